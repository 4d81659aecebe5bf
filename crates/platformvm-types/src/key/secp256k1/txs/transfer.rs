//! Fungible transfer forms: the output an amount lands in and the
//! input that consumes one.
use std::cmp::Ordering;

use crate::{
    codec,
    errors::{Error, Result},
    packer::{Packable, Packer},
};
use serde::{Deserialize, Serialize};

use super::{cmp_wire_arrays, OutputOwners};

/// A fungible amount held by a set of owners.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#TransferOutput>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Output {
    pub amount: u64,

    /// Serialized at the same level as "amount", as the wire form
    /// embeds the owners inline.
    #[serde(flatten)]
    pub output_owners: OutputOwners,
}

impl Output {
    pub fn new(amount: u64, output_owners: OutputOwners) -> Self {
        Self {
            amount,
            output_owners,
        }
    }

    pub fn type_name() -> String {
        "secp256k1fx.TransferOutput".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.amount == 0 {
            return Err(Error::Other {
                message: "output has no value".to_string(), // ref. "errNoValueOutput"
                retryable: false,
            });
        }
        self.output_owners.verify()
    }
}

impl Packable for Output {
    fn pack(&self, packer: &Packer) -> Result<()> {
        // type id, then the amount, then the owners inline
        packer.pack_u32(Self::type_id())?;
        packer.pack_u64(self.amount)?;

        packer.pack_u64(self.output_owners.locktime)?;
        packer.pack_u32(self.output_owners.threshold)?;
        packer.pack_u32(self.output_owners.addresses.len() as u32)?;
        for addr in self.output_owners.addresses.iter() {
            packer.pack_bytes(addr.as_ref())?;
        }
        Ok(())
    }
}

impl Ord for Output {
    fn cmp(&self, other: &Output) -> Ordering {
        self.amount
            .cmp(&other.amount)
            .then_with(|| self.output_owners.cmp(&other.output_owners))
    }
}

impl PartialOrd for Output {
    fn partial_cmp(&self, other: &Output) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Output {
    fn eq(&self, other: &Output) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// A fungible amount consumed from a referenced UTXO.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#TransferInput>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Input {
    pub amount: u64,
    #[serde(rename = "signatureIndices")]
    pub sig_indices: Vec<u32>,
}

impl Input {
    pub fn new(amount: u64, sig_indices: Vec<u32>) -> Self {
        Self {
            amount,
            sig_indices,
        }
    }

    pub fn type_name() -> String {
        "secp256k1fx.TransferInput".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.amount == 0 {
            return Err(Error::Other {
                message: "input has no value".to_string(), // ref. "errNoValueInput"
                retryable: false,
            });
        }
        if !cmp_manager::is_sorted_and_unique(&self.sig_indices) {
            return Err(Error::Other {
                message: "signatures not sorted and unique".to_string(), // ref. "errNotSortedUnique"
                retryable: false,
            });
        }
        Ok(())
    }
}

impl Ord for Input {
    fn cmp(&self, other: &Input) -> Ordering {
        self.amount
            .cmp(&other.amount)
            .then_with(|| cmp_wire_arrays(&self.sig_indices, &other.sig_indices))
    }
}

impl PartialOrd for Input {
    fn partial_cmp(&self, other: &Input) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Input {
    fn eq(&self, other: &Input) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- key::secp256k1::txs::transfer::test_verify --exact --show-output
#[test]
fn test_verify() {
    use crate::ids::short;

    let out = Output::new(
        10,
        OutputOwners::new(0, 1, &[short::Id::from_slice(&[1, 2, 3])]),
    );
    assert!(out.verify().is_ok());
    assert!(Output::default().verify().is_err());

    let input = Input::new(10, vec![0]);
    assert!(input.verify().is_ok());
    assert!(Input::new(0, vec![0]).verify().is_err());
    assert!(Input::new(10, vec![1, 0]).verify().is_err());
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- key::secp256k1::txs::transfer::test_sort_transfer_inputs --exact --show-output
#[test]
fn test_sort_transfer_inputs() {
    // amounts decide first; the signature-index arrays break ties
    let mut inputs: Vec<Input> = Vec::new();
    for i in (0..10).rev() {
        inputs.push(Input {
            amount: 5,
            sig_indices: vec![i as u32, 2, 3],
        });
        inputs.push(Input {
            amount: 5,
            sig_indices: vec![i as u32, 1, 3],
        });
    }
    assert!(!cmp_manager::is_sorted_and_unique(&inputs));
    inputs.sort();

    let mut sorted_inputs: Vec<Input> = Vec::new();
    for i in 0..10 {
        sorted_inputs.push(Input {
            amount: 5,
            sig_indices: vec![i as u32, 1, 3],
        });
        sorted_inputs.push(Input {
            amount: 5,
            sig_indices: vec![i as u32, 2, 3],
        });
    }
    assert!(cmp_manager::is_sorted_and_unique(&sorted_inputs));
    assert_eq!(inputs, sorted_inputs);
}
