//! secp256k1 credential types.
pub mod transfer;

use std::cmp::Ordering;

use crate::{
    codec::{self, serde::hex_0x_bytes::Hex0xBytes},
    errors::{Error, Result},
    ids::short,
    key::secp256k1,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Orders two wire arrays the way their encodings compare. The codec
/// writes the element count ahead of the elements, so a shorter
/// array always packs lower; ties fall back to element order.
pub(crate) fn cmp_wire_arrays<T: Ord>(a: &[T], b: &[T]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// A signature set over a transaction, one per input, plus a
/// trailing credential when a subnet authorization is consumed.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#Credential>
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Credential {
    /// Recoverable signatures, 65 bytes each.
    #[serde_as(as = "Vec<Hex0xBytes>")]
    pub signatures: Vec<Vec<u8>>,
}

impl Credential {
    pub fn new(sigs: Vec<Vec<u8>>) -> Self {
        Self { signatures: sigs }
    }

    pub fn type_name() -> String {
        "secp256k1fx.Credential".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    /// Checks the shape of the signature set.
    pub fn verify(&self) -> Result<()> {
        for sig in self.signatures.iter() {
            if sig.len() != secp256k1::SIGNATURE_LEN {
                return Err(Error::Other {
                    message: format!(
                        "credential signature length {} != {}",
                        sig.len(),
                        secp256k1::SIGNATURE_LEN
                    ),
                    retryable: false,
                });
            }
        }
        Ok(())
    }
}

impl Ord for Credential {
    fn cmp(&self, other: &Credential) -> Ordering {
        cmp_wire_arrays(&self.signatures, &other.signatures)
    }
}

impl PartialOrd for Credential {
    fn partial_cmp(&self, other: &Credential) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Credential) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// The bare signature-index input, used as the subnet authorization
/// proof.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#Input>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Input {
    #[serde(rename = "signatureIndices")]
    pub sig_indices: Vec<u32>,
}

impl Input {
    pub fn new(sig_indices: Vec<u32>) -> Self {
        Self { sig_indices }
    }

    pub fn type_name() -> String {
        "secp256k1fx.Input".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
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
        cmp_wire_arrays(&self.sig_indices, &other.sig_indices)
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

/// The owners of an output: the addresses that may sign for it, how
/// many of them must, and the time before which none of them can.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#OutputOwners>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct OutputOwners {
    pub locktime: u64,
    pub threshold: u32,
    pub addresses: Vec<short::Id>,
}

impl OutputOwners {
    pub fn new(locktime: u64, threshold: u32, addrs: &[short::Id]) -> Self {
        Self {
            locktime,
            threshold,
            addresses: Vec::from(addrs),
        }
    }

    pub fn type_name() -> String {
        "secp256k1fx.OutputOwners".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    /// Checks the owner invariants: a satisfiable threshold and
    /// canonically ordered, unique addresses.
    pub fn verify(&self) -> Result<()> {
        if self.threshold as usize > self.addresses.len() {
            return Err(Error::Other {
                message: format!(
                    "threshold {} exceeds number of addresses {}",
                    self.threshold,
                    self.addresses.len()
                ), // ref. "errOutputUnspendable"
                retryable: false,
            });
        }
        if !cmp_manager::is_sorted_and_unique(&self.addresses) {
            return Err(Error::Other {
                message: "addresses not sorted and unique".to_string(), // ref. "errAddrsNotSortedUnique"
                retryable: false,
            });
        }
        Ok(())
    }
}

impl Ord for OutputOwners {
    fn cmp(&self, other: &OutputOwners) -> Ordering {
        self.locktime
            .cmp(&other.locktime)
            .then_with(|| self.threshold.cmp(&other.threshold))
            .then_with(|| cmp_wire_arrays(&self.addresses, &other.addresses))
    }
}

impl PartialOrd for OutputOwners {
    fn partial_cmp(&self, other: &OutputOwners) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OutputOwners {
    fn eq(&self, other: &OutputOwners) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- key::secp256k1::txs::test_cmp_wire_arrays --exact --show-output
#[test]
fn test_cmp_wire_arrays() {
    // length decides before content
    assert_eq!(cmp_wire_arrays(&[9u32], &[1, 2]), Ordering::Less);
    assert_eq!(cmp_wire_arrays(&[1u32, 2], &[9]), Ordering::Greater);
    assert_eq!(cmp_wire_arrays(&[1u32, 2], &[1, 3]), Ordering::Less);
    assert_eq!(cmp_wire_arrays(&[1u32, 2], &[1, 2]), Ordering::Equal);

    // the same rule drives the credential and input orderings
    let short_cred = Credential::new(vec![vec![0xff]]);
    let long_cred = Credential::new(vec![vec![0x00], vec![0x00]]);
    assert!(short_cred < long_cred);

    let short_input = Input::new(vec![7]);
    let long_input = Input::new(vec![0, 1]);
    assert!(short_input < long_input);
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- key::secp256k1::txs::test_output_owners_verify --exact --show-output
#[test]
fn test_output_owners_verify() {
    let owners = OutputOwners::new(
        0,
        1,
        &[
            short::Id::from_slice(&[1, 2, 3]),
            short::Id::from_slice(&[4, 5, 6]),
        ],
    );
    assert!(owners.verify().is_ok());

    // threshold beyond the address set is unspendable
    let owners = OutputOwners::new(0, 3, &[short::Id::from_slice(&[1, 2, 3])]);
    assert!(owners.verify().is_err());

    // addresses out of order
    let owners = OutputOwners::new(
        0,
        1,
        &[
            short::Id::from_slice(&[4, 5, 6]),
            short::Id::from_slice(&[1, 2, 3]),
        ],
    );
    assert!(owners.verify().is_err());
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- key::secp256k1::txs::test_credential_custom_de_serializer --exact --show-output
#[test]
fn test_credential_custom_de_serializer() {
    let d = Credential {
        signatures: vec![vec![123]],
    };

    let json_encoded = serde_json::to_string(&d).unwrap();
    println!("json_encoded:\n{}", json_encoded);
    let json_decoded = serde_json::from_str(&json_encoded).unwrap();
    assert_eq!(d, json_decoded);

    let json_decoded_2: Credential = serde_json::from_str(
        "

{
    \"signatures\":[\"0x7b\"]
}

",
    )
    .unwrap();
    assert_eq!(d, json_decoded_2);
}
