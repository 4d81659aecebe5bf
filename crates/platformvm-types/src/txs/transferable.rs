use std::cmp::Ordering;

use crate::{
    errors::Result,
    ids, key,
    packer::{Packable, Packer},
    platformvm, txs,
};
use serde::{Deserialize, Serialize};

/// Implementation of "*components.avax.TransferOut"
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#TransferableOut>
/// which is either:
///
/// "*secp256k1fx.TransferOutput"
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#TransferOutput>
///
/// "*platformvm.StakeableLockOut" which embeds "*secp256k1fx.TransferOutput"
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm#StakeableLockOut>
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, PartialOrd)]
#[serde(untagged)]
pub enum TransferableOut {
    TransferOutput(key::secp256k1::txs::transfer::Output),
    StakeableLockOut(platformvm::txs::StakeableLockOut),
}

impl TransferableOut {
    pub fn type_id(&self) -> u32 {
        match self {
            TransferableOut::TransferOutput(_out) => {
                key::secp256k1::txs::transfer::Output::type_id()
            }
            TransferableOut::StakeableLockOut(_out) => platformvm::txs::StakeableLockOut::type_id(),
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            TransferableOut::TransferOutput(out) => out.amount,
            TransferableOut::StakeableLockOut(out) => out.transfer_output.amount,
        }
    }

    /// Returns the stakeable locktime, zero for plain transfer outputs.
    pub fn locktime(&self) -> u64 {
        match self {
            TransferableOut::TransferOutput(_out) => 0,
            TransferableOut::StakeableLockOut(out) => out.locktime,
        }
    }

    pub fn output_owners(&self) -> &key::secp256k1::txs::OutputOwners {
        match self {
            TransferableOut::TransferOutput(out) => &out.output_owners,
            TransferableOut::StakeableLockOut(out) => &out.transfer_output.output_owners,
        }
    }

    pub fn verify(&self) -> Result<()> {
        match self {
            TransferableOut::TransferOutput(out) => out.verify(),
            TransferableOut::StakeableLockOut(out) => out.transfer_output.verify(),
        }
    }
}

impl Packable for TransferableOut {
    fn pack(&self, packer: &Packer) -> Result<()> {
        match self {
            TransferableOut::TransferOutput(transfer_output) => {
                packer.pack(transfer_output)?;
            }
            TransferableOut::StakeableLockOut(stakeable_lock_out) => {
                // marshal type ID "platformvm::txs::StakeableLockOut"
                packer.pack_u32(platformvm::txs::StakeableLockOut::type_id())?;

                // marshal "platformvm::txs::StakeableLockOut.locktime" field
                packer.pack_u64(stakeable_lock_out.locktime)?;
                packer.pack(&stakeable_lock_out.transfer_output)?;
            }
        }
        Ok(())
    }
}

impl Ord for TransferableOut {
    fn cmp(&self, other: &TransferableOut) -> Ordering {
        // the wire leads with the type id, so it decides the order
        // across forms without marshaling anything
        self.type_id().cmp(&other.type_id()).then_with(|| {
            match (self, other) {
                (
                    TransferableOut::TransferOutput(out_self),
                    TransferableOut::TransferOutput(out_other),
                ) => out_self.cmp(out_other),
                (
                    TransferableOut::StakeableLockOut(out_self),
                    TransferableOut::StakeableLockOut(out_other),
                ) => out_self.cmp(out_other),
                // unreachable once the type ids tied
                (_, _) => Ordering::Equal,
            }
        })
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#TransferableOutput>
#[derive(Debug, Serialize, Deserialize, Eq, Clone)]
pub struct Output {
    #[serde(rename = "assetID")]
    pub asset_id: ids::Id,

    #[serde(rename = "output")]
    pub out: TransferableOut,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            asset_id: ids::Id::empty(),
            out: TransferableOut::TransferOutput(Default::default()),
        }
    }
}

impl Output {
    pub fn new(asset_id: ids::Id, out: TransferableOut) -> Self {
        Self { asset_id, out }
    }

    pub fn verify(&self) -> Result<()> {
        self.out.verify()
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#SortTransferableOutputs>
impl Ord for Output {
    fn cmp(&self, other: &Output) -> Ordering {
        self.asset_id
            .cmp(&other.asset_id)
            .then_with(|| self.out.cmp(&other.out))
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

/// Implementation of "*components.avax.TransferIn"
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#TransferableIn>
/// which is either:
///
/// "*secp256k1fx.TransferInput"
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/secp256k1fx#TransferInput>
///
/// "*platformvm.StakeableLockIn" which embeds "*secp256k1fx.TransferInput"
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm#StakeableLockIn>
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, PartialOrd)]
#[serde(untagged)]
pub enum TransferableIn {
    TransferInput(key::secp256k1::txs::transfer::Input),
    StakeableLockIn(platformvm::txs::StakeableLockIn),
}

impl TransferableIn {
    pub fn type_id(&self) -> u32 {
        match self {
            TransferableIn::TransferInput(_input) => {
                key::secp256k1::txs::transfer::Input::type_id()
            }
            TransferableIn::StakeableLockIn(_input) => platformvm::txs::StakeableLockIn::type_id(),
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            TransferableIn::TransferInput(input) => input.amount,
            TransferableIn::StakeableLockIn(input) => input.transfer_input.amount,
        }
    }

    /// Returns the stakeable locktime, zero for plain transfer inputs.
    pub fn locktime(&self) -> u64 {
        match self {
            TransferableIn::TransferInput(_input) => 0,
            TransferableIn::StakeableLockIn(input) => input.locktime,
        }
    }

    pub fn sig_indices(&self) -> &[u32] {
        match self {
            TransferableIn::TransferInput(input) => &input.sig_indices,
            TransferableIn::StakeableLockIn(input) => &input.transfer_input.sig_indices,
        }
    }

    pub fn verify(&self) -> Result<()> {
        match self {
            TransferableIn::TransferInput(input) => input.verify(),
            TransferableIn::StakeableLockIn(input) => input.transfer_input.verify(),
        }
    }
}

impl Ord for TransferableIn {
    fn cmp(&self, other: &TransferableIn) -> Ordering {
        // type id decides across forms, as in the wire encoding
        self.type_id().cmp(&other.type_id()).then_with(|| {
            match (self, other) {
                (
                    TransferableIn::TransferInput(in_self),
                    TransferableIn::TransferInput(in_other),
                ) => in_self.cmp(in_other),
                (
                    TransferableIn::StakeableLockIn(in_self),
                    TransferableIn::StakeableLockIn(in_other),
                ) => in_self.cmp(in_other),
                // unreachable once the type ids tied
                (_, _) => Ordering::Equal,
            }
        })
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#TransferableInput>
#[derive(Debug, Serialize, Deserialize, Eq, Clone)]
pub struct Input {
    #[serde(flatten)]
    pub utxo_id: txs::utxo::Id,

    #[serde(rename = "assetID")]
    pub asset_id: ids::Id,

    #[serde(rename = "input")]
    pub input: TransferableIn,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            utxo_id: txs::utxo::Id::default(),
            asset_id: ids::Id::empty(),
            input: TransferableIn::TransferInput(Default::default()),
        }
    }
}

impl Input {
    /// Returns the id of the referenced UTXO, the key the state
    /// diff stores the UTXO under.
    pub fn input_id(&self) -> ids::Id {
        self.utxo_id.id
    }

    pub fn verify(&self) -> Result<()> {
        self.input.verify()
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#SortTransferableInputs>
impl Ord for Input {
    fn cmp(&self, other: &Input) -> Ordering {
        self.utxo_id.cmp(&other.utxo_id)
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

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- txs::transferable::test_sort_transferable_inputs --exact --show-output
#[test]
fn test_sort_transferable_inputs() {
    let mut inputs: Vec<Input> = Vec::new();
    for i in (0..10).rev() {
        inputs.push(Input {
            utxo_id: txs::utxo::Id::new(&[i as u8; 32], 1).unwrap(),
            ..Input::default()
        });
        inputs.push(Input {
            utxo_id: txs::utxo::Id::new(&[i as u8; 32], 0).unwrap(),
            ..Input::default()
        });
    }
    assert!(!cmp_manager::is_sorted_and_unique(&inputs));
    inputs.sort();

    let mut sorted_inputs: Vec<Input> = Vec::new();
    for i in 0..10 {
        sorted_inputs.push(Input {
            utxo_id: txs::utxo::Id::new(&[i as u8; 32], 0).unwrap(),
            ..Input::default()
        });
        sorted_inputs.push(Input {
            utxo_id: txs::utxo::Id::new(&[i as u8; 32], 1).unwrap(),
            ..Input::default()
        });
    }
    assert!(cmp_manager::is_sorted_and_unique(&sorted_inputs));
    assert_eq!(inputs, sorted_inputs);
}
