//! Definitions of the shared transaction components.
pub mod transferable;
pub mod utxo;

use crate::{
    codec::serde::hex_0x_bytes::Hex0xBytes,
    errors::{Error, Result},
    hash, ids,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// The base transaction carried by every variant: the value-transfer
/// fields common to the whole platform chain.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#BaseTx>
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(rename = "networkID")]
    pub network_id: u32,
    #[serde(rename = "blockchainID")]
    pub blockchain_id: ids::Id,

    #[serde(rename = "outputs")]
    pub transferable_outputs: Vec<transferable::Output>,
    #[serde(rename = "inputs")]
    pub transferable_inputs: Vec<transferable::Input>,

    #[serde_as(as = "Hex0xBytes")]
    pub memo: Vec<u8>,
}

impl Tx {
    /// Checks that the base transaction is well formed under the
    /// given chain identifiers: every input and output verifies and
    /// the sets are canonically ordered (outputs sorted, inputs
    /// sorted and unique). Memo length rules are feature-gated and
    /// checked by the executor, not here.
    pub fn syntactic_verify(&self, network_id: u32, blockchain_id: ids::Id) -> Result<()> {
        if self.network_id != network_id {
            return Err(Error::Other {
                message: format!(
                    "tx has network ID {} but expected {}",
                    self.network_id, network_id
                ),
                retryable: false,
            });
        }
        if self.blockchain_id != blockchain_id {
            return Err(Error::Other {
                message: format!(
                    "tx has blockchain ID {} but expected {}",
                    self.blockchain_id, blockchain_id
                ),
                retryable: false,
            });
        }

        for out in self.transferable_outputs.iter() {
            out.verify()?;
        }
        for input in self.transferable_inputs.iter() {
            input.verify()?;
        }

        if !self
            .transferable_outputs
            .windows(2)
            .all(|w| w[0] <= w[1])
        {
            return Err(Error::Other {
                message: "outputs not sorted".to_string(), // ref. "errOutputsNotSorted"
                retryable: false,
            });
        }
        if !cmp_manager::is_sorted_and_unique(&self.transferable_inputs) {
            return Err(Error::Other {
                message: "inputs not sorted and unique".to_string(), // ref. "errInputsNotSortedUnique"
                retryable: false,
            });
        }
        Ok(())
    }
}

/// Transaction identity established at decode/sign time.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#Metadata>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Metadata {
    pub id: ids::Id,
    pub tx_bytes_with_no_signature: Vec<u8>,
    pub tx_bytes_with_signatures: Vec<u8>,
}

impl Metadata {
    pub fn new(tx_bytes_with_no_signature: &[u8], tx_bytes_with_signatures: &[u8]) -> Self {
        let id = hash::sha256(tx_bytes_with_signatures);
        let id = ids::Id::from_slice(&id);
        Self {
            id,
            tx_bytes_with_no_signature: Vec::from(tx_bytes_with_no_signature),
            tx_bytes_with_signatures: Vec::from(tx_bytes_with_signatures),
        }
    }

    pub fn verify(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::Other {
                message: "metadata was never initialized and is not valid".to_string(), // ref. "errMetadataNotInitialize"
                retryable: false,
            });
        }
        Ok(())
    }
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- txs::test_base_tx_syntactic_verify --exact --show-output
#[test]
fn test_base_tx_syntactic_verify() {
    use crate::key;

    let chain_id = ids::Id::from_slice(&[7, 7, 7]);
    let mut tx = Tx {
        network_id: 1,
        blockchain_id: chain_id,
        ..Tx::default()
    };
    assert!(tx.syntactic_verify(1, chain_id).is_ok());
    assert!(tx.syntactic_verify(2, chain_id).is_err());
    assert!(tx.syntactic_verify(1, ids::Id::empty()).is_err());

    // unsorted inputs must be rejected
    let in_a = transferable::Input {
        utxo_id: utxo::Id::new(&[2; 32], 0).unwrap(),
        asset_id: ids::Id::from_slice(&[1]),
        input: transferable::TransferableIn::TransferInput(
            key::secp256k1::txs::transfer::Input::new(10, vec![0]),
        ),
    };
    let in_b = transferable::Input {
        utxo_id: utxo::Id::new(&[1; 32], 0).unwrap(),
        asset_id: ids::Id::from_slice(&[1]),
        input: transferable::TransferableIn::TransferInput(
            key::secp256k1::txs::transfer::Input::new(10, vec![0]),
        ),
    };
    tx.transferable_inputs = vec![in_a.clone(), in_b.clone()];
    assert!(tx.syntactic_verify(1, chain_id).is_err());

    tx.transferable_inputs = vec![in_b, in_a];
    assert!(tx.syntactic_verify(1, chain_id).is_ok());
}
