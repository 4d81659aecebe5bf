use crate::{
    codec,
    errors::{Error, Result},
    ids, txs,
};
use serde::{Deserialize, Serialize};

/// Consumes UTXOs held in the shared memory of a peer chain and
/// produces them on this chain.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#ImportTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,

    /// The chain the imported inputs were exported from.
    #[serde(rename = "sourceChain")]
    pub source_chain_id: ids::Id,
    #[serde(rename = "importedInputs")]
    pub imported_inputs: Vec<txs::transferable::Input>,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.ImportTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.imported_inputs.is_empty() {
            return Err(Error::Other {
                message: "tx has no imported inputs".to_string(), // ref. "errNoImportInputs"
                retryable: false,
            });
        }
        for input in self.imported_inputs.iter() {
            input.verify()?;
        }
        if !cmp_manager::is_sorted_and_unique(&self.imported_inputs) {
            return Err(Error::Other {
                message: "imported inputs not sorted and unique".to_string(),
                retryable: false,
            });
        }
        Ok(())
    }
}
