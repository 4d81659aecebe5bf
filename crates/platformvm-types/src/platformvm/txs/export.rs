use crate::{
    codec,
    errors::{Error, Result},
    ids, txs,
};
use serde::{Deserialize, Serialize};

/// Moves UTXOs from this chain into the shared memory of a peer
/// chain.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#ExportTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,

    /// The chain the exported outputs are consumable on.
    #[serde(rename = "destinationChain")]
    pub destination_chain_id: ids::Id,
    #[serde(rename = "exportedOutputs")]
    pub exported_outputs: Vec<txs::transferable::Output>,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.ExportTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.exported_outputs.is_empty() {
            return Err(Error::Other {
                message: "tx has no exported outputs".to_string(), // ref. "errNoExportOutputs"
                retryable: false,
            });
        }
        for out in self.exported_outputs.iter() {
            out.verify()?;
        }
        if !self.exported_outputs.windows(2).all(|w| w[0] <= w[1]) {
            return Err(Error::Other {
                message: "exported outputs not sorted".to_string(), // ref. "errOutputsNotSorted"
                retryable: false,
            });
        }
        Ok(())
    }
}
