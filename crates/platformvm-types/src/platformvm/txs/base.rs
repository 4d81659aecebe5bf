use crate::{codec, txs};
use serde::{Deserialize, Serialize};

/// A plain value transfer, only valid once the Durango upgrade is
/// active.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#BaseTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,
}

impl Tx {
    pub fn new(base_tx: txs::Tx) -> Self {
        Self { base_tx }
    }

    pub fn type_name() -> String {
        "platformvm.BaseTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }
}
