use crate::codec;
use serde::{Deserialize, Serialize};

/// Proposes moving the chain time forward; a proposal transaction,
/// never executed by the standard executor.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#AdvanceTimeTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    /// Unix time this block proposes increasing the timestamp to.
    pub time: u64,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.AdvanceTimeTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }
}
