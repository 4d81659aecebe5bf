use crate::{codec, ids};
use serde::{Deserialize, Serialize};

/// Proposes rewarding a staker whose window has ended; a proposal
/// transaction, never executed by the standard executor.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#RewardValidatorTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    /// ID of the staker transaction being rewarded.
    #[serde(rename = "txID")]
    pub tx_id: ids::Id,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.RewardValidatorTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }
}
