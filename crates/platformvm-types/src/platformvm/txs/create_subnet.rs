use crate::{codec, errors::Result, key, txs};
use serde::{Deserialize, Serialize};

/// Creates a new subnet owned by the given key set.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#CreateSubnetTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,

    /// Keys that may authorize subnet operations
    /// (adding chains, permissioned validators, ...).
    pub owner: key::secp256k1::txs::OutputOwners,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.CreateSubnetTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        self.owner.verify()
    }
}
