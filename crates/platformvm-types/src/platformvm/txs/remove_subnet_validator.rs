use crate::{
    codec,
    errors::{Error, Result},
    ids::{self, node},
    key, platformvm, txs,
};
use serde::{Deserialize, Serialize};

/// Removes a permissioned validator from a subnet, authorized by the
/// subnet owner keys.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#RemoveSubnetValidatorTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,

    #[serde(rename = "nodeID")]
    pub node_id: node::Id,
    #[serde(rename = "subnetID")]
    pub subnet_id: ids::Id,
    #[serde(rename = "subnetAuthorization")]
    pub subnet_auth: key::secp256k1::txs::Input,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.RemoveSubnetValidatorTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.subnet_id == *platformvm::PRIMARY_NETWORK_ID {
            return Err(Error::Other {
                message: "cannot remove a validator from the primary network".to_string(),
                retryable: false,
            });
        }
        self.subnet_auth.verify()
    }
}
