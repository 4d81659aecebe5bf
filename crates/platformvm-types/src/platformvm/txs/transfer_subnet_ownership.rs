use crate::{
    codec,
    errors::{Error, Result},
    ids, key, platformvm, txs,
};
use serde::{Deserialize, Serialize};

/// Transfers ownership of a subnet to a new key set, authorized by
/// the current subnet owner keys.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#TransferSubnetOwnershipTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,

    #[serde(rename = "subnetID")]
    pub subnet_id: ids::Id,
    pub owner: key::secp256k1::txs::OutputOwners,
    #[serde(rename = "subnetAuthorization")]
    pub subnet_auth: key::secp256k1::txs::Input,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.TransferSubnetOwnershipTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.subnet_id == *platformvm::PRIMARY_NETWORK_ID {
            return Err(Error::Other {
                message: "cannot transfer ownership of the primary network".to_string(),
                retryable: false,
            });
        }
        self.owner.verify()?;
        self.subnet_auth.verify()
    }
}
