use crate::{
    codec,
    errors::{Error, Result},
    ids::{self, node},
    key, platformvm,
    platformvm::txs::staker::{Priority, Staker},
    txs,
};
use serde::{Deserialize, Serialize};

/// Adds a permissioned validator to a subnet, authorized by the
/// subnet owner keys.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#AddSubnetValidatorTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,

    pub validator: platformvm::txs::SubnetValidator,
    #[serde(rename = "subnetAuthorization")]
    pub subnet_auth: key::secp256k1::txs::Input,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.AddSubnetValidatorTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.validator.subnet_id == *platformvm::PRIMARY_NETWORK_ID {
            return Err(Error::Other {
                message: "cannot add a subnet validator to the primary network".to_string(),
                retryable: false,
            });
        }
        self.validator.verify()?;
        self.subnet_auth.verify()
    }
}

impl Staker for Tx {
    fn node_id(&self) -> node::Id {
        self.validator.validator.node_id
    }

    fn subnet_id(&self) -> ids::Id {
        self.validator.subnet_id
    }

    fn weight(&self) -> u64 {
        self.validator.validator.weight
    }

    fn start_time(&self) -> Option<u64> {
        Some(self.validator.validator.start)
    }

    fn end_time(&self) -> u64 {
        self.validator.validator.end
    }

    fn pending_priority(&self) -> Priority {
        Priority::SubnetPermissionedValidatorPending
    }

    fn current_priority(&self) -> Priority {
        Priority::SubnetPermissionedValidatorCurrent
    }
}
