use crate::{
    codec,
    errors::{Error, Result},
    ids::{self, node},
    key, platformvm,
    platformvm::txs::staker::{Priority, Staker},
    txs,
};
use serde::{Deserialize, Serialize};

/// Adds a validator to any permissionless network: the primary
/// network, or a subnet that has been transformed into a
/// permissionless one.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#AddPermissionlessValidatorTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,

    pub validator: platformvm::txs::SubnetValidator,
    #[serde(rename = "stake")]
    pub stake_outs: Vec<txs::transferable::Output>,
    #[serde(rename = "validationRewardsOwner")]
    pub validation_rewards_owner: key::secp256k1::txs::OutputOwners,
    #[serde(rename = "delegationRewardsOwner")]
    pub delegation_rewards_owner: key::secp256k1::txs::OutputOwners,

    /// Fee this validator charges delegators, in parts per million.
    #[serde(rename = "shares")]
    pub delegation_shares: u32,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.AddPermissionlessValidatorTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    /// Total amount this transaction stakes.
    pub fn staked_amount(&self) -> u64 {
        self.stake_outs.iter().map(|out| out.out.amount()).sum()
    }

    pub fn verify(&self) -> Result<()> {
        self.validator.verify()?;
        if self.delegation_shares as u64 > platformvm::txs::PERCENT_DENOMINATOR {
            return Err(Error::Other {
                message: format!(
                    "delegation shares {} exceed denominator {}",
                    self.delegation_shares,
                    platformvm::txs::PERCENT_DENOMINATOR
                ), // ref. "errTooManyShares"
                retryable: false,
            });
        }
        self.validation_rewards_owner.verify()?;
        self.delegation_rewards_owner.verify()?;
        let staked = platformvm::txs::verify_stake_outs(&self.stake_outs)?;
        if staked != self.validator.validator.weight {
            return Err(Error::Other {
                message: format!(
                    "staked amount {} does not match validator weight {}",
                    staked, self.validator.validator.weight
                ), // ref. "errValidatorWeightMismatch"
                retryable: false,
            });
        }
        Ok(())
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
        if self.validator.subnet_id == *platformvm::PRIMARY_NETWORK_ID {
            Priority::PrimaryNetworkValidatorPending
        } else {
            Priority::SubnetPermissionlessValidatorPending
        }
    }

    fn current_priority(&self) -> Priority {
        if self.validator.subnet_id == *platformvm::PRIMARY_NETWORK_ID {
            Priority::PrimaryNetworkValidatorCurrent
        } else {
            Priority::SubnetPermissionlessValidatorCurrent
        }
    }
}
