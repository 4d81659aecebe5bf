use crate::{
    codec,
    errors::{Error, Result},
    ids::{self, node},
    key, platformvm,
    platformvm::txs::staker::{Priority, Staker},
    txs,
};
use serde::{Deserialize, Serialize};

/// Adds a validator to the primary network, staking the locked
/// outputs for the validation window.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#AddValidatorTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,

    pub validator: platformvm::txs::Validator,
    #[serde(rename = "stake")]
    pub stake_outs: Vec<txs::transferable::Output>,
    #[serde(rename = "rewardsOwner")]
    pub rewards_owner: key::secp256k1::txs::OutputOwners,

    /// Fee this validator charges delegators, in parts per million.
    #[serde(rename = "shares")]
    pub delegation_shares: u32,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.AddValidatorTx".to_string()
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
        self.rewards_owner.verify()?;
        let staked = platformvm::txs::verify_stake_outs(&self.stake_outs)?;
        if staked != self.validator.weight {
            return Err(Error::Other {
                message: format!(
                    "staked amount {} does not match validator weight {}",
                    staked, self.validator.weight
                ), // ref. "errValidatorWeightMismatch"
                retryable: false,
            });
        }
        Ok(())
    }
}

impl Staker for Tx {
    fn node_id(&self) -> node::Id {
        self.validator.node_id
    }

    fn subnet_id(&self) -> ids::Id {
        *platformvm::PRIMARY_NETWORK_ID
    }

    fn weight(&self) -> u64 {
        self.validator.weight
    }

    fn start_time(&self) -> Option<u64> {
        Some(self.validator.start)
    }

    fn end_time(&self) -> u64 {
        self.validator.end
    }

    fn pending_priority(&self) -> Priority {
        Priority::PrimaryNetworkValidatorPending
    }

    fn current_priority(&self) -> Priority {
        Priority::PrimaryNetworkValidatorCurrent
    }
}
