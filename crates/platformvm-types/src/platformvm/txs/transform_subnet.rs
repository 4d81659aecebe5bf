use crate::{
    codec,
    errors::{Error, Result},
    ids, key, platformvm, txs,
};
use serde::{Deserialize, Serialize};

/// Converts a permissioned subnet into a permissionless one with its
/// own staking asset and reward curve.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#TransformSubnetTx>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,

    #[serde(rename = "subnetID")]
    pub subnet_id: ids::Id,
    /// The asset stakers of this subnet must lock;
    /// never the platform fee asset.
    #[serde(rename = "assetID")]
    pub asset_id: ids::Id,
    #[serde(rename = "initialSupply")]
    pub initial_supply: u64,
    #[serde(rename = "maximumSupply")]
    pub maximum_supply: u64,
    #[serde(rename = "minConsumptionRate")]
    pub min_consumption_rate: u64,
    #[serde(rename = "maxConsumptionRate")]
    pub max_consumption_rate: u64,
    #[serde(rename = "minValidatorStake")]
    pub min_validator_stake: u64,
    #[serde(rename = "maxValidatorStake")]
    pub max_validator_stake: u64,
    #[serde(rename = "minStakeDuration")]
    pub min_stake_duration: u32,
    #[serde(rename = "maxStakeDuration")]
    pub max_stake_duration: u32,
    #[serde(rename = "minDelegationFee")]
    pub min_delegation_fee: u32,
    #[serde(rename = "minDelegatorStake")]
    pub min_delegator_stake: u64,
    #[serde(rename = "maxValidatorWeightFactor")]
    pub max_validator_weight_factor: u8,
    #[serde(rename = "uptimeRequirement")]
    pub uptime_requirement: u32,

    #[serde(rename = "subnetAuthorization")]
    pub subnet_auth: key::secp256k1::txs::Input,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.TransformSubnetTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.subnet_id == *platformvm::PRIMARY_NETWORK_ID {
            return Err(Error::Other {
                message: "cannot transform the primary network".to_string(), // ref. "errCantTransformPrimaryNetwork"
                retryable: false,
            });
        }
        if self.asset_id.is_empty() {
            return Err(Error::Other {
                message: "staking asset must be set".to_string(), // ref. "errEmptyAssetID"
                retryable: false,
            });
        }
        if self.initial_supply == 0 {
            return Err(Error::Other {
                message: "initial supply must be non-zero".to_string(), // ref. "errInitialSupplyZero"
                retryable: false,
            });
        }
        if self.initial_supply > self.maximum_supply {
            return Err(Error::Other {
                message: format!(
                    "initial supply {} exceeds maximum supply {}",
                    self.initial_supply, self.maximum_supply
                ), // ref. "errInitialSupplyGreaterThanMaxSupply"
                retryable: false,
            });
        }
        if self.min_consumption_rate > self.max_consumption_rate
            || self.max_consumption_rate > platformvm::txs::PERCENT_DENOMINATOR
        {
            return Err(Error::Other {
                message: "consumption rates out of range".to_string(),
                retryable: false,
            });
        }
        if self.min_validator_stake == 0 || self.min_validator_stake > self.max_validator_stake {
            return Err(Error::Other {
                message: "validator stake bounds out of range".to_string(),
                retryable: false,
            });
        }
        if self.min_stake_duration == 0 || self.min_stake_duration > self.max_stake_duration {
            return Err(Error::Other {
                message: "stake duration bounds out of range".to_string(),
                retryable: false,
            });
        }
        if self.min_delegation_fee as u64 > platformvm::txs::PERCENT_DENOMINATOR {
            return Err(Error::Other {
                message: "min delegation fee out of range".to_string(),
                retryable: false,
            });
        }
        if self.min_delegator_stake == 0 {
            return Err(Error::Other {
                message: "min delegator stake must be non-zero".to_string(),
                retryable: false,
            });
        }
        if self.max_validator_weight_factor == 0 {
            return Err(Error::Other {
                message: "max validator weight factor must be non-zero".to_string(), // ref. "errZeroMaxValidatorWeightFactor"
                retryable: false,
            });
        }
        if self.uptime_requirement as u64 > platformvm::txs::PERCENT_DENOMINATOR {
            return Err(Error::Other {
                message: "uptime requirement out of range".to_string(),
                retryable: false,
            });
        }
        self.subnet_auth.verify()
    }
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- platformvm::txs::transform_subnet::test_verify --exact --show-output
#[test]
fn test_verify() {
    let mut tx = Tx {
        subnet_id: ids::Id::from_slice(&[1]),
        asset_id: ids::Id::from_slice(&[2]),
        initial_supply: 1_000,
        maximum_supply: 5_000,
        min_consumption_rate: 100_000,
        max_consumption_rate: 120_000,
        min_validator_stake: 1,
        max_validator_stake: 100,
        min_stake_duration: 1,
        max_stake_duration: 100,
        min_delegation_fee: 20_000,
        min_delegator_stake: 1,
        max_validator_weight_factor: 5,
        uptime_requirement: 800_000,
        ..Tx::default()
    };
    assert!(tx.verify().is_ok());

    tx.initial_supply = 10_000;
    assert!(tx.verify().is_err());

    tx.initial_supply = 1_000;
    tx.asset_id = ids::Id::empty();
    assert!(tx.verify().is_err());
}
