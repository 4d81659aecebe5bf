//! Protocol configuration: the fee table and the feature-activation
//! schedule, both pure functions of the chain timestamp.
use crate::rewards;
use platformvm_types::units;
use serde::{Deserialize, Serialize};

/// Execution configuration shared by every handler. Immutable for the
/// lifetime of one execution.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Fee burned by most transactions.
    #[serde(rename = "txFee")]
    pub tx_fee: u64,
    /// Fee the create-subnet and create-blockchain operations fall
    /// back to before the ApricotPhase3 fee split.
    #[serde(rename = "createAssetTxFee")]
    pub create_asset_tx_fee: u64,
    #[serde(rename = "createSubnetTxFee")]
    pub create_subnet_tx_fee: u64,
    #[serde(rename = "createBlockchainTxFee")]
    pub create_blockchain_tx_fee: u64,
    #[serde(rename = "transformSubnetTxFee")]
    pub transform_subnet_tx_fee: u64,
    #[serde(rename = "addPrimaryNetworkValidatorFee")]
    pub add_primary_network_validator_fee: u64,
    #[serde(rename = "addPrimaryNetworkDelegatorFee")]
    pub add_primary_network_delegator_fee: u64,
    #[serde(rename = "addSubnetValidatorFee")]
    pub add_subnet_validator_fee: u64,
    #[serde(rename = "addSubnetDelegatorFee")]
    pub add_subnet_delegator_fee: u64,

    /// Smallest stake a primary network validator may lock.
    #[serde(rename = "minValidatorStake")]
    pub min_validator_stake: u64,
    /// Largest total stake (own plus delegated) a primary network
    /// validator may hold.
    #[serde(rename = "maxValidatorStake")]
    pub max_validator_stake: u64,
    #[serde(rename = "minDelegatorStake")]
    pub min_delegator_stake: u64,
    /// Smallest delegation fee a validator may charge, in parts per
    /// million.
    #[serde(rename = "minDelegationFee")]
    pub min_delegation_fee: u32,
    /// Staking window bounds, in seconds.
    #[serde(rename = "minStakeDuration")]
    pub min_stake_duration: u64,
    #[serde(rename = "maxStakeDuration")]
    pub max_stake_duration: u64,
    /// How far ahead of chain time a pre-Durango staker may schedule
    /// its start, in seconds.
    #[serde(rename = "maxFutureStartTime")]
    pub max_future_start_time: u64,

    /// Whether this node only partially syncs the primary network.
    /// Such a node cannot vouch for cross-chain state and must not
    /// stake itself.
    #[serde(rename = "partialSyncPrimaryNetwork")]
    pub partial_sync_primary_network: bool,

    /// Unix seconds each upgrade activates at.
    #[serde(rename = "apricotPhase3Time")]
    pub apricot_phase3_time: u64,
    #[serde(rename = "durangoTime")]
    pub durango_time: u64,

    #[serde(rename = "rewardConfig")]
    pub reward_config: rewards::Config,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tx_fee: units::MILLI_AVAX,
            create_asset_tx_fee: 10 * units::MILLI_AVAX,
            create_subnet_tx_fee: units::AVAX,
            create_blockchain_tx_fee: units::AVAX,
            transform_subnet_tx_fee: 10 * units::AVAX,
            add_primary_network_validator_fee: 0,
            add_primary_network_delegator_fee: 0,
            add_subnet_validator_fee: units::MILLI_AVAX,
            add_subnet_delegator_fee: units::MILLI_AVAX,
            min_validator_stake: 2_000 * units::AVAX,
            max_validator_stake: 3 * units::MEGA_AVAX,
            min_delegator_stake: 25 * units::AVAX,
            min_delegation_fee: 20_000, // 2%
            min_stake_duration: 2 * 7 * 24 * 60 * 60,
            max_stake_duration: 365 * 24 * 60 * 60,
            max_future_start_time: 24 * 60 * 60,
            partial_sync_primary_network: false,
            apricot_phase3_time: 0,
            durango_time: 0,
            reward_config: rewards::Config::default(),
        }
    }
}

impl Config {
    pub fn is_apricot_phase3_activated(&self, timestamp: u64) -> bool {
        timestamp >= self.apricot_phase3_time
    }

    pub fn is_durango_activated(&self, timestamp: u64) -> bool {
        timestamp >= self.durango_time
    }

    /// Returns the fee to create a new blockchain at the given chain
    /// time.
    pub fn get_create_blockchain_tx_fee(&self, timestamp: u64) -> u64 {
        if self.is_apricot_phase3_activated(timestamp) {
            self.create_blockchain_tx_fee
        } else {
            self.create_asset_tx_fee
        }
    }

    /// Returns the fee to create a new subnet at the given chain time.
    pub fn get_create_subnet_tx_fee(&self, timestamp: u64) -> u64 {
        if self.is_apricot_phase3_activated(timestamp) {
            self.create_subnet_tx_fee
        } else {
            self.create_asset_tx_fee
        }
    }
}

/// RUST_LOG=debug cargo test --package platformvm-executor --lib -- config::test_serde_round_trip --exact --show-output
#[test]
fn test_serde_round_trip() {
    let config = Config::default();
    let json_encoded = serde_json::to_string(&config).unwrap();
    let json_decoded: Config = serde_json::from_str(&json_encoded).unwrap();
    assert_eq!(config, json_decoded);
}

/// RUST_LOG=debug cargo test --package platformvm-executor --lib -- config::test_fee_schedule --exact --show-output
#[test]
fn test_fee_schedule() {
    let config = Config {
        apricot_phase3_time: 1_000,
        durango_time: 2_000,
        ..Config::default()
    };

    assert!(!config.is_apricot_phase3_activated(999));
    assert!(config.is_apricot_phase3_activated(1_000));
    assert!(!config.is_durango_activated(1_999));
    assert!(config.is_durango_activated(2_000));

    // pre-AP3 both creation fees fall back to the asset-creation fee
    assert_eq!(
        config.get_create_subnet_tx_fee(999),
        config.create_asset_tx_fee
    );
    assert_eq!(
        config.get_create_blockchain_tx_fee(999),
        config.create_asset_tx_fee
    );
    assert_eq!(
        config.get_create_subnet_tx_fee(1_000),
        config.create_subnet_tx_fee
    );
    assert_eq!(
        config.get_create_blockchain_tx_fee(1_000),
        config.create_blockchain_tx_fee
    );
}
