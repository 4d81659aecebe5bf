//! Staking reward curves with exact integer arithmetic.
use crate::{
    config,
    errors::{Error, Result},
    state::Diff,
};
use num_bigint::BigUint;
use platformvm_types::{
    ids,
    platformvm::{self, txs::UnsignedTx},
    units,
};
use serde::{Deserialize, Serialize};

/// Denominator of consumption rates, in parts per million.
pub const PERCENT_DENOMINATOR: u64 = platformvm_types::platformvm::txs::PERCENT_DENOMINATOR;

/// Static parameters of a reward curve.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Rate paid to a staker locking for the full minting period,
    /// in parts per million.
    #[serde(rename = "maxConsumptionRate")]
    pub max_consumption_rate: u64,
    /// Rate paid to a staker locking for an instant, in parts per
    /// million.
    #[serde(rename = "minConsumptionRate")]
    pub min_consumption_rate: u64,
    /// Period over which the consumption rate interpolates, in
    /// seconds.
    #[serde(rename = "mintingPeriod")]
    pub minting_period: u64,
    /// Supply the curve asymptotically mints towards.
    #[serde(rename = "supplyCap")]
    pub supply_cap: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_consumption_rate: 120_000, // 12%
            min_consumption_rate: 100_000, // 10%
            minting_period: 365 * 24 * 60 * 60,
            supply_cap: 720 * units::MEGA_AVAX,
        }
    }
}

/// Computes the potential reward of one staker under a reward curve.
/// All arithmetic is exact; no floating point anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculator {
    config: Config,
}

impl Calculator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Returns the reward minted for staking "stake_amount" over
    /// "staked_duration" seconds at the given supply. The consumption
    /// rate interpolates linearly between the configured minimum and
    /// maximum by the fraction of the minting period staked.
    pub fn calculate(&self, staked_duration: u64, stake_amount: u64, current_supply: u64) -> u64 {
        if current_supply == 0 || current_supply >= self.config.supply_cap {
            return 0;
        }

        let duration = staked_duration.min(self.config.minting_period);
        let remaining_supply = self.config.supply_cap - current_supply;

        // rate numerator, scaled by PERCENT_DENOMINATOR * minting_period
        let rate_numerator = BigUint::from(self.config.min_consumption_rate)
            * self.config.minting_period
            + BigUint::from(
                self.config
                    .max_consumption_rate
                    .saturating_sub(self.config.min_consumption_rate),
            ) * duration;

        let reward = BigUint::from(remaining_supply) * duration * stake_amount * rate_numerator
            / (BigUint::from(current_supply)
                * self.config.minting_period
                * self.config.minting_period
                * PERCENT_DENOMINATOR);

        // the minted amount can never push the supply past the cap
        u64::try_from(reward)
            .unwrap_or(remaining_supply)
            .min(remaining_supply)
    }
}

/// Returns the reward calculator governing the given subnet: the
/// primary network uses the configured curve; a transformed subnet
/// derives its curve from its transformation transaction.
pub fn calculator_for_subnet<D: Diff>(
    config: &config::Config,
    state: &D,
    subnet_id: &ids::Id,
) -> Result<Calculator> {
    if *subnet_id == *platformvm::PRIMARY_NETWORK_ID {
        return Ok(Calculator::new(config.reward_config.clone()));
    }

    let transformation = state
        .get_subnet_transformation(subnet_id)
        .ok_or(Error::SubnetNotTransformed {
            subnet_id: *subnet_id,
        })?;
    match &transformation.unsigned {
        UnsignedTx::TransformSubnet(tx) => Ok(Calculator::new(Config {
            max_consumption_rate: tx.max_consumption_rate,
            min_consumption_rate: tx.min_consumption_rate,
            minting_period: config.reward_config.minting_period,
            supply_cap: tx.maximum_supply,
        })),
        _ => Err(Error::NotTransformSubnetTx {
            tx_id: transformation.id(),
        }),
    }
}

/// RUST_LOG=debug cargo test --package platformvm-executor --lib -- rewards::test_calculate --exact --show-output
#[test]
fn test_calculate() {
    let calculator = Calculator::new(Config {
        max_consumption_rate: 120_000,
        min_consumption_rate: 100_000,
        minting_period: 365 * 24 * 60 * 60,
        supply_cap: 720 * units::MEGA_AVAX,
    });

    // staking the full minting period earns the max consumption rate:
    // remaining * stake / supply * 12%
    let supply = 360 * units::MEGA_AVAX;
    let stake = 2_000 * units::AVAX;
    let full_period = 365 * 24 * 60 * 60;
    let reward = calculator.calculate(full_period, stake, supply);
    let expected = ((720 - 360) as u128 * units::MEGA_AVAX as u128 * stake as u128 * 120_000
        / (supply as u128 * 1_000_000)) as u64;
    assert_eq!(reward, expected);

    // zero for an instant stake
    assert_eq!(calculator.calculate(0, stake, supply), 0);

    // zero once the cap is reached
    assert_eq!(
        calculator.calculate(full_period, stake, 720 * units::MEGA_AVAX),
        0
    );

    // half the period earns between min and max rate, pro rata
    let half = calculator.calculate(full_period / 2, stake, supply);
    assert!(half > 0 && half < reward);

    // determinism
    assert_eq!(
        calculator.calculate(full_period / 3, stake, supply),
        calculator.calculate(full_period / 3, stake, supply)
    );
}

/// RUST_LOG=debug cargo test --package platformvm-executor --lib -- rewards::test_reward_bounded_by_remaining_supply --exact --show-output
#[test]
fn test_reward_bounded_by_remaining_supply() {
    let calculator = Calculator::new(Config {
        max_consumption_rate: 1_000_000,
        min_consumption_rate: 1_000_000,
        minting_period: 100,
        supply_cap: 1_000,
    });

    // a stake larger than the current supply must not mint past the cap
    let reward = calculator.calculate(100, 1_000_000, 100);
    assert!(reward <= 900);
}
