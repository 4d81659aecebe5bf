//! Semantic verification of staker transactions and subnet
//! authorization proofs. Verification never mutates state; every
//! check precedes the executor's first write.
use std::collections::HashMap;

use crate::{
    errors::{Error, Result},
    executor::{verify_memo_field_length, Backend},
    state::{Diff, Staker},
};
use platformvm_types::{
    ids,
    key::secp256k1::txs::Credential,
    platformvm::{
        self,
        txs::{
            self as ptxs, add_delegator, add_permissionless_delegator,
            add_permissionless_validator, add_subnet_validator, add_validator,
            remove_subnet_validator, transfer_subnet_ownership,
        },
    },
    txs::transferable,
};

/// A primary network validator may hold at most this multiple of its
/// own stake, delegations included.
pub const MAX_VALIDATOR_WEIGHT_FACTOR: u64 = 5;

/// Checks the subnet authorization proof against the subnet owner
/// keys and splits off the trailing credential it consumes, returning
/// the residual credentials for the flow check.
pub fn verify_subnet_authorization<D: Diff>(
    state: &D,
    tx: &ptxs::Tx,
    subnet_id: &ids::Id,
    subnet_auth: &platformvm_types::key::secp256k1::txs::Input,
) -> Result<Vec<Credential>> {
    if tx.creds.is_empty() {
        return Err(Error::SubnetAuthFailed {
            reason: "tx has no credential for the subnet authorization".to_string(),
        });
    }
    let (base_creds, subnet_cred) = tx.creds.split_at(tx.creds.len() - 1);
    let subnet_cred = &subnet_cred[0];

    let owner = state.get_subnet_owner(subnet_id)?;

    subnet_auth.verify().map_err(|e| Error::SubnetAuthFailed {
        reason: e.message(),
    })?;
    if subnet_auth.sig_indices.len() != owner.threshold as usize {
        return Err(Error::SubnetAuthFailed {
            reason: format!(
                "{} signature indices do not meet owner threshold {}",
                subnet_auth.sig_indices.len(),
                owner.threshold
            ),
        });
    }
    for sig_index in subnet_auth.sig_indices.iter() {
        if *sig_index as usize >= owner.addresses.len() {
            return Err(Error::SubnetAuthFailed {
                reason: format!("signature index {} out of range", sig_index),
            });
        }
    }
    if subnet_cred.signatures.len() != subnet_auth.sig_indices.len() {
        return Err(Error::SubnetAuthFailed {
            reason: format!(
                "credential has {} signatures but the authorization names {}",
                subnet_cred.signatures.len(),
                subnet_auth.sig_indices.len()
            ),
        });
    }

    Ok(base_creds.to_vec())
}

/// Like [`verify_subnet_authorization`], additionally rejecting
/// subnets that have been transformed: their owner keys are
/// immutable.
pub fn verify_poa_subnet_authorization<D: Diff>(
    state: &D,
    tx: &ptxs::Tx,
    subnet_id: &ids::Id,
    subnet_auth: &platformvm_types::key::secp256k1::txs::Input,
) -> Result<Vec<Credential>> {
    if state.get_subnet_transformation(subnet_id).is_some() {
        return Err(Error::TransformedSubnet {
            subnet_id: *subnet_id,
        });
    }
    verify_subnet_authorization(state, tx, subnet_id, subnet_auth)
}

fn verify_wrapping_tx(backend: &Backend, tx: &ptxs::Tx) -> Result<()> {
    tx.syntactic_verify(backend.ctx.network_id, backend.ctx.chain_id)
        .map_err(|e| Error::SyntacticInvalid {
            reason: e.message(),
        })
}

/// Pre-Durango, a staker must schedule a strictly-future start within
/// the allowed horizon. Post-Durango the scheduled start is ignored:
/// stakers start at chain time.
fn verify_staker_start_time(
    is_durango_active: bool,
    chain_time: u64,
    start_time: u64,
    max_future_start_time: u64,
) -> Result<()> {
    if is_durango_active {
        return Ok(());
    }
    if chain_time >= start_time {
        return Err(Error::TimestampNotBeforeStartTime {
            chain_time,
            start: start_time,
        });
    }
    let latest = chain_time.saturating_add(max_future_start_time);
    if start_time > latest {
        return Err(Error::FutureStakeTime {
            start: start_time,
            latest,
        });
    }
    Ok(())
}

fn staking_duration(start: u64, end: u64) -> Result<u64> {
    end.checked_sub(start)
        .ok_or(Error::StartAfterEndTime { start, end })
}

fn combined_outs(
    base_outs: &[transferable::Output],
    stake_outs: &[transferable::Output],
) -> Vec<transferable::Output> {
    let mut outs = Vec::with_capacity(base_outs.len() + stake_outs.len());
    outs.extend_from_slice(base_outs);
    outs.extend_from_slice(stake_outs);
    outs
}

fn get_validator<D: Diff>(state: &D, subnet_id: &ids::Id, node_id: &platformvm_types::ids::node::Id) -> Option<Staker> {
    state
        .get_current_validator(subnet_id, node_id)
        .or_else(|| state.get_pending_validator(subnet_id, node_id))
}

/// Rules an `AddValidatorTx` must satisfy: primary network staking
/// bounds, a well-placed window, no duplicate registration, and a
/// funded flow.
pub fn verify_add_validator_tx<D: Diff>(
    backend: &Backend,
    state: &D,
    tx: &ptxs::Tx,
    utx: &add_validator::Tx,
) -> Result<()> {
    verify_wrapping_tx(backend, tx)?;

    let current_timestamp = state.get_timestamp();
    let is_durango_active = backend.config.is_durango_activated(current_timestamp);
    verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

    let duration = staking_duration(utx.validator.start, utx.validator.end)?;
    if utx.validator.weight < backend.config.min_validator_stake {
        return Err(Error::WeightTooSmall);
    }
    if utx.validator.weight > backend.config.max_validator_stake {
        return Err(Error::WeightTooLarge);
    }
    if utx.delegation_shares < backend.config.min_delegation_fee {
        return Err(Error::InsufficientDelegationFee);
    }
    if duration < backend.config.min_stake_duration {
        return Err(Error::StakeTooShort);
    }
    if duration > backend.config.max_stake_duration {
        return Err(Error::StakeTooLong);
    }

    if !backend.bootstrapped() {
        // until this node is synced, it cannot dispute the block
        return Ok(());
    }

    verify_staker_start_time(
        is_durango_active,
        current_timestamp,
        utx.validator.start,
        backend.config.max_future_start_time,
    )?;

    let node_id = utx.validator.node_id;
    if get_validator(state, &platformvm::PRIMARY_NETWORK_ID, &node_id).is_some() {
        return Err(Error::DuplicateValidator {
            node_id,
            subnet_id: *platformvm::PRIMARY_NETWORK_ID,
        });
    }

    let outs = combined_outs(&utx.base_tx.transferable_outputs, &utx.stake_outs);
    backend.flow_checker.verify_spend(
        state,
        &utx.base_tx.transferable_inputs,
        &outs,
        &tx.creds,
        &HashMap::from([(
            backend.ctx.avax_asset_id,
            backend.config.add_primary_network_validator_fee,
        )]),
        current_timestamp,
    )
}

/// Rules an `AddSubnetValidatorTx` must satisfy: a window bounded by
/// the node's primary network validation period, subnet owner
/// authorization, no duplicate registration, and a funded flow.
pub fn verify_add_subnet_validator_tx<D: Diff>(
    backend: &Backend,
    state: &D,
    tx: &ptxs::Tx,
    utx: &add_subnet_validator::Tx,
) -> Result<()> {
    verify_wrapping_tx(backend, tx)?;

    let current_timestamp = state.get_timestamp();
    let is_durango_active = backend.config.is_durango_activated(current_timestamp);
    verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

    let vdr = &utx.validator.validator;
    let duration = staking_duration(vdr.start, vdr.end)?;
    if duration < backend.config.min_stake_duration {
        return Err(Error::StakeTooShort);
    }
    if duration > backend.config.max_stake_duration {
        return Err(Error::StakeTooLong);
    }

    if !backend.bootstrapped() {
        return Ok(());
    }

    verify_staker_start_time(
        is_durango_active,
        current_timestamp,
        vdr.start,
        backend.config.max_future_start_time,
    )?;

    if get_validator(state, &utx.validator.subnet_id, &vdr.node_id).is_some() {
        return Err(Error::DuplicateValidator {
            node_id: vdr.node_id,
            subnet_id: utx.validator.subnet_id,
        });
    }

    // the subnet validation period must sit inside the node's primary
    // network validation period
    let primary_vdr = get_validator(state, &platformvm::PRIMARY_NETWORK_ID, &vdr.node_id).ok_or(
        Error::NotValidator {
            node_id: vdr.node_id,
            subnet_id: *platformvm::PRIMARY_NETWORK_ID,
        },
    )?;
    let start_time = if is_durango_active {
        current_timestamp
    } else {
        vdr.start
    };
    if start_time < primary_vdr.start_time || vdr.end > primary_vdr.end_time {
        return Err(Error::ValidatorSubset {
            node_id: vdr.node_id,
        });
    }

    let base_creds = verify_subnet_authorization(state, tx, &utx.validator.subnet_id, &utx.subnet_auth)?;

    backend.flow_checker.verify_spend(
        state,
        &utx.base_tx.transferable_inputs,
        &utx.base_tx.transferable_outputs,
        &base_creds,
        &HashMap::from([(
            backend.ctx.avax_asset_id,
            backend.config.add_subnet_validator_fee,
        )]),
        current_timestamp,
    )
}

/// Rules an `AddDelegatorTx` must satisfy: delegator staking bounds,
/// a window inside the parent validator's window, no delegation
/// overflow, and a funded flow.
pub fn verify_add_delegator_tx<D: Diff>(
    backend: &Backend,
    state: &D,
    tx: &ptxs::Tx,
    utx: &add_delegator::Tx,
) -> Result<()> {
    verify_wrapping_tx(backend, tx)?;

    let current_timestamp = state.get_timestamp();
    let is_durango_active = backend.config.is_durango_activated(current_timestamp);
    verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

    let duration = staking_duration(utx.validator.start, utx.validator.end)?;
    if utx.validator.weight < backend.config.min_delegator_stake {
        return Err(Error::WeightTooSmall);
    }
    if duration < backend.config.min_stake_duration {
        return Err(Error::StakeTooShort);
    }
    if duration > backend.config.max_stake_duration {
        return Err(Error::StakeTooLong);
    }

    if !backend.bootstrapped() {
        return Ok(());
    }

    verify_staker_start_time(
        is_durango_active,
        current_timestamp,
        utx.validator.start,
        backend.config.max_future_start_time,
    )?;

    let node_id = utx.validator.node_id;
    let vdr = get_validator(state, &platformvm::PRIMARY_NETWORK_ID, &node_id).ok_or(
        Error::NotValidator {
            node_id,
            subnet_id: *platformvm::PRIMARY_NETWORK_ID,
        },
    )?;

    verify_delegation(
        backend,
        state,
        &vdr,
        utx.validator.start,
        utx.validator.end,
        utx.validator.weight,
        is_durango_active,
        current_timestamp,
        backend.config.max_validator_stake,
        MAX_VALIDATOR_WEIGHT_FACTOR,
    )?;

    let outs = combined_outs(&utx.base_tx.transferable_outputs, &utx.stake_outs);
    backend.flow_checker.verify_spend(
        state,
        &utx.base_tx.transferable_inputs,
        &outs,
        &tx.creds,
        &HashMap::from([(
            backend.ctx.avax_asset_id,
            backend.config.add_primary_network_delegator_fee,
        )]),
        current_timestamp,
    )
}

/// Shared delegation rules: the delegation window must sit inside the
/// validator's window and the validator's total weight must stay
/// under both the network maximum and its own weight factor.
#[allow(clippy::too_many_arguments)]
fn verify_delegation<D: Diff>(
    _backend: &Backend,
    state: &D,
    vdr: &Staker,
    start: u64,
    end: u64,
    weight: u64,
    is_durango_active: bool,
    current_timestamp: u64,
    max_validator_stake: u64,
    max_weight_factor: u64,
) -> Result<()> {
    let start_time = if is_durango_active {
        current_timestamp
    } else {
        start
    };
    if start_time < vdr.start_time || end > vdr.end_time {
        return Err(Error::ValidatorSubset {
            node_id: vdr.node_id,
        });
    }

    let max_weight = vdr
        .weight
        .checked_mul(max_weight_factor)
        .unwrap_or(u64::MAX)
        .min(max_validator_stake);
    let delegated = state.delegator_weight(&vdr.subnet_id, &vdr.node_id);
    let new_weight = vdr
        .weight
        .checked_add(delegated)
        .and_then(|w| w.checked_add(weight))
        .ok_or(Error::OverDelegated {
            node_id: vdr.node_id,
        })?;
    if new_weight > max_weight {
        return Err(Error::OverDelegated {
            node_id: vdr.node_id,
        });
    }
    Ok(())
}

/// Rules a `RemoveSubnetValidatorTx` must satisfy. Returns the staker
/// record to delete and whether it lives in the current set.
pub fn verify_remove_subnet_validator_tx<D: Diff>(
    backend: &Backend,
    state: &D,
    tx: &ptxs::Tx,
    utx: &remove_subnet_validator::Tx,
) -> Result<(Staker, bool)> {
    verify_wrapping_tx(backend, tx)?;

    let current_timestamp = state.get_timestamp();
    let is_durango_active = backend.config.is_durango_activated(current_timestamp);
    verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

    let (staker, is_current_validator) =
        match state.get_current_validator(&utx.subnet_id, &utx.node_id) {
            Some(staker) => (staker, true),
            None => match state.get_pending_validator(&utx.subnet_id, &utx.node_id) {
                Some(staker) => (staker, false),
                None => {
                    return Err(Error::NotValidator {
                        node_id: utx.node_id,
                        subnet_id: utx.subnet_id,
                    })
                }
            },
        };
    if !staker.priority.is_permissioned_validator() {
        return Err(Error::RemovePermissionlessValidator);
    }

    if !backend.bootstrapped() {
        return Ok((staker, is_current_validator));
    }

    let base_creds = verify_subnet_authorization(state, tx, &utx.subnet_id, &utx.subnet_auth)?;

    backend.flow_checker.verify_spend(
        state,
        &utx.base_tx.transferable_inputs,
        &utx.base_tx.transferable_outputs,
        &base_creds,
        &HashMap::from([(backend.ctx.avax_asset_id, backend.config.tx_fee)]),
        current_timestamp,
    )?;

    Ok((staker, is_current_validator))
}

/// Rules a `TransferSubnetOwnershipTx` must satisfy: the Durango
/// upgrade must be active, the current owner must authorize the
/// transfer, and the fee must be paid.
pub fn verify_transfer_subnet_ownership_tx<D: Diff>(
    backend: &Backend,
    state: &D,
    tx: &ptxs::Tx,
    utx: &transfer_subnet_ownership::Tx,
) -> Result<()> {
    let current_timestamp = state.get_timestamp();
    if !backend.config.is_durango_activated(current_timestamp) {
        return Err(Error::DurangoUpgradeNotActive);
    }

    verify_wrapping_tx(backend, tx)?;
    verify_memo_field_length(&utx.base_tx.memo, true)?;

    if !backend.bootstrapped() {
        return Ok(());
    }

    let base_creds = verify_poa_subnet_authorization(state, tx, &utx.subnet_id, &utx.subnet_auth)?;

    backend.flow_checker.verify_spend(
        state,
        &utx.base_tx.transferable_inputs,
        &utx.base_tx.transferable_outputs,
        &base_creds,
        &HashMap::from([(backend.ctx.avax_asset_id, backend.config.tx_fee)]),
        current_timestamp,
    )
}

struct ValidatorRules {
    min_validator_stake: u64,
    max_validator_stake: u64,
    min_delegation_fee: u32,
    min_stake_duration: u64,
    max_stake_duration: u64,
    staking_asset_id: ids::Id,
}

fn validator_rules<D: Diff>(
    backend: &Backend,
    state: &D,
    subnet_id: &ids::Id,
) -> Result<ValidatorRules> {
    if *subnet_id == *platformvm::PRIMARY_NETWORK_ID {
        return Ok(ValidatorRules {
            min_validator_stake: backend.config.min_validator_stake,
            max_validator_stake: backend.config.max_validator_stake,
            min_delegation_fee: backend.config.min_delegation_fee,
            min_stake_duration: backend.config.min_stake_duration,
            max_stake_duration: backend.config.max_stake_duration,
            staking_asset_id: backend.ctx.avax_asset_id,
        });
    }

    let transformation =
        state
            .get_subnet_transformation(subnet_id)
            .ok_or(Error::SubnetNotTransformed {
                subnet_id: *subnet_id,
            })?;
    match &transformation.unsigned {
        ptxs::UnsignedTx::TransformSubnet(transform_tx) => Ok(ValidatorRules {
            min_validator_stake: transform_tx.min_validator_stake,
            max_validator_stake: transform_tx.max_validator_stake,
            min_delegation_fee: transform_tx.min_delegation_fee,
            min_stake_duration: transform_tx.min_stake_duration as u64,
            max_stake_duration: transform_tx.max_stake_duration as u64,
            staking_asset_id: transform_tx.asset_id,
        }),
        _ => Err(Error::NotTransformSubnetTx {
            tx_id: transformation.id(),
        }),
    }
}

struct DelegatorRules {
    min_delegator_stake: u64,
    max_validator_stake: u64,
    max_validator_weight_factor: u64,
    min_stake_duration: u64,
    max_stake_duration: u64,
    staking_asset_id: ids::Id,
}

fn delegator_rules<D: Diff>(
    backend: &Backend,
    state: &D,
    subnet_id: &ids::Id,
) -> Result<DelegatorRules> {
    if *subnet_id == *platformvm::PRIMARY_NETWORK_ID {
        return Ok(DelegatorRules {
            min_delegator_stake: backend.config.min_delegator_stake,
            max_validator_stake: backend.config.max_validator_stake,
            max_validator_weight_factor: MAX_VALIDATOR_WEIGHT_FACTOR,
            min_stake_duration: backend.config.min_stake_duration,
            max_stake_duration: backend.config.max_stake_duration,
            staking_asset_id: backend.ctx.avax_asset_id,
        });
    }

    let transformation =
        state
            .get_subnet_transformation(subnet_id)
            .ok_or(Error::SubnetNotTransformed {
                subnet_id: *subnet_id,
            })?;
    match &transformation.unsigned {
        ptxs::UnsignedTx::TransformSubnet(transform_tx) => Ok(DelegatorRules {
            min_delegator_stake: transform_tx.min_delegator_stake,
            max_validator_stake: transform_tx.max_validator_stake,
            max_validator_weight_factor: transform_tx.max_validator_weight_factor as u64,
            min_stake_duration: transform_tx.min_stake_duration as u64,
            max_stake_duration: transform_tx.max_stake_duration as u64,
            staking_asset_id: transform_tx.asset_id,
        }),
        _ => Err(Error::NotTransformSubnetTx {
            tx_id: transformation.id(),
        }),
    }
}

fn verify_staked_asset(
    stake_outs: &[transferable::Output],
    staking_asset_id: &ids::Id,
) -> Result<()> {
    for out in stake_outs.iter() {
        if out.asset_id != *staking_asset_id {
            return Err(Error::StakedAssetMismatch {
                asset_id: out.asset_id,
            });
        }
    }
    Ok(())
}

/// Rules an `AddPermissionlessValidatorTx` must satisfy: staking
/// bounds from the subnet's transformation (or the primary network
/// config), the correct staking asset, no duplicate registration,
/// and a funded flow.
pub fn verify_add_permissionless_validator_tx<D: Diff>(
    backend: &Backend,
    state: &D,
    tx: &ptxs::Tx,
    utx: &add_permissionless_validator::Tx,
) -> Result<()> {
    verify_wrapping_tx(backend, tx)?;

    let current_timestamp = state.get_timestamp();
    let is_durango_active = backend.config.is_durango_activated(current_timestamp);
    verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

    if !backend.bootstrapped() {
        return Ok(());
    }

    let vdr = &utx.validator.validator;
    verify_staker_start_time(
        is_durango_active,
        current_timestamp,
        vdr.start,
        backend.config.max_future_start_time,
    )?;

    let rules = validator_rules(backend, state, &utx.validator.subnet_id)?;
    let duration = staking_duration(vdr.start, vdr.end)?;
    if vdr.weight < rules.min_validator_stake {
        return Err(Error::WeightTooSmall);
    }
    if vdr.weight > rules.max_validator_stake {
        return Err(Error::WeightTooLarge);
    }
    if utx.delegation_shares < rules.min_delegation_fee {
        return Err(Error::InsufficientDelegationFee);
    }
    if duration < rules.min_stake_duration {
        return Err(Error::StakeTooShort);
    }
    if duration > rules.max_stake_duration {
        return Err(Error::StakeTooLong);
    }
    verify_staked_asset(&utx.stake_outs, &rules.staking_asset_id)?;

    if get_validator(state, &utx.validator.subnet_id, &vdr.node_id).is_some() {
        return Err(Error::DuplicateValidator {
            node_id: vdr.node_id,
            subnet_id: utx.validator.subnet_id,
        });
    }

    let fee = if utx.validator.subnet_id == *platformvm::PRIMARY_NETWORK_ID {
        backend.config.add_primary_network_validator_fee
    } else {
        backend.config.add_subnet_validator_fee
    };
    let outs = combined_outs(&utx.base_tx.transferable_outputs, &utx.stake_outs);
    backend.flow_checker.verify_spend(
        state,
        &utx.base_tx.transferable_inputs,
        &outs,
        &tx.creds,
        &HashMap::from([(backend.ctx.avax_asset_id, fee)]),
        current_timestamp,
    )
}

/// Rules an `AddPermissionlessDelegatorTx` must satisfy: delegator
/// bounds from the subnet's transformation (or the primary network
/// config), the correct staking asset, a validator to delegate to
/// with a covering window and spare weight, and a funded flow.
pub fn verify_add_permissionless_delegator_tx<D: Diff>(
    backend: &Backend,
    state: &D,
    tx: &ptxs::Tx,
    utx: &add_permissionless_delegator::Tx,
) -> Result<()> {
    verify_wrapping_tx(backend, tx)?;

    let current_timestamp = state.get_timestamp();
    let is_durango_active = backend.config.is_durango_activated(current_timestamp);
    verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

    if !backend.bootstrapped() {
        return Ok(());
    }

    let dlr = &utx.validator.validator;
    verify_staker_start_time(
        is_durango_active,
        current_timestamp,
        dlr.start,
        backend.config.max_future_start_time,
    )?;

    let rules = delegator_rules(backend, state, &utx.validator.subnet_id)?;
    let duration = staking_duration(dlr.start, dlr.end)?;
    if dlr.weight < rules.min_delegator_stake {
        return Err(Error::WeightTooSmall);
    }
    if duration < rules.min_stake_duration {
        return Err(Error::StakeTooShort);
    }
    if duration > rules.max_stake_duration {
        return Err(Error::StakeTooLong);
    }
    verify_staked_asset(&utx.stake_outs, &rules.staking_asset_id)?;

    let vdr = get_validator(state, &utx.validator.subnet_id, &dlr.node_id).ok_or(
        Error::NotValidator {
            node_id: dlr.node_id,
            subnet_id: utx.validator.subnet_id,
        },
    )?;
    verify_delegation(
        backend,
        state,
        &vdr,
        dlr.start,
        dlr.end,
        dlr.weight,
        is_durango_active,
        current_timestamp,
        rules.max_validator_stake,
        rules.max_validator_weight_factor,
    )?;

    let fee = if utx.validator.subnet_id == *platformvm::PRIMARY_NETWORK_ID {
        backend.config.add_primary_network_delegator_fee
    } else {
        backend.config.add_subnet_delegator_fee
    };
    let outs = combined_outs(&utx.base_tx.transferable_outputs, &utx.stake_outs);
    backend.flow_checker.verify_spend(
        state,
        &utx.base_tx.transferable_inputs,
        &outs,
        &tx.creds,
        &HashMap::from([(backend.ctx.avax_asset_id, fee)]),
        current_timestamp,
    )
}
