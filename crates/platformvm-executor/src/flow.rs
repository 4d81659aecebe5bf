//! The flow checker: proof that declared inputs and credentials
//! cover declared outputs plus the required fees, per asset.
use std::collections::HashMap;

use crate::{
    errors::{Error, Result},
    state::Diff,
};
use platformvm_types::{
    ids,
    key::secp256k1::txs::Credential,
    txs::{transferable, utxo},
};

/// Verifies token flow against either a state-resolved or a
/// caller-supplied UTXO set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checker;

impl Checker {
    /// Resolves each input's UTXO from the state diff, then verifies
    /// the spend against them.
    #[allow(clippy::too_many_arguments)]
    pub fn verify_spend<D: Diff>(
        &self,
        state: &D,
        ins: &[transferable::Input],
        outs: &[transferable::Output],
        creds: &[Credential],
        produced_fees: &HashMap<ids::Id, u64>,
        chain_time: u64,
    ) -> Result<()> {
        let mut utxos = Vec::with_capacity(ins.len());
        for input in ins.iter() {
            utxos.push(state.get_utxo(&input.input_id())?);
        }
        self.verify_spend_utxos(&utxos, ins, outs, creds, produced_fees, chain_time)
    }

    /// Verifies that the inputs spend the given UTXOs under their
    /// credentials and that, per asset, the consumed amount covers
    /// the produced amount plus the fee. Consuming more than is
    /// produced burns the difference.
    #[allow(clippy::too_many_arguments)]
    pub fn verify_spend_utxos(
        &self,
        utxos: &[utxo::Utxo],
        ins: &[transferable::Input],
        outs: &[transferable::Output],
        creds: &[Credential],
        produced_fees: &HashMap<ids::Id, u64>,
        chain_time: u64,
    ) -> Result<()> {
        if ins.len() != utxos.len() {
            return Err(Error::FlowCheckFailed {
                reason: format!("{} inputs but {} utxos", ins.len(), utxos.len()),
            });
        }
        if ins.len() != creds.len() {
            return Err(Error::FlowCheckFailed {
                reason: format!("{} inputs but {} credentials", ins.len(), creds.len()),
            });
        }

        let mut consumed: HashMap<ids::Id, u64> = HashMap::new();
        for ((input, utxo), cred) in ins.iter().zip(utxos.iter()).zip(creds.iter()) {
            input.verify().map_err(|e| Error::FlowCheckFailed {
                reason: e.message(),
            })?;

            if input.asset_id != utxo.asset_id {
                return Err(Error::FlowCheckFailed {
                    reason: format!(
                        "input asset {} does not match utxo asset {}",
                        input.asset_id, utxo.asset_id
                    ),
                });
            }

            let out_locktime = utxo.out.locktime();
            if out_locktime > chain_time {
                // still stake-locked; only a lock-preserving spend
                // with the identical locktime may move it
                if input.input.locktime() != out_locktime {
                    return Err(Error::FlowCheckFailed {
                        reason: "locked UTXO spent with a mismatched locktime".to_string(),
                    });
                }
            } else {
                if input.input.locktime() != 0 {
                    return Err(Error::FlowCheckFailed {
                        reason: "unlocked UTXO spent as a locked input".to_string(),
                    });
                }
                let owners = utxo.out.output_owners();
                if owners.locktime > chain_time {
                    return Err(Error::FlowCheckFailed {
                        reason: "output is time locked".to_string(),
                    });
                }
            }

            let owners = utxo.out.output_owners();
            let sig_indices = input.input.sig_indices();
            if sig_indices.len() != cred.signatures.len() {
                return Err(Error::FlowCheckFailed {
                    reason: format!(
                        "input has {} signature indices but credential has {} signatures",
                        sig_indices.len(),
                        cred.signatures.len()
                    ),
                });
            }
            if sig_indices.len() != owners.threshold as usize {
                return Err(Error::FlowCheckFailed {
                    reason: format!(
                        "{} signatures do not meet threshold {}",
                        sig_indices.len(),
                        owners.threshold
                    ),
                });
            }
            for sig_index in sig_indices.iter() {
                if *sig_index as usize >= owners.addresses.len() {
                    return Err(Error::FlowCheckFailed {
                        reason: format!("signature index {} out of range", sig_index),
                    });
                }
            }

            let entry = consumed.entry(input.asset_id).or_insert(0);
            *entry = entry
                .checked_add(input.input.amount())
                .ok_or_else(|| Error::FlowCheckFailed {
                    reason: format!("consumed amount of asset {} overflows", input.asset_id),
                })?;
        }

        let mut produced: HashMap<ids::Id, u64> = produced_fees.clone();
        for out in outs.iter() {
            out.verify().map_err(|e| Error::FlowCheckFailed {
                reason: e.message(),
            })?;

            let entry = produced.entry(out.asset_id).or_insert(0);
            *entry = entry
                .checked_add(out.out.amount())
                .ok_or_else(|| Error::FlowCheckFailed {
                    reason: format!("produced amount of asset {} overflows", out.asset_id),
                })?;
        }

        for (asset_id, produced_amount) in produced.iter() {
            let consumed_amount = consumed.get(asset_id).copied().unwrap_or(0);
            if *produced_amount > consumed_amount {
                return Err(Error::FlowCheckFailed {
                    reason: format!(
                        "asset {} consumed {} but produced {}",
                        asset_id, consumed_amount, produced_amount
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
fn test_utxo_and_input(
    amount: u64,
    asset_id: ids::Id,
) -> (utxo::Utxo, transferable::Input, Credential) {
    use platformvm_types::{
        ids::short,
        key::secp256k1::{self, txs::OutputOwners, txs::transfer},
        txs::transferable::TransferableIn,
    };

    let utxo = utxo::Utxo {
        utxo_id: utxo::Id::new(&[1; 32], 0).unwrap(),
        asset_id,
        out: platformvm_types::txs::transferable::TransferableOut::TransferOutput(
            transfer::Output {
                amount,
                output_owners: OutputOwners {
                    locktime: 0,
                    threshold: 1,
                    addresses: vec![short::Id::from_slice(&[1, 2, 3])],
                },
            },
        ),
    };
    let input = transferable::Input {
        utxo_id: utxo.utxo_id.clone(),
        asset_id,
        input: TransferableIn::TransferInput(transfer::Input::new(amount, vec![0])),
    };
    let cred = Credential::new(vec![vec![0x7b; secp256k1::SIGNATURE_LEN]]);
    (utxo, input, cred)
}

/// RUST_LOG=debug cargo test --package platformvm-executor --lib -- flow::test_verify_spend_utxos --exact --show-output
#[test]
fn test_verify_spend_utxos() {
    let asset_id = ids::Id::from_slice(&[9]);
    let checker = Checker;
    let (utxo, input, cred) = test_utxo_and_input(1_000, asset_id);

    // exact cover: 1_000 consumed = 0 produced + 1_000 fee
    let fees = HashMap::from([(asset_id, 1_000_u64)]);
    assert!(checker
        .verify_spend_utxos(&[utxo.clone()], &[input.clone()], &[], &[cred.clone()], &fees, 0)
        .is_ok());

    // burning beyond the fee is permitted
    let fees = HashMap::from([(asset_id, 500_u64)]);
    assert!(checker
        .verify_spend_utxos(&[utxo.clone()], &[input.clone()], &[], &[cred.clone()], &fees, 0)
        .is_ok());

    // under-funded spend fails
    let fees = HashMap::from([(asset_id, 2_000_u64)]);
    assert!(matches!(
        checker.verify_spend_utxos(&[utxo.clone()], &[input.clone()], &[], &[cred.clone()], &fees, 0),
        Err(Error::FlowCheckFailed { .. })
    ));

    // credential count must match the inputs
    let fees = HashMap::from([(asset_id, 1_000_u64)]);
    assert!(matches!(
        checker.verify_spend_utxos(&[utxo], &[input], &[], &[], &fees, 0),
        Err(Error::FlowCheckFailed { .. })
    ));
}

/// RUST_LOG=debug cargo test --package platformvm-executor --lib -- flow::test_verify_spend_locked_utxo --exact --show-output
#[test]
fn test_verify_spend_locked_utxo() {
    use platformvm_types::{
        platformvm::txs::{StakeableLockIn, StakeableLockOut},
        txs::transferable::{TransferableIn, TransferableOut},
    };

    let asset_id = ids::Id::from_slice(&[9]);
    let checker = Checker;
    let (mut utxo, mut input, cred) = test_utxo_and_input(1_000, asset_id);

    // lock the UTXO until t=100
    let transfer_output = match utxo.out {
        TransferableOut::TransferOutput(out) => out,
        _ => unreachable!(),
    };
    utxo.out = TransferableOut::StakeableLockOut(StakeableLockOut {
        locktime: 100,
        transfer_output,
    });
    let fees = HashMap::from([(asset_id, 1_000_u64)]);

    // a plain input cannot spend it before the locktime passes
    assert!(checker
        .verify_spend_utxos(&[utxo.clone()], &[input.clone()], &[], &[cred.clone()], &fees, 50)
        .is_err());

    // a lock-preserving input with the identical locktime can
    let transfer_input = match input.input {
        TransferableIn::TransferInput(inner) => inner,
        _ => unreachable!(),
    };
    input.input = TransferableIn::StakeableLockIn(StakeableLockIn {
        locktime: 100,
        transfer_input,
    });
    assert!(checker
        .verify_spend_utxos(&[utxo.clone()], &[input.clone()], &[], &[cred.clone()], &fees, 50)
        .is_ok());

    // once the locktime passes, the lock-preserving spend is rejected
    assert!(checker
        .verify_spend_utxos(&[utxo], &[input], &[], &[cred], &fees, 150)
        .is_err());
}
