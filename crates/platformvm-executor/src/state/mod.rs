//! The mutable state view an execution runs against.
pub mod memory;

use crate::errors::{Error, Result};
use platformvm_types::{
    ids::{self, node},
    key,
    platformvm::txs::{self as ptxs, staker::Priority},
    txs::{transferable, utxo},
};
use serde::{Deserialize, Serialize};

/// A node's placement into a validator or delegator role over a time
/// window on some subnet.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/state#Staker>
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Staker {
    #[serde(rename = "txID")]
    pub tx_id: ids::Id,
    #[serde(rename = "nodeID")]
    pub node_id: node::Id,
    #[serde(rename = "subnetID")]
    pub subnet_id: ids::Id,
    pub weight: u64,
    #[serde(rename = "startTime")]
    pub start_time: u64,
    #[serde(rename = "endTime")]
    pub end_time: u64,
    /// Reward minted if the staker completes its window; zero for
    /// permissioned validators and for pending stakers, whose reward
    /// is computed at promotion time.
    #[serde(rename = "potentialReward")]
    pub potential_reward: u64,
    pub priority: Priority,
}

impl Staker {
    /// Builds a staker that is immediately current: its window starts
    /// at the given chain time.
    pub fn new_current(
        tx_id: ids::Id,
        staker_tx: &dyn ptxs::staker::Staker,
        chain_time: u64,
        potential_reward: u64,
    ) -> Self {
        Self {
            tx_id,
            node_id: staker_tx.node_id(),
            subnet_id: staker_tx.subnet_id(),
            weight: staker_tx.weight(),
            start_time: chain_time,
            end_time: staker_tx.end_time(),
            potential_reward,
            priority: staker_tx.current_priority(),
        }
    }

    /// Builds a staker scheduled to start in the future. Fails when
    /// the transaction carries no explicit start time, which is only
    /// legal post-Durango.
    pub fn new_pending(tx_id: ids::Id, staker_tx: &dyn ptxs::staker::Staker) -> Result<Self> {
        let start_time = staker_tx
            .start_time()
            .ok_or(Error::MissingStartTimePreDurango)?;
        Ok(Self {
            tx_id,
            node_id: staker_tx.node_id(),
            subnet_id: staker_tx.subnet_id(),
            weight: staker_tx.weight(),
            start_time,
            end_time: staker_tx.end_time(),
            potential_reward: 0,
            priority: staker_tx.pending_priority(),
        })
    }
}

/// An in-memory overlay over persistent chain state. Mutations are
/// buffered until the caller commits; a failed execution leaves the
/// overlay untouched.
pub trait Diff {
    /// The chain time this diff executes at, set by the caller to the
    /// block's timestamp before any execution.
    fn get_timestamp(&self) -> u64;
    fn set_timestamp(&mut self, timestamp: u64);

    fn get_current_supply(&self, subnet_id: &ids::Id) -> Result<u64>;
    fn set_current_supply(&mut self, subnet_id: &ids::Id, supply: u64);

    fn get_utxo(&self, utxo_id: &ids::Id) -> Result<utxo::Utxo>;
    fn add_utxo(&mut self, utxo: utxo::Utxo);
    fn delete_utxo(&mut self, utxo_id: &ids::Id);

    fn add_chain(&mut self, tx: &ptxs::Tx);
    fn add_subnet(&mut self, tx: &ptxs::Tx);
    fn get_subnet_owner(&self, subnet_id: &ids::Id) -> Result<key::secp256k1::txs::OutputOwners>;
    fn set_subnet_owner(&mut self, subnet_id: &ids::Id, owner: key::secp256k1::txs::OutputOwners);
    fn add_subnet_transformation(&mut self, tx: &ptxs::Tx);
    fn get_subnet_transformation(&self, subnet_id: &ids::Id) -> Option<ptxs::Tx>;

    fn put_current_validator(&mut self, staker: Staker);
    fn put_current_delegator(&mut self, staker: Staker);
    fn put_pending_validator(&mut self, staker: Staker);
    fn put_pending_delegator(&mut self, staker: Staker);
    fn get_current_validator(&self, subnet_id: &ids::Id, node_id: &node::Id) -> Option<Staker>;
    fn get_pending_validator(&self, subnet_id: &ids::Id, node_id: &node::Id) -> Option<Staker>;
    fn delete_current_validator(&mut self, staker: &Staker);
    fn delete_pending_validator(&mut self, staker: &Staker);

    /// Total weight currently or pendingly delegated to the node on
    /// the subnet.
    fn delegator_weight(&self, subnet_id: &ids::Id, node_id: &node::Id) -> u64;
}

/// Deletes each input's referenced UTXO. Every input must have been
/// resolved before any mutation.
pub fn consume<D: Diff>(state: &mut D, ins: &[transferable::Input]) {
    for input in ins.iter() {
        state.delete_utxo(&input.input_id());
    }
}

/// Creates the UTXOs of the transaction, indexed "(tx_id, i)".
/// The derivation is collision-free by construction: tx ids are
/// unique and the index is part of the hash preimage.
pub fn produce<D: Diff>(state: &mut D, tx_id: &ids::Id, outs: &[transferable::Output]) -> Result<()> {
    // derive every id before the first mutation so an error cannot
    // leave a partial write behind
    let mut utxos = Vec::with_capacity(outs.len());
    for (i, out) in outs.iter().enumerate() {
        utxos.push(utxo::Utxo {
            utxo_id: utxo::Id::new(tx_id.as_ref(), i as u32)?,
            asset_id: out.asset_id,
            out: out.out.clone(),
        });
    }
    for utxo in utxos {
        state.add_utxo(utxo);
    }
    Ok(())
}
