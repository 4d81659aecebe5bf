//! A map-backed state diff for hosts building blocks and for tests.
use std::collections::HashMap;

use crate::{
    errors::{Error, Result},
    state::{Diff, Staker},
};
use platformvm_types::{
    ids::{self, node},
    key,
    platformvm::{self, txs as ptxs},
    txs::utxo,
};

/// The whole diff is comparable and cloneable, so callers can
/// snapshot it before an execution and assert that a failed
/// execution left no observable mutation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Memory {
    timestamp: u64,
    supplies: HashMap<ids::Id, u64>,
    utxos: HashMap<ids::Id, utxo::Utxo>,
    chains: HashMap<ids::Id, Vec<ptxs::Tx>>,
    subnets: Vec<ptxs::Tx>,
    subnet_owners: HashMap<ids::Id, key::secp256k1::txs::OutputOwners>,
    subnet_transformations: HashMap<ids::Id, ptxs::Tx>,
    current_validators: HashMap<(ids::Id, node::Id), Staker>,
    pending_validators: HashMap<(ids::Id, node::Id), Staker>,
    current_delegators: HashMap<ids::Id, Staker>,
    pending_delegators: HashMap<ids::Id, Staker>,
}

impl Memory {
    /// Creates a diff with the primary network supply seeded.
    pub fn new(primary_network_supply: u64) -> Self {
        let mut supplies = HashMap::new();
        supplies.insert(*platformvm::PRIMARY_NETWORK_ID, primary_network_supply);
        Self {
            supplies,
            ..Self::default()
        }
    }

    /// Chains registered for the subnet, in registration order.
    pub fn chains(&self, subnet_id: &ids::Id) -> &[ptxs::Tx] {
        self.chains
            .get(subnet_id)
            .map(|chains| chains.as_slice())
            .unwrap_or(&[])
    }

    pub fn subnets(&self) -> &[ptxs::Tx] {
        &self.subnets
    }

    pub fn utxos(&self) -> &HashMap<ids::Id, utxo::Utxo> {
        &self.utxos
    }

    /// All staker records across the four staker sets.
    pub fn stakers(&self) -> Vec<Staker> {
        let mut stakers: Vec<Staker> = Vec::new();
        stakers.extend(self.current_validators.values().cloned());
        stakers.extend(self.pending_validators.values().cloned());
        stakers.extend(self.current_delegators.values().cloned());
        stakers.extend(self.pending_delegators.values().cloned());
        stakers
    }
}

impl Diff for Memory {
    fn get_timestamp(&self) -> u64 {
        self.timestamp
    }

    fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    fn get_current_supply(&self, subnet_id: &ids::Id) -> Result<u64> {
        self.supplies
            .get(subnet_id)
            .copied()
            .ok_or(Error::SupplyNotFound {
                subnet_id: *subnet_id,
            })
    }

    fn set_current_supply(&mut self, subnet_id: &ids::Id, supply: u64) {
        self.supplies.insert(*subnet_id, supply);
    }

    fn get_utxo(&self, utxo_id: &ids::Id) -> Result<utxo::Utxo> {
        self.utxos
            .get(utxo_id)
            .cloned()
            .ok_or(Error::UtxoNotFound { utxo_id: *utxo_id })
    }

    fn add_utxo(&mut self, utxo: utxo::Utxo) {
        self.utxos.insert(utxo.input_id(), utxo);
    }

    fn delete_utxo(&mut self, utxo_id: &ids::Id) {
        self.utxos.remove(utxo_id);
    }

    fn add_chain(&mut self, tx: &ptxs::Tx) {
        if let ptxs::UnsignedTx::CreateChain(create_chain_tx) = &tx.unsigned {
            self.chains
                .entry(create_chain_tx.subnet_id)
                .or_default()
                .push(tx.clone());
        }
    }

    fn add_subnet(&mut self, tx: &ptxs::Tx) {
        self.subnets.push(tx.clone());
    }

    fn get_subnet_owner(&self, subnet_id: &ids::Id) -> Result<key::secp256k1::txs::OutputOwners> {
        self.subnet_owners
            .get(subnet_id)
            .cloned()
            .ok_or(Error::SubnetNotFound {
                subnet_id: *subnet_id,
            })
    }

    fn set_subnet_owner(&mut self, subnet_id: &ids::Id, owner: key::secp256k1::txs::OutputOwners) {
        self.subnet_owners.insert(*subnet_id, owner);
    }

    fn add_subnet_transformation(&mut self, tx: &ptxs::Tx) {
        if let ptxs::UnsignedTx::TransformSubnet(transform_tx) = &tx.unsigned {
            self.subnet_transformations
                .insert(transform_tx.subnet_id, tx.clone());
        }
    }

    fn get_subnet_transformation(&self, subnet_id: &ids::Id) -> Option<ptxs::Tx> {
        self.subnet_transformations.get(subnet_id).cloned()
    }

    fn put_current_validator(&mut self, staker: Staker) {
        self.current_validators
            .insert((staker.subnet_id, staker.node_id), staker);
    }

    fn put_current_delegator(&mut self, staker: Staker) {
        self.current_delegators.insert(staker.tx_id, staker);
    }

    fn put_pending_validator(&mut self, staker: Staker) {
        self.pending_validators
            .insert((staker.subnet_id, staker.node_id), staker);
    }

    fn put_pending_delegator(&mut self, staker: Staker) {
        self.pending_delegators.insert(staker.tx_id, staker);
    }

    fn get_current_validator(&self, subnet_id: &ids::Id, node_id: &node::Id) -> Option<Staker> {
        self.current_validators
            .get(&(*subnet_id, *node_id))
            .cloned()
    }

    fn get_pending_validator(&self, subnet_id: &ids::Id, node_id: &node::Id) -> Option<Staker> {
        self.pending_validators
            .get(&(*subnet_id, *node_id))
            .cloned()
    }

    fn delete_current_validator(&mut self, staker: &Staker) {
        self.current_validators
            .remove(&(staker.subnet_id, staker.node_id));
    }

    fn delete_pending_validator(&mut self, staker: &Staker) {
        self.pending_validators
            .remove(&(staker.subnet_id, staker.node_id));
    }

    fn delegator_weight(&self, subnet_id: &ids::Id, node_id: &node::Id) -> u64 {
        self.current_delegators
            .values()
            .chain(self.pending_delegators.values())
            .filter(|staker| staker.subnet_id == *subnet_id && staker.node_id == *node_id)
            .map(|staker| staker.weight)
            .sum()
    }
}

/// RUST_LOG=debug cargo test --package platformvm-executor --lib -- state::memory::test_utxo_round_trip --exact --show-output
#[test]
fn test_utxo_round_trip() {
    let mut state = Memory::new(1_000);
    assert_eq!(
        state
            .get_current_supply(&platformvm::PRIMARY_NETWORK_ID)
            .unwrap(),
        1_000
    );

    let utxo = utxo::Utxo {
        utxo_id: utxo::Id::new(&[1; 32], 0).unwrap(),
        asset_id: ids::Id::from_slice(&[2]),
        ..utxo::Utxo::default()
    };
    let utxo_id = utxo.input_id();
    state.add_utxo(utxo.clone());
    assert_eq!(state.get_utxo(&utxo_id).unwrap(), utxo);

    state.delete_utxo(&utxo_id);
    assert!(matches!(
        state.get_utxo(&utxo_id),
        Err(Error::UtxoNotFound { .. })
    ));
}
