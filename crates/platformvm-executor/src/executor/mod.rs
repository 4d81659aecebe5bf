//! The standard transaction executor: the single point where
//! untrusted signed data becomes authoritative chain state.
pub mod verify;

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::{
    atomic, config,
    context::{self, Ctx},
    errors::{Error, Result},
    flow, rewards,
    state::{self, Diff, Staker},
};
use platformvm_types::{
    codec, ids,
    platformvm::txs::{
        self as ptxs, add_delegator, add_permissionless_delegator, add_permissionless_validator,
        add_subnet_validator, add_validator, base, create_chain, create_subnet, export, import,
        remove_subnet_validator, transfer_subnet_ownership, transform_subnet, UnsignedTx,
    },
    txs::utxo,
};

/// The immutable collaborators every execution borrows.
#[derive(Clone)]
pub struct Backend {
    pub config: config::Config,
    pub ctx: Ctx,
    /// Whether this node has finished bootstrapping. Until then it
    /// cannot vouch for cross-chain state and skips the checks that
    /// depend on it.
    pub bootstrapped: Arc<AtomicBool>,
    pub flow_checker: flow::Checker,
}

impl Backend {
    pub fn bootstrapped(&self) -> bool {
        self.bootstrapped.load(Ordering::SeqCst)
    }
}

/// The deferred effect of an accepted `CreateChainTx`: the host must
/// materialize the new chain. Captures only the tx id and body, never
/// the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainCreation {
    pub tx_id: ids::Id,
    pub chain: create_chain::Tx,
}

/// Pre-Durango a memo is bounded; post-Durango it must be empty.
pub fn verify_memo_field_length(memo: &[u8], is_durango_active: bool) -> Result<()> {
    if !is_durango_active {
        if memo.len() > ptxs::MAX_MEMO_SIZE {
            return Err(Error::MemoTooLong {
                size: memo.len(),
                max: ptxs::MAX_MEMO_SIZE,
            });
        }
    } else if !memo.is_empty() {
        return Err(Error::MemoTooLong {
            size: memo.len(),
            max: 0,
        });
    }
    Ok(())
}

/// Executes one standard (non-proposal) transaction against a state
/// diff. On success the diff holds the transaction's effect and the
/// output fields below are populated; on error the diff saw no
/// observable mutation.
pub struct StandardTxExecutor<'a, D> {
    backend: &'a Backend,
    state: &'a mut D,
    tx: &'a ptxs::Tx,

    /// Deferred effect to run once the containing block is accepted;
    /// only `CreateChainTx` sets it.
    pub on_accept: Option<ChainCreation>,
    /// Imported input ids, for mempool conflict detection; only
    /// `ImportTx` populates it.
    pub inputs: HashSet<ids::Id>,
    /// Cross-chain side effects keyed by peer chain; only
    /// `ImportTx`/`ExportTx` populate it.
    pub atomic_requests: HashMap<ids::Id, atomic::Requests>,
}

impl<'a, D: Diff> StandardTxExecutor<'a, D> {
    pub fn new(backend: &'a Backend, state: &'a mut D, tx: &'a ptxs::Tx) -> Self {
        Self {
            backend,
            state,
            tx,
            on_accept: None,
            inputs: HashSet::new(),
            atomic_requests: HashMap::new(),
        }
    }

    /// Dispatches on the transaction kind. The two proposal kinds are
    /// never executable here.
    pub fn execute(&mut self) -> Result<()> {
        let tx = self.tx;
        match &tx.unsigned {
            UnsignedTx::AdvanceTime(_) | UnsignedTx::RewardValidator(_) => {
                Err(Error::WrongTxType)
            }
            UnsignedTx::Base(utx) => self.base_tx(utx),
            UnsignedTx::CreateChain(utx) => self.create_chain_tx(utx),
            UnsignedTx::CreateSubnet(utx) => self.create_subnet_tx(utx),
            UnsignedTx::Import(utx) => self.import_tx(utx),
            UnsignedTx::Export(utx) => self.export_tx(utx),
            UnsignedTx::AddValidator(utx) => self.add_validator_tx(utx),
            UnsignedTx::AddSubnetValidator(utx) => self.add_subnet_validator_tx(utx),
            UnsignedTx::AddDelegator(utx) => self.add_delegator_tx(utx),
            UnsignedTx::RemoveSubnetValidator(utx) => self.remove_subnet_validator_tx(utx),
            UnsignedTx::TransformSubnet(utx) => self.transform_subnet_tx(utx),
            UnsignedTx::AddPermissionlessValidator(utx) => {
                self.add_permissionless_validator_tx(utx)
            }
            UnsignedTx::AddPermissionlessDelegator(utx) => {
                self.add_permissionless_delegator_tx(utx)
            }
            UnsignedTx::TransferSubnetOwnership(utx) => self.transfer_subnet_ownership_tx(utx),
        }
    }

    fn syntactic_verify(&self) -> Result<()> {
        self.tx
            .syntactic_verify(self.backend.ctx.network_id, self.backend.ctx.chain_id)
            .map_err(|e| Error::SyntacticInvalid {
                reason: e.message(),
            })
    }

    fn create_chain_tx(&mut self, utx: &create_chain::Tx) -> Result<()> {
        self.syntactic_verify()?;

        let current_timestamp = self.state.get_timestamp();
        let is_durango_active = self.backend.config.is_durango_activated(current_timestamp);
        verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

        let base_tx_creds =
            verify::verify_poa_subnet_authorization(self.state, self.tx, &utx.subnet_id, &utx.subnet_auth)?;

        // Verify the flowcheck
        let create_blockchain_tx_fee = self
            .backend
            .config
            .get_create_blockchain_tx_fee(current_timestamp);
        self.backend.flow_checker.verify_spend(
            self.state,
            &utx.base_tx.transferable_inputs,
            &utx.base_tx.transferable_outputs,
            &base_tx_creds,
            &HashMap::from([(self.backend.ctx.avax_asset_id, create_blockchain_tx_fee)]),
            current_timestamp,
        )?;

        let tx_id = self.tx.id();

        // Consume the UTXOS
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        // Produce the UTXOS
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;
        // Add the new chain to the database
        self.state.add_chain(self.tx);

        // If this tx is committed and this node validates the subnet,
        // the host materializes the chain on accept
        self.on_accept = Some(ChainCreation {
            tx_id,
            chain: utx.clone(),
        });
        Ok(())
    }

    fn create_subnet_tx(&mut self, utx: &create_subnet::Tx) -> Result<()> {
        // Make sure this transaction is well formed.
        self.syntactic_verify()?;

        let current_timestamp = self.state.get_timestamp();
        let is_durango_active = self.backend.config.is_durango_activated(current_timestamp);
        verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

        // Verify the flowcheck
        let create_subnet_tx_fee = self
            .backend
            .config
            .get_create_subnet_tx_fee(current_timestamp);
        self.backend.flow_checker.verify_spend(
            self.state,
            &utx.base_tx.transferable_inputs,
            &utx.base_tx.transferable_outputs,
            &self.tx.creds,
            &HashMap::from([(self.backend.ctx.avax_asset_id, create_subnet_tx_fee)]),
            current_timestamp,
        )?;

        let tx_id = self.tx.id();

        // Consume the UTXOS
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        // Produce the UTXOS
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;
        // Add the new subnet to the database
        self.state.add_subnet(self.tx);
        self.state.set_subnet_owner(&tx_id, utx.owner.clone());
        Ok(())
    }

    fn import_tx(&mut self, utx: &import::Tx) -> Result<()> {
        self.syntactic_verify()?;

        let current_timestamp = self.state.get_timestamp();
        let is_durango_active = self.backend.config.is_durango_activated(current_timestamp);
        verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

        self.inputs = HashSet::with_capacity(utx.imported_inputs.len());
        let mut utxo_ids: Vec<Vec<u8>> = Vec::with_capacity(utx.imported_inputs.len());
        for input in utx.imported_inputs.iter() {
            let utxo_id = input.input_id();
            self.inputs.insert(utxo_id);
            utxo_ids.push(utxo_id.to_vec());
        }

        // Skip verification of the shared memory inputs if the other
        // primary network chains are not guaranteed to be up-to-date.
        if self.backend.bootstrapped() && !self.backend.config.partial_sync_primary_network {
            context::verify_same_subnet(&self.backend.ctx, &utx.source_chain_id)?;

            let all_utxo_bytes = self
                .backend
                .ctx
                .shared_memory
                .get(&utx.source_chain_id, &utxo_ids)?;

            let local_ins = &utx.base_tx.transferable_inputs;
            let mut utxos = Vec::with_capacity(local_ins.len() + utx.imported_inputs.len());
            for input in local_ins.iter() {
                utxos.push(self.state.get_utxo(&input.input_id())?);
            }
            for utxo_bytes in all_utxo_bytes.iter() {
                utxos.push(utxo::Utxo::unpack(utxo_bytes)?);
            }

            // local inputs first, imported second; the order decides
            // which credential verifies which input
            let mut ins = Vec::with_capacity(local_ins.len() + utx.imported_inputs.len());
            ins.extend_from_slice(local_ins);
            ins.extend_from_slice(&utx.imported_inputs);

            self.backend.flow_checker.verify_spend_utxos(
                &utxos,
                &ins,
                &utx.base_tx.transferable_outputs,
                &self.tx.creds,
                &HashMap::from([(self.backend.ctx.avax_asset_id, self.backend.config.tx_fee)]),
                current_timestamp,
            )?;
        }

        let tx_id = self.tx.id();

        // Consume the UTXOS
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        // Produce the UTXOS
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;

        // Note: we record the atomic requests even if we did not
        // verify them, so the shared state stays correct if
        // verification is enabled later.
        self.atomic_requests.insert(
            utx.source_chain_id,
            atomic::Requests {
                remove_requests: utxo_ids,
                put_requests: Vec::new(),
            },
        );
        Ok(())
    }

    fn export_tx(&mut self, utx: &export::Tx) -> Result<()> {
        self.syntactic_verify()?;

        let current_timestamp = self.state.get_timestamp();
        let is_durango_active = self.backend.config.is_durango_activated(current_timestamp);
        verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

        let mut outs = Vec::with_capacity(
            utx.base_tx.transferable_outputs.len() + utx.exported_outputs.len(),
        );
        outs.extend_from_slice(&utx.base_tx.transferable_outputs);
        outs.extend_from_slice(&utx.exported_outputs);

        if self.backend.bootstrapped() {
            context::verify_same_subnet(&self.backend.ctx, &utx.destination_chain_id)?;
        }

        // Verify the flowcheck
        self.backend.flow_checker.verify_spend(
            self.state,
            &utx.base_tx.transferable_inputs,
            &outs,
            &self.tx.creds,
            &HashMap::from([(self.backend.ctx.avax_asset_id, self.backend.config.tx_fee)]),
            current_timestamp,
        )?;

        let tx_id = self.tx.id();

        // Consume the UTXOS
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        // Produce the UTXOS
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;

        // Note: we record the atomic requests even if we did not
        // verify them, so the shared state stays correct if
        // verification is enabled later.
        let mut elems = Vec::with_capacity(utx.exported_outputs.len());
        for (i, out) in utx.exported_outputs.iter().enumerate() {
            let exported_utxo = utxo::Utxo {
                utxo_id: utxo::Id::new(
                    tx_id.as_ref(),
                    (utx.base_tx.transferable_outputs.len() + i) as u32,
                )?,
                asset_id: out.asset_id,
                out: out.out.clone(),
            };

            let utxo_bytes = exported_utxo.pack(codec::VERSION)?.take_bytes().to_vec();
            let traits = exported_utxo
                .addresses()
                .iter()
                .map(|addr| addr.to_vec())
                .collect();
            elems.push(atomic::Element {
                key: exported_utxo.input_id().to_vec(),
                value: utxo_bytes,
                traits,
            });
        }
        self.atomic_requests.insert(
            utx.destination_chain_id,
            atomic::Requests {
                remove_requests: Vec::new(),
                put_requests: elems,
            },
        );
        Ok(())
    }

    fn add_validator_tx(&mut self, utx: &add_validator::Tx) -> Result<()> {
        if utx.validator.node_id.is_empty() {
            return Err(Error::EmptyNodeId);
        }

        verify::verify_add_validator_tx(self.backend, self.state, self.tx, utx)?;

        self.put_staker(utx)?;

        let tx_id = self.tx.id();
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;

        if self.backend.config.partial_sync_primary_network
            && utx.validator.node_id == self.backend.ctx.node_id
        {
            log::warn!(
                "verified transaction that would cause this node to become unhealthy \
                (reason: primary network is not being fully synced, txID: {}, \
                txType: addValidator, nodeID: {})",
                tx_id,
                utx.validator.node_id,
            );
        }
        Ok(())
    }

    fn add_subnet_validator_tx(&mut self, utx: &add_subnet_validator::Tx) -> Result<()> {
        verify::verify_add_subnet_validator_tx(self.backend, self.state, self.tx, utx)?;

        self.put_staker(utx)?;

        let tx_id = self.tx.id();
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;
        Ok(())
    }

    fn add_delegator_tx(&mut self, utx: &add_delegator::Tx) -> Result<()> {
        verify::verify_add_delegator_tx(self.backend, self.state, self.tx, utx)?;

        self.put_staker(utx)?;

        let tx_id = self.tx.id();
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;
        Ok(())
    }

    /// Removes `utx.node_id` as a validator of `utx.subnet_id`; the
    /// staker may live in either the current or the pending set.
    /// There are no permissioned subnet delegators to remove.
    fn remove_subnet_validator_tx(&mut self, utx: &remove_subnet_validator::Tx) -> Result<()> {
        let (staker, is_current_validator) =
            verify::verify_remove_subnet_validator_tx(self.backend, self.state, self.tx, utx)?;

        if is_current_validator {
            self.state.delete_current_validator(&staker);
        } else {
            self.state.delete_pending_validator(&staker);
        }

        let tx_id = self.tx.id();
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;
        Ok(())
    }

    fn transform_subnet_tx(&mut self, utx: &transform_subnet::Tx) -> Result<()> {
        self.syntactic_verify()?;

        let current_timestamp = self.state.get_timestamp();
        let is_durango_active = self.backend.config.is_durango_activated(current_timestamp);
        verify_memo_field_length(&utx.base_tx.memo, is_durango_active)?;

        if utx.max_stake_duration as u64 > self.backend.config.max_stake_duration {
            return Err(Error::MaxStakeDurationTooLarge);
        }

        // the staking asset must differ from the fee asset, so the
        // two fee-map entries below can never collide
        if utx.asset_id == self.backend.ctx.avax_asset_id {
            return Err(Error::StakedAssetMismatch {
                asset_id: utx.asset_id,
            });
        }

        let base_tx_creds =
            verify::verify_poa_subnet_authorization(self.state, self.tx, &utx.subnet_id, &utx.subnet_auth)?;

        let total_reward_amount = utx.maximum_supply - utx.initial_supply;
        self.backend.flow_checker.verify_spend(
            self.state,
            &utx.base_tx.transferable_inputs,
            &utx.base_tx.transferable_outputs,
            &base_tx_creds,
            &HashMap::from([
                (
                    self.backend.ctx.avax_asset_id,
                    self.backend.config.transform_subnet_tx_fee,
                ),
                (utx.asset_id, total_reward_amount),
            ]),
            current_timestamp,
        )?;

        let tx_id = self.tx.id();

        // Consume the UTXOS
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        // Produce the UTXOS
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;
        // Transform the subnet in the database
        self.state.add_subnet_transformation(self.tx);
        self.state
            .set_current_supply(&utx.subnet_id, utx.initial_supply);
        Ok(())
    }

    fn add_permissionless_validator_tx(
        &mut self,
        utx: &add_permissionless_validator::Tx,
    ) -> Result<()> {
        verify::verify_add_permissionless_validator_tx(self.backend, self.state, self.tx, utx)?;

        self.put_staker(utx)?;

        let tx_id = self.tx.id();
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;

        if self.backend.config.partial_sync_primary_network
            && utx.validator.subnet_id == *platformvm_types::platformvm::PRIMARY_NETWORK_ID
            && utx.validator.validator.node_id == self.backend.ctx.node_id
        {
            log::warn!(
                "verified transaction that would cause this node to become unhealthy \
                (reason: primary network is not being fully synced, txID: {}, \
                txType: addPermissionlessValidator, nodeID: {})",
                tx_id,
                utx.validator.validator.node_id,
            );
        }
        Ok(())
    }

    fn add_permissionless_delegator_tx(
        &mut self,
        utx: &add_permissionless_delegator::Tx,
    ) -> Result<()> {
        verify::verify_add_permissionless_delegator_tx(self.backend, self.state, self.tx, utx)?;

        self.put_staker(utx)?;

        let tx_id = self.tx.id();
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;
        Ok(())
    }

    /// Transfers the ownership of `utx.subnet_id` to `utx.owner`.
    fn transfer_subnet_ownership_tx(
        &mut self,
        utx: &transfer_subnet_ownership::Tx,
    ) -> Result<()> {
        verify::verify_transfer_subnet_ownership_tx(self.backend, self.state, self.tx, utx)?;

        self.state.set_subnet_owner(&utx.subnet_id, utx.owner.clone());

        let tx_id = self.tx.id();
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;
        Ok(())
    }

    fn base_tx(&mut self, utx: &base::Tx) -> Result<()> {
        if !self
            .backend
            .config
            .is_durango_activated(self.state.get_timestamp())
        {
            return Err(Error::DurangoUpgradeNotActive);
        }

        // Verify the tx is well formed
        self.syntactic_verify()?;

        verify_memo_field_length(&utx.base_tx.memo, true)?;

        // Verify the flowcheck
        let current_timestamp = self.state.get_timestamp();
        self.backend.flow_checker.verify_spend(
            self.state,
            &utx.base_tx.transferable_inputs,
            &utx.base_tx.transferable_outputs,
            &self.tx.creds,
            &HashMap::from([(self.backend.ctx.avax_asset_id, self.backend.config.tx_fee)]),
            current_timestamp,
        )?;

        let tx_id = self.tx.id();
        // Consume the UTXOS
        state::consume(self.state, &utx.base_tx.transferable_inputs);
        // Produce the UTXOS
        state::produce(self.state, &tx_id, &utx.base_tx.transferable_outputs)?;
        Ok(())
    }

    /// Creates the staker defined by `staker_tx` and adds it to the
    /// diff.
    fn put_staker(&mut self, staker_tx: &dyn ptxs::staker::Staker) -> Result<()> {
        let chain_time = self.state.get_timestamp();
        let tx_id = self.tx.id();

        let staker = if !self.backend.config.is_durango_activated(chain_time) {
            // Pre-Durango, stakers set a future start time and are
            // added to the pending set; a later chain-time advance
            // promotes them to the current set.
            Staker::new_pending(tx_id, staker_tx)?
        } else {
            // Only permissionless stakers earn a reward; recall that
            // there are no permissioned delegators, so checking the
            // permissioned-validator bit suffices.
            let mut potential_reward = 0;
            if !staker_tx.current_priority().is_permissioned_validator() {
                let subnet_id = staker_tx.subnet_id();
                let current_supply = self.state.get_current_supply(&subnet_id)?;

                let calculator =
                    rewards::calculator_for_subnet(&self.backend.config, self.state, &subnet_id)?;

                // Post-Durango, stakers are immediately current: the
                // window runs from chain time to the scheduled end.
                let stake_duration = staker_tx.end_time().saturating_sub(chain_time);
                potential_reward =
                    calculator.calculate(stake_duration, staker_tx.weight(), current_supply);

                self.state
                    .set_current_supply(&subnet_id, current_supply + potential_reward);
            }

            Staker::new_current(tx_id, staker_tx, chain_time, potential_reward)
        };

        let priority = staker.priority;
        match priority {
            priority if priority.is_current_validator() => {
                self.state.put_current_validator(staker)
            }
            priority if priority.is_current_delegator() => {
                self.state.put_current_delegator(staker)
            }
            priority if priority.is_pending_validator() => {
                self.state.put_pending_validator(staker)
            }
            priority if priority.is_pending_delegator() => {
                self.state.put_pending_delegator(staker)
            }
            priority => {
                return Err(Error::UnexpectedStakerPriority { tx_id, priority });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        atomic::MapSharedMemory,
        context::MapValidatorState,
        state::memory::Memory,
    };
    use platformvm_types::{
        ids::{node, short},
        key::secp256k1::{
            self,
            txs::{transfer, Credential, OutputOwners},
        },
        platformvm,
        platformvm::txs::{advance_time, reward_validator, staker::Priority, Validator},
        txs::{
            self as avax_txs,
            transferable::{self, TransferableIn, TransferableOut},
        },
        units,
    };
    use proptest::prelude::*;

    const NETWORK_ID: u32 = 1;

    fn avax_asset_id() -> ids::Id {
        ids::Id::from_slice(&[0xaa])
    }

    fn p_chain_id() -> ids::Id {
        ids::Id::from_slice(&[0x01])
    }

    fn x_chain_id() -> ids::Id {
        ids::Id::from_slice(&[0x02])
    }

    fn self_node_id() -> node::Id {
        node::Id::from_slice(&[0x0f])
    }

    fn test_ctx(shared_memory: MapSharedMemory) -> Ctx {
        let mut validator_state = MapValidatorState::default();
        validator_state
            .subnet_of
            .insert(p_chain_id(), *platformvm::PRIMARY_NETWORK_ID);
        validator_state
            .subnet_of
            .insert(x_chain_id(), *platformvm::PRIMARY_NETWORK_ID);
        Ctx {
            network_id: NETWORK_ID,
            chain_id: p_chain_id(),
            subnet_id: *platformvm::PRIMARY_NETWORK_ID,
            avax_asset_id: avax_asset_id(),
            node_id: self_node_id(),
            shared_memory: Arc::new(shared_memory),
            validator_state: Arc::new(validator_state),
        }
    }

    fn test_backend(config: config::Config) -> Backend {
        test_backend_with(config, MapSharedMemory::default(), true)
    }

    fn test_backend_with(
        config: config::Config,
        shared_memory: MapSharedMemory,
        bootstrapped: bool,
    ) -> Backend {
        Backend {
            config,
            ctx: test_ctx(shared_memory),
            bootstrapped: Arc::new(AtomicBool::new(bootstrapped)),
            flow_checker: flow::Checker,
        }
    }

    /// Small staking bounds so scenarios can use human-sized numbers.
    fn test_staking_config() -> config::Config {
        config::Config {
            tx_fee: 10,
            min_validator_stake: 10,
            max_validator_stake: 1_000_000,
            min_delegator_stake: 10,
            min_delegation_fee: 0,
            min_stake_duration: 100,
            max_stake_duration: 1_000_000,
            max_future_start_time: 10_000,
            add_primary_network_validator_fee: 0,
            add_primary_network_delegator_fee: 0,
            add_subnet_validator_fee: 10,
            add_subnet_delegator_fee: 10,
            ..config::Config::default()
        }
    }

    fn owners(addr_byte: u8) -> OutputOwners {
        OutputOwners::new(0, 1, &[short::Id::from_slice(&[addr_byte])])
    }

    fn credential() -> Credential {
        Credential::new(vec![vec![0x7b; secp256k1::SIGNATURE_LEN]])
    }

    fn base_tx_with(
        ins: Vec<transferable::Input>,
        outs: Vec<transferable::Output>,
    ) -> avax_txs::Tx {
        avax_txs::Tx {
            network_id: NETWORK_ID,
            blockchain_id: p_chain_id(),
            transferable_inputs: ins,
            transferable_outputs: outs,
            memo: Vec::new(),
        }
    }

    /// Registers a spendable UTXO in the diff and returns the input
    /// consuming it. Distinct "source" bytes give distinct utxo ids.
    fn funded_utxo(
        state: &mut Memory,
        source: u8,
        amount: u64,
        asset_id: ids::Id,
    ) -> transferable::Input {
        let utxo_id = utxo::Id::new(&[source; 32], 0).unwrap();
        state.add_utxo(utxo::Utxo {
            utxo_id: utxo_id.clone(),
            asset_id,
            out: TransferableOut::TransferOutput(transfer::Output {
                amount,
                output_owners: owners(0x11),
            }),
        });
        transferable::Input {
            utxo_id,
            asset_id,
            input: TransferableIn::TransferInput(transfer::Input::new(amount, vec![0])),
        }
    }

    fn change_output(amount: u64, asset_id: ids::Id) -> transferable::Output {
        transferable::Output {
            asset_id,
            out: TransferableOut::TransferOutput(transfer::Output {
                amount,
                output_owners: owners(0x11),
            }),
        }
    }

    fn tx_metadata(tag: u8) -> avax_txs::Metadata {
        avax_txs::Metadata::new(&[tag], &[tag, tag, tag])
    }

    fn primary_validator(node_id: node::Id, start: u64, end: u64, weight: u64) -> Staker {
        Staker {
            tx_id: ids::Id::from_slice(&[0xcc]),
            node_id,
            subnet_id: *platformvm::PRIMARY_NETWORK_ID,
            weight,
            start_time: start,
            end_time: end,
            potential_reward: 0,
            priority: Priority::PrimaryNetworkValidatorCurrent,
        }
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_create_subnet_happy_path --exact --show-output
    #[test]
    fn test_create_subnet_happy_path() {
        let _ = env_logger::builder().is_test(true).try_init();

        let config = config::Config::default();
        assert_eq!(config.create_subnet_tx_fee, 1_000_000_000);
        let backend = test_backend(config.clone());

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);

        let input = funded_utxo(&mut state, 1, config.create_subnet_tx_fee, avax_asset_id());
        let consumed_utxo_id = input.input_id();

        let tx = ptxs::Tx::new(
            UnsignedTx::CreateSubnet(create_subnet::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
                owner: owners(0x22),
            }),
            vec![credential()],
            tx_metadata(1),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();
        assert!(executor.on_accept.is_none());
        assert!(executor.atomic_requests.is_empty());
        assert!(executor.inputs.is_empty());

        assert_eq!(state.subnets().len(), 1);
        assert_eq!(state.get_subnet_owner(&tx.id()).unwrap(), owners(0x22));
        assert!(state.get_utxo(&consumed_utxo_id).is_err());
        assert!(state.utxos().is_empty());
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_create_chain_on_accept --exact --show-output
    #[test]
    fn test_create_chain_on_accept() {
        let config = config::Config::default();
        let backend = test_backend(config.clone());

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);

        let subnet_id = ids::Id::from_slice(&[0x51]);
        state.set_subnet_owner(&subnet_id, owners(0x33));

        let input = funded_utxo(&mut state, 1, config.create_blockchain_tx_fee, avax_asset_id());
        let utx = create_chain::Tx {
            base_tx: base_tx_with(vec![input], Vec::new()),
            subnet_id,
            chain_name: "timestampvm".to_string(),
            vm_id: ids::Id::from_slice(&[0x99]),
            fx_ids: Vec::new(),
            genesis_data: vec![1, 2, 3],
            subnet_auth: secp256k1::txs::Input::new(vec![0]),
        };
        // the trailing credential answers the subnet authorization
        let tx = ptxs::Tx::new(
            UnsignedTx::CreateChain(utx.clone()),
            vec![credential(), credential()],
            tx_metadata(2),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();

        let on_accept = executor.on_accept.clone().unwrap();
        assert_eq!(on_accept.tx_id, tx.id());
        assert_eq!(on_accept.chain, utx);
        assert!(executor.atomic_requests.is_empty());

        assert_eq!(state.chains(&subnet_id).len(), 1);
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_import_not_bootstrapped --exact --show-output
    #[test]
    fn test_import_not_bootstrapped() {
        let config = config::Config::default();
        // an empty shared memory proves the import path never reads it
        let backend = test_backend_with(config, MapSharedMemory::default(), false);

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);

        let local_input = funded_utxo(&mut state, 1, 500, avax_asset_id());
        let local_utxo_id = local_input.input_id();

        let imported_inputs = vec![
            transferable::Input {
                utxo_id: utxo::Id::new(&[3; 32], 0).unwrap(),
                asset_id: avax_asset_id(),
                input: TransferableIn::TransferInput(transfer::Input::new(100, vec![0])),
            },
            transferable::Input {
                utxo_id: utxo::Id::new(&[4; 32], 0).unwrap(),
                asset_id: avax_asset_id(),
                input: TransferableIn::TransferInput(transfer::Input::new(200, vec![0])),
            },
        ];
        let imported_utxo_ids: Vec<ids::Id> =
            imported_inputs.iter().map(|input| input.input_id()).collect();

        let tx = ptxs::Tx::new(
            UnsignedTx::Import(import::Tx {
                base_tx: base_tx_with(vec![local_input], vec![change_output(50, avax_asset_id())]),
                source_chain_id: x_chain_id(),
                imported_inputs,
            }),
            vec![credential(), credential(), credential()],
            tx_metadata(3),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();

        assert_eq!(executor.inputs.len(), 2);
        for utxo_id in imported_utxo_ids.iter() {
            assert!(executor.inputs.contains(utxo_id));
        }

        let requests = executor.atomic_requests.get(&x_chain_id()).unwrap();
        assert_eq!(requests.remove_requests.len(), 2);
        assert_eq!(requests.remove_requests[0], imported_utxo_ids[0].to_vec());
        assert_eq!(requests.remove_requests[1], imported_utxo_ids[1].to_vec());
        assert!(requests.put_requests.is_empty());

        // the local UTXO was consumed, one change UTXO was produced
        assert!(state.get_utxo(&local_utxo_id).is_err());
        assert_eq!(state.utxos().len(), 1);
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_import_bootstrapped_reads_shared_memory --exact --show-output
    #[test]
    fn test_import_bootstrapped_reads_shared_memory() {
        let config = config::Config::default();
        let tx_fee = config.tx_fee;

        let imported_utxo = utxo::Utxo {
            utxo_id: utxo::Id::new(&[3; 32], 0).unwrap(),
            asset_id: avax_asset_id(),
            out: TransferableOut::TransferOutput(transfer::Output {
                amount: 100,
                output_owners: owners(0x11),
            }),
        };
        let mut shared_memory = MapSharedMemory::default();
        shared_memory.entries.entry(x_chain_id()).or_default().insert(
            imported_utxo.input_id().to_vec(),
            imported_utxo.pack(codec::VERSION).unwrap().take_bytes().to_vec(),
        );
        let backend = test_backend_with(config, shared_memory, true);

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);

        let local_input = funded_utxo(&mut state, 1, tx_fee, avax_asset_id());
        let imported_input = transferable::Input {
            utxo_id: imported_utxo.utxo_id.clone(),
            asset_id: avax_asset_id(),
            input: TransferableIn::TransferInput(transfer::Input::new(100, vec![0])),
        };

        let tx = ptxs::Tx::new(
            UnsignedTx::Import(import::Tx {
                base_tx: base_tx_with(vec![local_input], vec![change_output(100, avax_asset_id())]),
                source_chain_id: x_chain_id(),
                imported_inputs: vec![imported_input],
            }),
            vec![credential(), credential()],
            tx_metadata(4),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();

        assert_eq!(executor.inputs.len(), 1);
        let requests = executor.atomic_requests.get(&x_chain_id()).unwrap();
        assert_eq!(requests.remove_requests.len(), 1);
        assert_eq!(state.utxos().len(), 1);
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_export_address_traits --exact --show-output
    #[test]
    fn test_export_address_traits() {
        let config = config::Config::default();
        let tx_fee = config.tx_fee;
        let backend = test_backend(config);

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);

        let input = funded_utxo(&mut state, 1, tx_fee + 30, avax_asset_id());

        let addr_1 = short::Id::from_slice(&[0x01]);
        let addr_2 = short::Id::from_slice(&[0x02]);
        let exported_outputs = vec![
            transferable::Output {
                asset_id: avax_asset_id(),
                out: TransferableOut::TransferOutput(transfer::Output {
                    amount: 10,
                    output_owners: OutputOwners::new(0, 1, &[addr_1.clone(), addr_2.clone()]),
                }),
            },
            transferable::Output {
                asset_id: avax_asset_id(),
                out: TransferableOut::TransferOutput(transfer::Output {
                    amount: 20,
                    output_owners: OutputOwners::new(0, 0, &[]),
                }),
            },
        ];

        let tx = ptxs::Tx::new(
            UnsignedTx::Export(export::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
                destination_chain_id: x_chain_id(),
                exported_outputs,
            }),
            vec![credential()],
            tx_metadata(5),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();

        let requests = executor.atomic_requests.get(&x_chain_id()).unwrap();
        assert_eq!(requests.put_requests.len(), 2);
        assert!(requests.remove_requests.is_empty());

        // exported UTXOs are indexed after the chain-local outputs
        let elem_0 = &requests.put_requests[0];
        let expected_id = utxo::Id::new(tx.id().as_ref(), 0).unwrap();
        assert_eq!(elem_0.key, expected_id.id.to_vec());
        assert_eq!(elem_0.traits, vec![addr_1.to_vec(), addr_2.to_vec()]);

        let decoded = utxo::Utxo::unpack(&elem_0.value).unwrap();
        assert_eq!(decoded.asset_id, avax_asset_id());
        assert_eq!(decoded.out.amount(), 10);

        // an output owned by no addresses carries no traits
        assert!(requests.put_requests[1].traits.is_empty());
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_transform_subnet_dual_asset_fee --exact --show-output
    #[test]
    fn test_transform_subnet_dual_asset_fee() {
        let config = config::Config {
            transform_subnet_tx_fee: 100,
            ..test_staking_config()
        };
        let backend = test_backend(config);

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);

        let subnet_id = ids::Id::from_slice(&[0x51]);
        state.set_subnet_owner(&subnet_id, owners(0x33));

        let staking_asset_id = ids::Id::from_slice(&[0xbb]);
        let fee_input = funded_utxo(&mut state, 1, 100, avax_asset_id());
        // the full reward pool, maximum minus initial supply
        let stake_input = funded_utxo(&mut state, 2, 4_000, staking_asset_id);

        let tx = ptxs::Tx::new(
            UnsignedTx::TransformSubnet(transform_subnet::Tx {
                base_tx: base_tx_with(vec![fee_input, stake_input], Vec::new()),
                subnet_id,
                asset_id: staking_asset_id,
                initial_supply: 1_000,
                maximum_supply: 5_000,
                min_consumption_rate: 100_000,
                max_consumption_rate: 120_000,
                min_validator_stake: 10,
                max_validator_stake: 1_000,
                min_stake_duration: 100,
                max_stake_duration: 1_000,
                min_delegation_fee: 0,
                min_delegator_stake: 10,
                max_validator_weight_factor: 5,
                uptime_requirement: 800_000,
                subnet_auth: secp256k1::txs::Input::new(vec![0]),
            }),
            vec![credential(), credential(), credential()],
            tx_metadata(6),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();

        assert!(state.get_subnet_transformation(&subnet_id).is_some());
        assert_eq!(state.get_current_supply(&subnet_id).unwrap(), 1_000);
        assert!(state.utxos().is_empty());
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_pre_durango_delegator_is_pending --exact --show-output
    #[test]
    fn test_pre_durango_delegator_is_pending() {
        let config = config::Config {
            durango_time: u64::MAX,
            ..test_staking_config()
        };
        let backend = test_backend(config);

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);
        let supply_before = state
            .get_current_supply(&platformvm::PRIMARY_NETWORK_ID)
            .unwrap();

        let node_id = node::Id::from_slice(&[0x77]);
        state.put_current_validator(primary_validator(node_id, 0, 1_000_000, 10_000));

        let input = funded_utxo(&mut state, 1, 100, avax_asset_id());
        let tx = ptxs::Tx::new(
            UnsignedTx::AddPermissionlessDelegator(add_permissionless_delegator::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
                validator: ptxs::SubnetValidator {
                    validator: Validator {
                        node_id,
                        start: 2_000,
                        end: 3_000,
                        weight: 100,
                    },
                    subnet_id: *platformvm::PRIMARY_NETWORK_ID,
                },
                stake_outs: vec![change_output(100, avax_asset_id())],
                rewards_owner: owners(0x22),
            }),
            vec![credential()],
            tx_metadata(7),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();

        let stakers = state.stakers();
        let staker = stakers
            .iter()
            .find(|staker| staker.tx_id == tx.id())
            .unwrap();
        assert_eq!(staker.priority, Priority::PrimaryNetworkDelegatorPending);
        assert_eq!(staker.start_time, 2_000);
        assert_eq!(staker.potential_reward, 0);

        // no reward is minted until promotion
        assert_eq!(
            state
                .get_current_supply(&platformvm::PRIMARY_NETWORK_ID)
                .unwrap(),
            supply_before
        );
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_post_durango_permissionless_validator --exact --show-output
    #[test]
    fn test_post_durango_permissionless_validator() {
        let config = test_staking_config();
        let backend = test_backend(config.clone());

        let supply_before = 360 * units::MEGA_AVAX;
        let mut state = Memory::new(supply_before);
        state.set_timestamp(1_000);

        let node_id = node::Id::from_slice(&[0x77]);
        let weight = 1_000_000;
        let end = 501_000;
        let input = funded_utxo(&mut state, 1, weight, avax_asset_id());

        let tx = ptxs::Tx::new(
            UnsignedTx::AddPermissionlessValidator(add_permissionless_validator::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
                validator: ptxs::SubnetValidator {
                    validator: Validator {
                        node_id,
                        start: 1_000,
                        end,
                        weight,
                    },
                    subnet_id: *platformvm::PRIMARY_NETWORK_ID,
                },
                stake_outs: vec![change_output(weight, avax_asset_id())],
                validation_rewards_owner: owners(0x22),
                delegation_rewards_owner: owners(0x22),
                delegation_shares: 20_000,
            }),
            vec![credential()],
            tx_metadata(8),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();

        let staker = state
            .get_current_validator(&platformvm::PRIMARY_NETWORK_ID, &node_id)
            .unwrap();
        assert_eq!(staker.priority, Priority::PrimaryNetworkValidatorCurrent);
        assert_eq!(staker.start_time, 1_000);
        assert_eq!(staker.end_time, end);

        let expected_reward = rewards::Calculator::new(config.reward_config)
            .calculate(end - 1_000, weight, supply_before);
        assert!(expected_reward > 0);
        assert_eq!(staker.potential_reward, expected_reward);
        assert_eq!(
            state
                .get_current_supply(&platformvm::PRIMARY_NETWORK_ID)
                .unwrap(),
            supply_before + expected_reward
        );
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_add_subnet_validator_earns_no_reward --exact --show-output
    #[test]
    fn test_add_subnet_validator_earns_no_reward() {
        let config = test_staking_config();
        let backend = test_backend(config);

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);

        let subnet_id = ids::Id::from_slice(&[0x51]);
        state.set_subnet_owner(&subnet_id, owners(0x33));

        let node_id = node::Id::from_slice(&[0x77]);
        state.put_current_validator(primary_validator(node_id, 0, 1_000_000, 10_000));

        let input = funded_utxo(&mut state, 1, 10, avax_asset_id());
        let tx = ptxs::Tx::new(
            UnsignedTx::AddSubnetValidator(add_subnet_validator::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
                validator: ptxs::SubnetValidator {
                    validator: Validator {
                        node_id,
                        start: 2_000,
                        end: 10_000,
                        weight: 7,
                    },
                    subnet_id,
                },
                subnet_auth: secp256k1::txs::Input::new(vec![0]),
            }),
            vec![credential(), credential()],
            tx_metadata(9),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();

        let staker = state.get_current_validator(&subnet_id, &node_id).unwrap();
        assert_eq!(staker.priority, Priority::SubnetPermissionedValidatorCurrent);
        assert_eq!(staker.potential_reward, 0);
        // a permissioned subnet carries no supply to mint from
        assert!(state.get_current_supply(&subnet_id).is_err());
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_remove_subnet_validator --exact --show-output
    #[test]
    fn test_remove_subnet_validator() {
        let config = test_staking_config();
        let backend = test_backend(config.clone());

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);

        let subnet_id = ids::Id::from_slice(&[0x51]);
        state.set_subnet_owner(&subnet_id, owners(0x33));

        let node_id = node::Id::from_slice(&[0x77]);
        state.put_current_validator(Staker {
            tx_id: ids::Id::from_slice(&[0xdd]),
            node_id,
            subnet_id,
            weight: 7,
            start_time: 0,
            end_time: 10_000,
            potential_reward: 0,
            priority: Priority::SubnetPermissionedValidatorCurrent,
        });

        let input = funded_utxo(&mut state, 1, config.tx_fee, avax_asset_id());
        let tx = ptxs::Tx::new(
            UnsignedTx::RemoveSubnetValidator(remove_subnet_validator::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
                node_id,
                subnet_id,
                subnet_auth: secp256k1::txs::Input::new(vec![0]),
            }),
            vec![credential(), credential()],
            tx_metadata(10),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();

        assert!(state.get_current_validator(&subnet_id, &node_id).is_none());
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_transfer_subnet_ownership --exact --show-output
    #[test]
    fn test_transfer_subnet_ownership() {
        let config = test_staking_config();
        let backend = test_backend(config.clone());

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);

        let subnet_id = ids::Id::from_slice(&[0x51]);
        state.set_subnet_owner(&subnet_id, owners(0x33));

        let input = funded_utxo(&mut state, 1, config.tx_fee, avax_asset_id());
        let tx = ptxs::Tx::new(
            UnsignedTx::TransferSubnetOwnership(transfer_subnet_ownership::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
                subnet_id,
                owner: owners(0x44),
                subnet_auth: secp256k1::txs::Input::new(vec![0]),
            }),
            vec![credential(), credential()],
            tx_metadata(11),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        executor.execute().unwrap();

        assert_eq!(state.get_subnet_owner(&subnet_id).unwrap(), owners(0x44));
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_add_validator_rejects_empty_node_id --exact --show-output
    #[test]
    fn test_add_validator_rejects_empty_node_id() {
        let backend = test_backend(test_staking_config());

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);
        let input = funded_utxo(&mut state, 1, 1_000, avax_asset_id());
        let snapshot = state.clone();

        let tx = ptxs::Tx::new(
            UnsignedTx::AddValidator(add_validator::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
                validator: Validator {
                    node_id: node::Id::empty(),
                    start: 1_000,
                    end: 500_000,
                    weight: 1_000,
                },
                stake_outs: vec![change_output(1_000, avax_asset_id())],
                rewards_owner: owners(0x22),
                delegation_shares: 20_000,
            }),
            vec![credential()],
            tx_metadata(21),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        assert_eq!(executor.execute(), Err(Error::EmptyNodeId));
        assert_eq!(state, snapshot);
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_base_tx_requires_durango --exact --show-output
    #[test]
    fn test_base_tx_requires_durango() {
        let config = config::Config {
            durango_time: u64::MAX,
            ..config::Config::default()
        };
        let tx_fee = config.tx_fee;
        let backend = test_backend(config);

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);
        let input = funded_utxo(&mut state, 1, tx_fee, avax_asset_id());
        let snapshot = state.clone();

        let tx = ptxs::Tx::new(
            UnsignedTx::Base(platformvm::txs::base::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
            }),
            vec![credential()],
            tx_metadata(12),
        );

        let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
        assert_eq!(executor.execute(), Err(Error::DurangoUpgradeNotActive));
        assert_eq!(state, snapshot);
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_wrong_tx_type_rejection --exact --show-output
    #[test]
    fn test_wrong_tx_type_rejection() {
        let backend = test_backend(config::Config::default());

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);
        let snapshot = state.clone();

        let advance_tx = ptxs::Tx::new(
            UnsignedTx::AdvanceTime(advance_time::Tx { time: 9_999 }),
            Vec::new(),
            tx_metadata(13),
        );
        let mut executor = StandardTxExecutor::new(&backend, &mut state, &advance_tx);
        assert_eq!(executor.execute(), Err(Error::WrongTxType));

        let reward_tx = ptxs::Tx::new(
            UnsignedTx::RewardValidator(reward_validator::Tx {
                tx_id: ids::Id::from_slice(&[0xee]),
            }),
            Vec::new(),
            tx_metadata(14),
        );
        let mut executor = StandardTxExecutor::new(&backend, &mut state, &reward_tx);
        assert_eq!(executor.execute(), Err(Error::WrongTxType));

        assert_eq!(state.get_timestamp(), 1_000);
        assert_eq!(state, snapshot);
    }

    fn run_create_subnet(
        state: &mut Memory,
        fee_paid: u64,
        change: u64,
        memo: Vec<u8>,
    ) -> Result<ids::Id> {
        let config = config::Config {
            create_subnet_tx_fee: 1_000,
            ..config::Config::default()
        };
        let backend = test_backend(config);

        let input = funded_utxo(state, 1, fee_paid + change, avax_asset_id());
        let outs = if change > 0 {
            vec![change_output(change, avax_asset_id())]
        } else {
            Vec::new()
        };
        let mut base_tx = base_tx_with(vec![input], outs);
        base_tx.memo = memo;

        let tx = ptxs::Tx::new(
            UnsignedTx::CreateSubnet(create_subnet::Tx {
                base_tx,
                owner: owners(0x22),
            }),
            vec![credential()],
            tx_metadata(15),
        );

        let mut executor = StandardTxExecutor::new(&backend, state, &tx);
        executor.execute()?;
        Ok(tx.id())
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            .. ProptestConfig::default()
        })]

        /// Any failure leaves the diff byte-identical to its
        /// pre-execution snapshot.
        #[test]
        fn prop_failed_execution_leaves_no_mutation(
            fee_paid in 0u64..2_000,
            memo_len in 0usize..4,
        ) {
            let mut state = Memory::new(360 * units::MEGA_AVAX);
            state.set_timestamp(1_000);

            let result = run_create_subnet(&mut state, fee_paid, 0, vec![0x4d; memo_len]);
            let snapshot_after_funding = {
                // rebuild the expected pre-execution state: timestamp
                // plus the funded UTXO
                let mut expected = Memory::new(360 * units::MEGA_AVAX);
                expected.set_timestamp(1_000);
                let _ = funded_utxo(&mut expected, 1, fee_paid, avax_asset_id());
                expected
            };

            if fee_paid < 1_000 || memo_len > 0 {
                prop_assert!(result.is_err());
                prop_assert_eq!(state, snapshot_after_funding);
            } else {
                prop_assert!(result.is_ok());
                prop_assert!(state.utxos().is_empty());
                prop_assert_eq!(state.subnets().len(), 1);
            }
        }

        /// For every accepted spend, consumed value equals produced
        /// value plus the fee.
        #[test]
        fn prop_flow_conservation(change in 0u64..10_000) {
            let mut state = Memory::new(360 * units::MEGA_AVAX);
            state.set_timestamp(1_000);

            let consumed = 1_000 + change;
            let result = run_create_subnet(&mut state, 1_000, change, Vec::new());
            prop_assert!(result.is_ok());

            let produced: u64 = state
                .utxos()
                .values()
                .map(|utxo| utxo.out.amount())
                .sum();
            prop_assert_eq!(consumed, produced + 1_000);
        }

        /// Produced UTXO ids never collide, with each other or with
        /// the consumed ones.
        #[test]
        fn prop_produced_utxo_ids_unique(n_outs in 1usize..16) {
            let mut state = Memory::new(360 * units::MEGA_AVAX);
            state.set_timestamp(1_000);

            let outs: Vec<transferable::Output> = (0..n_outs)
                .map(|_| change_output(10, avax_asset_id()))
                .collect();
            let config = config::Config {
                create_subnet_tx_fee: 1_000,
                ..config::Config::default()
            };
            let backend = test_backend(config);
            let input = funded_utxo(&mut state, 1, 1_000 + 10 * n_outs as u64, avax_asset_id());
            let consumed_id = input.input_id();

            let tx = ptxs::Tx::new(
                UnsignedTx::CreateSubnet(create_subnet::Tx {
                    base_tx: base_tx_with(vec![input], outs),
                    owner: owners(0x22),
                }),
                vec![credential()],
                tx_metadata(16),
            );
            let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
            prop_assert!(executor.execute().is_ok());

            // the map is keyed by utxo id, so its size proves
            // injectivity
            prop_assert_eq!(state.utxos().len(), n_outs);
            prop_assert!(!state.utxos().contains_key(&consumed_id));
        }

        /// Identical executions on cloned diffs produce identical
        /// mutations and atomic requests.
        #[test]
        fn prop_identical_executions_are_deterministic(amount in 1u64..1_000) {
            let config = config::Config::default();
            let tx_fee = config.tx_fee;
            let backend = test_backend(config);

            let mut state_a = Memory::new(360 * units::MEGA_AVAX);
            state_a.set_timestamp(1_000);
            let input = funded_utxo(&mut state_a, 1, tx_fee + amount, avax_asset_id());
            let mut state_b = state_a.clone();

            let tx = ptxs::Tx::new(
                UnsignedTx::Export(export::Tx {
                    base_tx: base_tx_with(vec![input], Vec::new()),
                    destination_chain_id: x_chain_id(),
                    exported_outputs: vec![change_output(amount, avax_asset_id())],
                }),
                vec![credential()],
                tx_metadata(17),
            );

            let mut executor_a = StandardTxExecutor::new(&backend, &mut state_a, &tx);
            prop_assert!(executor_a.execute().is_ok());
            let requests_a = executor_a.atomic_requests.clone();

            let mut executor_b = StandardTxExecutor::new(&backend, &mut state_b, &tx);
            prop_assert!(executor_b.execute().is_ok());
            let requests_b = executor_b.atomic_requests.clone();

            prop_assert_eq!(state_a, state_b);
            prop_assert_eq!(requests_a, requests_b);
        }

        /// Supply only ever grows, and only when a permissionless
        /// staker is added.
        #[test]
        fn prop_supply_monotone(weight in 10u64..1_000_000, duration in 100u64..500_000) {
            let config = test_staking_config();
            let backend = test_backend(config);

            let supply_before = 360 * units::MEGA_AVAX;
            let mut state = Memory::new(supply_before);
            state.set_timestamp(1_000);

            let node_id = node::Id::from_slice(&[0x77]);
            let input = funded_utxo(&mut state, 1, weight, avax_asset_id());
            let tx = ptxs::Tx::new(
                UnsignedTx::AddPermissionlessValidator(add_permissionless_validator::Tx {
                    base_tx: base_tx_with(vec![input], Vec::new()),
                    validator: ptxs::SubnetValidator {
                        validator: Validator {
                            node_id,
                            start: 1_000,
                            end: 1_000 + duration,
                            weight,
                        },
                        subnet_id: *platformvm::PRIMARY_NETWORK_ID,
                    },
                    stake_outs: vec![change_output(weight, avax_asset_id())],
                    validation_rewards_owner: owners(0x22),
                    delegation_rewards_owner: owners(0x22),
                    delegation_shares: 20_000,
                }),
                vec![credential()],
                tx_metadata(18),
            );

            let mut executor = StandardTxExecutor::new(&backend, &mut state, &tx);
            prop_assert!(executor.execute().is_ok());

            let supply_after = state
                .get_current_supply(&platformvm::PRIMARY_NETWORK_ID)
                .unwrap();
            prop_assert!(supply_after >= supply_before);

            let staker = state
                .get_current_validator(&platformvm::PRIMARY_NETWORK_ID, &node_id)
                .unwrap();
            prop_assert_eq!(supply_after - supply_before, staker.potential_reward);
        }
    }

    /// RUST_LOG=debug cargo test --package platformvm-executor --lib -- executor::tests::test_staker_partition --exact --show-output
    #[test]
    fn test_staker_partition() {
        // run the two staker scenarios above back to back on one
        // diff, then check no record appears in more than one set
        let config = test_staking_config();
        let backend = test_backend(config.clone());

        let mut state = Memory::new(360 * units::MEGA_AVAX);
        state.set_timestamp(1_000);

        let subnet_id = ids::Id::from_slice(&[0x51]);
        state.set_subnet_owner(&subnet_id, owners(0x33));

        let validator_node_id = node::Id::from_slice(&[0x77]);
        let input = funded_utxo(&mut state, 1, 1_000, avax_asset_id());
        let validator_tx = ptxs::Tx::new(
            UnsignedTx::AddPermissionlessValidator(add_permissionless_validator::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
                validator: ptxs::SubnetValidator {
                    validator: Validator {
                        node_id: validator_node_id,
                        start: 1_000,
                        end: 500_000,
                        weight: 1_000,
                    },
                    subnet_id: *platformvm::PRIMARY_NETWORK_ID,
                },
                stake_outs: vec![change_output(1_000, avax_asset_id())],
                validation_rewards_owner: owners(0x22),
                delegation_rewards_owner: owners(0x22),
                delegation_shares: 20_000,
            }),
            vec![credential()],
            tx_metadata(19),
        );
        let mut executor = StandardTxExecutor::new(&backend, &mut state, &validator_tx);
        executor.execute().unwrap();

        let input = funded_utxo(&mut state, 2, 100, avax_asset_id());
        let delegator_tx = ptxs::Tx::new(
            UnsignedTx::AddPermissionlessDelegator(add_permissionless_delegator::Tx {
                base_tx: base_tx_with(vec![input], Vec::new()),
                validator: ptxs::SubnetValidator {
                    validator: Validator {
                        node_id: validator_node_id,
                        start: 1_000,
                        end: 400_000,
                        weight: 100,
                    },
                    subnet_id: *platformvm::PRIMARY_NETWORK_ID,
                },
                stake_outs: vec![change_output(100, avax_asset_id())],
                rewards_owner: owners(0x22),
            }),
            vec![credential()],
            tx_metadata(20),
        );
        let mut executor = StandardTxExecutor::new(&backend, &mut state, &delegator_tx);
        executor.execute().unwrap();

        let stakers = state.stakers();
        assert_eq!(stakers.len(), 2);
        let mut tx_ids: Vec<ids::Id> = stakers.iter().map(|staker| staker.tx_id).collect();
        tx_ids.sort();
        tx_ids.dedup();
        assert_eq!(tx_ids.len(), 2);
    }
}
