//! The immutable chain context an executor runs under.
use std::{collections::HashMap, sync::Arc};

use crate::{
    atomic::SharedMemory,
    errors::{Error, Result},
};
use platformvm_types::ids::{self, node};

/// Resolves which subnet a chain belongs to. The platform chain
/// consults this oracle before accepting cross-chain atomic
/// operations; the membership policy itself lives outside the
/// executor.
pub trait ValidatorState: Send + Sync {
    fn get_subnet_id(&self, chain_id: &ids::Id) -> Result<ids::Id>;
}

/// A map-backed [`ValidatorState`] for hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MapValidatorState {
    pub subnet_of: HashMap<ids::Id, ids::Id>,
}

impl ValidatorState for MapValidatorState {
    fn get_subnet_id(&self, chain_id: &ids::Id) -> Result<ids::Id> {
        self.subnet_of
            .get(chain_id)
            .copied()
            .ok_or(Error::SameSubnetMismatch {
                chain_id: *chain_id,
                subnet_id: ids::Id::empty(),
            })
    }
}

/// Identifiers and shared handles of the chain this executor runs
/// for. Cloning is cheap; the oracle handles are reference counted.
#[derive(Clone)]
pub struct Ctx {
    pub network_id: u32,
    pub chain_id: ids::Id,
    /// The subnet that validates this chain.
    pub subnet_id: ids::Id,
    /// The platform fee asset.
    pub avax_asset_id: ids::Id,
    /// This node's own id, used only for partial-sync warnings.
    pub node_id: node::Id,

    pub shared_memory: Arc<dyn SharedMemory>,
    pub validator_state: Arc<dyn ValidatorState>,
}

/// Checks that the peer chain may exchange atomic messages with this
/// chain: it must be a different chain validated by the same subnet.
pub fn verify_same_subnet(ctx: &Ctx, peer_chain_id: &ids::Id) -> Result<()> {
    if *peer_chain_id == ctx.chain_id {
        return Err(Error::SameSubnetMismatch {
            chain_id: *peer_chain_id,
            subnet_id: ctx.subnet_id,
        });
    }
    let peer_subnet_id = ctx.validator_state.get_subnet_id(peer_chain_id)?;
    if peer_subnet_id != ctx.subnet_id {
        return Err(Error::SameSubnetMismatch {
            chain_id: *peer_chain_id,
            subnet_id: ctx.subnet_id,
        });
    }
    Ok(())
}

/// RUST_LOG=debug cargo test --package platformvm-executor --lib -- context::test_verify_same_subnet --exact --show-output
#[test]
fn test_verify_same_subnet() {
    use crate::atomic::MapSharedMemory;

    let subnet_id = ids::Id::from_slice(&[1]);
    let chain_id = ids::Id::from_slice(&[2]);
    let peer_chain_id = ids::Id::from_slice(&[3]);
    let foreign_chain_id = ids::Id::from_slice(&[4]);

    let mut validator_state = MapValidatorState::default();
    validator_state.subnet_of.insert(chain_id, subnet_id);
    validator_state.subnet_of.insert(peer_chain_id, subnet_id);
    validator_state
        .subnet_of
        .insert(foreign_chain_id, ids::Id::from_slice(&[9]));

    let ctx = Ctx {
        network_id: 1,
        chain_id,
        subnet_id,
        avax_asset_id: ids::Id::from_slice(&[8]),
        node_id: node::Id::empty(),
        shared_memory: Arc::new(MapSharedMemory::default()),
        validator_state: Arc::new(validator_state),
    };

    assert!(verify_same_subnet(&ctx, &peer_chain_id).is_ok());
    // a chain cannot atomically message itself
    assert!(verify_same_subnet(&ctx, &chain_id).is_err());
    // nor a chain on a different subnet
    assert!(verify_same_subnet(&ctx, &foreign_chain_id).is_err());
}
