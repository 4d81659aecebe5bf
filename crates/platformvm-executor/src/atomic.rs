//! Cross-chain atomic side effects: the requests an execution queues
//! and the shared-memory reader the import path resolves UTXOs from.
use std::collections::HashMap;

use crate::errors::{Error, Result};
use platformvm_types::ids;
use serde::{Deserialize, Serialize};

/// A single UTXO handed to a peer chain's shared memory.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Element {
    /// The UTXO's input id.
    pub key: Vec<u8>,
    /// The marshaled UTXO.
    pub value: Vec<u8>,
    /// Addresses owning the UTXO, for cross-chain indexing.
    /// May be empty.
    pub traits: Vec<Vec<u8>>,
}

/// Side effects to apply to one peer chain's shared memory when the
/// transaction is accepted. The executor only records them; the
/// atomic commit layer materializes them.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Requests {
    #[serde(rename = "removeRequests")]
    pub remove_requests: Vec<Vec<u8>>,
    #[serde(rename = "putRequests")]
    pub put_requests: Vec<Element>,
}

/// Read access to the shared memory between this chain and its peers.
/// The contract is synchronous: one value per requested key, in key
/// order, or an error if any key is absent.
pub trait SharedMemory: Send + Sync {
    fn get(&self, peer_chain_id: &ids::Id, keys: &[Vec<u8>]) -> Result<Vec<Vec<u8>>>;
}

/// A map-backed [`SharedMemory`] for hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MapSharedMemory {
    pub entries: HashMap<ids::Id, HashMap<Vec<u8>, Vec<u8>>>,
}

impl SharedMemory for MapSharedMemory {
    fn get(&self, peer_chain_id: &ids::Id, keys: &[Vec<u8>]) -> Result<Vec<Vec<u8>>> {
        let chain_entries =
            self.entries
                .get(peer_chain_id)
                .ok_or_else(|| Error::SharedMemoryUnavailable {
                    reason: format!("no shared memory with chain {}", peer_chain_id),
                })?;

        let mut values = Vec::with_capacity(keys.len());
        for key in keys.iter() {
            let value =
                chain_entries
                    .get(key)
                    .ok_or_else(|| Error::SharedMemoryUnavailable {
                        reason: format!("key {} absent", hex::encode(key)),
                    })?;
            values.push(value.clone());
        }
        Ok(values)
    }
}

/// RUST_LOG=debug cargo test --package platformvm-executor --lib -- atomic::test_map_shared_memory --exact --show-output
#[test]
fn test_map_shared_memory() {
    let peer = ids::Id::from_slice(&[1]);
    let mut shared_memory = MapSharedMemory::default();
    shared_memory
        .entries
        .entry(peer)
        .or_default()
        .insert(vec![1, 2], vec![3, 4]);

    let values = shared_memory.get(&peer, &[vec![1, 2]]).unwrap();
    assert_eq!(values, vec![vec![3, 4]]);

    // any absent key fails the whole read
    assert!(shared_memory.get(&peer, &[vec![1, 2], vec![9]]).is_err());
    assert!(shared_memory
        .get(&ids::Id::from_slice(&[2]), &[vec![1, 2]])
        .is_err());
}
