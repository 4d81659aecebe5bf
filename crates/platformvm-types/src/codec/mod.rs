//! Implementation of the platform chain linear codec registry.
pub mod serde;

use std::collections::HashMap;

use lazy_static::lazy_static;

pub const VERSION: u16 = 0;

lazy_static! {
    /// Registered platform chain type names and their wire type ids.
    /// The registry is process-wide and immutable; initialization
    /// failure aborts the process at startup.
    /// ref. "avalanchego/vms/platformvm/txs/codec.go"
    pub static ref P_TYPES: HashMap<String, usize> = {
        let mut m = HashMap::new();
        m.insert("platformvm.ProposalBlock".to_string(), 0);
        m.insert("platformvm.AbortBlock".to_string(), 1);
        m.insert("platformvm.CommitBlock".to_string(), 2);
        m.insert("platformvm.StandardBlock".to_string(), 3);
        m.insert("platformvm.AtomicBlock".to_string(), 4);

        m.insert("secp256k1fx.TransferInput".to_string(), 5);
        m.insert("secp256k1fx.MintOutput".to_string(), 6);
        m.insert("secp256k1fx.TransferOutput".to_string(), 7);
        m.insert("secp256k1fx.MintOperation".to_string(), 8);
        m.insert("secp256k1fx.Credential".to_string(), 9);
        m.insert("secp256k1fx.Input".to_string(), 10);
        m.insert("secp256k1fx.OutputOwners".to_string(), 11);

        m.insert("platformvm.AddValidatorTx".to_string(), 12);
        m.insert("platformvm.AddSubnetValidatorTx".to_string(), 13);
        m.insert("platformvm.AddDelegatorTx".to_string(), 14);
        m.insert("platformvm.CreateChainTx".to_string(), 15);
        m.insert("platformvm.CreateSubnetTx".to_string(), 16);
        m.insert("platformvm.ImportTx".to_string(), 17);
        m.insert("platformvm.ExportTx".to_string(), 18);
        m.insert("platformvm.AdvanceTimeTx".to_string(), 19);
        m.insert("platformvm.RewardValidatorTx".to_string(), 20);
        m.insert("platformvm.StakeableLockIn".to_string(), 21);
        m.insert("platformvm.StakeableLockOut".to_string(), 22);

        m.insert("platformvm.RemoveSubnetValidatorTx".to_string(), 23);
        m.insert("platformvm.TransformSubnetTx".to_string(), 24);
        m.insert("platformvm.AddPermissionlessValidatorTx".to_string(), 25);
        m.insert("platformvm.AddPermissionlessDelegatorTx".to_string(), 26);

        m.insert("platformvm.BaseTx".to_string(), 27);
        m.insert("platformvm.TransferSubnetOwnershipTx".to_string(), 28);

        m
    };
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- codec::test_p_types --exact --show-output
#[test]
fn test_p_types() {
    assert_eq!(*P_TYPES.get("secp256k1fx.TransferOutput").unwrap(), 7);
    assert_eq!(*P_TYPES.get("platformvm.StakeableLockOut").unwrap(), 22);
}
