//! Staker transaction capabilities and scheduling priorities.
use crate::ids::{self, node};
use serde::{Deserialize, Serialize};

/// Encodes where a staker record lives: {pending, current} x
/// {validator, delegator} x {permissioned, permissionless}.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#Priority>
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Priority {
    SubnetPermissionedValidatorPending,
    SubnetPermissionlessDelegatorPending,
    SubnetPermissionlessValidatorPending,
    PrimaryNetworkDelegatorPending,
    PrimaryNetworkValidatorPending,

    SubnetPermissionedValidatorCurrent,
    SubnetPermissionlessDelegatorCurrent,
    SubnetPermissionlessValidatorCurrent,
    PrimaryNetworkDelegatorCurrent,
    PrimaryNetworkValidatorCurrent,
}

impl Priority {
    pub fn is_current(&self) -> bool {
        matches!(
            self,
            Priority::SubnetPermissionedValidatorCurrent
                | Priority::SubnetPermissionlessDelegatorCurrent
                | Priority::SubnetPermissionlessValidatorCurrent
                | Priority::PrimaryNetworkDelegatorCurrent
                | Priority::PrimaryNetworkValidatorCurrent
        )
    }

    pub fn is_pending(&self) -> bool {
        !self.is_current()
    }

    pub fn is_validator(&self) -> bool {
        matches!(
            self,
            Priority::SubnetPermissionedValidatorPending
                | Priority::SubnetPermissionlessValidatorPending
                | Priority::PrimaryNetworkValidatorPending
                | Priority::SubnetPermissionedValidatorCurrent
                | Priority::SubnetPermissionlessValidatorCurrent
                | Priority::PrimaryNetworkValidatorCurrent
        )
    }

    pub fn is_delegator(&self) -> bool {
        !self.is_validator()
    }

    pub fn is_current_validator(&self) -> bool {
        self.is_current() && self.is_validator()
    }

    pub fn is_current_delegator(&self) -> bool {
        self.is_current() && self.is_delegator()
    }

    pub fn is_pending_validator(&self) -> bool {
        self.is_pending() && self.is_validator()
    }

    pub fn is_pending_delegator(&self) -> bool {
        self.is_pending() && self.is_delegator()
    }

    /// Permissioned validators are admitted by the subnet owner key
    /// and never earn a reward.
    pub fn is_permissioned_validator(&self) -> bool {
        matches!(
            self,
            Priority::SubnetPermissionedValidatorPending
                | Priority::SubnetPermissionedValidatorCurrent
        )
    }
}

/// Implemented by every transaction that places a node into a
/// validator or delegator role over a time window.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#Staker>
pub trait Staker {
    fn node_id(&self) -> node::Id;
    fn subnet_id(&self) -> ids::Id;
    fn weight(&self) -> u64;
    /// The scheduled start time, "None" when the variant carries no
    /// explicit start (post-Durango stakers start at chain time).
    fn start_time(&self) -> Option<u64>;
    fn end_time(&self) -> u64;
    fn pending_priority(&self) -> Priority;
    fn current_priority(&self) -> Priority;
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- platformvm::txs::staker::test_priority_partition --exact --show-output
#[test]
fn test_priority_partition() {
    let all = [
        Priority::SubnetPermissionedValidatorPending,
        Priority::SubnetPermissionlessDelegatorPending,
        Priority::SubnetPermissionlessValidatorPending,
        Priority::PrimaryNetworkDelegatorPending,
        Priority::PrimaryNetworkValidatorPending,
        Priority::SubnetPermissionedValidatorCurrent,
        Priority::SubnetPermissionlessDelegatorCurrent,
        Priority::SubnetPermissionlessValidatorCurrent,
        Priority::PrimaryNetworkDelegatorCurrent,
        Priority::PrimaryNetworkValidatorCurrent,
    ];
    for p in all.iter() {
        // every priority falls in exactly one of the four cells
        let cells = [
            p.is_current_validator(),
            p.is_current_delegator(),
            p.is_pending_validator(),
            p.is_pending_delegator(),
        ];
        assert_eq!(cells.iter().filter(|b| **b).count(), 1);
    }

    assert!(Priority::SubnetPermissionedValidatorCurrent.is_permissioned_validator());
    assert!(!Priority::SubnetPermissionlessValidatorCurrent.is_permissioned_validator());
}
