//! The stable error taxonomy of the standard transaction executor.
use platformvm_types::{
    ids::{self, node},
    platformvm::txs::staker::Priority,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure an execution can surface. A returned error implies
/// the state diff saw no observable mutation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The executor was handed a proposal transaction
    /// (advance time, reward validator).
    #[error("wrong transaction type")]
    WrongTxType,

    #[error("validator nodeID cannot be empty")]
    EmptyNodeId,

    #[error("max stake duration must be less than or equal to the global max stake duration")]
    MaxStakeDurationTooLarge,

    #[error("staker transactions must have a start time pre-Durango")]
    MissingStartTimePreDurango,

    #[error("Durango upgrade is not yet active")]
    DurangoUpgradeNotActive,

    #[error("failed syntactic verification: {reason}")]
    SyntacticInvalid { reason: String },

    #[error("memo size {size} exceeds maximum {max}")]
    MemoTooLong { size: usize, max: usize },

    #[error("flow check failed: {reason}")]
    FlowCheckFailed { reason: String },

    #[error("subnet authorization failed: {reason}")]
    SubnetAuthFailed { reason: String },

    #[error("chain {chain_id} cannot exchange atomic messages with subnet {subnet_id}")]
    SameSubnetMismatch {
        chain_id: ids::Id,
        subnet_id: ids::Id,
    },

    #[error("failed to get shared memory: {reason}")]
    SharedMemoryUnavailable { reason: String },

    #[error("codec failure: {0}")]
    Codec(#[from] platformvm_types::errors::Error),

    #[error("staker {tx_id} has unexpected priority {priority:?}")]
    UnexpectedStakerPriority { tx_id: ids::Id, priority: Priority },

    #[error("UTXO {utxo_id} not found")]
    UtxoNotFound { utxo_id: ids::Id },

    #[error("subnet {subnet_id} does not exist")]
    SubnetNotFound { subnet_id: ids::Id },

    #[error("no current supply recorded for subnet {subnet_id}")]
    SupplyNotFound { subnet_id: ids::Id },

    #[error("subnet {subnet_id} is permissioned and has not been transformed")]
    SubnetNotTransformed { subnet_id: ids::Id },

    #[error("tx {tx_id} recorded as the transformation of its subnet is not a transform subnet tx")]
    NotTransformSubnetTx { tx_id: ids::Id },

    #[error("subnet {subnet_id} has been transformed and its owner keys are immutable")]
    TransformedSubnet { subnet_id: ids::Id },

    #[error("staker start time {start} is not after the end time {end}")]
    StartAfterEndTime { start: u64, end: u64 },

    #[error("chain timestamp {chain_time} is not before the staker start time {start}")]
    TimestampNotBeforeStartTime { chain_time: u64, start: u64 },

    #[error("staker start time {start} is too far in the future (latest allowed {latest})")]
    FutureStakeTime { start: u64, latest: u64 },

    #[error("staking period is too short")]
    StakeTooShort,

    #[error("staking period is too long")]
    StakeTooLong,

    #[error("staker weight is too small")]
    WeightTooSmall,

    #[error("staker weight is too large")]
    WeightTooLarge,

    #[error("delegation fee charged is below the network minimum")]
    InsufficientDelegationFee,

    #[error("node {node_id} is already a validator of subnet {subnet_id}")]
    DuplicateValidator {
        node_id: node::Id,
        subnet_id: ids::Id,
    },

    #[error("node {node_id} is not a validator of subnet {subnet_id}")]
    NotValidator {
        node_id: node::Id,
        subnet_id: ids::Id,
    },

    #[error("staking period of node {node_id} is not a subset of its validation period")]
    ValidatorSubset { node_id: node::Id },

    #[error("node {node_id} would exceed its allowed delegated weight")]
    OverDelegated { node_id: node::Id },

    #[error("cannot remove a permissionless validator with a permissioned removal")]
    RemovePermissionlessValidator,

    #[error("staked asset {asset_id} is not the expected staking asset")]
    StakedAssetMismatch { asset_id: ids::Id },
}
