//! Definitions of the platform chain transaction variants.
pub mod add_delegator;
pub mod add_permissionless_delegator;
pub mod add_permissionless_validator;
pub mod add_subnet_validator;
pub mod add_validator;
pub mod advance_time;
pub mod base;
pub mod create_chain;
pub mod create_subnet;
pub mod export;
pub mod import;
pub mod remove_subnet_validator;
pub mod reward_validator;
pub mod staker;
pub mod transfer_subnet_ownership;
pub mod transform_subnet;

use std::cmp::Ordering;

use crate::{
    codec,
    errors::{Error, Result},
    ids::{self, node},
    key, txs,
};
use serde::{Deserialize, Serialize};

/// Maximum number of memo bytes a pre-Durango transaction may carry.
pub const MAX_MEMO_SIZE: usize = 256;

/// Maximum number of characters in a chain name.
pub const MAX_NAME_LEN: usize = 128;

/// Denominator of ratios expressed in parts per million
/// (delegation shares, consumption rates, uptime requirements).
pub const PERCENT_DENOMINATOR: u64 = 1_000_000;

/// The staking window and weight of a validator or delegator.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#Validator>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Validator {
    #[serde(rename = "nodeID")]
    pub node_id: node::Id,
    pub start: u64,
    pub end: u64,
    pub weight: u64,
}

impl Validator {
    pub fn verify(&self) -> Result<()> {
        if self.weight == 0 {
            return Err(Error::Other {
                message: "validator weight must be non-zero".to_string(), // ref. "ErrWeightTooSmall"
                retryable: false,
            });
        }
        Ok(())
    }
}

/// A validator of a specific subnet.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#SubnetValidator>
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct SubnetValidator {
    #[serde(flatten)]
    pub validator: Validator,
    #[serde(rename = "subnetID")]
    pub subnet_id: ids::Id,
}

impl SubnetValidator {
    pub fn verify(&self) -> Result<()> {
        self.validator.verify()
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm#StakeableLockIn>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct StakeableLockIn {
    pub locktime: u64,
    pub transfer_input: key::secp256k1::txs::transfer::Input,
}

impl StakeableLockIn {
    pub fn type_name() -> String {
        "platformvm.StakeableLockIn".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }
}

impl Ord for StakeableLockIn {
    fn cmp(&self, other: &StakeableLockIn) -> Ordering {
        self.locktime
            .cmp(&other.locktime)
            .then_with(|| self.transfer_input.cmp(&other.transfer_input))
    }
}

impl PartialOrd for StakeableLockIn {
    fn partial_cmp(&self, other: &StakeableLockIn) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for StakeableLockIn {
    fn eq(&self, other: &StakeableLockIn) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm#StakeableLockOut>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct StakeableLockOut {
    pub locktime: u64,
    pub transfer_output: key::secp256k1::txs::transfer::Output,
}

impl StakeableLockOut {
    pub fn type_name() -> String {
        "platformvm.StakeableLockOut".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }
}

impl Ord for StakeableLockOut {
    fn cmp(&self, other: &StakeableLockOut) -> Ordering {
        self.locktime
            .cmp(&other.locktime)
            .then_with(|| self.transfer_output.cmp(&other.transfer_output))
    }
}

impl PartialOrd for StakeableLockOut {
    fn partial_cmp(&self, other: &StakeableLockOut) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for StakeableLockOut {
    fn eq(&self, other: &StakeableLockOut) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// The closed set of transaction kinds the platform chain recognizes.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub enum UnsignedTx {
    Base(base::Tx),
    CreateChain(create_chain::Tx),
    CreateSubnet(create_subnet::Tx),
    Import(import::Tx),
    Export(export::Tx),
    AddValidator(add_validator::Tx),
    AddSubnetValidator(add_subnet_validator::Tx),
    AddDelegator(add_delegator::Tx),
    RemoveSubnetValidator(remove_subnet_validator::Tx),
    TransformSubnet(transform_subnet::Tx),
    AddPermissionlessValidator(add_permissionless_validator::Tx),
    AddPermissionlessDelegator(add_permissionless_delegator::Tx),
    TransferSubnetOwnership(transfer_subnet_ownership::Tx),
    AdvanceTime(advance_time::Tx),
    RewardValidator(reward_validator::Tx),
}

impl UnsignedTx {
    /// Returns the embedded base transaction; "None" for the proposal
    /// kinds that carry no value transfer.
    pub fn base_tx(&self) -> Option<&txs::Tx> {
        match self {
            UnsignedTx::Base(tx) => Some(&tx.base_tx),
            UnsignedTx::CreateChain(tx) => Some(&tx.base_tx),
            UnsignedTx::CreateSubnet(tx) => Some(&tx.base_tx),
            UnsignedTx::Import(tx) => Some(&tx.base_tx),
            UnsignedTx::Export(tx) => Some(&tx.base_tx),
            UnsignedTx::AddValidator(tx) => Some(&tx.base_tx),
            UnsignedTx::AddSubnetValidator(tx) => Some(&tx.base_tx),
            UnsignedTx::AddDelegator(tx) => Some(&tx.base_tx),
            UnsignedTx::RemoveSubnetValidator(tx) => Some(&tx.base_tx),
            UnsignedTx::TransformSubnet(tx) => Some(&tx.base_tx),
            UnsignedTx::AddPermissionlessValidator(tx) => Some(&tx.base_tx),
            UnsignedTx::AddPermissionlessDelegator(tx) => Some(&tx.base_tx),
            UnsignedTx::TransferSubnetOwnership(tx) => Some(&tx.base_tx),
            UnsignedTx::AdvanceTime(_) | UnsignedTx::RewardValidator(_) => None,
        }
    }

    pub fn memo(&self) -> &[u8] {
        self.base_tx().map(|b| b.memo.as_ref()).unwrap_or(&[])
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            UnsignedTx::Base(_) => "platformvm.BaseTx",
            UnsignedTx::CreateChain(_) => "platformvm.CreateChainTx",
            UnsignedTx::CreateSubnet(_) => "platformvm.CreateSubnetTx",
            UnsignedTx::Import(_) => "platformvm.ImportTx",
            UnsignedTx::Export(_) => "platformvm.ExportTx",
            UnsignedTx::AddValidator(_) => "platformvm.AddValidatorTx",
            UnsignedTx::AddSubnetValidator(_) => "platformvm.AddSubnetValidatorTx",
            UnsignedTx::AddDelegator(_) => "platformvm.AddDelegatorTx",
            UnsignedTx::RemoveSubnetValidator(_) => "platformvm.RemoveSubnetValidatorTx",
            UnsignedTx::TransformSubnet(_) => "platformvm.TransformSubnetTx",
            UnsignedTx::AddPermissionlessValidator(_) => {
                "platformvm.AddPermissionlessValidatorTx"
            }
            UnsignedTx::AddPermissionlessDelegator(_) => {
                "platformvm.AddPermissionlessDelegatorTx"
            }
            UnsignedTx::TransferSubnetOwnership(_) => "platformvm.TransferSubnetOwnershipTx",
            UnsignedTx::AdvanceTime(_) => "platformvm.AdvanceTimeTx",
            UnsignedTx::RewardValidator(_) => "platformvm.RewardValidatorTx",
        }
    }

    /// Variant-specific structural checks beyond the base transaction.
    pub fn verify(&self) -> Result<()> {
        match self {
            UnsignedTx::Base(_) => Ok(()),
            UnsignedTx::CreateChain(tx) => tx.verify(),
            UnsignedTx::CreateSubnet(tx) => tx.verify(),
            UnsignedTx::Import(tx) => tx.verify(),
            UnsignedTx::Export(tx) => tx.verify(),
            UnsignedTx::AddValidator(tx) => tx.verify(),
            UnsignedTx::AddSubnetValidator(tx) => tx.verify(),
            UnsignedTx::AddDelegator(tx) => tx.verify(),
            UnsignedTx::RemoveSubnetValidator(tx) => tx.verify(),
            UnsignedTx::TransformSubnet(tx) => tx.verify(),
            UnsignedTx::AddPermissionlessValidator(tx) => tx.verify(),
            UnsignedTx::AddPermissionlessDelegator(tx) => tx.verify(),
            UnsignedTx::TransferSubnetOwnership(tx) => tx.verify(),
            UnsignedTx::AdvanceTime(_) | UnsignedTx::RewardValidator(_) => Ok(()),
        }
    }
}

/// A signed transaction: the unsigned variant, its credentials, and
/// the identity established when the transaction was decoded.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#Tx>
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Tx {
    #[serde(rename = "unsignedTx")]
    pub unsigned: UnsignedTx,
    pub creds: Vec<key::secp256k1::txs::Credential>,

    #[serde(skip)]
    pub metadata: txs::Metadata,
}

impl Tx {
    pub fn new(
        unsigned: UnsignedTx,
        creds: Vec<key::secp256k1::txs::Credential>,
        metadata: txs::Metadata,
    ) -> Self {
        Self {
            unsigned,
            creds,
            metadata,
        }
    }

    /// Returns the transaction ID established at decode/sign time.
    pub fn id(&self) -> ids::Id {
        self.metadata.id
    }

    /// Checks that the signed transaction is well formed: initialized
    /// metadata, base transaction rules under the given chain
    /// identifiers, a non-empty credential set of valid shape, and the
    /// variant-specific structure.
    pub fn syntactic_verify(&self, network_id: u32, blockchain_id: ids::Id) -> Result<()> {
        self.metadata.verify()?;

        let base_tx = self.unsigned.base_tx().ok_or_else(|| Error::Other {
            message: format!("{} has no base tx to verify", self.unsigned.type_name()),
            retryable: false,
        })?;
        base_tx.syntactic_verify(network_id, blockchain_id)?;

        if self.creds.is_empty() {
            return Err(Error::Other {
                message: "tx has no credentials".to_string(), // ref. "errNoCredentials"
                retryable: false,
            });
        }
        for cred in self.creds.iter() {
            cred.verify()?;
        }

        self.unsigned.verify()
    }
}

/// Checks that a staked output set is well formed: every output
/// verifies, the set is sorted, and the amounts do not overflow.
pub(crate) fn verify_stake_outs(stake_outs: &[txs::transferable::Output]) -> Result<u64> {
    let mut total: u64 = 0;
    for out in stake_outs.iter() {
        out.verify()?;
        total = total.checked_add(out.out.amount()).ok_or(Error::Other {
            message: "staked amount overflows".to_string(),
            retryable: false,
        })?;
    }
    if !stake_outs.windows(2).all(|w| w[0] <= w[1]) {
        return Err(Error::Other {
            message: "stake outputs not sorted".to_string(), // ref. "errOutputsNotSorted"
            retryable: false,
        });
    }
    Ok(total)
}
