use crate::{
    codec::{self, serde::hex_0x_bytes::Hex0xBytes},
    errors::{Error, Result},
    ids, key, platformvm, txs,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Registers a new blockchain on an existing subnet.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/platformvm/txs#CreateChainTx>
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Clone, Default)]
pub struct Tx {
    #[serde(flatten)]
    pub base_tx: txs::Tx,

    /// The subnet that validates the new chain.
    #[serde(rename = "subnetID")]
    pub subnet_id: ids::Id,
    #[serde(rename = "chainName")]
    pub chain_name: String,
    #[serde(rename = "vmID")]
    pub vm_id: ids::Id,
    #[serde(rename = "fxIDs")]
    pub fx_ids: Vec<ids::Id>,
    #[serde_as(as = "Hex0xBytes")]
    #[serde(rename = "genesisData")]
    pub genesis_data: Vec<u8>,

    /// Authorizes this transaction against the subnet owner keys.
    #[serde(rename = "subnetAuthorization")]
    pub subnet_auth: key::secp256k1::txs::Input,
}

impl Tx {
    pub fn type_name() -> String {
        "platformvm.CreateChainTx".to_string()
    }

    pub fn type_id() -> u32 {
        *(codec::P_TYPES.get(&Self::type_name()).unwrap()) as u32
    }

    pub fn verify(&self) -> Result<()> {
        if self.subnet_id == *platformvm::PRIMARY_NETWORK_ID {
            return Err(Error::Other {
                message: "cannot create a chain on the primary network".to_string(),
                retryable: false,
            });
        }
        if self.chain_name.len() > platformvm::txs::MAX_NAME_LEN {
            return Err(Error::Other {
                message: format!(
                    "chain name length {} exceeds {}",
                    self.chain_name.len(),
                    platformvm::txs::MAX_NAME_LEN
                ), // ref. "errNameTooLong"
                retryable: false,
            });
        }
        if !self.chain_name.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
            return Err(Error::Other {
                message: "chain name contains non-printable character".to_string(), // ref. "errIllegalNameCharacter"
                retryable: false,
            });
        }
        if !cmp_manager::is_sorted_and_unique(&self.fx_ids) {
            return Err(Error::Other {
                message: "fx IDs not sorted and unique".to_string(),
                retryable: false,
            });
        }
        self.subnet_auth.verify()
    }
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- platformvm::txs::create_chain::test_verify --exact --show-output
#[test]
fn test_verify() {
    let mut tx = Tx {
        subnet_id: ids::Id::from_slice(&[1, 2, 3]),
        chain_name: "xsvm".to_string(),
        vm_id: ids::Id::from_slice(&[9]),
        ..Tx::default()
    };
    assert!(tx.verify().is_ok());

    tx.subnet_id = ids::Id::empty();
    assert!(tx.verify().is_err());

    tx.subnet_id = ids::Id::from_slice(&[1, 2, 3]);
    tx.chain_name = "\u{7f}".to_string();
    assert!(tx.verify().is_err());
}
