use std::cmp::Ordering;

use crate::{
    codec,
    errors::{Error, Result},
    ids::{self, short},
    key, packer, platformvm,
    txs::transferable::TransferableOut,
};
use serde::{Deserialize, Serialize};

/// Identifies a UTXO by the producing transaction and output position.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#UTXOID>
#[derive(Debug, Serialize, Deserialize, Eq, Clone, Default)]
pub struct Id {
    #[serde(rename = "txID")]
    pub tx_id: ids::Id,
    #[serde(rename = "outputIndex")]
    pub output_index: u32,

    /// Derived input id, the key the UTXO is indexed under.
    #[serde(skip)]
    pub id: ids::Id,
}

impl Id {
    pub fn new(tx_id: &[u8], output_index: u32) -> Result<Self> {
        let tx_id = ids::Id::from_slice(tx_id);
        let prefixes: Vec<u64> = vec![output_index as u64];
        let id = tx_id.prefix(&prefixes)?;
        Ok(Self {
            tx_id,
            output_index,
            id,
        })
    }
}

impl Ord for Id {
    fn cmp(&self, other: &Id) -> Ordering {
        self.tx_id
            .cmp(&other.tx_id)
            .then_with(|| self.output_index.cmp(&other.output_index))
    }
}

impl PartialOrd for Id {
    fn partial_cmp(&self, other: &Id) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Id) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

/// An unspent transaction output together with its asset.
/// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#UTXO>
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Utxo {
    #[serde(flatten)]
    pub utxo_id: Id,
    #[serde(rename = "assetID")]
    pub asset_id: ids::Id,
    #[serde(rename = "output")]
    pub out: TransferableOut,
}

impl Default for Utxo {
    fn default() -> Self {
        Self {
            utxo_id: Id::default(),
            asset_id: ids::Id::empty(),
            out: TransferableOut::TransferOutput(Default::default()),
        }
    }
}

impl Utxo {
    /// Returns the id the UTXO is indexed under in the state.
    pub fn input_id(&self) -> ids::Id {
        self.utxo_id.id
    }

    /// Returns the owning addresses, used as the traits of an
    /// atomic element for cross-chain indexing.
    pub fn addresses(&self) -> Vec<short::Id> {
        self.out.output_owners().addresses.clone()
    }

    /// Marshals the Utxo with the codec version header.
    pub fn pack(&self, codec_version: u16) -> Result<packer::Packer> {
        // ref. "math.MaxInt32" and "constants.DefaultByteSliceCap" in Go
        let packer = packer::Packer::new((1 << 31) - 1, 128);

        // codec version
        // ref. "avalanchego/codec.manager.Marshal"
        packer.pack_u16(codec_version)?;

        packer.pack_bytes(self.utxo_id.tx_id.as_ref())?;
        packer.pack_u32(self.utxo_id.output_index)?;
        packer.pack_bytes(self.asset_id.as_ref())?;
        packer.pack(&self.out)?;

        Ok(packer)
    }

    /// Parses raw bytes to "Utxo".
    /// ref. <https://pkg.go.dev/github.com/ava-labs/avalanchego/vms/components/avax#UTXO>
    pub fn unpack(d: &[u8]) -> Result<Self> {
        let packer = packer::Packer::load_bytes_for_unpack(d.len() + 1024, d);

        let codec_version = packer.unpack_u16()?;
        if codec_version != codec::VERSION {
            return Err(Error::Packing {
                message: format!("unexpected codec version {}", codec_version),
            });
        }

        // must unpack in the order of struct
        let tx_id_bytes = packer.unpack_bytes(ids::LEN)?;
        let tx_id = ids::Id::from_slice(&tx_id_bytes);

        let output_index = packer.unpack_u32()?;

        let asset_id_bytes = packer.unpack_bytes(ids::LEN)?;
        let asset_id = ids::Id::from_slice(&asset_id_bytes);

        // "*secp256k1fx.TransferOutput" -- type ID 7
        // "*platformvm.StakeableLockOut" -- type ID 22
        let type_id = packer.unpack_u32()?;
        let stakeable_locktime = match type_id {
            7 => None,
            22 => {
                let locktime = packer.unpack_u64()?;

                // the embedded "*secp256k1fx.TransferOutput" carries
                // its own type ID
                let inner_type_id = packer.unpack_u32()?;
                if inner_type_id != key::secp256k1::txs::transfer::Output::type_id() {
                    return Err(Error::Packing {
                        message: format!(
                            "unexpected inner type ID {} for StakeableLockOut",
                            inner_type_id
                        ),
                    });
                }
                Some(locktime)
            }
            _ => {
                return Err(Error::Packing {
                    message: format!("unknown type ID for output {}", type_id),
                })
            }
        };

        let amount = packer.unpack_u64()?;
        let locktime = packer.unpack_u64()?;
        let threshold = packer.unpack_u32()?;
        let addr_len = packer.unpack_u32()?;
        let mut addresses: Vec<short::Id> = Vec::new();
        for _ in 0..addr_len {
            let b = packer.unpack_bytes(short::LEN)?;
            addresses.push(short::Id::from_slice(&b));
        }
        let transfer_output = key::secp256k1::txs::transfer::Output {
            amount,
            output_owners: key::secp256k1::txs::OutputOwners {
                locktime,
                threshold,
                addresses,
            },
        };

        let out = match stakeable_locktime {
            Some(locktime) => {
                TransferableOut::StakeableLockOut(platformvm::txs::StakeableLockOut {
                    locktime,
                    transfer_output,
                })
            }
            None => TransferableOut::TransferOutput(transfer_output),
        };

        Ok(Utxo {
            utxo_id: Id::new(tx_id.as_ref(), output_index)?,
            asset_id,
            out,
        })
    }
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- txs::utxo::test_utxo_pack_unpack_round_trip --exact --show-output
#[test]
fn test_utxo_pack_unpack_round_trip() {
    let utxo = Utxo {
        utxo_id: Id::new(&[9; 32], 3).unwrap(),
        asset_id: ids::Id::from_slice(&[5, 5, 5]),
        out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
            amount: 1_000_000,
            output_owners: key::secp256k1::txs::OutputOwners {
                locktime: 0,
                threshold: 1,
                addresses: vec![short::Id::from_slice(&[1, 2, 3, 4, 5])],
            },
        }),
    };

    let b = utxo.pack(codec::VERSION).unwrap().take_bytes();
    let unpacked = Utxo::unpack(&b).unwrap();
    assert_eq!(utxo, unpacked);
    assert_eq!(utxo.input_id(), unpacked.input_id());
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- txs::utxo::test_utxo_unpack_stakeable_lock_out --exact --show-output
#[test]
fn test_utxo_unpack_stakeable_lock_out() {
    let utxo = Utxo {
        utxo_id: Id::new(&[7; 32], 0).unwrap(),
        asset_id: ids::Id::from_slice(&[5, 5, 5]),
        out: TransferableOut::StakeableLockOut(platformvm::txs::StakeableLockOut {
            locktime: 100,
            transfer_output: key::secp256k1::txs::transfer::Output {
                amount: 77,
                output_owners: key::secp256k1::txs::OutputOwners {
                    locktime: 0,
                    threshold: 1,
                    addresses: vec![short::Id::from_slice(&[1, 2, 3, 4, 5])],
                },
            },
        }),
    };

    let b = utxo.pack(codec::VERSION).unwrap().take_bytes();
    let unpacked = Utxo::unpack(&b).unwrap();
    assert_eq!(utxo, unpacked);
    assert_eq!(unpacked.out.locktime(), 100);
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- txs::utxo::test_utxo_unpack_hex --exact --show-output
#[test]
fn test_utxo_unpack_hex() {
    // fixed vector produced by the reference implementation
    let utxo_hex = "000000000000000000000000000000000000000000000000000000000000000000000000000088eec2e099c6a528e689618e8721e04ae85ea574c7a15a7968644d14d54780140000000702c68af0bb1400000000000000000000000000010000000165844a05405f3662c1928142c6c2a783ef871de9";
    let d = hex::decode(utxo_hex).unwrap();
    let utxo = Utxo::unpack(&d).unwrap();

    let expected = Utxo {
        utxo_id: Id::new(ids::Id::empty().as_ref(), 0).unwrap(),
        asset_id: ids::Id::from_slice(&[
            136, 238, 194, 224, 153, 198, 165, 40, 230, 137, 97, 142, 135, 33, 224, 74, 232, 94,
            165, 116, 199, 161, 90, 121, 104, 100, 77, 20, 213, 71, 128, 20,
        ]),
        out: TransferableOut::TransferOutput(key::secp256k1::txs::transfer::Output {
            amount: 200000000000000000,
            output_owners: key::secp256k1::txs::OutputOwners {
                locktime: 0,
                threshold: 1,
                addresses: vec![short::Id::from_slice(&[
                    101, 132, 74, 5, 64, 95, 54, 98, 193, 146, 129, 66, 198, 194, 167, 131, 239,
                    135, 29, 233,
                ])],
            },
        }),
    };
    assert_eq!(utxo, expected);

    let repacked = utxo.pack(codec::VERSION).unwrap().take_bytes();
    assert_eq!(hex::encode(repacked), utxo_hex);
}
