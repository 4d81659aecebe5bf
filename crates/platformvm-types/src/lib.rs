//! # platformvm-types
//!
//! Primitive types for the platform chain: ids, formatting, the linear
//! codec packer, secp256k1fx credential types, transferable inputs and
//! outputs, UTXOs, and the platformvm transaction variants.
pub mod codec;
pub mod errors;
pub mod formatting;
pub mod hash;
pub mod ids;
pub mod key;
pub mod packer;
pub mod platformvm;
pub mod txs;
pub mod units;
