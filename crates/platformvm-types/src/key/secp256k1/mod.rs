//! secp256k1 key types.
pub mod txs;

/// Byte length of a recoverable secp256k1 signature (r || s || v).
pub const SIGNATURE_LEN: usize = 65;
