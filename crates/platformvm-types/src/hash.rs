//! Hashing utilities (SHA256).
use ring::digest::{digest, SHA256};

pub const SHA256_OUTPUT_LEN: usize = ring::digest::SHA256_OUTPUT_LEN;

/// Returns SHA256 digest of the given data.
pub fn sha256(d: impl AsRef<[u8]>) -> Vec<u8> {
    digest(&SHA256, d.as_ref()).as_ref().into()
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- hash::test_sha256 --exact --show-output
#[test]
fn test_sha256() {
    let d = sha256(b"hello");
    assert_eq!(d.len(), SHA256_OUTPUT_LEN);
    assert_eq!(
        hex::encode(&d),
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}
