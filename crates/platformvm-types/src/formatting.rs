//! Implements the checksummed cb58 formatting of chain ids.
use std::io::{self, Error, ErrorKind};

use bs58::{decode::DecodeBuilder, encode::EncodeBuilder, Alphabet};

/// Encodes the bytes with the cb58 checksum appended.
/// "ids.Id.String" appends checksum to the digest bytes.
pub fn encode_cb58_with_checksum_string(d: &[u8]) -> String {
    EncodeBuilder::new(d, Alphabet::DEFAULT)
        .as_cb58(None)
        .into_string()
}

/// Decodes the cb58-encoded string, verifying its checksum.
pub fn decode_cb58_with_checksum(d: &str) -> io::Result<Vec<u8>> {
    DecodeBuilder::new(d, Alphabet::DEFAULT)
        .as_cb58(None)
        .into_vec()
        .map_err(|err| {
            let msg = match err {
                bs58::decode::Error::InvalidChecksum {
                    checksum,
                    expected_checksum,
                } => format!("invalid checksum {checksum:?} != {expected_checksum:?}"),
                _ => format!("failed to decode base58 ({err})"),
            };

            Error::new(ErrorKind::InvalidInput, msg)
        })
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- formatting::test_encode_cb58_with_checksum --exact --show-output
#[test]
fn test_encode_cb58_with_checksum() {
    let d: Vec<u8> = Vec::new();
    let encoded = encode_cb58_with_checksum_string(&d);
    assert_eq!(encoded, "45PJLL");
    let decoded = decode_cb58_with_checksum(&encoded).unwrap();
    assert_eq!(d, decoded);

    let d: Vec<u8> = vec![0];
    let encoded = encode_cb58_with_checksum_string(&d);
    assert_eq!(encoded, "1c7hwa");
    let decoded = decode_cb58_with_checksum(&encoded).unwrap();
    assert_eq!(d, decoded);

    let d: Vec<u8> = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 255];
    let encoded = encode_cb58_with_checksum_string(&d);
    assert_eq!(encoded, "1NVSVezva3bAtJesnUj");
    let decoded = decode_cb58_with_checksum(&encoded).unwrap();
    assert_eq!(d, decoded);
}
