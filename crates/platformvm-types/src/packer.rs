//! Low-level byte packing for the linear codec.
use std::cell::Cell;

use crate::errors::{Error, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// number of bytes per short
pub const U16_LEN: usize = 2;
/// number of bytes per int
pub const U32_LEN: usize = 4;
/// number of bytes per long
pub const U64_LEN: usize = 8;

/// Packer packs and unpacks the underlying bytes array.
/// The cursor is tracked with a "Cell" so the packer can be
/// threaded through pack calls without mutable borrows.
pub struct Packer {
    /// largest allowed size of expanding the byte array
    max_size: usize,
    /// current byte array
    bytes: Cell<BytesMut>,
    /// offset that is being written to or read from in the byte array
    offset: Cell<usize>,
}

impl Packer {
    pub fn new(max_size: usize, initial_cap: usize) -> Self {
        Self {
            max_size,
            bytes: Cell::new(BytesMut::with_capacity(initial_cap)),
            offset: Cell::new(0),
        }
    }

    /// Creates a new packer from the existing bytes,
    /// with the offset reset to the beginning for unpacking.
    pub fn load_bytes_for_unpack(max_size: usize, b: &[u8]) -> Self {
        Self {
            max_size,
            bytes: Cell::new(BytesMut::from(b)),
            offset: Cell::new(0),
        }
    }

    /// Returns the current bytes array as an immutable bytes array.
    /// Once bytes are taken out, the "bytes" field is emptied;
    /// to keep writing, put the bytes back with "set_bytes".
    pub fn take_bytes(&self) -> Bytes {
        let mut b = self.bytes.take();
        let n = b.len();
        b.copy_to_bytes(n)
    }

    /// Sets the current bytes array, useful to reuse the packer
    /// after "take_bytes" emptied it.
    pub fn set_bytes(&self, b: &[u8]) {
        self.bytes.set(BytesMut::from(b));
        self.offset.set(b.len());
    }

    pub fn bytes_len(&self) -> usize {
        let b = self.bytes.take();
        let n = b.len();
        self.bytes.set(b);
        n
    }

    /// Ensures the bytes array can hold "n" more bytes past the offset.
    fn expand(&self, n: usize) -> Result<()> {
        let needed_size = self.offset.get() + n;
        if needed_size > self.max_size {
            return Err(Error::Packing {
                message: format!("needed_size {} exceeds max_size {}", needed_size, self.max_size),
            });
        }
        let mut b = self.bytes.take();
        if needed_size > b.capacity() {
            b.reserve(needed_size - b.len());
        }
        self.bytes.set(b);
        Ok(())
    }

    /// Returns an error if the packer has insufficient bytes left to read.
    fn check_remaining_unpack(&self, bytes_to_read: usize) -> Result<()> {
        let needed_size = self.offset.get() + bytes_to_read;
        let bytes_n = self.bytes_len();
        if needed_size > bytes_n {
            return Err(Error::Packing {
                message: format!(
                    "bad length to read; offset + bytes ({}) to read exceeds current total bytes size {}",
                    needed_size, bytes_n
                ),
            });
        }
        Ok(())
    }

    /// Writes the "u16" value in big-endian order and advances the offset.
    pub fn pack_u16(&self, v: u16) -> Result<()> {
        self.expand(U16_LEN)?;
        let mut b = self.bytes.take();
        b.put_u16(v);
        self.bytes.set(b);
        self.offset.set(self.offset.get() + U16_LEN);
        Ok(())
    }

    /// Unpacks the u16 at the offset and advances the offset.
    pub fn unpack_u16(&self) -> Result<u16> {
        self.check_remaining_unpack(U16_LEN)?;
        let offset = self.offset.get();
        let b = self.bytes.take();
        let pos = &b[offset..offset + U16_LEN];
        let v = u16::from_be_bytes([pos[0], pos[1]]);
        self.bytes.set(b);
        self.offset.set(offset + U16_LEN);
        Ok(v)
    }

    /// Writes the "u32" value in big-endian order and advances the offset.
    pub fn pack_u32(&self, v: u32) -> Result<()> {
        self.expand(U32_LEN)?;
        let mut b = self.bytes.take();
        b.put_u32(v);
        self.bytes.set(b);
        self.offset.set(self.offset.get() + U32_LEN);
        Ok(())
    }

    /// Unpacks the u32 at the offset and advances the offset.
    pub fn unpack_u32(&self) -> Result<u32> {
        self.check_remaining_unpack(U32_LEN)?;
        let offset = self.offset.get();
        let b = self.bytes.take();
        let pos = &b[offset..offset + U32_LEN];
        let v = u32::from_be_bytes([pos[0], pos[1], pos[2], pos[3]]);
        self.bytes.set(b);
        self.offset.set(offset + U32_LEN);
        Ok(v)
    }

    /// Writes the "u64" value in big-endian order and advances the offset.
    pub fn pack_u64(&self, v: u64) -> Result<()> {
        self.expand(U64_LEN)?;
        let mut b = self.bytes.take();
        b.put_u64(v);
        self.bytes.set(b);
        self.offset.set(self.offset.get() + U64_LEN);
        Ok(())
    }

    /// Unpacks the u64 at the offset and advances the offset.
    pub fn unpack_u64(&self) -> Result<u64> {
        self.check_remaining_unpack(U64_LEN)?;
        let offset = self.offset.get();
        let b = self.bytes.take();
        let pos = &b[offset..offset + U64_LEN];
        let v = u64::from_be_bytes([
            pos[0], pos[1], pos[2], pos[3], pos[4], pos[5], pos[6], pos[7],
        ]);
        self.bytes.set(b);
        self.offset.set(offset + U64_LEN);
        Ok(v)
    }

    /// Writes the raw bytes without the length prefix and advances the offset.
    /// Array lengths are packed separately as "u32" by the caller.
    pub fn pack_bytes(&self, v: &[u8]) -> Result<()> {
        let n = v.len();
        self.expand(n)?;
        let mut b = self.bytes.take();
        b.put_slice(v);
        self.bytes.set(b);
        self.offset.set(self.offset.get() + n);
        Ok(())
    }

    /// Packs the given value with its own wire layout.
    pub fn pack(&self, v: &impl Packable) -> Result<()> {
        v.pack(self)
    }

    /// Unpacks the "n" raw bytes at the offset and advances the offset.
    pub fn unpack_bytes(&self, n: usize) -> Result<Vec<u8>> {
        self.check_remaining_unpack(n)?;
        let offset = self.offset.get();
        let b = self.bytes.take();
        let v = Vec::from(&b[offset..offset + n]);
        self.bytes.set(b);
        self.offset.set(offset + n);
        Ok(v)
    }
}

/// Implemented by types that know their own wire layout,
/// including the leading type id where the codec requires one.
pub trait Packable {
    fn pack(&self, packer: &Packer) -> Result<()>;
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- packer::test_pack_unpack --exact --show-output
#[test]
fn test_pack_unpack() {
    let packer = Packer::new(64, 16);
    packer.pack_u16(0x0102).unwrap();
    packer.pack_u32(0x0304_0506).unwrap();
    packer.pack_u64(0x0708_090a_0b0c_0d0e).unwrap();
    packer.pack_bytes(&[0xde, 0xad]).unwrap();
    let b = packer.take_bytes();
    assert_eq!(
        b.as_ref(),
        &[
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
            0xde, 0xad
        ]
    );

    let packer = Packer::load_bytes_for_unpack(b.len() + 1024, &b);
    assert_eq!(packer.unpack_u16().unwrap(), 0x0102);
    assert_eq!(packer.unpack_u32().unwrap(), 0x0304_0506);
    assert_eq!(packer.unpack_u64().unwrap(), 0x0708_090a_0b0c_0d0e);
    assert_eq!(packer.unpack_bytes(2).unwrap(), vec![0xde, 0xad]);
    assert!(packer.unpack_u16().is_err());
}

/// RUST_LOG=debug cargo test --package platformvm-types --lib -- packer::test_expand_max_size --exact --show-output
#[test]
fn test_expand_max_size() {
    let packer = Packer::new(4, 4);
    packer.pack_u32(7).unwrap();
    assert!(packer.pack_u16(1).is_err());
}
