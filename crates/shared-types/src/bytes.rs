//! # Byte Layout Helpers
//!
//! Cursor-style reader and writer helpers shared by every fixed-layout
//! format in the workspace. All multi-byte integers are big-endian; lengths
//! of variable fields use unsigned VLQ (LEB128).

use crate::errors::ReadError;

/// Maximum encoded size of a 64-bit VLQ integer.
const MAX_VLQ_BYTES: usize = 10;

/// Forward-only reader over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// True once every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume exactly `len` bytes.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        if len > self.remaining() {
            return Err(ReadError::UnexpectedEnd {
                offset: self.position,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let slice = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, ReadError> {
        Ok(i8::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReadError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Read an unsigned LEB128 integer.
    pub fn read_vlq(&mut self) -> Result<u64, ReadError> {
        let start = self.position;
        let mut value: u64 = 0;
        for index in 0..MAX_VLQ_BYTES {
            let byte = self.read_u8()?;
            let chunk = u64::from(byte & 0x7f);
            // The tenth byte may only carry the top bit of a u64.
            if index == MAX_VLQ_BYTES - 1 && chunk > 1 {
                return Err(ReadError::VlqOverflow { offset: start });
            }
            value |= chunk << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ReadError::VlqOverflow { offset: start })
    }
}

/// Append an unsigned LEB128 integer to `out`.
pub fn put_vlq(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}
