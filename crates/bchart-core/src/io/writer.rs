//! Little-endian byte writer.
//!
//! The write-side counterpart of [`ByteBuffer`](super::ByteBuffer). Writes go
//! to a growable in-memory buffer and cannot fail; length fields that must be
//! known before their payload are reserved and patched afterwards.

/// A growable little-endian output buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    data: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.data.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.data.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Reserves four zero bytes and returns their offset for [`Self::patch_i32`].
    pub fn reserve_i32(&mut self) -> usize {
        let offset = self.data.len();
        self.write_i32(0);
        offset
    }

    /// Overwrites four bytes previously reserved at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset` was not returned by [`Self::reserve_i32`] on this writer.
    pub fn patch_i32(&mut self, offset: usize, value: i32) {
        self.data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}
