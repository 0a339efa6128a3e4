//! Byte buffer utilities for parsing binary data structures.
//!
//! This module provides `ByteBuffer`, a position-tracking little-endian reader
//! over an in-memory file. Every read is bounds-checked; a read past the end
//! of the buffer is reported as [`Error::TruncatedInput`] rather than a panic.

use crate::error::{Error, Result};

/// A position-tracking byte reader for parsing binary data structures.
///
/// # Example
///
/// ```
/// use bchart_core::io::ByteBuffer;
///
/// let data = [0x78, 0x56, 0x34, 0x12, 0x00, 0x00, 0x00, 0x00];
/// let mut buf = ByteBuffer::new(&data);
///
/// let value = buf.read_i32().unwrap();
/// assert_eq!(value, 0x12345678);
/// assert_eq!(buf.position(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ByteBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteBuffer<'a> {
    /// Creates a new `ByteBuffer` wrapping the given byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the total length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of bytes remaining from the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns true once every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Skips the specified number of bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if skipping would go beyond the buffer length.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Reads an unsigned 8-bit integer and advances the position.
    pub fn read_u8(&mut self) -> Result<u8> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    /// Reads an unsigned 16-bit integer (little-endian) and advances the position.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Reads a signed 32-bit integer (little-endian) and advances the position.
    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads an unsigned 32-bit integer (little-endian) and advances the position.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads the specified number of bytes and advances the position.
    ///
    /// # Errors
    ///
    /// Returns an error if there are not enough bytes remaining.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(count)
            .ok_or(Error::Overflow { position: self.pos })?;

        if end > self.data.len() {
            return Err(Error::TruncatedInput {
                position: self.pos,
                needed: count,
                remaining: self.remaining(),
            });
        }

        let result = &self.data[self.pos..end];
        self.pos = end;
        Ok(result)
    }

    /// Reads a signed 32-bit length field and the payload it describes.
    ///
    /// A negative length is rejected before any slicing takes place.
    pub fn read_i32_prefixed(&mut self) -> Result<&'a [u8]> {
        let position = self.pos;
        let length = self.read_i32()?;
        let length = usize::try_from(length).map_err(|_| Error::InvalidLength {
            position,
            length: length.into(),
        })?;
        self.read_bytes(length)
    }
}
