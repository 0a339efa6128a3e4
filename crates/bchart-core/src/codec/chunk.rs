//! Chunk framing.
//!
//! A file is a flat sequence of `tag:u32 | length:i32 | payload[length]`
//! containers. Tags are four ASCII bytes read as a little-endian `u32`.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::io::{ByteBuffer, ByteWriter};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkTag(pub u32);

impl ChunkTag {
    pub const HEADER: Self = Self::from_ascii(b"BCHF");
    pub const SYNC: Self = Self::from_ascii(b"SYNC");
    pub const EVENTS: Self = Self::from_ascii(b"EVTS");
    pub const INSTRUMENT: Self = Self::from_ascii(b"INST");
    pub const DIFFICULTY: Self = Self::from_ascii(b"DIFF");

    pub const fn from_ascii(tag: &[u8; 4]) -> Self {
        Self(u32::from_le_bytes(*tag))
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    pub fn is_known(self) -> bool {
        matches!(
            self,
            Self::HEADER | Self::SYNC | Self::EVENTS | Self::INSTRUMENT | Self::DIFFICULTY
        )
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic()) {
            bytes.iter().try_for_each(|&b| write!(f, "{}", b as char))
        } else {
            write!(f, "0x{:08X}", self.0)
        }
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag({})", self)
    }
}

impl Serialize for ChunkTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Writes one chunk, filling its payload with `body`.
///
/// The length field is reserved up front and patched once the payload size
/// is known.
pub fn write_chunk<F>(out: &mut ByteWriter, tag: ChunkTag, body: F) -> Result<()>
where
    F: FnOnce(&mut ByteWriter) -> Result<()>,
{
    out.write_u32(tag.0);
    let length_slot = out.reserve_i32();
    let start = out.len();

    body(out)?;

    let length = out.len() - start;
    let field = i32::try_from(length).map_err(|_| Error::ChunkTooLarge { tag, length })?;
    out.patch_i32(length_slot, field);
    Ok(())
}

/// A framed chunk borrowed from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub tag: ChunkTag,
    /// Offset of the chunk's tag within the file.
    pub offset: usize,
    pub payload: &'a [u8],
}

impl Chunk<'_> {
    pub fn summary(&self) -> ChunkSummary {
        ChunkSummary {
            tag: self.tag,
            offset: self.offset,
            length: self.payload.len(),
        }
    }
}

/// Position and size of a chunk, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkSummary {
    pub tag: ChunkTag,
    pub offset: usize,
    pub length: usize,
}

/// Iterates the chunks of a file in order.
///
/// Yields `Err` once for a chunk whose header or payload runs past the
/// buffer, then stops.
pub struct ChunkIter<'a> {
    buf: ByteBuffer<'a>,
    failed: bool,
}

impl<'a> ChunkIter<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buf: ByteBuffer::new(data),
            failed: false,
        }
    }

    fn read_chunk(&mut self) -> Result<Chunk<'a>> {
        let offset = self.buf.position();
        let tag = ChunkTag(self.buf.read_u32()?);
        let payload = self.buf.read_i32_prefixed()?;
        Ok(Chunk {
            tag,
            offset,
            payload,
        })
    }
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.buf.is_at_end() {
            return None;
        }

        let chunk = self.read_chunk();
        if chunk.is_err() {
            self.failed = true;
        }
        Some(chunk)
    }
}
