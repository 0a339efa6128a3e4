use thiserror::Error;

use crate::codec::ChunkTag;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Truncated input at position {position}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        position: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("Invalid length {length} at position {position}")]
    InvalidLength { position: usize, length: i64 },

    #[error("Arithmetic overflow computing a slice at position {position}")]
    Overflow { position: usize },

    #[error("Resolution {0} does not fit the header field")]
    ResolutionOutOfRange(u32),

    #[error("Chunk {tag} payload of {length} bytes exceeds the length field")]
    ChunkTooLarge { tag: ChunkTag, length: usize },
}

impl Error {
    /// True for errors raised while reading past the end of the input.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
