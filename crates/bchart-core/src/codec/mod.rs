//! BChart binary codec.
//!
//! File layout, in order:
//!
//! ```text
//! BCHF  version:u16 | resolution:u16 | instrumentCount:u16
//! SYNC  tempo map event list
//! EVTS  global text and section event list
//! INST  instrumentId:u32 | difficultyCount:u8     (per instrument)
//! DIFF  eventCount:i32 | difficultyId:u8 | events (per difficulty)
//! ```
//!
//! See [`chunk`] for framing, [`event`] for record layouts and [`tick`] for
//! the tick delta encoding.

pub mod chunk;
pub mod event;
pub mod header;
pub mod mapping;
pub mod reader;
pub mod solo;
pub mod tick;
pub mod writer;

pub use chunk::{Chunk, ChunkIter, ChunkSummary, ChunkTag};
pub use header::FileHeader;
pub use reader::{decode, inspect, read_header};
pub use writer::encode;
