pub mod codec;
pub mod config;
pub mod error;
pub mod io;
pub mod song;

pub use codec::{ChunkSummary, ChunkTag, FileHeader, decode, encode, inspect, read_header};
pub use error::{Error, Result};
pub use song::{
    Chart, ChartObject, Difficulty, GlobalEvent, Instrument, InstrumentFamily, Note, NoteFlags,
    SoloMarker, Song, Starpower, SyncEvent, Tempo, TextEvent, TimeSignature,
};
