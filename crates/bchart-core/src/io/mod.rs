//! Bounds-checked little-endian cursor over in-memory buffers.

mod bytes;
mod writer;

pub use bytes::ByteBuffer;
pub use writer::ByteWriter;
