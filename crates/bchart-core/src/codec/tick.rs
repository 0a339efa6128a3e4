//! Variable-length tick deltas.
//!
//! Each event record starts with the distance in ticks from the previous
//! record of the same list:
//!
//! | delta            | bytes                     |
//! |------------------|---------------------------|
//! | 0..=253          | `delta`                   |
//! | 254..=65535      | `0xFE`, u16 LE            |
//! | 65536..          | `0xFF`, u32 LE            |
//!
//! The baseline is session state owned by one writer or reader and starts at
//! zero for every event list.

use tracing::warn;

use crate::config::tick::{MARKER_U16, MARKER_U32, MAX_INLINE_DELTA};
use crate::error::Result;
use crate::io::{ByteBuffer, ByteWriter};

#[derive(Debug, Default, Clone)]
pub struct TickWriter {
    previous: u32,
}

impl TickWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `tick` as a delta from the previously written tick.
    ///
    /// Ticks must not decrease within one session; if one does, the baseline
    /// falls back to zero and the tick is written as an absolute value.
    pub fn write(&mut self, out: &mut ByteWriter, tick: u32) {
        if tick < self.previous {
            warn!(
                "Tick {} precedes previous tick {}, resetting delta baseline",
                tick, self.previous
            );
            self.previous = 0;
        }

        let delta = tick - self.previous;
        if delta > u16::MAX as u32 {
            out.write_u8(MARKER_U32);
            out.write_u32(delta);
        } else if delta > MAX_INLINE_DELTA {
            out.write_u8(MARKER_U16);
            out.write_u16(delta as u16);
        } else {
            out.write_u8(delta as u8);
        }
        self.previous = tick;
    }
}

#[derive(Debug, Default, Clone)]
pub struct TickReader {
    previous: u32,
}

impl TickReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the next delta and returns the absolute tick.
    pub fn read(&mut self, buf: &mut ByteBuffer<'_>) -> Result<u32> {
        let delta = match buf.read_u8()? {
            MARKER_U32 => buf.read_u32()?,
            MARKER_U16 => buf.read_u16()? as u32,
            inline => inline as u32,
        };
        self.previous = self.previous.saturating_add(delta);
        Ok(self.previous)
    }
}

/// Encoded width in bytes of a tick delta.
pub fn encoded_width(delta: u32) -> usize {
    if delta > u16::MAX as u32 {
        5
    } else if delta > MAX_INLINE_DELTA {
        3
    } else {
        1
    }
}
