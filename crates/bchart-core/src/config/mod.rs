//! Format constants.
//!
//! Fixed values of the BChart wire format, grouped by concern:
//! - `format` - header version and record size limits
//! - `tick` - tick-delta marker bytes
//! - `tempo` - tempo fixed-point scale
//! - `solo` - host sentinel strings for solo markers

/// File-level format configuration.
pub mod format {
    /// Version written to the header chunk.
    pub const VERSION: u16 = 1;

    /// Largest text payload a one-byte record length can describe.
    pub const MAX_TEXT_LEN: usize = u8::MAX as usize;

    /// Width in bytes of the note modifier bitmask.
    pub const MODIFIER_FIELD_LEN: u8 = 4;
}

/// Tick-delta encoding configuration.
pub mod tick {
    /// Largest delta stored inline as a single byte.
    pub const MAX_INLINE_DELTA: u32 = 253;

    /// Marker preceding a u16 delta.
    pub const MARKER_U16: u8 = 254;

    /// Marker preceding a u32 delta.
    pub const MARKER_U32: u8 = 255;
}

/// Tempo conversion configuration.
pub mod tempo {
    /// Host tempo values are beats-per-minute scaled by this factor.
    pub const BPM_SCALE: u32 = 1000;

    /// Scaled microseconds per minute: `60_000_000 * BPM_SCALE`.
    pub const SCALED_MICROS_PER_MINUTE: u64 = 60_000_000_000;
}

/// Solo marker configuration.
pub mod solo {
    /// Text of the marker that opens a solo section.
    pub const START_TEXT: &str = "solo";

    /// Text of the marker that closes a solo section.
    pub const END_TEXT: &str = "soloend";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_markers_follow_inline_range() {
        assert_eq!(tick::MARKER_U16 as u32, tick::MAX_INLINE_DELTA + 1);
        assert_eq!(tick::MARKER_U32, u8::MAX);
    }

    #[test]
    fn test_tempo_scale() {
        assert_eq!(
            tempo::SCALED_MICROS_PER_MINUTE,
            60_000_000 * tempo::BPM_SCALE as u64
        );
    }
}
