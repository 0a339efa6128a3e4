use serde::{Deserialize, Serialize};
use strum::FromRepr;

bitflags::bitflags! {
    /// Articulation flags carried by a host note.
    ///
    /// Guitar families use the first four, drums the last four.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NoteFlags: u16 {
        /// Toggles the natural hammer-on/pull-off state.
        const FORCED = 1 << 0;
        const FORCE_HOPO = 1 << 1;
        const FORCE_STRUM = 1 << 2;
        const TAP = 1 << 3;
        const CYMBAL = 1 << 4;
        const ACCENT = 1 << 5;
        const GHOST = 1 << 6;
        /// Second kick pedal lane.
        const DOUBLE_KICK = 1 << 7;
    }
}

impl Serialize for NoteFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NoteFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u16::deserialize(deserializer)?;
        Ok(NoteFlags::from_bits_truncate(bits))
    }
}

/// A single note of a chart.
///
/// `raw_note` is the host fret or pad index; see [`GuitarFret`],
/// [`SixFret`] and [`DrumPad`] for the per-family meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub tick: u32,
    pub raw_note: u8,
    #[serde(default)]
    pub length: u32,
    #[serde(default)]
    pub flags: NoteFlags,
}

impl Note {
    pub fn new(tick: u32, raw_note: u8, length: u32) -> Self {
        Self {
            tick,
            raw_note,
            length,
            flags: NoteFlags::empty(),
        }
    }

    pub fn with_flags(mut self, flags: NoteFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum GuitarFret {
    Green = 0,
    Red = 1,
    Yellow = 2,
    Blue = 3,
    Orange = 4,
    Open = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum SixFret {
    Black1 = 0,
    Black2 = 1,
    Black3 = 2,
    White1 = 3,
    White2 = 4,
    White3 = 5,
    Open = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum DrumPad {
    Kick = 0,
    Red = 1,
    Yellow = 2,
    Blue = 3,
    Orange = 4,
    /// Fifth lane on five-lane kits.
    Green = 5,
}
