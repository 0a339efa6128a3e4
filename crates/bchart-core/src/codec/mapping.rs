//! Host ↔ wire translation tables.
//!
//! The host model numbers frets per family (see [`GuitarFret`], [`SixFret`],
//! [`DrumPad`]) and keeps articulations in [`NoteFlags`]. The file stores
//! family-specific note ids and a 32-bit modifier mask whose bit meaning also
//! depends on the family. Notes with no wire id are dropped by the writer;
//! flags with no wire bit are lost.

use crate::song::{DrumPad, GuitarFret, Instrument, InstrumentFamily, Note, NoteFlags, SixFret};

/// Wire note id reserved for "no mapping".
pub const UNKNOWN_NOTE: u8 = 0xFF;

pub mod instrument_id {
    pub const GUITAR: u32 = 0;
    pub const GUITAR_SIX: u32 = 1;
    pub const BASS: u32 = 2;
    pub const BASS_SIX: u32 = 3;
    pub const RHYTHM: u32 = 4;
    pub const COOP: u32 = 5;
    pub const KEYS: u32 = 6;
    pub const DRUMS: u32 = 7;
    pub const VOCALS: u32 = 8;
    pub const UNKNOWN: u32 = 0xFFFF;
}

/// Guitar and six-fret modifier bits.
pub mod guitar_mod {
    pub const FORCED: u32 = 1 << 0;
    pub const FORCE_HOPO: u32 = 1 << 1;
    pub const FORCE_STRUM: u32 = 1 << 2;
    pub const TAP: u32 = 1 << 3;
}

/// Drum modifier bits.
pub mod drums_mod {
    pub const ACCENT: u32 = 1 << 0;
    pub const GHOST: u32 = 1 << 1;
    pub const CYMBAL: u32 = 1 << 2;
    pub const DOUBLE_KICK: u32 = 1 << 3;
}

const GUITAR_MODS: [(NoteFlags, u32); 4] = [
    (NoteFlags::FORCED, guitar_mod::FORCED),
    (NoteFlags::FORCE_HOPO, guitar_mod::FORCE_HOPO),
    (NoteFlags::FORCE_STRUM, guitar_mod::FORCE_STRUM),
    (NoteFlags::TAP, guitar_mod::TAP),
];

const DRUMS_MODS: [(NoteFlags, u32); 4] = [
    (NoteFlags::ACCENT, drums_mod::ACCENT),
    (NoteFlags::GHOST, drums_mod::GHOST),
    (NoteFlags::CYMBAL, drums_mod::CYMBAL),
    (NoteFlags::DOUBLE_KICK, drums_mod::DOUBLE_KICK),
];

fn modifier_table(family: InstrumentFamily) -> &'static [(NoteFlags, u32)] {
    match family {
        InstrumentFamily::Guitar | InstrumentFamily::SixFret => &GUITAR_MODS,
        InstrumentFamily::Drums => &DRUMS_MODS,
    }
}

pub fn instrument_to_wire(instrument: Instrument) -> u32 {
    match instrument {
        Instrument::Guitar => instrument_id::GUITAR,
        Instrument::GuitarCoop => instrument_id::COOP,
        Instrument::Bass => instrument_id::BASS,
        Instrument::Rhythm => instrument_id::RHYTHM,
        Instrument::Keys => instrument_id::KEYS,
        Instrument::Drums => instrument_id::DRUMS,
        Instrument::GhLiveGuitar => instrument_id::GUITAR_SIX,
        Instrument::GhLiveBass => instrument_id::BASS_SIX,
    }
}

/// Returns `None` for vocals, the unrecognised sentinel and unknown ids.
pub fn instrument_from_wire(id: u32) -> Option<Instrument> {
    match id {
        instrument_id::GUITAR => Some(Instrument::Guitar),
        instrument_id::GUITAR_SIX => Some(Instrument::GhLiveGuitar),
        instrument_id::BASS => Some(Instrument::Bass),
        instrument_id::BASS_SIX => Some(Instrument::GhLiveBass),
        instrument_id::RHYTHM => Some(Instrument::Rhythm),
        instrument_id::COOP => Some(Instrument::GuitarCoop),
        instrument_id::KEYS => Some(Instrument::Keys),
        instrument_id::DRUMS => Some(Instrument::Drums),
        _ => None,
    }
}

/// Maps a host fret index to its wire id, `None` when it has no mapping.
pub fn to_wire_note(family: InstrumentFamily, raw_note: u8) -> Option<u8> {
    let id = match family {
        InstrumentFamily::Guitar => match GuitarFret::from_repr(raw_note)? {
            GuitarFret::Open => 0,
            GuitarFret::Green => 1,
            GuitarFret::Red => 2,
            GuitarFret::Yellow => 3,
            GuitarFret::Blue => 4,
            GuitarFret::Orange => 5,
        },
        InstrumentFamily::SixFret => match SixFret::from_repr(raw_note)? {
            SixFret::Open => 0,
            SixFret::Black1 => 1,
            SixFret::Black2 => 2,
            SixFret::Black3 => 3,
            SixFret::White1 => 4,
            SixFret::White2 => 5,
            SixFret::White3 => 6,
        },
        InstrumentFamily::Drums => match DrumPad::from_repr(raw_note)? {
            DrumPad::Kick => 0,
            DrumPad::Red => 1,
            DrumPad::Yellow => 2,
            DrumPad::Blue => 3,
            DrumPad::Orange => 4,
            DrumPad::Green => 5,
        },
    };
    Some(id)
}

/// Maps a wire id back to the host fret index.
pub fn from_wire_note(family: InstrumentFamily, wire_note: u8) -> Option<u8> {
    let raw = match family {
        InstrumentFamily::Guitar => (match wire_note {
            0 => GuitarFret::Open,
            1 => GuitarFret::Green,
            2 => GuitarFret::Red,
            3 => GuitarFret::Yellow,
            4 => GuitarFret::Blue,
            5 => GuitarFret::Orange,
            _ => return None,
        }) as u8,
        InstrumentFamily::SixFret => (match wire_note {
            0 => SixFret::Open,
            1 => SixFret::Black1,
            2 => SixFret::Black2,
            3 => SixFret::Black3,
            4 => SixFret::White1,
            5 => SixFret::White2,
            6 => SixFret::White3,
            _ => return None,
        }) as u8,
        InstrumentFamily::Drums => (match wire_note {
            0 => DrumPad::Kick,
            1 => DrumPad::Red,
            2 => DrumPad::Yellow,
            3 => DrumPad::Blue,
            4 => DrumPad::Orange,
            5 => DrumPad::Green,
            _ => return None,
        }) as u8,
    };
    Some(raw)
}

pub fn to_wire_modifiers(family: InstrumentFamily, note: &Note) -> u32 {
    modifier_table(family)
        .iter()
        .filter(|(flag, _)| note.flags.contains(*flag))
        .fold(0, |mask, (_, bit)| mask | bit)
}

/// Sets the host flags described by `modifiers`. Unknown bits are ignored.
pub fn apply_wire_modifiers(family: InstrumentFamily, note: &mut Note, modifiers: u32) {
    for (flag, bit) in modifier_table(family) {
        if modifiers & bit != 0 {
            note.flags.insert(*flag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const FAMILIES: [InstrumentFamily; 3] = [
        InstrumentFamily::Guitar,
        InstrumentFamily::SixFret,
        InstrumentFamily::Drums,
    ];

    #[test]
    fn test_note_tables_are_inverse() {
        for family in FAMILIES {
            for raw in 0..=u8::MAX {
                if let Some(wire) = to_wire_note(family, raw) {
                    assert_ne!(wire, UNKNOWN_NOTE);
                    assert_eq!(from_wire_note(family, wire), Some(raw), "{:?}", family);
                }
            }
        }
    }

    #[test]
    fn test_open_note_is_wire_zero() {
        assert_eq!(
            to_wire_note(InstrumentFamily::Guitar, GuitarFret::Open as u8),
            Some(0)
        );
        assert_eq!(
            to_wire_note(InstrumentFamily::SixFret, SixFret::Open as u8),
            Some(0)
        );
        assert_eq!(
            to_wire_note(InstrumentFamily::Guitar, GuitarFret::Green as u8),
            Some(1)
        );
    }

    #[test]
    fn test_out_of_table_notes_are_unrepresentable() {
        assert_eq!(to_wire_note(InstrumentFamily::Guitar, 6), None);
        assert_eq!(to_wire_note(InstrumentFamily::SixFret, 7), None);
        assert_eq!(to_wire_note(InstrumentFamily::Drums, 6), None);
        assert_eq!(from_wire_note(InstrumentFamily::Guitar, 6), None);
        assert_eq!(from_wire_note(InstrumentFamily::Drums, UNKNOWN_NOTE), None);
    }

    #[test]
    fn test_guitar_modifier_bits() {
        let note = Note::new(0, 0, 0).with_flags(NoteFlags::FORCED | NoteFlags::TAP);
        assert_eq!(
            to_wire_modifiers(InstrumentFamily::Guitar, &note),
            guitar_mod::FORCED | guitar_mod::TAP
        );
        assert_eq!(to_wire_modifiers(InstrumentFamily::Guitar, &note), 0b1001);
    }

    #[test]
    fn test_drum_modifier_bits() {
        let note = Note::new(0, DrumPad::Yellow as u8, 0)
            .with_flags(NoteFlags::CYMBAL | NoteFlags::GHOST);
        assert_eq!(to_wire_modifiers(InstrumentFamily::Drums, &note), 0b0110);

        let mut back = Note::new(0, DrumPad::Yellow as u8, 0);
        apply_wire_modifiers(InstrumentFamily::Drums, &mut back, 0b0110);
        assert_eq!(back.flags, note.flags);
    }

    #[test]
    fn test_foreign_flags_are_dropped() {
        let note = Note::new(0, 0, 0).with_flags(NoteFlags::ACCENT | NoteFlags::FORCE_STRUM);
        assert_eq!(
            to_wire_modifiers(InstrumentFamily::Guitar, &note),
            guitar_mod::FORCE_STRUM
        );
        assert_eq!(
            to_wire_modifiers(InstrumentFamily::Drums, &note),
            drums_mod::ACCENT
        );
    }

    #[test]
    fn test_unknown_modifier_bits_are_ignored() {
        let mut note = Note::new(0, 0, 0);
        apply_wire_modifiers(InstrumentFamily::Guitar, &mut note, 0xFFFF_FFF0);
        assert!(note.flags.is_empty());
    }

    #[test]
    fn test_instrument_ids_round_trip() {
        for instrument in Instrument::iter() {
            assert_eq!(
                instrument_from_wire(instrument_to_wire(instrument)),
                Some(instrument)
            );
        }
        assert_eq!(instrument_from_wire(instrument_id::VOCALS), None);
        assert_eq!(instrument_from_wire(instrument_id::UNKNOWN), None);
    }
}
