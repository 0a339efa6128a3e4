//! Event records.
//!
//! Every event list (tempo map, global events, one difficulty) is a record
//! count followed by records of the form
//!
//! ```text
//! tick delta | kind:u8 | length:u8 | payload[length]
//! ```
//!
//! Payload layouts by kind:
//!
//! | kind              | payload                                          |
//! |-------------------|--------------------------------------------------|
//! | Tempo (1)         | µs per quarter note, u32                         |
//! | TimeSignature (2) | numerator u8, denominator u8                     |
//! | Text (3)          | UTF-8 bytes                                      |
//! | Section (4)       | UTF-8 bytes                                      |
//! | Phrase (5)        | phrase type u8, length u32                       |
//! | Note (6)          | wire note u8, sustain u32, [width u8, mask u32]  |
//!
//! Records of an unknown kind, or too short for their kind, are skipped by
//! their length byte.

use strum::FromRepr;
use tracing::trace;

use crate::codec::mapping;
use crate::codec::tick::{TickReader, TickWriter};
use crate::config::format::{MAX_TEXT_LEN, MODIFIER_FIELD_LEN};
use crate::config::tempo::SCALED_MICROS_PER_MINUTE;
use crate::error::{Error, Result};
use crate::io::{ByteBuffer, ByteWriter};
use crate::song::{InstrumentFamily, Note, Tempo, TextEvent, TimeSignature};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum EventKind {
    Tempo = 1,
    TimeSignature = 2,
    Text = 3,
    Section = 4,
    Phrase = 5,
    Note = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromRepr)]
#[repr(u8)]
pub enum PhraseType {
    Starpower = 1,
    Solo = 2,
}

/// Converts a scaled BPM value to microseconds per quarter note.
pub fn tempo_to_micros(value: u32) -> u32 {
    let value = u64::from(value.max(1));
    let micros = (SCALED_MICROS_PER_MINUTE + value / 2) / value;
    micros.min(u32::MAX as u64) as u32
}

/// Converts microseconds per quarter note back to a scaled BPM value.
pub fn micros_to_tempo(micros: u32) -> u32 {
    let micros = u64::from(micros.max(1));
    let value = (SCALED_MICROS_PER_MINUTE + micros / 2) / micros;
    value.min(u32::MAX as u64) as u32
}

/// Cuts `text` to at most [`MAX_TEXT_LEN`] bytes without splitting a character.
fn truncate_text(text: &str) -> &[u8] {
    if text.len() <= MAX_TEXT_LEN {
        return text.as_bytes();
    }
    let mut end = MAX_TEXT_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text.as_bytes()[..end]
}

/// Writes one event list: a reserved record count, then records.
///
/// The count is patched in by [`EventWriter::finish`].
pub struct EventWriter<'w> {
    out: &'w mut ByteWriter,
    ticks: TickWriter,
    count_slot: usize,
    count: i32,
}

impl<'w> EventWriter<'w> {
    pub fn begin(out: &'w mut ByteWriter) -> Self {
        let count_slot = out.reserve_i32();
        Self {
            out,
            ticks: TickWriter::new(),
            count_slot,
            count: 0,
        }
    }

    /// Writes bytes between the count and the first record.
    pub fn preamble(&mut self) -> &mut ByteWriter {
        &mut *self.out
    }

    fn record(&mut self, tick: u32, kind: EventKind, payload: &[u8]) {
        debug_assert!(payload.len() <= u8::MAX as usize);
        self.ticks.write(self.out, tick);
        self.out.write_u8(kind as u8);
        self.out.write_u8(payload.len() as u8);
        self.out.write_bytes(payload);
        self.count += 1;
    }

    pub fn tempo(&mut self, tempo: &Tempo) {
        let micros = tempo_to_micros(tempo.value);
        self.record(tempo.tick, EventKind::Tempo, &micros.to_le_bytes());
    }

    pub fn time_signature(&mut self, ts: &TimeSignature) {
        self.record(
            ts.tick,
            EventKind::TimeSignature,
            &[ts.numerator, ts.denominator],
        );
    }

    pub fn text(&mut self, ev: &TextEvent) {
        self.record(ev.tick, EventKind::Text, truncate_text(&ev.text));
    }

    pub fn section(&mut self, ev: &TextEvent) {
        self.record(ev.tick, EventKind::Section, truncate_text(&ev.text));
    }

    pub fn phrase(&mut self, tick: u32, phrase: PhraseType, length: u32) {
        let mut payload = [0u8; 5];
        payload[0] = phrase as u8;
        payload[1..].copy_from_slice(&length.to_le_bytes());
        self.record(tick, EventKind::Phrase, &payload);
    }

    /// Writes a note, returning false when it has no wire id and was skipped.
    pub fn note(&mut self, family: InstrumentFamily, note: &Note) -> bool {
        let Some(wire_note) = mapping::to_wire_note(family, note.raw_note) else {
            trace!(
                "Skipping unrepresentable {:?} note {} at tick {}",
                family, note.raw_note, note.tick
            );
            return false;
        };
        let modifiers = mapping::to_wire_modifiers(family, note);

        let mut payload = Vec::with_capacity(10);
        payload.push(wire_note);
        payload.extend_from_slice(&note.length.to_le_bytes());
        if modifiers != 0 {
            payload.push(MODIFIER_FIELD_LEN);
            payload.extend_from_slice(&modifiers.to_le_bytes());
        }
        self.record(note.tick, EventKind::Note, &payload);
        true
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    /// Patches the record count and returns it.
    pub fn finish(self) -> i32 {
        self.out.patch_i32(self.count_slot, self.count);
        self.count
    }
}

/// A decoded event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Tempo(Tempo),
    TimeSignature(TimeSignature),
    Text(TextEvent),
    Section(TextEvent),
    Phrase {
        tick: u32,
        phrase: PhraseType,
        length: u32,
    },
    Note {
        tick: u32,
        wire_note: u8,
        length: u32,
        modifiers: u32,
    },
    /// A record this reader does not understand; its payload was skipped.
    Unknown { tick: u32, kind: u8 },
}

impl Event {
    pub fn tick(&self) -> u32 {
        match self {
            Self::Tempo(t) => t.tick,
            Self::TimeSignature(ts) => ts.tick,
            Self::Text(ev) | Self::Section(ev) => ev.tick,
            Self::Phrase { tick, .. } | Self::Note { tick, .. } | Self::Unknown { tick, .. } => {
                *tick
            }
        }
    }

    /// Host note for a decoded note record, `None` if the id has no mapping.
    pub fn to_note(&self, family: InstrumentFamily) -> Option<Note> {
        let Self::Note {
            tick,
            wire_note,
            length,
            modifiers,
        } = *self
        else {
            return None;
        };
        let raw_note = mapping::from_wire_note(family, wire_note)?;
        let mut note = Note::new(tick, raw_note, length);
        mapping::apply_wire_modifiers(family, &mut note, modifiers);
        Some(note)
    }
}

/// Reads the records of one event list.
///
/// Yields `Err` once if the list is cut short, then stops.
pub struct EventReader<'a> {
    buf: ByteBuffer<'a>,
    ticks: TickReader,
    remaining: usize,
    failed: bool,
}

impl<'a> EventReader<'a> {
    /// Reads the record count and positions on the first record.
    ///
    /// `preamble` consumes any bytes between the count and the first record.
    pub fn begin<T>(
        payload: &'a [u8],
        preamble: impl FnOnce(&mut ByteBuffer<'a>) -> Result<T>,
    ) -> Result<(Self, T)> {
        let mut buf = ByteBuffer::new(payload);
        let position = buf.position();
        let count = buf.read_i32()?;
        let remaining = usize::try_from(count).map_err(|_| Error::InvalidLength {
            position,
            length: count.into(),
        })?;
        let extra = preamble(&mut buf)?;

        Ok((
            Self {
                buf,
                ticks: TickReader::new(),
                remaining,
                failed: false,
            },
            extra,
        ))
    }

    /// Number of records still to be read.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn read_record(&mut self) -> Result<Event> {
        let tick = self.ticks.read(&mut self.buf)?;
        let kind = self.buf.read_u8()?;
        let length = self.buf.read_u8()? as usize;
        let payload = self.buf.read_bytes(length)?;

        let Some(known) = EventKind::from_repr(kind) else {
            trace!("Skipping unknown event kind {} at tick {}", kind, tick);
            return Ok(Event::Unknown { tick, kind });
        };

        match parse_payload(tick, known, payload) {
            Ok(event) => Ok(event),
            Err(e) => {
                trace!("Skipping malformed {:?} record at tick {}: {}", known, tick, e);
                Ok(Event::Unknown { tick, kind })
            }
        }
    }
}

impl Iterator for EventReader<'_> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.failed {
            return None;
        }
        self.remaining -= 1;

        let record = self.read_record();
        if record.is_err() {
            self.failed = true;
        }
        Some(record)
    }
}

fn parse_payload(tick: u32, kind: EventKind, payload: &[u8]) -> Result<Event> {
    let mut data = ByteBuffer::new(payload);
    let event = match kind {
        EventKind::Tempo => Event::Tempo(Tempo::new(tick, micros_to_tempo(data.read_u32()?))),
        EventKind::TimeSignature => {
            let numerator = data.read_u8()?;
            let denominator = data.read_u8()?;
            Event::TimeSignature(TimeSignature::new(tick, numerator, denominator))
        }
        EventKind::Text => Event::Text(TextEvent::new(tick, String::from_utf8_lossy(payload))),
        EventKind::Section => {
            Event::Section(TextEvent::new(tick, String::from_utf8_lossy(payload)))
        }
        EventKind::Phrase => {
            let phrase = data.read_u8()?;
            let length = data.read_u32()?;
            match PhraseType::from_repr(phrase) {
                Some(phrase) => Event::Phrase {
                    tick,
                    phrase,
                    length,
                },
                None => Event::Unknown {
                    tick,
                    kind: kind as u8,
                },
            }
        }
        EventKind::Note => {
            let wire_note = data.read_u8()?;
            let length = data.read_u32()?;
            let modifiers = if data.is_at_end() {
                0
            } else {
                let width = data.read_u8()? as usize;
                let field = data.read_bytes(width)?;
                // Only the low 32 bits are defined.
                let mut mask = [0u8; 4];
                let used = field.len().min(4);
                mask[..used].copy_from_slice(&field[..used]);
                u32::from_le_bytes(mask)
            };
            Event::Note {
                tick,
                wire_note,
                length,
                modifiers,
            }
        }
    };
    Ok(event)
}
