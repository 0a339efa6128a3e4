//! BChart to Song decoding.

use tracing::{debug, trace, warn};

use crate::codec::chunk::{Chunk, ChunkIter, ChunkSummary, ChunkTag};
use crate::codec::event::{Event, EventReader, PhraseType};
use crate::codec::header::FileHeader;
use crate::codec::mapping;
use crate::codec::solo::PendingSoloEnds;
use crate::config::format::VERSION;
use crate::error::Result;
use crate::io::ByteBuffer;
use crate::song::{
    Chart, ChartObject, Difficulty, GlobalEvent, Instrument, Song, Starpower, SyncEvent,
};

/// Decodes a BChart byte buffer into a song.
///
/// Unknown chunks, unknown event kinds and notes without a mapping are
/// skipped. A difficulty chunk is only read after an instrument chunk this
/// reader recognises.
///
/// # Errors
///
/// Fails when a chunk length runs past the end of the buffer or a length
/// field is negative. A chunk whose payload is too short for its own
/// contents is skipped as a whole.
pub fn decode(data: &[u8]) -> Result<Song> {
    let mut song = Song::default();
    let mut header: Option<FileHeader> = None;
    let mut context: Option<Instrument> = None;
    let mut instruments_read: u16 = 0;

    for chunk in ChunkIter::new(data) {
        let chunk = chunk?;
        match chunk.tag {
            ChunkTag::HEADER => {
                let Some(parsed) = skip_short(FileHeader::parse(chunk.payload), &chunk)? else {
                    continue;
                };
                if parsed.version != VERSION {
                    warn!(
                        "Unexpected format version {} (expected {}), reading anyway",
                        parsed.version, VERSION
                    );
                }
                song.resolution = u32::from(parsed.resolution);
                header = Some(parsed);
            }
            ChunkTag::SYNC => {
                skip_short(read_sync_track(&mut song, chunk.payload), &chunk)?;
            }
            ChunkTag::EVENTS => {
                skip_short(read_global_events(&mut song, chunk.payload), &chunk)?;
            }
            ChunkTag::INSTRUMENT => {
                context = skip_short(read_instrument(&chunk), &chunk)?.flatten();
                instruments_read = instruments_read.saturating_add(1);
            }
            ChunkTag::DIFFICULTY => match context {
                Some(instrument) => {
                    skip_short(read_difficulty(&mut song, instrument, chunk.payload), &chunk)?;
                }
                None => warn!(
                    "Skipping difficulty chunk at offset {} without a known instrument",
                    chunk.offset
                ),
            },
            other => debug!(
                "Skipping unknown chunk {} at offset {} ({} bytes)",
                other,
                chunk.offset,
                chunk.payload.len()
            ),
        }
    }

    match header {
        Some(h) if h.instrument_count != instruments_read => warn!(
            "Header lists {} instruments but {} were found",
            h.instrument_count, instruments_read
        ),
        Some(_) => {}
        None => warn!("No header chunk found, assuming resolution {}", song.resolution),
    }

    let dropped = song.remove_charts_without_notes();
    if dropped > 0 {
        debug!("Dropped {} charts without notes", dropped);
    }
    song.update_cache();
    Ok(song)
}

/// Lists the chunks of a file without decoding their payloads.
pub fn inspect(data: &[u8]) -> Result<Vec<ChunkSummary>> {
    ChunkIter::new(data)
        .map(|chunk| chunk.map(|c| c.summary()))
        .collect()
}

/// Parses the first header chunk, if the file has one.
pub fn read_header(data: &[u8]) -> Result<Option<FileHeader>> {
    for chunk in ChunkIter::new(data) {
        let chunk = chunk?;
        if chunk.tag == ChunkTag::HEADER {
            return skip_short(FileHeader::parse(chunk.payload), &chunk);
        }
    }
    Ok(None)
}

/// Downgrades a payload too short for its fixed fields to a skipped chunk.
///
/// The chunk framing already bounds the payload, so running out of bytes
/// here means the chunk itself is malformed, not the file.
fn skip_short<T>(result: Result<T>, chunk: &Chunk<'_>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_truncated() => {
            warn!(
                "Skipping {} chunk at offset {} ({} bytes): {}",
                chunk.tag,
                chunk.offset,
                chunk.payload.len(),
                e
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn no_preamble(_: &mut ByteBuffer<'_>) -> Result<()> {
    Ok(())
}

fn read_sync_track(song: &mut Song, payload: &[u8]) -> Result<()> {
    let (events, ()) = EventReader::begin(payload, no_preamble)?;
    let mut sync_track = Vec::new();
    for event in events {
        match event? {
            Event::Tempo(tempo) => sync_track.push(SyncEvent::Tempo(tempo)),
            Event::TimeSignature(ts) => sync_track.push(SyncEvent::TimeSignature(ts)),
            other => trace!("Ignoring {:?} in tempo map", other),
        }
    }
    song.sync_track.extend(sync_track);
    Ok(())
}

fn read_global_events(song: &mut Song, payload: &[u8]) -> Result<()> {
    let (events, ()) = EventReader::begin(payload, no_preamble)?;
    let mut global = Vec::new();
    for event in events {
        match event? {
            Event::Text(ev) => global.push(GlobalEvent::Text(ev)),
            Event::Section(ev) => global.push(GlobalEvent::Section(ev)),
            other => trace!("Ignoring {:?} in global events", other),
        }
    }
    song.events.extend(global);
    Ok(())
}

/// Returns the instrument that following difficulty chunks belong to.
fn read_instrument(chunk: &Chunk<'_>) -> Result<Option<Instrument>> {
    let mut buf = ByteBuffer::new(chunk.payload);
    let id = buf.read_u32()?;
    let difficulty_count = buf.read_u8()?;

    let instrument = mapping::instrument_from_wire(id);
    match instrument {
        Some(instrument) => debug!(
            "Reading {} ({} difficulties)",
            instrument, difficulty_count
        ),
        None => warn!(
            "Unsupported instrument id {} at offset {}, skipping its difficulties",
            id, chunk.offset
        ),
    }
    Ok(instrument)
}

fn read_difficulty(song: &mut Song, instrument: Instrument, payload: &[u8]) -> Result<()> {
    let (events, difficulty) = EventReader::begin(payload, |buf| buf.read_u8())?;
    let Some(difficulty) = Difficulty::from_u8(difficulty) else {
        warn!(
            "Skipping {} chart with unknown difficulty id {}",
            instrument, difficulty
        );
        return Ok(());
    };

    let family = instrument.family();
    let mut chart = Chart::new();
    let mut pending = PendingSoloEnds::new();

    for event in events {
        let event = event?;
        pending.flush_before(&mut chart, event.tick());

        match event {
            Event::Note { tick, wire_note, .. } => match event.to_note(family) {
                Some(note) => chart.push(ChartObject::Note(note)),
                None => trace!(
                    "Skipping unmapped {:?} note id {} at tick {}",
                    family, wire_note, tick
                ),
            },
            Event::Phrase {
                tick,
                phrase: PhraseType::Starpower,
                length,
            } => chart.push(ChartObject::Starpower(Starpower::new(tick, length))),
            Event::Phrase {
                tick,
                phrase: PhraseType::Solo,
                length,
            } => pending.open(&mut chart, tick, length),
            Event::Text(ev) => chart.push(ChartObject::from_text(ev.tick, &ev.text)),
            Event::Section(ev) => chart.push(ChartObject::Section(ev)),
            Event::Tempo(_) | Event::TimeSignature(_) | Event::Unknown { .. } => {
                trace!("Ignoring {:?} in {} {}", event, instrument, difficulty)
            }
        }
    }
    pending.flush_all(&mut chart);

    debug!(
        "Read {} {}: {} objects",
        instrument,
        difficulty,
        chart.len()
    );
    let target = song.chart_mut(instrument, difficulty);
    for object in chart.into_objects() {
        target.push(object);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::chunk::write_chunk;
    use crate::codec::encode;
    use crate::io::ByteWriter;
    use crate::song::{Note, Tempo};

    fn chunk(out: &mut ByteWriter, tag: &[u8; 4], payload: &[u8]) {
        write_chunk(out, ChunkTag::from_ascii(tag), |w| {
            w.write_bytes(payload);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_empty_input_decodes_to_default_song() {
        let song = decode(&[]).unwrap();
        assert_eq!(song, Song::default());
    }

    #[test]
    fn test_header_sets_resolution() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"BCHF", &[1, 0, 0xE0, 0x01, 0, 0]);
        let song = decode(out.as_slice()).unwrap();
        assert_eq!(song.resolution, 480);
    }

    #[test]
    fn test_version_mismatch_is_not_fatal() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"BCHF", &[9, 0, 192, 0, 0, 0]);
        chunk(&mut out, b"SYNC", &[1, 0, 0, 0, 0, 2, 2, 4, 4]);
        let song = decode(out.as_slice()).unwrap();
        assert_eq!(song.sync_track.len(), 1);
    }

    #[test]
    fn test_difficulty_without_instrument_is_skipped() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"BCHF", &[1, 0, 192, 0, 0, 0]);
        chunk(&mut out, b"DIFF", &[1, 0, 0, 0, 3, 0, 6, 5, 1, 0, 0, 0, 0]);
        let song = decode(out.as_slice()).unwrap();
        assert_eq!(song.charts().count(), 0);
    }

    #[test]
    fn test_vocals_instrument_is_skipped() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"INST", &[8, 0, 0, 0, 1]);
        chunk(&mut out, b"DIFF", &[1, 0, 0, 0, 3, 0, 6, 5, 1, 0, 0, 0, 0]);
        let song = decode(out.as_slice()).unwrap();
        assert_eq!(song.charts().count(), 0);
    }

    #[test]
    fn test_unknown_difficulty_id_is_skipped() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"INST", &[0, 0, 0, 0, 1]);
        chunk(&mut out, b"DIFF", &[1, 0, 0, 0, 9, 0, 6, 5, 1, 0, 0, 0, 0]);
        let song = decode(out.as_slice()).unwrap();
        assert_eq!(song.charts().count(), 0);
    }

    #[test]
    fn test_unmapped_wire_note_is_skipped() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"INST", &[0, 0, 0, 0, 1]);
        chunk(
            &mut out,
            b"DIFF",
            &[
                2, 0, 0, 0, 3, // two records, expert
                0, 6, 5, 0xFF, 0, 0, 0, 0, // unmapped id
                10, 6, 5, 1, 0, 0, 0, 0, // green at tick 10
            ],
        );
        let song = decode(out.as_slice()).unwrap();
        let chart = song.chart(Instrument::Guitar, Difficulty::Expert).unwrap();
        assert_eq!(chart.objects(), &[ChartObject::Note(Note::new(10, 0, 0))]);
        assert_eq!(chart.note_count(), 1);
    }

    #[test]
    fn test_truncated_file_is_an_error() {
        let mut song = Song::default();
        song.add_tempo(Tempo::new(0, 120_000));
        song.chart_mut(Instrument::Keys, Difficulty::Easy)
            .push(ChartObject::Note(Note::new(0, 1, 0)));
        let data = encode(&song).unwrap();
        let boundaries: Vec<usize> = inspect(&data).unwrap().iter().map(|c| c.offset).collect();

        for cut in (1..data.len()).filter(|c| !boundaries.contains(c)) {
            let result = decode(&data[..cut]);
            assert!(result.is_err(), "cut at {} decoded", cut);
            assert!(result.unwrap_err().is_truncated());
        }
    }

    #[test]
    fn test_short_header_is_skipped() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"BCHF", &[1, 0, 0xE0]);
        chunk(&mut out, b"SYNC", &[1, 0, 0, 0, 0, 2, 2, 4, 4]);
        let song = decode(out.as_slice()).unwrap();
        assert_eq!(song.resolution, 192);
        assert_eq!(song.sync_track.len(), 1);
        assert!(read_header(out.as_slice()).unwrap().is_none());
    }

    #[test]
    fn test_short_instrument_clears_context() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"BCHF", &[1, 0, 192, 0, 2, 0]);
        chunk(&mut out, b"INST", &[0, 0, 0, 0, 1]);
        chunk(&mut out, b"DIFF", &[1, 0, 0, 0, 3, 0, 6, 5, 1, 0, 0, 0, 0]);
        chunk(&mut out, b"INST", &[1, 0]);
        chunk(&mut out, b"DIFF", &[1, 0, 0, 0, 0, 0, 6, 5, 1, 0, 0, 0, 0]);
        chunk(&mut out, b"EVTS", &[1, 0, 0, 0, 0, 4, 1, b'A']);

        let song = decode(out.as_slice()).unwrap();
        let keys: Vec<_> = song.charts().map(|(i, d, _)| (i, d)).collect();
        assert_eq!(keys, vec![(Instrument::Guitar, Difficulty::Expert)]);
        assert_eq!(song.events.len(), 1);
    }

    #[test]
    fn test_short_difficulty_is_skipped() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"INST", &[0, 0, 0, 0, 2]);
        chunk(&mut out, b"DIFF", &[0, 0, 0, 0]);
        chunk(&mut out, b"DIFF", &[1, 0, 0, 0, 1, 0, 6, 5, 1, 0, 0, 0, 0]);
        let song = decode(out.as_slice()).unwrap();
        let keys: Vec<_> = song.charts().map(|(i, d, _)| (i, d)).collect();
        assert_eq!(keys, vec![(Instrument::Guitar, Difficulty::Medium)]);
    }

    #[test]
    fn test_overrunning_record_drops_whole_chunk() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"INST", &[0, 0, 0, 0, 1]);
        chunk(
            &mut out,
            b"DIFF",
            &[
                2, 0, 0, 0, 3, // two records, expert
                0, 6, 5, 1, 0, 0, 0, 0, // green at 0
                10, 6, 5, 1, 0, // cut short
            ],
        );
        let song = decode(out.as_slice()).unwrap();
        assert_eq!(song.charts().count(), 0);
    }

    #[test]
    fn test_chart_without_notes_is_dropped() {
        let mut out = ByteWriter::new();
        chunk(&mut out, b"INST", &[0, 0, 0, 0, 2]);
        chunk(&mut out, b"DIFF", &[1, 0, 0, 0, 3, 0, 5, 5, 1, 0x10, 0, 0, 0]);
        chunk(&mut out, b"DIFF", &[1, 0, 0, 0, 0, 0, 6, 5, 1, 0, 0, 0, 0]);

        let song = decode(out.as_slice()).unwrap();
        assert!(song.chart(Instrument::Guitar, Difficulty::Expert).is_none());
        assert!(song.chart(Instrument::Guitar, Difficulty::Easy).is_some());
        assert_eq!(decode(&encode(&song).unwrap()).unwrap(), song);
    }

    #[test]
    fn test_inspect_lists_chunks() {
        let data = encode(&Song::default()).unwrap();
        let summary = inspect(&data).unwrap();
        assert_eq!(summary.len(), 3);
        assert_eq!(summary[0].tag, ChunkTag::HEADER);
        assert_eq!(summary[0].length, 6);
        assert_eq!(summary[1].offset, 14);

        let header = read_header(&data).unwrap().unwrap();
        assert_eq!(header.resolution, 192);
    }
}
