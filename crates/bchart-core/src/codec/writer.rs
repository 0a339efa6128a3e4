//! Song to BChart encoding.

use std::collections::BTreeMap;

use tracing::{debug, trace, warn};

use crate::codec::chunk::{ChunkTag, write_chunk};
use crate::codec::event::{EventWriter, PhraseType};
use crate::codec::header::FileHeader;
use crate::codec::mapping;
use crate::codec::solo;
use crate::config::format::VERSION;
use crate::error::{Error, Result};
use crate::io::ByteWriter;
use crate::song::{
    Chart, ChartObject, Difficulty, GlobalEvent, Instrument, SoloEdge, Song, SyncEvent,
};

/// Encodes a song into a BChart byte buffer.
///
/// Only charts containing at least one note are written. Instruments follow
/// their declaration order and difficulties ascend from Easy.
///
/// # Errors
///
/// Fails when the resolution or a chunk payload does not fit its field.
pub fn encode(song: &Song) -> Result<Vec<u8>> {
    let resolution = u16::try_from(song.resolution)
        .map_err(|_| Error::ResolutionOutOfRange(song.resolution))?;

    let mut tracks: BTreeMap<Instrument, Vec<(Difficulty, &Chart)>> = BTreeMap::new();
    for (instrument, difficulty, chart) in song.charts() {
        if chart.has_notes() {
            tracks
                .entry(instrument)
                .or_default()
                .push((difficulty, chart));
        } else {
            trace!("Skipping empty chart {} {}", instrument, difficulty);
        }
    }

    let header = FileHeader {
        version: VERSION,
        resolution,
        instrument_count: tracks.len() as u16,
    };

    let mut out = ByteWriter::with_capacity(4096);
    write_chunk(&mut out, ChunkTag::HEADER, |w| {
        header.write(w);
        Ok(())
    })?;
    write_chunk(&mut out, ChunkTag::SYNC, |w| {
        write_sync_track(w, &song.sync_track);
        Ok(())
    })?;
    write_chunk(&mut out, ChunkTag::EVENTS, |w| {
        write_global_events(w, &song.events);
        Ok(())
    })?;

    for (instrument, charts) in &tracks {
        write_chunk(&mut out, ChunkTag::INSTRUMENT, |w| {
            w.write_u32(mapping::instrument_to_wire(*instrument));
            w.write_u8(charts.len() as u8);
            Ok(())
        })?;

        for (difficulty, chart) in charts {
            write_chunk(&mut out, ChunkTag::DIFFICULTY, |w| {
                let count = write_chart(w, *instrument, *difficulty, chart);
                debug!("Wrote {} {}: {} records", instrument, difficulty, count);
                Ok(())
            })?;
        }
    }

    debug!(
        "Encoded {} instruments into {} bytes",
        tracks.len(),
        out.len()
    );
    Ok(out.into_inner())
}

fn write_sync_track(out: &mut ByteWriter, sync_track: &[SyncEvent]) {
    let mut sorted: Vec<&SyncEvent> = sync_track.iter().collect();
    sorted.sort_by_key(|e| e.tick());

    let mut writer = EventWriter::begin(out);
    for event in sorted {
        match event {
            SyncEvent::Tempo(tempo) => writer.tempo(tempo),
            SyncEvent::TimeSignature(ts) => writer.time_signature(ts),
        }
    }
    writer.finish();
}

fn write_global_events(out: &mut ByteWriter, events: &[GlobalEvent]) {
    let mut sorted: Vec<&GlobalEvent> = events.iter().collect();
    sorted.sort_by_key(|e| e.tick());

    let mut writer = EventWriter::begin(out);
    for event in sorted {
        match event {
            GlobalEvent::Text(ev) => writer.text(ev),
            GlobalEvent::Section(ev) => writer.section(ev),
        }
    }
    writer.finish();
}

fn write_chart(
    out: &mut ByteWriter,
    instrument: Instrument,
    difficulty: Difficulty,
    chart: &Chart,
) -> i32 {
    let family = instrument.family();

    let sorted;
    let chart = if chart.is_sorted() {
        chart
    } else {
        warn!(
            "{} {} objects are out of tick order, sorting before write",
            instrument, difficulty
        );
        sorted = chart.sorted();
        &sorted
    };
    let solo_lengths = solo::pair_solos(chart);

    let mut writer = EventWriter::begin(out);
    writer.preamble().write_u8(difficulty as u8);

    for (object, solo_length) in chart.objects().iter().zip(solo_lengths) {
        match object {
            ChartObject::Note(note) => {
                writer.note(family, note);
            }
            ChartObject::Starpower(sp) => writer.phrase(sp.tick, PhraseType::Starpower, sp.length),
            ChartObject::Solo(marker) => {
                if let (SoloEdge::Start, Some(length)) = (marker.edge, solo_length) {
                    writer.phrase(marker.tick, PhraseType::Solo, length);
                }
            }
            ChartObject::Text(ev) => writer.text(ev),
            ChartObject::Section(ev) => writer.section(ev),
        }
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::chunk::ChunkIter;
    use crate::song::{Note, Tempo, TimeSignature};

    fn tags(data: &[u8]) -> Vec<String> {
        ChunkIter::new(data)
            .map(|c| c.unwrap().tag.to_string())
            .collect()
    }

    #[test]
    fn test_empty_song_has_fixed_sections() {
        let data = encode(&Song::default()).unwrap();
        assert_eq!(tags(&data), vec!["BCHF", "SYNC", "EVTS"]);
    }

    #[test]
    fn test_charts_without_notes_are_omitted() {
        let mut song = Song::default();
        song.chart_mut(Instrument::Guitar, Difficulty::Expert)
            .push(ChartObject::from_text(0, "solo"));
        song.chart_mut(Instrument::Bass, Difficulty::Easy)
            .push(ChartObject::Note(Note::new(0, 0, 0)));

        let data = encode(&song).unwrap();
        assert_eq!(tags(&data), vec!["BCHF", "SYNC", "EVTS", "INST", "DIFF"]);

        let header = ChunkIter::new(&data).next().unwrap().unwrap();
        assert_eq!(FileHeader::parse(header.payload).unwrap().instrument_count, 1);
    }

    #[test]
    fn test_instrument_and_difficulty_order() {
        let mut song = Song::default();
        for (instrument, difficulty) in [
            (Instrument::Drums, Difficulty::Expert),
            (Instrument::Guitar, Difficulty::Hard),
            (Instrument::Drums, Difficulty::Easy),
            (Instrument::Guitar, Difficulty::Medium),
        ] {
            song.chart_mut(instrument, difficulty)
                .push(ChartObject::Note(Note::new(0, 0, 0)));
        }

        let data = encode(&song).unwrap();
        let chunks: Vec<_> = ChunkIter::new(&data).map(|c| c.unwrap()).collect();
        let inst_ids: Vec<u8> = chunks
            .iter()
            .filter(|c| c.tag == ChunkTag::INSTRUMENT)
            .map(|c| c.payload[0])
            .collect();
        let diff_ids: Vec<u8> = chunks
            .iter()
            .filter(|c| c.tag == ChunkTag::DIFFICULTY)
            .map(|c| c.payload[4])
            .collect();

        assert_eq!(inst_ids, vec![0, 7]);
        assert_eq!(diff_ids, vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_sync_track_is_sorted_stably() {
        let mut song = Song::default();
        song.add_time_signature(TimeSignature::new(768, 3, 4));
        song.add_tempo(Tempo::new(0, 120_000));
        song.add_time_signature(TimeSignature::new(0, 4, 4));

        let data = encode(&song).unwrap();
        let sync = ChunkIter::new(&data).nth(1).unwrap().unwrap();
        assert_eq!(
            sync.payload,
            &[
                3, 0, 0, 0, // count
                0, 1, 4, 0x20, 0xA1, 0x07, 0x00, // tempo at 0
                0, 2, 2, 4, 4, // 4/4 at 0
                254, 0x00, 0x03, 2, 2, 3, 4, // 3/4 at 768
            ]
        );
    }

    #[test]
    fn test_unsorted_chart_is_written_in_tick_order() {
        let mut song = Song::default();
        let chart = song.chart_mut(Instrument::Guitar, Difficulty::Expert);
        chart.push(ChartObject::Note(Note::new(500, 0, 0)));
        chart.push(ChartObject::Note(Note::new(10, 1, 0)));

        let data = encode(&song).unwrap();
        let diff = ChunkIter::new(&data).last().unwrap().unwrap();
        assert_eq!(
            diff.payload,
            &[
                2, 0, 0, 0, 3, // count, expert
                10, 6, 5, 2, 0, 0, 0, 0, // red at 10
                254, 0xEA, 0x01, 6, 5, 1, 0, 0, 0, 0, // green at 500
            ]
        );
    }

    #[test]
    fn test_resolution_must_fit_header() {
        let song = Song::new(70_000);
        assert!(matches!(
            encode(&song),
            Err(Error::ResolutionOutOfRange(70_000))
        ));
    }
}
