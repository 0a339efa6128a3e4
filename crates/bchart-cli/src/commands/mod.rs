//! CLI command implementations.
//!
//! This module contains the implementation of each CLI command.

pub mod dump;
pub mod info;
pub mod pack;
pub mod verify;

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use bchart_core::Song;
use tracing::info;

/// Reads a whole file, logging how long it took.
fn read_file(path: &Path) -> Result<Vec<u8>> {
    let start = Instant::now();
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    info!(
        "Read {} ({} bytes) in {}ms",
        path.display(),
        data.len(),
        start.elapsed().as_millis()
    );
    Ok(data)
}

/// Loads and decodes a BChart file.
fn load_song(path: &Path) -> Result<Song> {
    let data = read_file(path)?;
    let start = Instant::now();
    let song = bchart_core::decode(&data)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    info!(
        "Decoded {} in {}ms",
        path.display(),
        start.elapsed().as_millis()
    );
    Ok(song)
}

/// Encodes a song and writes it to `path`.
fn save_song(song: &Song, path: &Path) -> Result<()> {
    let start = Instant::now();
    let data = bchart_core::encode(song).context("Failed to encode song")?;
    fs::write(path, &data).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(
        "Saved {} ({} bytes) in {}ms",
        path.display(),
        data.len(),
        start.elapsed().as_millis()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bchart_core::{ChartObject, Difficulty, Instrument, Note, Tempo};
    use tempfile::tempdir;

    fn sample_song() -> Song {
        let mut song = Song::new(480);
        song.add_tempo(Tempo::new(0, 128_000));
        song.add_section(0, "Intro");
        let chart = song.chart_mut(Instrument::Keys, Difficulty::Expert);
        chart.push(ChartObject::from_text(0, "solo"));
        chart.push(ChartObject::Note(Note::new(0, 2, 120)));
        chart.push(ChartObject::Note(Note::new(480, 4, 0)));
        chart.push(ChartObject::from_text(480, "soloend"));
        song.update_cache();
        song
    }

    #[test]
    fn test_save_and_load_song() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("song.bchart");

        save_song(&sample_song(), &path).unwrap();
        assert_eq!(load_song(&path).unwrap(), sample_song());
    }

    #[test]
    fn test_pack_dump_verify() {
        let dir = tempdir().unwrap();
        let json_in = dir.path().join("in.json");
        let packed = dir.path().join("song.bchart");
        let json_out = dir.path().join("out.json");

        fs::write(&json_in, serde_json::to_string(&sample_song()).unwrap()).unwrap();
        pack::run(&json_in, &packed).unwrap();
        verify::run(&packed).unwrap();
        dump::run(&packed, Some(&json_out)).unwrap();

        let dumped = pack::parse_song(&fs::read_to_string(&json_out).unwrap()).unwrap();
        assert_eq!(dumped, sample_song());
    }

    #[test]
    fn test_verify_accepts_chart_with_only_starpower() {
        use bchart_core::codec::{ChunkTag, chunk::write_chunk};
        use bchart_core::io::ByteWriter;

        let chunks: [(&[u8; 4], &[u8]); 4] = [
            (b"BCHF", &[1, 0, 192, 0, 1, 0]),
            (b"INST", &[0, 0, 0, 0, 2]),
            (b"DIFF", &[1, 0, 0, 0, 3, 0, 5, 5, 1, 0x10, 0, 0, 0]),
            (b"DIFF", &[1, 0, 0, 0, 0, 0, 6, 5, 1, 0, 0, 0, 0]),
        ];
        let mut out = ByteWriter::new();
        for (tag, payload) in chunks {
            write_chunk(&mut out, ChunkTag::from_ascii(tag), |w| {
                w.write_bytes(payload);
                Ok(())
            })
            .unwrap();
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("starpower.bchart");
        fs::write(&path, out.as_slice()).unwrap();
        verify::run(&path).unwrap();
        assert_eq!(load_song(&path).unwrap().charts().count(), 1);
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let dir = tempdir().unwrap();
        let err = load_song(&dir.path().join("missing.bchart")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }

    #[test]
    fn test_load_truncated_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cut.bchart");
        let data = bchart_core::encode(&sample_song()).unwrap();
        fs::write(&path, &data[..data.len() - 1]).unwrap();

        let err = load_song(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to decode"));
    }

    #[test]
    fn test_parse_song_rejects_bad_json() {
        assert!(pack::parse_song("{ \"resolution\": ").is_err());
    }
}
