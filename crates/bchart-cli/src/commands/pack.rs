//! Pack command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bchart_core::Song;

use super::save_song;

/// Parses a JSON song and refreshes its caches.
pub fn parse_song(json: &str) -> Result<Song> {
    let mut song: Song = serde_json::from_str(json).context("Failed to parse song JSON")?;
    song.update_cache();
    Ok(song)
}

/// Run the pack command
pub fn run(input: &Path, output: &Path) -> Result<()> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let song = parse_song(&json)?;
    save_song(&song, output)
}
