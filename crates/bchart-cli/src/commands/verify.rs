//! Verify command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};
use bchart_core::Song;
use tracing::info;

use super::load_song;

/// Re-encodes `song` and checks that decoding gives it back.
pub fn check_round_trip(song: &Song) -> Result<()> {
    let data = bchart_core::encode(song).context("Failed to re-encode song")?;
    let again = bchart_core::decode(&data).context("Failed to decode re-encoded song")?;

    if &again != song {
        bail!("Song changed after re-encoding");
    }
    info!("Re-encoded to {} bytes", data.len());
    Ok(())
}

/// Run the verify command
pub fn run(file: &Path) -> Result<()> {
    let song = load_song(file)?;
    check_round_trip(&song).with_context(|| format!("{} failed verification", file.display()))?;

    let charts = song.charts().count();
    println!("{}: OK ({} charts)", file.display(), charts);
    Ok(())
}
