//! Dump command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::load_song;

/// Run the dump command
pub fn run(file: &Path, output: Option<&Path>) -> Result<()> {
    let song = load_song(file)?;
    let json = serde_json::to_string_pretty(&song).context("Failed to serialize song")?;

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
