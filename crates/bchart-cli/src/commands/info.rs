//! Info command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use bchart_core::{ChunkSummary, FileHeader};
use serde::Serialize;

use super::read_file;

#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub size: usize,
    pub header: Option<FileHeader>,
    pub chunks: Vec<ChunkSummary>,
}

impl FileInfo {
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let chunks = bchart_core::inspect(data).context("Failed to read chunk list")?;
        let header = bchart_core::read_header(data).context("Failed to read header")?;
        Ok(Self {
            size: data.len(),
            header,
            chunks,
        })
    }
}

/// Run the info command
pub fn run(file: &Path, json: bool) -> Result<()> {
    let data = read_file(file)?;
    let info = FileInfo::from_bytes(&data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} ({} bytes)", file.display(), info.size);
    match &info.header {
        Some(h) => println!(
            "Version {}, resolution {}, {} instruments",
            h.version, h.resolution, h.instrument_count
        ),
        None => println!("No header chunk"),
    }
    println!("{:<6} {:>10} {:>10}", "Tag", "Offset", "Length");
    for chunk in &info.chunks {
        println!(
            "{:<6} {:>10} {:>10}",
            chunk.tag.to_string(),
            chunk.offset,
            chunk.length
        );
    }
    Ok(())
}
