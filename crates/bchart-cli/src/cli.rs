//! CLI argument definitions for bchart.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bchart")]
#[command(about = "BChart chart cache inspector and converter", version)]
pub struct Args {
    /// Log at info level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log filter directive (overridden by RUST_LOG)
    #[arg(long, env = "BCHART_LOG", global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show header fields and the chunk list
    Info {
        /// BChart file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Decode a BChart file to JSON
    Dump {
        /// BChart file
        file: PathBuf,
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Encode a JSON song into a BChart file
    Pack {
        /// JSON song produced by `dump`
        input: PathBuf,
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Check that a file survives decode, encode and decode unchanged
    Verify {
        /// BChart file
        file: PathBuf,
    },
}
