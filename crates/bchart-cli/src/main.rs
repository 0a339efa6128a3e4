mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "bchart=warn,bchart_core=warn";
const VERBOSE_FILTER: &str = "bchart=info,bchart_core=info";

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins, then --log / BCHART_LOG, then --verbose
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match (&args.log, args.verbose) {
            (Some(directive), _) => EnvFilter::new(directive),
            (None, true) => EnvFilter::new(VERBOSE_FILTER),
            (None, false) => EnvFilter::new(DEFAULT_FILTER),
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Info { file, json } => commands::info::run(&file, json),
        Command::Dump { file, output } => commands::dump::run(&file, output.as_deref()),
        Command::Pack { input, output } => commands::pack::run(&input, &output),
        Command::Verify { file } => commands::verify::run(&file),
    }
}
