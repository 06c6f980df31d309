use std::path::PathBuf;

use clap::Parser;

/// Wayfinder: a conversational travel assistant for weather and sightseeing.
#[derive(Parser, Debug)]
#[command(name = "wayfinder", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive override (e.g. `debug`, `wayfinder=trace`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Engine credential. Takes precedence over the configured env var.
    #[arg(long)]
    pub token: Option<String>,

    /// Answer a single question and exit instead of starting the REPL.
    #[arg(long, value_name = "QUESTION")]
    pub once: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
