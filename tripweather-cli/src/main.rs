//! Binary crate for the `tripweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Console output and the JSON endpoint

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

/// Logs go to stderr so stdout carries only the report.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn,tripweather=info,tripweather_core=info",
        1 => "warn,tripweather=debug,tripweather_core=debug",
        _ => "info,tripweather=trace,tripweather_core=trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
