//! Binary crate for the `metego` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Printing the forecast and relaying it to Pushover

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

mod app;
mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.debug);

    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// `--debug` only raises our own crates; dependencies stay at `warn` unless
/// `RUST_LOG` says otherwise.
fn env_filter(debug: bool) -> EnvFilter {
    let level = if debug { "debug" } else { "info" };
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    for target in ["metego", "metego_core"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}
