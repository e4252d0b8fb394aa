//! `pmc-exchange` - Exchange extraction agent
//!
//! Connects to an Exchange mailbox, finds unread and flagged messages, and
//! writes each as one line of JSON to standard output.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Args;
use pmc_exchange_core::{Config, QueryMode};

/// Exit status for command-line errors.
const EXIT_USAGE: u8 = 1;

/// Exit status for failures after the arguments were accepted.
const EXIT_RUNTIME: u8 = 2;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version come through here too.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(EXIT_RUNTIME)
        }
    }
}

/// Logs go to stderr; stdout carries only records.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "pmc_exchange=debug,pmc_exchange_core=debug,pmc_exchange_ews=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn run(args: &Args) -> anyhow::Result<()> {
    let config = Config::load(&args.config)?;
    let mode = QueryMode::from(args.query);
    info!(config = %args.config.display(), ?mode, "Starting pmc-exchange");

    let service = pmc_exchange_core::connect(&config)
        .await
        .with_context(|| format!("cannot connect to the mailbox of {}", config.email))?;

    let stdout = std::io::stdout().lock();
    pmc_exchange_core::run(&service, mode, stdout)
        .await
        .context("extraction failed")?;
    Ok(())
}
