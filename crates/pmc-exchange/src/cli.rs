//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pmc_exchange_core::{DEFAULT_CONFIG_FILE, QueryMode};

/// Emit unread and flagged Exchange messages as newline-delimited JSON.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Display details of what the program is doing.
    #[arg(short, long)]
    pub verbose: bool,

    /// Specify the configuration file to use.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Which messages to emit.
    #[arg(short, long, value_enum, default_value_t = Query::All)]
    pub query: Query,
}

/// Query selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Query {
    /// Unread messages in the Inbox and its subfolders.
    Unread,
    /// Flagged messages in any folder except Junk.
    Flagged,
    /// Both, each message at most once.
    All,
}

impl From<Query> for QueryMode {
    fn from(query: Query) -> Self {
        match query {
            Query::Unread => Self::Unread,
            Query::Flagged => Self::Flagged,
            Query::All => Self::All,
        }
    }
}
