// CLI module - command-line argument parsing
//
// The command line is the whole configuration surface: the dataset path,
// a verbosity toggle, and which front end to start.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8050";

/// Sentiment Dashboard - charts over a pre-processed tweet dataset
#[derive(Debug, Parser)]
#[command(name = "sentiment-dashboard")]
#[command(version)]
#[command(about = "Sentiment analysis dashboard for tweet datasets", long_about = None)]
pub struct Cli {
    /// Dataset to load (.csv, .json or .parquet)
    pub data: Option<PathBuf>,

    /// Verbose (debug-level) logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the dashboard over HTTP (default)
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_BIND_ADDR)]
        bind: SocketAddr,
    },
    /// Open the dashboard in a native window
    View,
}

impl Cli {
    /// The selected front end, defaulting to the web server.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            bind: default_bind_addr(),
        })
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8050))
}
