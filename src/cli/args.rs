//! CLI argument definitions using clap
//!
//! Commands:
//! - agroledger init --config <path>
//! - agroledger serve --config <path>
//! - agroledger exec --config <path>
//! - agroledger inspect --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AgroLedger - an agricultural production record registry
#[derive(Parser, Debug)]
#[command(name = "agroledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and an empty ledger snapshot
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./agroledger.json")]
        config: PathBuf,
    },

    /// Load the ledger and process requests from stdin until EOF
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./agroledger.json")]
        config: PathBuf,
    },

    /// Execute a single request from stdin and exit
    Exec {
        /// Path to configuration file
        #[arg(long, default_value = "./agroledger.json")]
        config: PathBuf,
    },

    /// Print ledger statistics and exit
    Inspect {
        /// Path to configuration file
        #[arg(long, default_value = "./agroledger.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
