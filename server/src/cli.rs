//! # CLI Interface
//!
//! Defines the command-line argument structure for `kudi-server` using
//! `clap` derive. Supports three subcommands: `run`, `init`, and `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use kudi_ledger::config::{DEFAULT_METRICS_PORT, DEFAULT_RPC_PORT};

/// Kudi wallet ledger server.
///
/// Serves the wallet ledger over HTTP: account creation, deposits, peer
/// transfers, and wallet reads, with Prometheus metrics on a separate port.
#[derive(Parser, Debug)]
#[command(
    name = "kudi-server",
    about = "Kudi wallet ledger server",
    version,
    propagate_version = true
)]
pub struct KudiServerCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the Kudi server binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the ledger server.
    Run(RunArgs),
    /// Initialize a new data directory and create the ledger database.
    Init(InitArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the data directory where the ledger database is stored.
    ///
    /// Created on first run if it does not exist.
    #[arg(long, short = 'd', env = "KUDI_DATA_DIR", default_value = "~/.kudi")]
    pub data_dir: PathBuf,

    /// Port for the HTTP API.
    #[arg(long, env = "KUDI_RPC_PORT", default_value_t = DEFAULT_RPC_PORT)]
    pub rpc_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "KUDI_METRICS_PORT", default_value_t = DEFAULT_METRICS_PORT)]
    pub metrics_port: u16,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "KUDI_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `init` subcommand.
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Path to the data directory to initialize.
    #[arg(long, short = 'd', env = "KUDI_DATA_DIR", default_value = "~/.kudi")]
    pub data_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        KudiServerCli::command().debug_assert();
    }

    #[test]
    fn run_defaults_match_config() {
        let cli = KudiServerCli::parse_from(["kudi-server", "run"]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.rpc_port, DEFAULT_RPC_PORT);
                assert_eq!(args.metrics_port, DEFAULT_METRICS_PORT);
                assert_eq!(args.log_format, "pretty");
            }
            other => panic!("expected Run, got {other:?}"),
        }
    }
}
