//! # prr CLI entry point
//!
//! Parses command-line arguments, loads the network snapshot and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prr_cli::client::{run_client, ClientArgs};
use prr_cli::import::{run_import, ImportArgs};
use prr_cli::lookup::{run_lookup, LookupArgs};
use prr_cli::store::Store;
use prr_cli::terminal::{run_terminal, TerminalArgs};
use prr_core::NetworkConfig;

/// PRR network CLI.
///
/// Registers clients and terminals, places texts, voice and video calls,
/// takes payments and answers lookups over a persisted network.
#[derive(Parser, Debug)]
#[command(name = "prr", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Network snapshot file.
    #[arg(long, global = true, env = "PRR_STATE", default_value = "network.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Client registration, notifications and accounts.
    Client(ClientArgs),

    /// Terminal registration, communications, payments, friends and status.
    Terminal(TerminalArgs),

    /// Listings and network-wide totals.
    Lookup(LookupArgs),

    /// Populate the network from a text file.
    Import(ImportArgs),

    /// Write the snapshot to another path.
    SaveAs {
        /// Destination file.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = NetworkConfig::from_env().context("invalid network configuration")?;
    let mut store = Store::new(cli.state, config);
    tracing::debug!(state = %store.path().display(), "prr CLI starting");
    let mut network = store.load()?;

    // Failed commands may have applied part of their work (imports stop at
    // the first bad line), so the snapshot is written either way.
    let result = match cli.command {
        Commands::Client(args) => run_client(&args, &mut network),
        Commands::Terminal(args) => run_terminal(&args, &mut network),
        Commands::Lookup(args) => run_lookup(&args, &network),
        Commands::Import(args) => run_import(&args, &mut network),
        Commands::SaveAs { path } => {
            store.save_as(&mut network, &path)?;
            println!("OK: saved to {}", path.display());
            Ok(0)
        }
    };
    store.save(&mut network)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_terminal_register() {
        let cli = Cli::try_parse_from([
            "prr", "terminal", "register", "--type", "BASIC", "--id", "111111", "--owner", "ana",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Terminal(_)));
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "prr", "lookup", "clients", "-vv", "--state", "/tmp/net.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.state, PathBuf::from("/tmp/net.json"));
    }

    #[test]
    fn cli_parse_delivery_value() {
        assert!(Cli::try_parse_from(["prr", "client", "delivery", "ana", "trace"]).is_ok());
        assert!(Cli::try_parse_from(["prr", "client", "delivery", "ana", "pigeon"]).is_err());
    }

    #[test]
    fn cli_rejects_missing_subcommand() {
        assert!(Cli::try_parse_from(["prr"]).is_err());
    }

    #[test]
    fn run_persists_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("net.json");
        let state = state.to_str().unwrap();
        let invoke = |args: &[&str]| {
            let mut argv = vec!["prr", "--state", state];
            argv.extend_from_slice(args);
            run(Cli::try_parse_from(argv).unwrap())
        };

        assert_eq!(invoke(&["client", "register", "--id", "ana", "--name", "Ana", "--tax-id", "1"]).unwrap(), 0);
        assert_eq!(invoke(&["terminal", "register", "--type", "FANCY", "--id", "111111", "--owner", "ana"]).unwrap(), 0);
        assert_eq!(invoke(&["terminal", "register", "--type", "BASIC", "--id", "222222", "--owner", "ana"]).unwrap(), 0);
        assert_eq!(invoke(&["terminal", "sms", "111111", "222222", "hello"]).unwrap(), 0);

        let store = Store::new(dir.path().join("net.json"), NetworkConfig::default());
        let network = store.load().unwrap();
        assert_eq!(network.communications().count(), 1);
        assert_eq!(network.client("ana").unwrap().debts(), 10.0);
    }
}
