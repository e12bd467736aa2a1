//! # Text Import
//!
//! Populates a network from a pipe-separated text file, one entity per
//! line:
//!
//! ```text
//! CLIENT|id|name|taxId
//! BASIC|id|owner|status
//! FANCY|id|owner|status
//! FRIENDS|id|friend1,friend2,...
//! ```
//!
//! Blank lines are skipped. The first malformed or rejected line stops the
//! import with its line number; lines before it stay applied.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use prr_core::TaxId;
use prr_network::Network;

/// Arguments for the `prr import` subcommand.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Text file to import.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// One parsed import line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<'a> {
    /// `CLIENT|id|name|taxId`
    Client {
        /// Client key.
        id: &'a str,
        /// Display name.
        name: &'a str,
        /// Tax number.
        tax_id: u32,
    },
    /// `BASIC|...` or `FANCY|...`
    Terminal {
        /// Type literal.
        kind: &'a str,
        /// Terminal key.
        id: &'a str,
        /// Owning client key.
        owner: &'a str,
        /// Status literal.
        status: &'a str,
    },
    /// `FRIENDS|id|friend1,friend2,...`
    Friends {
        /// Terminal key.
        id: &'a str,
        /// Friend keys.
        friends: Vec<&'a str>,
    },
}

/// Parse one non-blank line.
pub fn parse_line(line: &str) -> Result<Entry<'_>> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    match fields[..] {
        ["CLIENT", id, name, tax_id] => Ok(Entry::Client {
            id,
            name,
            tax_id: tax_id
                .parse()
                .with_context(|| format!("invalid tax id: {tax_id}"))?,
        }),
        [kind @ ("BASIC" | "FANCY"), id, owner, status] => Ok(Entry::Terminal {
            kind,
            id,
            owner,
            status,
        }),
        ["FRIENDS", id, friends] => Ok(Entry::Friends {
            id,
            friends: friends
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .collect(),
        }),
        ["FRIENDS", id] => Ok(Entry::Friends {
            id,
            friends: Vec::new(),
        }),
        _ => bail!("unrecognised entry: {line}"),
    }
}

/// Apply one entry to the network.
pub fn apply(network: &mut Network, entry: &Entry<'_>) -> Result<()> {
    match entry {
        Entry::Client { id, name, tax_id } => {
            network.register_client(id, name, TaxId(*tax_id))?;
        }
        Entry::Terminal {
            kind,
            id,
            owner,
            status,
        } => {
            network.register_terminal(kind, id, owner)?;
            network.set_status(id, status)?;
        }
        Entry::Friends { id, friends } => {
            for friend in friends {
                network.add_friend(id, friend)?;
            }
        }
    }
    Ok(())
}

/// Import every line of `text`. Returns the number of entries applied.
pub fn import_str(network: &mut Network, text: &str) -> Result<usize> {
    let mut applied = 0;
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let number = index + 1;
        let entry = parse_line(line).with_context(|| format!("line {number}"))?;
        apply(network, &entry).with_context(|| format!("line {number}"))?;
        applied += 1;
    }
    Ok(applied)
}

/// Execute the import subcommand.
pub fn run_import(args: &ImportArgs, network: &mut Network) -> Result<u8> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read import file: {}", args.file.display()))?;
    let applied = import_str(network, &text)?;
    tracing::info!(file = %args.file.display(), entries = applied, "import finished");
    println!("OK: imported {applied} entries");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prr_state::TerminalStatus;

    const SAMPLE: &str = "\
CLIENT|ana|Ana Lima|123456789
CLIENT|rui|Rui Sousa|987654321

BASIC|111111|ana|ON
FANCY|222222|rui|SILENCE
FANCY|333333|rui|OFF
FRIENDS|111111|222222,333333
";

    #[test]
    fn parses_each_entry_kind() {
        assert_eq!(
            parse_line("CLIENT|ana|Ana|12").unwrap(),
            Entry::Client {
                id: "ana",
                name: "Ana",
                tax_id: 12
            }
        );
        assert!(matches!(
            parse_line("FANCY|222222|rui|OFF").unwrap(),
            Entry::Terminal { kind: "FANCY", .. }
        ));
        assert_eq!(
            parse_line("FRIENDS|111111|222222, 333333").unwrap(),
            Entry::Friends {
                id: "111111",
                friends: vec!["222222", "333333"]
            }
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_line("CLIENT|ana|Ana").is_err());
        assert!(parse_line("CLIENT|ana|Ana|twelve").is_err());
        assert!(parse_line("SMART|111111|ana|ON").is_err());
    }

    #[test]
    fn imports_sample() {
        let mut net = Network::default();
        assert_eq!(import_str(&mut net, SAMPLE).unwrap(), 6);
        assert_eq!(net.terminal("111111").unwrap().status(), TerminalStatus::Idle);
        assert_eq!(net.terminal("222222").unwrap().status(), TerminalStatus::Silent);
        assert_eq!(net.terminal("333333").unwrap().status(), TerminalStatus::Off);
        assert_eq!(net.terminal("111111").unwrap().friends().len(), 2);
        assert_eq!(net.client("rui").unwrap().terminals().len(), 2);
    }

    #[test]
    fn error_names_the_line() {
        let mut net = Network::default();
        let err = import_str(&mut net, "CLIENT|ana|Ana|1\n\nBASIC|111111|zed|ON\n").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.starts_with("line 3"), "{message}");
        assert!(message.contains("unknown client key"), "{message}");
        assert!(net.client("ana").is_ok());
    }

    #[test]
    fn import_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.txt");
        std::fs::write(&path, SAMPLE).unwrap();
        let mut net = Network::default();
        let code = run_import(&ImportArgs { file: path }, &mut net).unwrap();
        assert_eq!(code, 0);
        assert_eq!(net.terminals().count(), 3);
    }
}
