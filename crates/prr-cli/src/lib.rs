//! # prr-cli — Command Line for the PRR Network
//!
//! Provides the `prr` command-line interface over a network persisted as a
//! JSON snapshot. Every invocation loads the snapshot, runs one subcommand
//! and writes the snapshot back if the network changed.
//!
//! ## Subcommands
//!
//! - `prr client` — Client registration, notifications and accounts.
//! - `prr terminal` — Terminal registration, communications, payments,
//!   friends and status.
//! - `prr lookup` — Listings and network-wide totals.
//! - `prr import` — Populate the network from a pipe-separated text file.
//! - `prr save-as` — Write the snapshot to another path.
//!
//! ```bash
//! prr client register --id ana --name "Ana Lima" --tax-id 123456789
//! prr terminal register --type FANCY --id 111111 --owner ana
//! prr terminal voice 111111 222222
//! prr terminal end 111111 3
//! prr lookup clients-with-debts
//! ```
//!
//! Exit code 0 is success, 1 is an error or a request that had no effect.

pub mod client;
pub mod import;
pub mod lookup;
pub mod store;
pub mod terminal;
