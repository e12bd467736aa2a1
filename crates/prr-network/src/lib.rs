//! # prr-network — The Network Registry
//!
//! Clients, terminals and the [`Network`] that owns them. The registry is
//! the single mutation entry point and orchestrates the state machines of
//! `prr-state` across entities:
//!
//! - **Origination** checks the sender can start, resolves the receiver,
//!   runs the receiver's reception guard and only then creates the
//!   communication. A guard that blocks or defers delivery queues the
//!   sender's owner on the receiver.
//! - **Calls** make both endpoints `Busy`. Only the sender ends a call;
//!   both endpoints return to `Idle` and flush their queues.
//! - **Ledgers** of a terminal and its owner move in lockstep. Payments
//!   trigger the owner's promotion check.
//!
//! ## Modules
//!
//! - `client.rs`, `terminal.rs`: the entities.
//! - `network.rs`: registration and every mutating operation.
//! - `query.rs`: read-only lookups.
//! - `render.rs`: one-line reports for each entity.
//! - `snapshot.rs`: the versioned, id-based snapshot schema.
//!
//! ## Concurrency
//!
//! [`Network`] is plain data with `&mut self` operations and no internal
//! locking. Embedders that share it must serialize mutating calls.

pub mod client;
pub mod network;
mod query;
pub mod render;
pub mod snapshot;
pub mod terminal;

pub use client::Client;
pub use network::Network;
pub use render::Report;
pub use snapshot::{NetworkSnapshot, SnapshotError, SNAPSHOT_VERSION};
pub use terminal::{Terminal, TerminalKind};
