#![deny(missing_docs)]

//! # prr-core — Foundational Types for the PRR Network
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies and uses only `serde` and
//! `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for keys.** [`ClientId`], [`TerminalId`] and
//!    [`CommunicationId`] are distinct types. You cannot look up a terminal
//!    with a client key.
//!
//! 2. **One closed error taxonomy.** [`NetworkError`] lists every way a
//!    network operation can be rejected. All of them are recoverable by the
//!    caller with corrected input.
//!
//! 3. **One ledger shape.** [`Ledger`] is used by terminals and by client
//!    tiers alike, so a delta always means the same thing on both sides.
//!
//! 4. **Explicit thresholds.** Tier promotion thresholds live in
//!    [`NetworkConfig`], never as literals scattered through the state
//!    machines.

pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{ConfigError, NetworkConfig, PromotionThresholds, DEFAULT_PLATINUM_THRESHOLD};
pub use error::{InvalidCommunicationReason, InvalidFriendReason, NetworkError, ValidationError};
pub use identity::{ClientId, CommunicationId, TaxId, TerminalId};
pub use ledger::Ledger;
