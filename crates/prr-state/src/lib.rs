//! # prr-state — Network State Machines
//!
//! The state machines of the network, each an enum stored directly
//! on its owning entity. Operations take whatever context they need (the
//! terminal key for error reporting, a pricing closure) as explicit
//! arguments; no state object points back at its owner.
//!
//! ## State Machines
//!
//! - **Status** (`status.rs`): terminal reachability.
//!   `Idle ⇄ Off ⇄ Silent` under owner control, `Idle → Busy → Idle` under
//!   call control. An owner cannot interrupt `Busy`.
//!
//! - **Tier** (`tier.rs`): client billing level.
//!   `Normal → Gold → Platinum`, checked after completed payments, never
//!   demoted. Carries the client ledger, consecutive-communication
//!   counters and the tariff plan.
//!
//! - **Communication** (`communication.rs`): text is priced and charged at
//!   creation; voice and video are `ongoing → finished (priced) → paid`.
//!
//! - **Notification** (`notification.rs`): what a client is told when a
//!   terminal it tried to reach recovers, and how it is told.

pub mod communication;
pub mod notification;
pub mod status;
pub mod tier;

pub use communication::{Communication, Payload};
pub use notification::{DeliveryMethod, Inbox, Notification, NotificationKind};
pub use status::{Reception, StatusChange, TerminalStatus};
pub use tier::Tier;
