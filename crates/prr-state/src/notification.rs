//! # Deferred-Delivery Notifications
//!
//! When a terminal cannot fully serve a sender, the sender's owner is
//! queued on the terminal. When the terminal recovers, every queued client
//! receives one [`Notification`] naming the recovery, through its own
//! [`DeliveryMethod`].
//!
//! ## Recoveries
//!
//! | Transition      | Kind  |
//! |-----------------|-------|
//! | Off → Idle      | `O2I` |
//! | Off → Silent    | `O2S` |
//! | Busy → Idle     | `B2I` |
//! | Silent → Idle   | `S2I` |
//!
//! Every other transition leaves the queue untouched.

use serde::{Deserialize, Serialize};

use prr_core::{ClientId, TerminalId};

use crate::status::{StatusChange, TerminalStatus};

/// Which recovery a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// Off → Idle.
    OffToIdle,
    /// Off → Silent.
    OffToSilent,
    /// Busy → Idle.
    BusyToIdle,
    /// Silent → Idle.
    SilentToIdle,
}

impl NotificationKind {
    /// The notification a status change triggers, if it is a recovery.
    pub fn for_change(change: StatusChange) -> Option<Self> {
        use TerminalStatus::*;
        match (change.from, change.to) {
            (Off, Idle) => Some(Self::OffToIdle),
            (Off, Silent) => Some(Self::OffToSilent),
            (Busy, Idle) => Some(Self::BusyToIdle),
            (Silent, Idle) => Some(Self::SilentToIdle),
            _ => None,
        }
    }

    /// Short code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OffToIdle => "O2I",
            Self::OffToSilent => "O2S",
            Self::BusyToIdle => "B2I",
            Self::SilentToIdle => "S2I",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal recovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notification {
    /// The recovery.
    pub kind: NotificationKind,
    /// The terminal that recovered.
    pub terminal: TerminalId,
}

/// Insertion-ordered, deduplicated notification store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inbox(Vec<Notification>);

impl Inbox {
    /// Add a notification unless an equal one is already held. Returns
    /// whether it was added.
    pub fn push(&mut self, notification: Notification) -> bool {
        if self.0.contains(&notification) {
            return false;
        }
        self.0.push(notification);
        true
    }

    /// Take every held notification, oldest first.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.0)
    }

    /// Held notifications, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.0.iter()
    }

    /// Number of held notifications.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How a client receives notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMethod {
    /// Accumulate in the client's inbox until read.
    #[default]
    Inbox,
    /// Emit a tracing event; the inbox is left untouched.
    Trace,
}

impl DeliveryMethod {
    /// Deliver `notification` to `recipient`.
    pub fn deliver(&self, recipient: &ClientId, inbox: &mut Inbox, notification: Notification) {
        match self {
            Self::Inbox => {
                inbox.push(notification);
            }
            Self::Trace => {
                tracing::info!(
                    client = %recipient,
                    terminal = %notification.terminal,
                    kind = %notification.kind,
                    "notification delivered"
                );
            }
        }
    }
}
