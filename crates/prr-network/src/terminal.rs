//! # Terminals
//!
//! A terminal belongs to one client for its whole life. It keeps its own
//! ledger (moved in lockstep with the owner's), its status, the key of the
//! interactive communication it is part of, its communication history, an
//! ordered friend list and the queue of clients waiting to hear that it
//! recovered.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use prr_core::{
    ClientId, CommunicationId, InvalidFriendReason, Ledger, NetworkError, TerminalId,
};
use prr_state::TerminalStatus;

/// Terminal hardware type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalKind {
    /// Text and voice only.
    Basic,
    /// Text, voice and video.
    Fancy,
}

impl TerminalKind {
    /// Parse a type literal (`BASIC` or `FANCY`, case-insensitive).
    ///
    /// # Errors
    ///
    /// `UnknownTerminalType` for any other literal.
    pub fn from_literal(literal: &str) -> Result<Self, NetworkError> {
        match literal.trim().to_ascii_uppercase().as_str() {
            "BASIC" => Ok(Self::Basic),
            "FANCY" => Ok(Self::Fancy),
            _ => Err(NetworkError::UnknownTerminalType(literal.to_string())),
        }
    }

    /// Whether video calls can be made and received.
    pub fn supports_video(&self) -> bool {
        matches!(self, Self::Fancy)
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Fancy => "FANCY",
        }
    }
}

impl std::fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terminal {
    id: TerminalId,
    kind: TerminalKind,
    owner: ClientId,
    ledger: Ledger,
    status: TerminalStatus,
    ongoing: Option<CommunicationId>,
    communications: BTreeSet<CommunicationId>,
    friends: BTreeSet<TerminalId>,
    pending_notify: Vec<ClientId>,
}

impl Terminal {
    /// An idle terminal with an empty ledger.
    pub fn new(id: TerminalId, kind: TerminalKind, owner: ClientId) -> Self {
        Self {
            id,
            kind,
            owner,
            ledger: Ledger::default(),
            status: TerminalStatus::default(),
            ongoing: None,
            communications: BTreeSet::new(),
            friends: BTreeSet::new(),
            pending_notify: Vec::new(),
        }
    }

    /// Terminal key.
    pub fn id(&self) -> &TerminalId {
        &self.id
    }

    /// Hardware type.
    pub fn kind(&self) -> TerminalKind {
        self.kind
    }

    /// Owning client.
    pub fn owner(&self) -> &ClientId {
        &self.owner
    }

    /// The terminal's ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// `payments - debts` of this terminal.
    pub fn balance(&self) -> f64 {
        self.ledger.balance()
    }

    /// Current status.
    pub fn status(&self) -> TerminalStatus {
        self.status
    }

    /// The interactive communication in progress, if any.
    pub fn ongoing(&self) -> Option<CommunicationId> {
        self.ongoing
    }

    /// Every communication sent or received, ordered by key.
    pub fn communications(&self) -> &BTreeSet<CommunicationId> {
        &self.communications
    }

    /// Whether the terminal never took part in a communication.
    pub fn is_unused(&self) -> bool {
        self.communications.is_empty()
    }

    /// Friends, ordered by key.
    pub fn friends(&self) -> &BTreeSet<TerminalId> {
        &self.friends
    }

    /// Whether `other` is on this terminal's friend list.
    pub fn is_friend(&self, other: &TerminalId) -> bool {
        self.friends.contains(other)
    }

    /// Clients waiting for this terminal to recover.
    pub fn pending_notify(&self) -> &[ClientId] {
        &self.pending_notify
    }

    /// Whether a communication can be originated.
    pub fn can_start_communication(&self) -> bool {
        self.status.can_start_communication()
    }

    pub(crate) fn status_mut(&mut self) -> &mut TerminalStatus {
        &mut self.status
    }

    pub(crate) fn apply(&mut self, delta: f64) {
        self.ledger.apply(delta);
    }

    pub(crate) fn record(&mut self, communication: CommunicationId) {
        self.communications.insert(communication);
    }

    pub(crate) fn set_ongoing(&mut self, communication: Option<CommunicationId>) {
        self.ongoing = communication;
    }

    /// Queue `client` unless it is already waiting. Returns whether it was
    /// added.
    pub(crate) fn enqueue(&mut self, client: ClientId) -> bool {
        if self.pending_notify.contains(&client) {
            return false;
        }
        self.pending_notify.push(client);
        true
    }

    /// Empty the pending-notify queue, in queueing order.
    pub(crate) fn take_pending(&mut self) -> Vec<ClientId> {
        std::mem::take(&mut self.pending_notify)
    }

    pub(crate) fn add_friend(&mut self, friend: TerminalId) -> Result<(), NetworkError> {
        let reason = if friend == self.id {
            Some(InvalidFriendReason::SelfReference)
        } else if self.is_friend(&friend) {
            Some(InvalidFriendReason::AlreadyFriend)
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(self.invalid_friend(friend, reason));
        }
        self.friends.insert(friend);
        Ok(())
    }

    pub(crate) fn remove_friend(&mut self, friend: &TerminalId) -> Result<(), NetworkError> {
        if !self.friends.remove(friend) {
            return Err(self.invalid_friend(friend.clone(), InvalidFriendReason::NotFriend));
        }
        Ok(())
    }

    fn invalid_friend(&self, friend: TerminalId, reason: InvalidFriendReason) -> NetworkError {
        NetworkError::InvalidFriend {
            terminal: self.id.clone(),
            friend,
            reason,
        }
    }
}
