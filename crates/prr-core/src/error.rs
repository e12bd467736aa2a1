//! # Error Hierarchy
//!
//! Structured error types for the PRR network, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! [`NetworkError`] is closed: every public network operation documents
//! which of its variants it can return, and all of them are recoverable by
//! retrying with corrected input. The only operations that succeed without
//! effect instead of failing are ending a call the terminal did not
//! originate and originating from a terminal that cannot start one.

use thiserror::Error;

use crate::identity::{ClientId, CommunicationId, TerminalId};

/// Every way a network operation can be rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// No client is registered under the key.
    #[error("unknown client key: {0}")]
    UnknownClientKey(String),

    /// No terminal is registered under the key.
    #[error("unknown terminal key: {0}")]
    UnknownTerminalKey(String),

    /// The communication cannot take part in the requested operation.
    #[error("invalid communication: {0}")]
    InvalidCommunication(InvalidCommunicationReason),

    /// A client is already registered under the key.
    #[error("duplicate client key: {0}")]
    DuplicateClientKey(ClientId),

    /// A terminal is already registered under the key.
    #[error("duplicate terminal key: {0}")]
    DuplicateTerminalKey(TerminalId),

    /// A key failed format validation.
    #[error(transparent)]
    InvalidKey(#[from] ValidationError),

    /// The terminal type literal is not one the network supports.
    #[error("unknown terminal type: {0}")]
    UnknownTerminalType(String),

    /// The friend list cannot be changed as requested.
    #[error("invalid friend {friend} for terminal {terminal}: {reason}")]
    InvalidFriend {
        /// Terminal whose friend list was being changed.
        terminal: TerminalId,
        /// The would-be (or former) friend.
        friend: TerminalId,
        /// Why the change was rejected.
        reason: InvalidFriendReason,
    },

    /// The requested status is the current one, or the literal is unknown.
    #[error("illegal status transition for terminal {terminal}: {from} -> {to}")]
    IllegalStatusTransition {
        /// The terminal.
        terminal: TerminalId,
        /// Current status name.
        from: String,
        /// Requested status name or literal.
        to: String,
    },

    /// The terminal is off.
    #[error("terminal {0} is off")]
    UnreachableOffTerminal(TerminalId),

    /// The terminal is in an interactive communication.
    #[error("terminal {0} is busy")]
    UnreachableBusyTerminal(TerminalId),

    /// The terminal is silenced and only accepts text.
    #[error("terminal {0} is silent")]
    UnreachableSilentTerminal(TerminalId),

    /// The originating terminal does not support the communication type.
    #[error("terminal {terminal} cannot originate {communication} communications")]
    UnsupportedCommunicationAtOrigin {
        /// The originating terminal.
        terminal: TerminalId,
        /// The communication type name.
        communication: &'static str,
    },

    /// The destination terminal does not support the communication type.
    #[error("terminal {terminal} cannot receive {communication} communications")]
    UnsupportedCommunicationAtDestination {
        /// The destination terminal.
        terminal: TerminalId,
        /// The communication type name.
        communication: &'static str,
    },
}

impl NetworkError {
    /// Whether the error reports an unreachable destination.
    ///
    /// Rejections of this kind leave the sender's owner queued for a
    /// notification on the destination terminal.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::UnreachableOffTerminal(_)
                | Self::UnreachableBusyTerminal(_)
                | Self::UnreachableSilentTerminal(_)
        )
    }
}

/// Why a communication was rejected by an operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidCommunicationReason {
    /// No communication has the id.
    #[error("no communication with id {0}")]
    UnknownId(CommunicationId),

    /// The acting terminal did not originate the communication.
    #[error("communication {0} was not originated by this terminal")]
    NotSender(CommunicationId),

    /// The communication is still in progress.
    #[error("communication {0} is still ongoing")]
    Ongoing(CommunicationId),

    /// The communication has already been paid.
    #[error("communication {0} is already paid")]
    AlreadyPaid(CommunicationId),

    /// Text communications are charged when sent and are never paid.
    #[error("communication {0} is a text, charged when sent")]
    PrepaidText(CommunicationId),

    /// An interactive call was addressed to the calling terminal.
    #[error("a terminal cannot call itself")]
    SelfTargeted,

    /// The terminal has no ongoing interactive communication.
    #[error("no ongoing communication")]
    NoneOngoing,
}

/// Why a friend list change was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidFriendReason {
    /// A terminal cannot befriend itself.
    #[error("a terminal cannot be its own friend")]
    SelfReference,

    /// The terminal is already a friend.
    #[error("already a friend")]
    AlreadyFriend,

    /// The terminal is not a friend.
    #[error("not a friend")]
    NotFriend,
}

/// Validation errors for key newtypes.
///
/// Each error carries the rejected input so that the caller can report it
/// back verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Terminal key is not exactly six digits.
    #[error("invalid terminal key: \"{0}\" (expected 6 digits)")]
    InvalidTerminalKey(String),

    /// Client key is empty or contains the `|` separator.
    #[error("invalid client key: \"{0}\" (expected non-empty text without '|')")]
    InvalidClientKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(s: &str) -> TerminalId {
        TerminalId::new(s).unwrap()
    }

    #[test]
    fn unreachable_variants_are_flagged() {
        assert!(NetworkError::UnreachableOffTerminal(tid("100000")).is_unreachable());
        assert!(NetworkError::UnreachableBusyTerminal(tid("100000")).is_unreachable());
        assert!(NetworkError::UnreachableSilentTerminal(tid("100000")).is_unreachable());
        assert!(!NetworkError::UnknownTerminalKey("x".into()).is_unreachable());
    }

    #[test]
    fn validation_error_converts_into_network_error() {
        let err: NetworkError = ValidationError::InvalidTerminalKey("12".into()).into();
        assert!(matches!(err, NetworkError::InvalidKey(_)));
        assert!(format!("{err}").contains("6 digits"));
    }

    #[test]
    fn invalid_friend_display_names_both_terminals() {
        let err = NetworkError::InvalidFriend {
            terminal: tid("111111"),
            friend: tid("222222"),
            reason: InvalidFriendReason::AlreadyFriend,
        };
        let msg = format!("{err}");
        assert!(msg.contains("111111"));
        assert!(msg.contains("222222"));
        assert!(msg.contains("already a friend"));
    }

    #[test]
    fn invalid_communication_display_carries_id() {
        let err = NetworkError::InvalidCommunication(InvalidCommunicationReason::AlreadyPaid(
            CommunicationId::new(7),
        ));
        assert!(format!("{err}").contains('7'));
    }

    #[test]
    fn illegal_status_transition_display() {
        let err = NetworkError::IllegalStatusTransition {
            terminal: tid("123123"),
            from: "IDLE".into(),
            to: "IDLE".into(),
        };
        assert!(format!("{err}").contains("IDLE -> IDLE"));
    }
}
