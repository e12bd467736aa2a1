//! # Terminal Status State Machine
//!
//! Reachability of a terminal.
//!
//! ## States
//!
//! ```text
//!   Idle ◀──▶ Off ◀──▶ Silent ◀──▶ Idle      (owner: set_on_idle,
//!    │                                         set_on_silent, turn_off)
//!    │ set_on_busy (call starts)
//!    ▼
//!   Busy ──un_busy (call ends)──▶ Idle
//! ```
//!
//! Owner-issued transitions (`set_on_idle`, `set_on_silent`, `turn_off`)
//! move freely among `Idle`, `Off` and `Silent`. They are rejected with
//! `UnreachableBusyTerminal` while `Busy`, and with
//! `IllegalStatusTransition` when the target is the current state.
//!
//! `Busy` is entered and left only by the call lifecycle.
//!
//! ## Reception
//!
//! | Status | Text                 | Voice / Video        |
//! |--------|----------------------|----------------------|
//! | Idle   | delivered            | accepted             |
//! | Silent | delivered, deferred  | `UnreachableSilent`  |
//! | Busy   | delivered, deferred  | `UnreachableBusy`    |
//! | Off    | `UnreachableOff`     | `UnreachableOff`     |

use serde::{Deserialize, Serialize};

use prr_core::{NetworkError, TerminalId};

/// Reachability of a terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalStatus {
    /// On and free. The only state a communication can start from.
    #[default]
    Idle,
    /// Switched off. Nothing is delivered.
    Off,
    /// On but silenced. Only text is delivered.
    Silent,
    /// In an interactive communication. Only text is delivered.
    Busy,
}

/// A status transition that happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Status before the transition.
    pub from: TerminalStatus,
    /// Status after the transition.
    pub to: TerminalStatus,
}

/// Outcome of a successful text reception check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reception {
    /// The terminal is fully reachable.
    Direct,
    /// Delivered while the terminal cannot take calls; the sender should be
    /// told once the terminal is free again.
    Deferred,
}

impl TerminalStatus {
    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Off => "OFF",
            Self::Silent => "SILENCE",
            Self::Busy => "BUSY",
        }
    }

    /// Map a status literal to an owner-settable status.
    ///
    /// Accepts `ON`/`IDLE`, `OFF` and `SILENCE`/`SILENT`, case-insensitive.
    ///
    /// # Errors
    ///
    /// `IllegalStatusTransition` for any other literal, `BUSY` included.
    pub fn from_literal(literal: &str, terminal: &TerminalId) -> Result<Self, NetworkError> {
        match literal.trim().to_ascii_uppercase().as_str() {
            "ON" | "IDLE" => Ok(Self::Idle),
            "OFF" => Ok(Self::Off),
            "SILENCE" | "SILENT" => Ok(Self::Silent),
            _ => Err(NetworkError::IllegalStatusTransition {
                terminal: terminal.clone(),
                from: String::new(),
                to: literal.to_string(),
            }),
        }
    }

    /// Whether a communication can be originated: only while `Idle`.
    pub fn can_start_communication(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Overwrite the status from a literal without the busy guard.
    ///
    /// Used when reconstructing terminals from imported data.
    pub fn set_literal(
        &mut self,
        literal: &str,
        terminal: &TerminalId,
    ) -> Result<StatusChange, NetworkError> {
        let to = Self::from_literal(literal, terminal).map_err(|_| {
            NetworkError::IllegalStatusTransition {
                terminal: terminal.clone(),
                from: self.as_str().to_string(),
                to: literal.to_string(),
            }
        })?;
        Ok(self.do_transition(to))
    }

    /// Owner turns the terminal on (→ `Idle`).
    pub fn set_on_idle(&mut self, terminal: &TerminalId) -> Result<StatusChange, NetworkError> {
        self.owner_transition(Self::Idle, terminal)
    }

    /// Owner silences the terminal (→ `Silent`).
    pub fn set_on_silent(&mut self, terminal: &TerminalId) -> Result<StatusChange, NetworkError> {
        self.owner_transition(Self::Silent, terminal)
    }

    /// Owner switches the terminal off (→ `Off`).
    pub fn turn_off(&mut self, terminal: &TerminalId) -> Result<StatusChange, NetworkError> {
        self.owner_transition(Self::Off, terminal)
    }

    /// A call starts on this terminal (`Idle` → `Busy`).
    ///
    /// # Errors
    ///
    /// The interactive reception error of the current status when not
    /// `Idle`.
    pub fn set_on_busy(&mut self, terminal: &TerminalId) -> Result<StatusChange, NetworkError> {
        self.assert_interactive_reception(terminal)?;
        Ok(self.do_transition(Self::Busy))
    }

    /// A call on this terminal ended (`Busy` → `Idle`). `None` if the
    /// terminal was not busy.
    pub fn un_busy(&mut self) -> Option<StatusChange> {
        match *self {
            Self::Busy => Some(self.do_transition(Self::Idle)),
            _ => None,
        }
    }

    /// Check whether a text can be delivered.
    ///
    /// # Errors
    ///
    /// `UnreachableOffTerminal` when `Off`.
    pub fn assert_text_reception(&self, terminal: &TerminalId) -> Result<Reception, NetworkError> {
        match self {
            Self::Idle => Ok(Reception::Direct),
            Self::Silent | Self::Busy => Ok(Reception::Deferred),
            Self::Off => Err(NetworkError::UnreachableOffTerminal(terminal.clone())),
        }
    }

    /// Check whether a voice or video call can be accepted.
    ///
    /// # Errors
    ///
    /// `UnreachableOffTerminal`, `UnreachableBusyTerminal` or
    /// `UnreachableSilentTerminal`, matching the status.
    pub fn assert_interactive_reception(&self, terminal: &TerminalId) -> Result<(), NetworkError> {
        match self {
            Self::Idle => Ok(()),
            Self::Off => Err(NetworkError::UnreachableOffTerminal(terminal.clone())),
            Self::Busy => Err(NetworkError::UnreachableBusyTerminal(terminal.clone())),
            Self::Silent => Err(NetworkError::UnreachableSilentTerminal(terminal.clone())),
        }
    }

    fn owner_transition(
        &mut self,
        to: TerminalStatus,
        terminal: &TerminalId,
    ) -> Result<StatusChange, NetworkError> {
        if *self == Self::Busy {
            return Err(NetworkError::UnreachableBusyTerminal(terminal.clone()));
        }
        if *self == to {
            return Err(NetworkError::IllegalStatusTransition {
                terminal: terminal.clone(),
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        Ok(self.do_transition(to))
    }

    fn do_transition(&mut self, to: TerminalStatus) -> StatusChange {
        let change = StatusChange { from: *self, to };
        *self = to;
        change
    }
}

impl std::fmt::Display for TerminalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
