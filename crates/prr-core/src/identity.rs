//! # Identity Newtypes
//!
//! Key newtypes for the entities held by a network. Each key is a distinct
//! type. You cannot pass a [`ClientId`] where a [`TerminalId`] is expected.
//!
//! ## Validation
//!
//! - [`TerminalId`] is exactly six ASCII digits.
//! - [`ClientId`] is any non-empty string without the `|` field separator.
//! - [`CommunicationId`] is assigned by the network and is always valid.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of digits in a terminal key.
pub const TERMINAL_KEY_LENGTH: usize = 6;

// ---------------------------------------------------------------------------
// Client keys
// ---------------------------------------------------------------------------

/// Key of a registered client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Create a client key, rejecting empty keys and keys containing `|`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidClientKey`] on a malformed key.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() || s.contains('|') {
            return Err(ValidationError::InvalidClientKey(s));
        }
        Ok(Self(s))
    }

    /// Access the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientId> for String {
    fn from(id: ClientId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Terminal keys
// ---------------------------------------------------------------------------

/// Key of a registered terminal: exactly six ASCII digits.
///
/// Ordering is lexicographic, which for fixed-width digit strings is also
/// numeric order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TerminalId(String);

impl TerminalId {
    /// Create a terminal key, validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTerminalKey`] if the key is not
    /// exactly six ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.len() != TERMINAL_KEY_LENGTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidTerminalKey(s));
        }
        Ok(Self(s))
    }

    /// Access the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TerminalId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TerminalId> for String {
    fn from(id: TerminalId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TerminalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Network-assigned keys
// ---------------------------------------------------------------------------

/// Key of a communication, assigned monotonically by the network starting
/// at 1.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CommunicationId(u32);

impl CommunicationId {
    /// The first id handed out by a fresh network.
    pub const FIRST: CommunicationId = CommunicationId(1);

    /// Wrap a raw id.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// The raw numeric id.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for CommunicationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A client's tax identification number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(pub u32);

impl std::fmt::Display for TaxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_key_accepts_six_digits() {
        let id = TerminalId::new("123456").unwrap();
        assert_eq!(id.as_str(), "123456");
        assert_eq!(id.to_string(), "123456");
    }

    #[test]
    fn terminal_key_rejects_wrong_length() {
        assert!(TerminalId::new("12345").is_err());
        assert!(TerminalId::new("1234567").is_err());
        assert!(TerminalId::new("").is_err());
    }

    #[test]
    fn terminal_key_rejects_non_digits() {
        let err = TerminalId::new("12a456").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTerminalKey(ref k) if k == "12a456"));
        // Six bytes but not six digits.
        assert!(TerminalId::new("١٢٣").is_err());
    }

    #[test]
    fn terminal_keys_order_numerically() {
        let a = TerminalId::new("000010").unwrap();
        let b = TerminalId::new("000100").unwrap();
        assert!(a < b);
    }

    #[test]
    fn client_key_rejects_empty_and_separator() {
        assert!(ClientId::new("").is_err());
        assert!(ClientId::new("   ").is_err());
        assert!(ClientId::new("a|b").is_err());
        assert_eq!(ClientId::new("alice").unwrap().as_str(), "alice");
    }

    #[test]
    fn communication_ids_advance() {
        let first = CommunicationId::FIRST;
        assert_eq!(first.value(), 1);
        assert_eq!(first.next().value(), 2);
        assert!(first < first.next());
    }

    #[test]
    fn terminal_key_deserialization_validates() {
        let ok: TerminalId = serde_json::from_str("\"654321\"").unwrap();
        assert_eq!(ok.as_str(), "654321");
        let bad: Result<TerminalId, _> = serde_json::from_str("\"65a321\"");
        assert!(bad.is_err());
    }

    #[test]
    fn client_key_serializes_as_plain_string() {
        let id = ClientId::new("bob").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"bob\"");
    }
}
