//! # Pricing Dimensions
//!
//! The two closed enums that index every tariff plan.

use serde::{Deserialize, Serialize};

/// A client's billing tier. Declaration order is promotion order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TierKind {
    /// Entry tier.
    Normal,
    /// Reached from Normal.
    Gold,
    /// Reached from Gold; the highest tier.
    Platinum,
}

impl TierKind {
    /// All tiers in promotion order.
    pub const ALL: [TierKind; 3] = [Self::Normal, Self::Gold, Self::Platinum];

    /// The tier a promotion leads to, if any.
    pub fn next(&self) -> Option<TierKind> {
        match self {
            Self::Normal => Some(Self::Gold),
            Self::Gold => Some(Self::Platinum),
            Self::Platinum => None,
        }
    }

    /// Row index in a rate matrix.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
        }
    }
}

impl std::fmt::Display for TierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of a communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommunicationKind {
    /// Single-shot text message, priced by character count.
    Text,
    /// Interactive voice call, priced by duration.
    Voice,
    /// Interactive video call, priced by duration.
    Video,
}

impl CommunicationKind {
    /// All kinds in matrix column order.
    pub const ALL: [CommunicationKind; 3] = [Self::Text, Self::Voice, Self::Video];

    /// Column index in a rate matrix.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether the communication has an ongoing phase and an explicit end.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Voice | Self::Video)
    }

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Voice => "VOICE",
            Self::Video => "VIDEO",
        }
    }
}

impl std::fmt::Display for CommunicationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
