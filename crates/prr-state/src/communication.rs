//! # Communication Lifecycle
//!
//! ## Text
//!
//! Single-shot. Priced at creation and charged to the sender's debts. A text
//! is never ongoing and is created with `paid` set, so a payment for it is
//! rejected.
//!
//! ## Voice / Video
//!
//! ```text
//! created (ongoing) ──finish(by sender)──▶ finished (priced, unpaid) ──pay──▶ paid
//! ```
//!
//! A communication is never both paid and ongoing, and its price is never
//! negative. Price, `paid` and `ongoing` are each set once.
//!
//! Pricing is supplied by the caller as a `quote` closure over
//! `(kind, units)`, so this module knows nothing about tiers or friendship.

use serde::{Deserialize, Serialize};

use prr_core::{CommunicationId, InvalidCommunicationReason, NetworkError, TerminalId};
use prr_tariff::CommunicationKind;

/// Kind-specific data of a communication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// A text message.
    Text {
        /// Message body.
        message: String,
    },
    /// A voice call; duration is known once it ends.
    Voice {
        /// Units the call lasted.
        duration: Option<u32>,
    },
    /// A video call; duration is known once it ends.
    Video {
        /// Units the call lasted.
        duration: Option<u32>,
    },
}

impl Payload {
    /// The communication kind.
    pub fn kind(&self) -> CommunicationKind {
        match self {
            Self::Text { .. } => CommunicationKind::Text,
            Self::Voice { .. } => CommunicationKind::Voice,
            Self::Video { .. } => CommunicationKind::Video,
        }
    }

    /// Priced units: characters for text, duration for calls (0 while
    /// ongoing).
    pub fn units(&self) -> u32 {
        match self {
            Self::Text { message } => text_units(message),
            Self::Voice { duration } | Self::Video { duration } => duration.unwrap_or(0),
        }
    }
}

fn text_units(message: &str) -> u32 {
    u32::try_from(message.chars().count()).unwrap_or(u32::MAX)
}

/// A communication between two terminals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    id: CommunicationId,
    sender: TerminalId,
    receiver: TerminalId,
    price: f64,
    paid: bool,
    ongoing: bool,
    payload: Payload,
}

impl Communication {
    /// A text message, priced with `quote` at creation and marked paid.
    pub fn text(
        id: CommunicationId,
        sender: TerminalId,
        receiver: TerminalId,
        message: String,
        quote: impl FnOnce(CommunicationKind, u32) -> f64,
    ) -> Self {
        let price = quote(CommunicationKind::Text, text_units(&message)).max(0.0);
        Self {
            id,
            sender,
            receiver,
            price,
            paid: true,
            ongoing: false,
            payload: Payload::Text { message },
        }
    }

    /// A voice call that has just started.
    pub fn voice(id: CommunicationId, sender: TerminalId, receiver: TerminalId) -> Self {
        Self::started(id, sender, receiver, Payload::Voice { duration: None })
    }

    /// A video call that has just started.
    pub fn video(id: CommunicationId, sender: TerminalId, receiver: TerminalId) -> Self {
        Self::started(id, sender, receiver, Payload::Video { duration: None })
    }

    fn started(
        id: CommunicationId,
        sender: TerminalId,
        receiver: TerminalId,
        payload: Payload,
    ) -> Self {
        Self {
            id,
            sender,
            receiver,
            price: 0.0,
            paid: false,
            ongoing: true,
            payload,
        }
    }

    /// Communication key.
    pub fn id(&self) -> CommunicationId {
        self.id
    }

    /// Originating terminal.
    pub fn sender(&self) -> &TerminalId {
        &self.sender
    }

    /// Destination terminal.
    pub fn receiver(&self) -> &TerminalId {
        &self.receiver
    }

    /// Price; 0 until an interactive call ends.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Whether the price has been settled.
    pub fn is_paid(&self) -> bool {
        self.paid
    }

    /// Whether an interactive call is still in progress.
    pub fn is_ongoing(&self) -> bool {
        self.ongoing
    }

    /// Kind-specific data.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The communication kind.
    pub fn kind(&self) -> CommunicationKind {
        self.payload.kind()
    }

    /// Priced units.
    pub fn units(&self) -> u32 {
        self.payload.units()
    }

    /// End an ongoing call on behalf of `by`, pricing it with `quote`.
    ///
    /// Returns the price, or `None` with nothing changed if `by` is not the
    /// sender or the call is not ongoing.
    pub fn finish(
        &mut self,
        by: &TerminalId,
        duration: u32,
        quote: impl FnOnce(CommunicationKind, u32) -> f64,
    ) -> Option<f64> {
        if !self.ongoing || *by != self.sender {
            return None;
        }
        match &mut self.payload {
            Payload::Voice { duration: d } | Payload::Video { duration: d } => *d = Some(duration),
            Payload::Text { .. } => return None,
        }
        self.ongoing = false;
        self.price = quote(self.payload.kind(), duration).max(0.0);
        Some(self.price)
    }

    /// Pay a finished call on behalf of `payer`. Returns the amount settled.
    ///
    /// # Errors
    ///
    /// `InvalidCommunication` if `payer` is not the sender, the
    /// communication is a text, or it is still ongoing or already paid.
    pub fn pay(&mut self, payer: &TerminalId) -> Result<f64, NetworkError> {
        let reason = if *payer != self.sender {
            Some(InvalidCommunicationReason::NotSender(self.id))
        } else if matches!(self.payload, Payload::Text { .. }) {
            Some(InvalidCommunicationReason::PrepaidText(self.id))
        } else if self.ongoing {
            Some(InvalidCommunicationReason::Ongoing(self.id))
        } else if self.paid {
            Some(InvalidCommunicationReason::AlreadyPaid(self.id))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(NetworkError::InvalidCommunication(reason));
        }
        self.paid = true;
        Ok(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(s: &str) -> TerminalId {
        TerminalId::new(s).unwrap()
    }

    fn flat(per_unit: f64) -> impl FnOnce(CommunicationKind, u32) -> f64 {
        move |_, units| per_unit * f64::from(units)
    }

    fn call() -> Communication {
        Communication::voice(CommunicationId::new(1), tid("111111"), tid("222222"))
    }

    // ── Text ─────────────────────────────────────────────────────────

    #[test]
    fn text_is_priced_and_paid_at_creation() {
        let c = Communication::text(
            CommunicationId::new(3),
            tid("111111"),
            tid("222222"),
            "hello".to_string(),
            flat(2.0),
        );
        assert_eq!(c.kind(), CommunicationKind::Text);
        assert_eq!(c.units(), 5);
        assert_eq!(c.price(), 10.0);
        assert!(c.is_paid());
        assert!(!c.is_ongoing());
    }

    #[test]
    fn text_units_count_characters_not_bytes() {
        let c = Communication::text(
            CommunicationId::new(1),
            tid("111111"),
            tid("222222"),
            "olá".to_string(),
            flat(1.0),
        );
        assert_eq!(c.units(), 3);
    }

    #[test]
    fn text_cannot_be_paid() {
        let mut c = Communication::text(
            CommunicationId::new(1),
            tid("111111"),
            tid("222222"),
            "x".to_string(),
            flat(1.0),
        );
        let err = c.pay(&tid("111111")).unwrap_err();
        assert_eq!(
            err,
            NetworkError::InvalidCommunication(InvalidCommunicationReason::PrepaidText(
                CommunicationId::new(1)
            ))
        );
    }

    #[test]
    fn negative_quote_is_clamped() {
        let c = Communication::text(
            CommunicationId::new(1),
            tid("111111"),
            tid("222222"),
            "x".to_string(),
            |_, _| -5.0,
        );
        assert_eq!(c.price(), 0.0);
    }

    // ── Interactive ──────────────────────────────────────────────────

    #[test]
    fn call_starts_ongoing_and_unpriced() {
        let c = call();
        assert!(c.is_ongoing());
        assert!(!c.is_paid());
        assert_eq!(c.price(), 0.0);
        assert_eq!(c.units(), 0);
    }

    #[test]
    fn sender_finishes_call() {
        let mut c = call();
        let price = c.finish(&tid("111111"), 2, flat(20.0)).unwrap();
        assert_eq!(price, 40.0);
        assert_eq!(c.units(), 2);
        assert!(!c.is_ongoing());
        assert!(!c.is_paid());
    }

    #[test]
    fn receiver_cannot_finish_call() {
        let mut c = call();
        assert!(c.finish(&tid("222222"), 2, flat(20.0)).is_none());
        assert!(c.is_ongoing());
        assert_eq!(c.units(), 0);
    }

    #[test]
    fn finished_call_cannot_be_finished_again() {
        let mut c = call();
        c.finish(&tid("111111"), 2, flat(20.0)).unwrap();
        assert!(c.finish(&tid("111111"), 9, flat(20.0)).is_none());
        assert_eq!(c.price(), 40.0);
    }

    #[test]
    fn payment_rules() {
        let mut c = call();
        assert!(matches!(
            c.pay(&tid("111111")),
            Err(NetworkError::InvalidCommunication(InvalidCommunicationReason::Ongoing(_)))
        ));
        c.finish(&tid("111111"), 3, flat(10.0)).unwrap();
        assert!(matches!(
            c.pay(&tid("222222")),
            Err(NetworkError::InvalidCommunication(InvalidCommunicationReason::NotSender(_)))
        ));
        assert_eq!(c.pay(&tid("111111")).unwrap(), 30.0);
        assert!(c.is_paid());
        assert!(matches!(
            c.pay(&tid("111111")),
            Err(NetworkError::InvalidCommunication(InvalidCommunicationReason::AlreadyPaid(_)))
        ));
    }

    #[test]
    fn video_kind() {
        let c = Communication::video(CommunicationId::new(1), tid("111111"), tid("222222"));
        assert_eq!(c.kind(), CommunicationKind::Video);
    }

    #[test]
    fn communication_serialization() {
        let mut c = call();
        c.finish(&tid("111111"), 4, flat(20.0)).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        let parsed: Communication = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, c);
    }
}
