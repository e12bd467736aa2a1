//! # Payments/Debts Ledger
//!
//! Terminals and client tiers each keep a ledger. A delta has one meaning
//! on both sides:
//!
//! - negative delta: a charge, debts grow by its magnitude;
//! - positive delta: a settlement, the amount moves from debts to payments.
//!
//! Balance is always `payments - debts`.

use serde::{Deserialize, Serialize};

/// Cumulative payments and outstanding debts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    payments: f64,
    debts: f64,
}

impl Ledger {
    /// Cumulative payments.
    pub fn payments(&self) -> f64 {
        self.payments
    }

    /// Outstanding debts.
    pub fn debts(&self) -> f64 {
        self.debts
    }

    /// `payments - debts`.
    pub fn balance(&self) -> f64 {
        self.payments - self.debts
    }

    /// Apply a signed delta.
    pub fn apply(&mut self, delta: f64) {
        if delta < 0.0 {
            self.debts += -delta;
        } else {
            self.debts -= delta;
            self.payments += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_delta_grows_debts() {
        let mut l = Ledger::default();
        l.apply(-10.0);
        assert_eq!(l.debts(), 10.0);
        assert_eq!(l.payments(), 0.0);
        assert_eq!(l.balance(), -10.0);
    }

    #[test]
    fn positive_delta_moves_debt_into_payments() {
        let mut l = Ledger::default();
        l.apply(-40.0);
        l.apply(40.0);
        assert_eq!(l.debts(), 0.0);
        assert_eq!(l.payments(), 40.0);
        assert_eq!(l.balance(), 40.0);
    }

    #[test]
    fn zero_delta_is_neutral() {
        let mut l = Ledger::default();
        l.apply(0.0);
        assert_eq!(l, Ledger::default());
    }
}
