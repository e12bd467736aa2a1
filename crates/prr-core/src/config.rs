//! Network configuration.
//!
//! Promotion thresholds are the only tunable behaviour of the network.
//! Defaults match the observed Normal → Gold rule; the Gold → Platinum
//! threshold is a chosen constant and can be overridden from the
//! environment.

use serde::{Deserialize, Serialize};

/// Balance a Normal client must exceed to be promoted to Gold.
pub const DEFAULT_GOLD_THRESHOLD: f64 = 500.0;

/// Balance a Gold client must exceed to be promoted to Platinum.
pub const DEFAULT_PLATINUM_THRESHOLD: f64 = 1_000.0;

/// Balances a client must exceed, after a completed payment, to move up
/// one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PromotionThresholds {
    /// Normal → Gold.
    pub gold: f64,
    /// Gold → Platinum.
    pub platinum: f64,
}

impl Default for PromotionThresholds {
    fn default() -> Self {
        Self {
            gold: DEFAULT_GOLD_THRESHOLD,
            platinum: DEFAULT_PLATINUM_THRESHOLD,
        }
    }
}

/// Configuration for a network instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Tier promotion thresholds.
    pub promotion: PromotionThresholds,
}

impl NetworkConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PRR_GOLD_THRESHOLD` (default: 500)
    /// - `PRR_PLATINUM_THRESHOLD` (default: 1000)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] if a variable is set but is
    /// not a finite number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            promotion: PromotionThresholds {
                gold: env_threshold("PRR_GOLD_THRESHOLD", DEFAULT_GOLD_THRESHOLD)?,
                platinum: env_threshold("PRR_PLATINUM_THRESHOLD", DEFAULT_PLATINUM_THRESHOLD)?,
            },
        })
    }
}

fn env_threshold(var: &str, default: f64) -> Result<f64, ConfigError> {
    match std::env::var(var) {
        Err(_) => Ok(default),
        Ok(raw) => parse_threshold(var, &raw),
    }
}

fn parse_threshold(var: &str, raw: &str) -> Result<f64, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::InvalidThreshold(var.to_string(), raw.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A threshold variable did not hold a finite number.
    #[error("invalid threshold for {0}: {1:?}")]
    InvalidThreshold(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = NetworkConfig::default();
        assert_eq!(c.promotion.gold, 500.0);
        assert_eq!(c.promotion.platinum, DEFAULT_PLATINUM_THRESHOLD);
    }

    #[test]
    fn parse_threshold_accepts_numbers() {
        assert_eq!(parse_threshold("X", " 750 ").unwrap(), 750.0);
        assert_eq!(parse_threshold("X", "12.5").unwrap(), 12.5);
    }

    #[test]
    fn parse_threshold_rejects_garbage() {
        assert!(parse_threshold("X", "lots").is_err());
        assert!(parse_threshold("X", "inf").is_err());
        assert!(parse_threshold("X", "NaN").is_err());
    }
}
