//! Engine configuration: roles, fee ceilings and propagation delay bounds.

use serde::{Deserialize, Serialize};

use crate::{AccountId, LedgerError, Result, constants};

/// Configuration for a settlement engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Account allowed to call governance setters and manage the registry.
    pub admin: AccountId,
    /// Sole account allowed to submit settlements and withdrawals.
    pub dispatcher: AccountId,
    /// Account credited with trade and withdrawal fees.
    pub fee_wallet: AccountId,
    pub max_maker_fee_bps: u64,
    pub max_taker_fee_bps: u64,
    pub max_withdrawal_fee_bps: u64,
    /// Sequencer steps between recording an intent and enforcing it.
    pub propagation_delay: u64,
    pub min_propagation_delay: u64,
    pub max_propagation_delay: u64,
    /// How far beyond "now" an invalidation timestamp may be.
    pub nonce_future_tolerance_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            admin: AccountId([0u8; 32]),
            dispatcher: AccountId([0u8; 32]),
            fee_wallet: AccountId([0u8; 32]),
            max_maker_fee_bps: constants::DEFAULT_MAX_MAKER_FEE_BPS,
            max_taker_fee_bps: constants::DEFAULT_MAX_TAKER_FEE_BPS,
            max_withdrawal_fee_bps: constants::DEFAULT_MAX_WITHDRAWAL_FEE_BPS,
            propagation_delay: constants::DEFAULT_PROPAGATION_DELAY,
            min_propagation_delay: 0,
            max_propagation_delay: constants::MAX_PROPAGATION_DELAY,
            nonce_future_tolerance_ms: constants::DEFAULT_NONCE_FUTURE_TOLERANCE_MS,
        }
    }
}

impl EngineConfig {
    /// Config with the given roles and default limits.
    #[must_use]
    pub fn with_roles(admin: AccountId, dispatcher: AccountId, fee_wallet: AccountId) -> Self {
        Self {
            admin,
            dispatcher,
            fee_wallet,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check fee ceilings and delay bounds.
    ///
    /// # Errors
    /// Returns [`LedgerError::InvalidConfig`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        for (name, bps) in [
            ("max_maker_fee_bps", self.max_maker_fee_bps),
            ("max_taker_fee_bps", self.max_taker_fee_bps),
            ("max_withdrawal_fee_bps", self.max_withdrawal_fee_bps),
        ] {
            if bps > constants::FEE_BPS_CEILING {
                return Err(LedgerError::InvalidConfig(format!(
                    "{name} {bps} exceeds ceiling {}",
                    constants::FEE_BPS_CEILING
                )));
            }
        }
        if self.min_propagation_delay > self.max_propagation_delay {
            return Err(LedgerError::InvalidConfig(format!(
                "min_propagation_delay {} > max_propagation_delay {}",
                self.min_propagation_delay, self.max_propagation_delay
            )));
        }
        if self.max_propagation_delay > constants::MAX_PROPAGATION_DELAY {
            return Err(LedgerError::InvalidConfig(format!(
                "max_propagation_delay {} exceeds {}",
                self.max_propagation_delay,
                constants::MAX_PROPAGATION_DELAY
            )));
        }
        if !(self.min_propagation_delay..=self.max_propagation_delay)
            .contains(&self.propagation_delay)
        {
            return Err(LedgerError::InvalidConfig(format!(
                "propagation_delay {} outside [{}, {}]",
                self.propagation_delay, self.min_propagation_delay, self.max_propagation_delay
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_withdrawal_fee_bps, 2_000);
        assert_eq!(cfg.nonce_future_tolerance_ms, 86_400_000);
    }

    #[test]
    fn fee_above_ceiling_rejected() {
        let cfg = EngineConfig {
            max_taker_fee_bps: 2_001,
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(LedgerError::InvalidConfig(_))));
    }

    #[test]
    fn delay_outside_bounds_rejected() {
        let cfg = EngineConfig {
            propagation_delay: 10,
            min_propagation_delay: 0,
            max_propagation_delay: 5,
            ..EngineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(LedgerError::InvalidConfig(_))));
    }

    #[test]
    fn json_with_partial_fields_uses_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{"propagation_delay": 12}"#).unwrap();
        assert_eq!(cfg.propagation_delay, 12);
        assert_eq!(cfg.max_maker_fee_bps, constants::DEFAULT_MAX_MAKER_FEE_BPS);
    }

    #[test]
    fn invalid_json_is_serialization_error() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, LedgerError::Serialization(_)));
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = EngineConfig::with_roles(
            AccountId([1u8; 32]),
            AccountId([2u8; 32]),
            AccountId([3u8; 32]),
        );
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), cfg);
    }
}
