//! Validated runtime settings built from the configuration port.

use crate::ports::config_port::ConfigPort;

use super::error::SaathiError;
use super::ledger::INITIAL_CASH;

/// Reference tick cadence for the simulated feed, in seconds.
pub const DEFAULT_TICK_SECONDS: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub initial_cash: f64,
    pub seed_portfolio: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            initial_cash: INITIAL_CASH,
            seed_portfolio: true,
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SaathiError> {
        let initial_cash = config.get_double("session", "initial_cash", INITIAL_CASH);
        if !initial_cash.is_finite() || initial_cash <= 0.0 {
            return Err(SaathiError::ConfigInvalid {
                section: "session".into(),
                key: "initial_cash".into(),
                reason: "must be a positive amount".into(),
            });
        }
        Ok(SessionSettings {
            initial_cash,
            seed_portfolio: config.get_bool("session", "seed_portfolio", true),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedSettings {
    pub tick_seconds: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        FeedSettings {
            tick_seconds: DEFAULT_TICK_SECONDS,
        }
    }
}

impl FeedSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SaathiError> {
        let tick_seconds = config.get_int("feed", "tick_seconds", DEFAULT_TICK_SECONDS as i64);
        if tick_seconds < 1 {
            return Err(SaathiError::ConfigInvalid {
                section: "feed".into(),
                key: "tick_seconds".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(FeedSettings {
            tick_seconds: tick_seconds as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn defaults_apply_when_config_is_empty() {
        let config = FileConfigAdapter::from_string("[session]\n").unwrap();
        let session = SessionSettings::from_config(&config).unwrap();
        assert!((session.initial_cash - INITIAL_CASH).abs() < f64::EPSILON);
        assert!(session.seed_portfolio);

        let feed = FeedSettings::from_config(&config).unwrap();
        assert_eq!(feed.tick_seconds, DEFAULT_TICK_SECONDS);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = FileConfigAdapter::from_string(
            "[session]\ninitial_cash = 250000\nseed_portfolio = no\n\n[feed]\ntick_seconds = 10\n",
        )
        .unwrap();
        let session = SessionSettings::from_config(&config).unwrap();
        assert!((session.initial_cash - 250_000.0).abs() < f64::EPSILON);
        assert!(!session.seed_portfolio);
        assert_eq!(FeedSettings::from_config(&config).unwrap().tick_seconds, 10);
    }

    #[test]
    fn non_positive_cash_is_invalid() {
        let config = FileConfigAdapter::from_string("[session]\ninitial_cash = -5\n").unwrap();
        assert!(matches!(
            SessionSettings::from_config(&config),
            Err(SaathiError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn zero_tick_interval_is_invalid() {
        let config = FileConfigAdapter::from_string("[feed]\ntick_seconds = 0\n").unwrap();
        assert!(matches!(
            FeedSettings::from_config(&config),
            Err(SaathiError::ConfigInvalid { .. })
        ));
    }
}
