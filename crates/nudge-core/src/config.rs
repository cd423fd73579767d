//! Engine configuration.
//!
//! ```toml
//! poll_interval_secs = 30
//! snooze_minutes = 5
//! alert_profile = "chime"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::domain::{ReminderError, Result};
use crate::ports::AlertProfile;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_SNOOZE_MINUTES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds between poller scans. Bounds notification latency.
    pub poll_interval_secs: u64,
    /// Default snooze delay.
    pub snooze_minutes: i64,
    pub alert_profile: AlertProfile,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            alert_profile: AlertProfile::default(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file. Missing keys fall back to defaults.
    ///
    /// # Errors
    /// I/O failures, TOML syntax errors, and values rejected by [`validate`](Self::validate).
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| ReminderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(ReminderError::Config(
                "poll_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.snooze_minutes <= 0 {
            return Err(ReminderError::Config(
                "snooze_minutes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn snooze_delay(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.snooze_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.snooze_delay(), chrono::Duration::minutes(5));
        assert_eq!(config.alert_profile, AlertProfile::Chime);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml("alert_profile = \"bell\"\n").unwrap();
        assert_eq!(config.alert_profile, AlertProfile::Bell);
        assert_eq!(config.poll_interval_secs, 30);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_toml("poll_interval_secs = 0"),
            Err(ReminderError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml("snooze_minutes = -1"),
            Err(ReminderError::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml("alert_profile = \"siren\""),
            Err(ReminderError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ReminderError::Io(_)));
    }
}
