//! Connection manager configuration.
//!
//! [`ConnectionConfig`] is an immutable snapshot handed to
//! [`ConnectionManager::new`](crate::ConnectionManager::new). Nothing is
//! re-read from ambient state once the manager exists.

use std::fmt::{Debug, Formatter};
use std::time::Duration;
use thiserror::Error;

use crate::types::constants::{
    DEFAULT_MAX_RETRIES, MAX_SSID_LEN, notification, power_management, timeouts,
};

/// Configuration for the connection manager.
///
/// # Example
///
/// ```rust
/// use linkwatch::ConnectionConfig;
/// use std::time::Duration;
///
/// let config = ConnectionConfig::new("HomeWiFi", "hunter22", "GB")
///     .with_connect_timeout(Duration::from_secs(20))
///     .with_max_retries(3)
///     .with_backoff(Duration::from_secs(2));
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_retries, 3);
/// ```
#[derive(Clone, PartialEq)]
pub struct ConnectionConfig {
    /// Network SSID (1-32 bytes)
    pub ssid: String,
    /// Network password (empty for open networks)
    pub password: String,
    /// Regulatory country code, e.g. "GB"
    pub country: String,
    /// Power management policy written to the radio at startup
    pub power_management: u32,
    /// How long to wait for the link to come up
    pub connect_timeout: Duration,
    /// How long to wait for the link to go down after a disconnect
    pub disconnect_timeout: Duration,
    /// Interval between status samples
    pub poll_interval: Duration,
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Pause between failed attempts
    pub backoff: Duration,
    /// LED frequency used to signal the backoff
    pub backoff_hz: f32,
    /// Sleep between monitor passes
    pub monitor_interval: Duration,
    /// Connects slower than this are logged as warnings
    pub slow_connect_threshold: Duration,
}

impl ConnectionConfig {
    /// Creates a configuration with the default timings.
    ///
    /// Defaults:
    /// - connect and disconnect timeout: 10 s
    /// - poll interval: 500 ms
    /// - max retries: 1
    /// - backoff: 5 s, signalled at 4 Hz
    /// - monitor interval: 5 s
    /// - slow-connect threshold: 5000 ms
    pub fn new(
        ssid: impl Into<String>,
        password: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
            country: country.into(),
            power_management: power_management::DISABLED,
            connect_timeout: timeouts::connect_timeout(),
            disconnect_timeout: timeouts::connect_timeout(),
            poll_interval: timeouts::poll_interval(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: timeouts::backoff(),
            backoff_hz: notification::BACKOFF_HZ,
            monitor_interval: timeouts::monitor_interval(),
            slow_connect_threshold: timeouts::slow_connect_threshold(),
        }
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_disconnect_timeout(mut self, timeout: Duration) -> Self {
        self.disconnect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn with_backoff_hz(mut self, hz: f32) -> Self {
        self.backoff_hz = hz;
        self
    }

    #[must_use]
    pub fn with_monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval = interval;
        self
    }

    #[must_use]
    pub fn with_slow_connect_threshold(mut self, threshold: Duration) -> Self {
        self.slow_connect_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_power_management(mut self, policy: u32) -> Self {
        self.power_management = policy;
        self
    }

    /// Total connect attempts a single `ensure_network_access` pass may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ssid.is_empty() {
            return Err(ConfigError::SsidEmpty);
        }
        if self.ssid.len() > MAX_SSID_LEN {
            return Err(ConfigError::SsidTooLong {
                len: self.ssid.len(),
                max: MAX_SSID_LEN,
            });
        }
        if self.country.trim().is_empty() {
            return Err(ConfigError::CountryEmpty);
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if !(self.backoff_hz.is_finite() && self.backoff_hz > 0.0) {
            return Err(ConfigError::InvalidBackoffFrequency(self.backoff_hz));
        }
        Ok(())
    }
}

impl Debug for ConnectionConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("country", &self.country)
            .field("power_management", &format_args!("{:#x}", self.power_management))
            .field("connect_timeout", &self.connect_timeout)
            .field("disconnect_timeout", &self.disconnect_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .field("backoff_hz", &self.backoff_hz)
            .field("monitor_interval", &self.monitor_interval)
            .field("slow_connect_threshold", &self.slow_connect_threshold)
            .finish()
    }
}

/// Errors reported by [`ConnectionConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("SSID cannot be empty")]
    SsidEmpty,

    #[error("SSID too long: {len} bytes (max {max})")]
    SsidTooLong { len: usize, max: usize },

    #[error("country code cannot be empty")]
    CountryEmpty,

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("backoff frequency must be a positive number, got {0}")]
    InvalidBackoffFrequency(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("TestNetwork", "password123", "GB")
    }

    #[test]
    fn defaults_match_device_settings() {
        let cfg = config();
        assert_eq!(cfg.connect_timeout, Duration::from_secs(10));
        assert_eq!(cfg.disconnect_timeout, Duration::from_secs(10));
        assert_eq!(cfg.poll_interval, Duration::from_millis(500));
        assert_eq!(cfg.max_retries, 1);
        assert_eq!(cfg.max_attempts(), 2);
        assert_eq!(cfg.backoff, Duration::from_secs(5));
        assert_eq!(cfg.backoff_hz, 4.0);
        assert_eq!(cfg.monitor_interval, Duration::from_secs(5));
        assert_eq!(cfg.slow_connect_threshold, Duration::from_millis(5000));
        assert_eq!(cfg.power_management, 0xa11140);
    }

    #[test]
    fn valid_config() {
        assert!(config().validate().is_ok());
        assert!(ConnectionConfig::new("Open", "", "US").validate().is_ok());
    }

    #[test]
    fn empty_ssid() {
        let cfg = ConnectionConfig::new("", "password123", "GB");
        assert_eq!(cfg.validate(), Err(ConfigError::SsidEmpty));
    }

    #[test]
    fn ssid_too_long() {
        let cfg = ConnectionConfig::new("a".repeat(33), "password123", "GB");
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::SsidTooLong { len: 33, max: 32 })
        ));
    }

    #[test]
    fn ssid_max_length() {
        let cfg = ConnectionConfig::new("a".repeat(32), "password123", "GB");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_country() {
        let cfg = ConnectionConfig::new("TestNetwork", "password123", " ");
        assert_eq!(cfg.validate(), Err(ConfigError::CountryEmpty));
    }

    #[test]
    fn zero_poll_interval() {
        let cfg = config().with_poll_interval(Duration::ZERO);
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroPollInterval));
    }

    #[test]
    fn bad_backoff_frequency() {
        assert!(matches!(
            config().with_backoff_hz(0.0).validate(),
            Err(ConfigError::InvalidBackoffFrequency(_))
        ));
        assert!(matches!(
            config().with_backoff_hz(f32::NAN).validate(),
            Err(ConfigError::InvalidBackoffFrequency(_))
        ));
    }

    #[test]
    fn builders_override_defaults() {
        let cfg = config()
            .with_power_management(0)
            .with_slow_connect_threshold(Duration::from_secs(2))
            .with_disconnect_timeout(Duration::from_secs(3))
            .with_monitor_interval(Duration::from_secs(30));

        assert_eq!(cfg.power_management, 0);
        assert_eq!(cfg.slow_connect_threshold, Duration::from_secs(2));
        assert_eq!(cfg.disconnect_timeout, Duration::from_secs(3));
        assert_eq!(cfg.monitor_interval, Duration::from_secs(30));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn max_attempts_saturates() {
        assert_eq!(config().with_max_retries(u32::MAX).max_attempts(), u32::MAX);
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", config());
        assert!(rendered.contains("TestNetwork"));
        assert!(!rendered.contains("password123"));
        assert!(rendered.contains("0xa11140"));
    }
}
