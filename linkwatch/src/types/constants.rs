//! Constants for chip link status codes and connection manager defaults.
//!
//! The link status values correspond to the numeric codes reported by the
//! CYW43 wireless chip (see the "Connecting to the Internet with Raspberry Pi
//! Pico W" datasheet).

/// Link status codes reported by the wireless chip.
pub mod link_status {
    pub const DOWN: i32 = 0;
    pub const JOIN: i32 = 1;
    pub const NOIP: i32 = 2;
    pub const UP: i32 = 3;
    pub const FAIL: i32 = -1;
    pub const NONET: i32 = -2;
    pub const BADAUTH: i32 = -3;
}

/// Radio power management policies.
pub mod power_management {
    /// Disables chip power saving so the link stays responsive.
    pub const DISABLED: u32 = 0xa11140;
}

/// LED notification patterns used by the connection manager.
pub mod notification {
    /// Flashes emitted after a successful connect.
    pub const SUCCESS_FLASHES: u32 = 1;
    /// Flashes emitted after a failed connect attempt.
    pub const FAILURE_FLASHES: u32 = 2;
    /// Frequency of the success and failure patterns.
    pub const SIGNAL_HZ: f32 = 2.0;
    /// Default frequency of the backoff pattern.
    pub const BACKOFF_HZ: f32 = 4.0;
}

/// SSID length limit per IEEE 802.11.
pub const MAX_SSID_LEN: usize = 32;

/// Placeholder for addressing fields before the first successful connect.
pub const UNKNOWN: &str = "Unknown";

/// Default durations for polling, waiting and backing off.
pub mod timeouts {
    use std::time::Duration;

    /// Maximum time to wait for the link to come up (10 seconds).
    const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Interval between link status samples (500 milliseconds).
    ///
    /// Keep this small relative to the connect timeout; wait responsiveness
    /// is bounded by it.
    const POLL_INTERVAL_MS: u64 = 500;

    /// Pause between failed attempts (5 seconds).
    const BACKOFF_SECS: u64 = 5;

    /// Sleep between monitor passes (5 seconds).
    const MONITOR_INTERVAL_SECS: u64 = 5;

    /// Connects slower than this are reported as warnings.
    const SLOW_CONNECT_MS: u64 = 5000;

    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }

    pub fn poll_interval() -> Duration {
        Duration::from_millis(POLL_INTERVAL_MS)
    }

    pub fn backoff() -> Duration {
        Duration::from_secs(BACKOFF_SECS)
    }

    pub fn monitor_interval() -> Duration {
        Duration::from_secs(MONITOR_INTERVAL_SECS)
    }

    pub fn slow_connect_threshold() -> Duration {
        Duration::from_millis(SLOW_CONNECT_MS)
    }
}

/// Default number of retries after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 1;
