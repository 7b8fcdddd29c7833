use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::time::Duration;
use thiserror::Error;

use crate::api::config::ConfigError;
use crate::types::constants::{UNKNOWN, link_status};

/// Wireless link state as reported by the chip.
///
/// The progress path is `Down -> Joining -> NoIp -> Up`. Negative codes are
/// terminal failure signals for the current connect attempt.
///
/// # Example
///
/// ```rust
/// use linkwatch::LinkState;
///
/// let state = LinkState::try_from(-3).unwrap();
/// assert_eq!(state, LinkState::BadAuth);
/// assert!(state.is_failure());
/// assert_eq!(state.code(), -3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkState {
    /// No association.
    Down,
    /// Associating with the access point.
    Joining,
    /// Associated, no address yet.
    NoIp,
    /// Fully connected with an address assigned.
    Up,
    /// Generic connection failure.
    Fail,
    /// No matching network found.
    NoNet,
    /// Authentication rejected.
    BadAuth,
}

impl LinkState {
    /// Returns the raw chip code for this state.
    pub fn code(self) -> i32 {
        match self {
            Self::Down => link_status::DOWN,
            Self::Joining => link_status::JOIN,
            Self::NoIp => link_status::NOIP,
            Self::Up => link_status::UP,
            Self::Fail => link_status::FAIL,
            Self::NoNet => link_status::NONET,
            Self::BadAuth => link_status::BADAUTH,
        }
    }

    /// Returns `true` for the negative, attempt-terminating codes.
    pub fn is_failure(self) -> bool {
        self.code() < 0
    }

    /// Returns `true` while associating or associated (Joining through Up).
    pub fn is_joined_or_better(self) -> bool {
        matches!(self, Self::Joining | Self::NoIp | Self::Up)
    }

    /// Human-readable description of the state.
    pub fn description(self) -> &'static str {
        match self {
            Self::Down => "Link is down",
            Self::Joining => "Connected to wifi",
            Self::NoIp => "Connected to wifi, but no IP address",
            Self::Up => "Connected to wifi with an IP address",
            Self::Fail => "Connection failed",
            Self::NoNet => "No matching SSID found (could be out of range, or down)",
            Self::BadAuth => "Authentication failure",
        }
    }
}

impl TryFrom<i32> for LinkState {
    type Error = LinkError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            link_status::DOWN => Ok(Self::Down),
            link_status::JOIN => Ok(Self::Joining),
            link_status::NOIP => Ok(Self::NoIp),
            link_status::UP => Ok(Self::Up),
            link_status::FAIL => Ok(Self::Fail),
            link_status::NONET => Ok(Self::NoNet),
            link_status::BADAUTH => Ok(Self::BadAuth),
            v => Err(LinkError::UnknownStatus(v)),
        }
    }
}

impl Display for LinkState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Describes any raw status code, including codes outside the chip table.
pub fn describe_code(code: i32) -> String {
    match LinkState::try_from(code) {
        Ok(state) => state.description().to_string(),
        Err(_) => format!("Unknown link status ({code})"),
    }
}

/// Addressing information read from the network stack after connecting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpConfig {
    /// Assigned IPv4 address
    pub ip: String,
    /// Subnet mask
    pub subnet: String,
    /// Default gateway
    pub gateway: String,
    /// DNS server
    pub dns: String,
}

impl IpConfig {
    /// Builds a config from the stack's `(ip, subnet, gateway, dns)` strings.
    pub fn new(
        ip: impl Into<String>,
        subnet: impl Into<String>,
        gateway: impl Into<String>,
        dns: impl Into<String>,
    ) -> Self {
        Self {
            ip: ip.into(),
            subnet: subnet.into(),
            gateway: gateway.into(),
            dns: dns.into(),
        }
    }

    /// Returns `true` until a successful connect has recorded real values.
    pub fn is_unknown(&self) -> bool {
        self == &Self::default()
    }
}

impl Default for IpConfig {
    /// Every field set to `"Unknown"`.
    fn default() -> Self {
        Self::new(UNKNOWN, UNKNOWN, UNKNOWN, UNKNOWN)
    }
}

impl Display for IpConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IP: {}, Subnet: {}, Gateway: {}, DNS: {}",
            self.ip, self.subnet, self.gateway, self.dns
        )
    }
}

/// Snapshot of the connection, shaped for a monitoring API.
///
/// # Example
///
/// ```rust
/// use linkwatch::{IpConfig, StatusReport};
///
/// let report = StatusReport::new("28:cd:c1:00:00:01", 0, IpConfig::default());
/// assert_eq!(report.status_description, "Link is down");
/// assert_eq!(report.ip, "Unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Hardware (MAC) address of the interface
    pub mac: String,
    /// Description of the current status code
    #[serde(rename = "status description")]
    pub status_description: String,
    /// Raw status code reported by the chip
    #[serde(rename = "status code")]
    pub status_code: i32,
    /// Last known IPv4 address
    pub ip: String,
    /// Last known subnet mask
    pub subnet: String,
    /// Last known gateway
    pub gateway: String,
    /// Last known DNS server
    pub dns: String,
}

impl StatusReport {
    /// Assembles a report from the raw parts.
    pub fn new(mac: impl Into<String>, status_code: i32, ip_config: IpConfig) -> Self {
        Self {
            mac: mac.into(),
            status_description: describe_code(status_code),
            status_code,
            ip: ip_config.ip,
            subnet: ip_config.subnet,
            gateway: ip_config.gateway,
            dns: ip_config.dns,
        }
    }
}

/// Result of a bounded wait for a link state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The expected state was observed.
    Reached,
    /// The poll budget ran out first.
    TimedOut,
}

impl WaitOutcome {
    /// Returns `true` if the expected state was observed.
    pub fn is_reached(self) -> bool {
        matches!(self, Self::Reached)
    }
}

/// Details of a successful connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOutcome {
    /// Wall time from the start of the attempt to link up
    pub elapsed: Duration,
    /// Addressing read from the stack once the link was up
    pub ip_config: IpConfig,
}

/// Errors that can occur while driving the link.
///
/// Wrapper variants keep their inner cause, so the reason an attempt failed
/// survives all the way up to [`ConnectionManager::connect_wifi`].
///
/// [`ConnectionManager::connect_wifi`]: crate::ConnectionManager::connect_wifi
///
/// # Example
///
/// ```rust
/// use linkwatch::{LinkError, LinkState};
///
/// let err = LinkError::ConnectionEstablishFailed(Box::new(LinkError::ConnectFailed {
///     ssid: "HomeWiFi".into(),
///     source: Box::new(LinkError::LinkRejected(LinkState::BadAuth)),
/// }));
///
/// assert!(matches!(
///     err.root_cause(),
///     LinkError::LinkRejected(LinkState::BadAuth)
/// ));
/// ```
#[derive(Debug, Error)]
pub enum LinkError {
    /// The chip reported a failure code while waiting.
    #[error("link rejected: {0}")]
    LinkRejected(LinkState),

    /// A wait ran out of time before the expected state was observed.
    #[error("timed out after {waited:?} waiting for: {expected}")]
    TimeoutExceeded {
        /// State that was being waited for
        expected: LinkState,
        /// Time budget that was exhausted
        waited: Duration,
    },

    /// The link did not reach Down after a disconnect command.
    #[error("failed to disconnect wifi: {0}")]
    DisconnectFailed(#[source] Box<LinkError>),

    /// A single connect attempt failed.
    #[error("failed to connect to SSID {ssid}: {source}")]
    ConnectFailed {
        /// Network that was being joined
        ssid: String,
        /// Why the attempt failed
        #[source]
        source: Box<LinkError>,
    },

    /// Outer wrapper used by `connect_wifi`.
    #[error("failed to connect to network: {0}")]
    ConnectionEstablishFailed(#[source] Box<LinkError>),

    /// The chip reported a code outside the known status table.
    #[error("unknown link status code: {0}")]
    UnknownStatus(i32),

    /// The configuration was rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl LinkError {
    /// Returns the innermost error behind any wrapper variants.
    pub fn root_cause(&self) -> &LinkError {
        match self {
            Self::DisconnectFailed(inner)
            | Self::ConnectFailed { source: inner, .. }
            | Self::ConnectionEstablishFailed(inner) => inner.root_cause(),
            other => other,
        }
    }

    /// Returns `true` if the chip actively rejected the link.
    ///
    /// Any negative code is a rejection, including ones outside the known
    /// table, which surface as `UnknownStatus`.
    pub fn is_rejection(&self) -> bool {
        match self.root_cause() {
            Self::LinkRejected(_) => true,
            Self::UnknownStatus(code) => *code < 0,
            _ => false,
        }
    }

    /// Returns `true` if the failure was a wait running out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self.root_cause(), Self::TimeoutExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_state_from_known_codes() {
        assert_eq!(LinkState::try_from(0).unwrap(), LinkState::Down);
        assert_eq!(LinkState::try_from(1).unwrap(), LinkState::Joining);
        assert_eq!(LinkState::try_from(2).unwrap(), LinkState::NoIp);
        assert_eq!(LinkState::try_from(3).unwrap(), LinkState::Up);
        assert_eq!(LinkState::try_from(-1).unwrap(), LinkState::Fail);
        assert_eq!(LinkState::try_from(-2).unwrap(), LinkState::NoNet);
        assert_eq!(LinkState::try_from(-3).unwrap(), LinkState::BadAuth);
    }

    #[test]
    fn link_state_from_unknown_code() {
        assert!(matches!(
            LinkState::try_from(4),
            Err(LinkError::UnknownStatus(4))
        ));
        assert!(matches!(
            LinkState::try_from(-7),
            Err(LinkError::UnknownStatus(-7))
        ));
    }

    #[test]
    fn link_state_code_matches_table() {
        for code in -3..=3 {
            assert_eq!(LinkState::try_from(code).unwrap().code(), code);
        }
    }

    #[test]
    fn only_negative_codes_are_failures() {
        assert!(!LinkState::Down.is_failure());
        assert!(!LinkState::Joining.is_failure());
        assert!(!LinkState::NoIp.is_failure());
        assert!(!LinkState::Up.is_failure());
        assert!(LinkState::Fail.is_failure());
        assert!(LinkState::NoNet.is_failure());
        assert!(LinkState::BadAuth.is_failure());
    }

    #[test]
    fn joined_band_is_joining_through_up() {
        assert!(!LinkState::Down.is_joined_or_better());
        assert!(LinkState::Joining.is_joined_or_better());
        assert!(LinkState::NoIp.is_joined_or_better());
        assert!(LinkState::Up.is_joined_or_better());
        assert!(!LinkState::BadAuth.is_joined_or_better());
    }

    #[test]
    fn link_state_display() {
        assert_eq!(format!("{}", LinkState::Down), "Link is down");
        assert_eq!(
            format!("{}", LinkState::NoIp),
            "Connected to wifi, but no IP address"
        );
        assert_eq!(format!("{}", LinkState::BadAuth), "Authentication failure");
    }

    #[test]
    fn describe_code_falls_back_for_unknown() {
        assert_eq!(describe_code(3), "Connected to wifi with an IP address");
        assert_eq!(describe_code(42), "Unknown link status (42)");
    }

    #[test]
    fn ip_config_defaults_to_unknown() {
        let cfg = IpConfig::default();
        assert!(cfg.is_unknown());
        assert_eq!(cfg.ip, "Unknown");
        assert_eq!(cfg.dns, "Unknown");

        let real = IpConfig::new("10.0.0.2", "255.255.255.0", "10.0.0.1", "1.1.1.1");
        assert!(!real.is_unknown());
    }

    #[test]
    fn status_report_serializes_with_api_keys() {
        let report = StatusReport::new(
            "28:cd:c1:0a:0b:0c",
            -2,
            IpConfig::new("192.168.1.50", "255.255.255.0", "192.168.1.1", "8.8.8.8"),
        );
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["mac"], "28:cd:c1:0a:0b:0c");
        assert_eq!(json["status code"], -2);
        assert_eq!(
            json["status description"],
            "No matching SSID found (could be out of range, or down)"
        );
        assert_eq!(json["gateway"], "192.168.1.1");
    }

    #[test]
    fn root_cause_unwraps_nested_errors() {
        let err = LinkError::ConnectionEstablishFailed(Box::new(LinkError::ConnectFailed {
            ssid: "Lab".into(),
            source: Box::new(LinkError::DisconnectFailed(Box::new(
                LinkError::TimeoutExceeded {
                    expected: LinkState::Down,
                    waited: Duration::from_secs(10),
                },
            ))),
        }));

        assert!(err.is_timeout());
        assert!(!err.is_rejection());
        assert!(matches!(
            err.root_cause(),
            LinkError::TimeoutExceeded {
                expected: LinkState::Down,
                ..
            }
        ));
    }

    #[test]
    fn negative_unknown_code_is_a_rejection() {
        let err = LinkError::ConnectFailed {
            ssid: "Lab".into(),
            source: Box::new(LinkError::UnknownStatus(-4)),
        };
        assert!(err.is_rejection());
        assert!(!err.is_timeout());

        assert!(!LinkError::UnknownStatus(7).is_rejection());
        assert!(LinkError::LinkRejected(LinkState::Fail).is_rejection());
    }

    #[test]
    fn error_display_keeps_inner_reason() {
        let err = LinkError::ConnectFailed {
            ssid: "Lab".into(),
            source: Box::new(LinkError::LinkRejected(LinkState::NoNet)),
        };
        assert_eq!(
            err.to_string(),
            "failed to connect to SSID Lab: link rejected: No matching SSID found (could be out of range, or down)"
        );
    }
}
