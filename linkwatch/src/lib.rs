//! A polling Wi-Fi connection manager for microcontroller-class radios.
//!
//! This crate keeps a station-mode Wi-Fi link usable:
//!
//! - Connecting and disconnecting with timeouts, by polling the chip status
//! - Retrying failed connects with a bounded, LED-signalled backoff
//! - Re-asserting connectivity from a background monitor
//! - Reporting the MAC, status and IP configuration for a monitoring API
//!
//! # Example
//!
//! ```rust
//! use linkwatch::{ConnectionConfig, ConnectionManager};
//! use linkwatch::sim::{RecordingNotifier, ScriptedLink};
//! use std::time::Duration;
//!
//! # async fn example() -> linkwatch::Result<()> {
//! let config = ConnectionConfig::new("HomeWiFi", "hunter22", "GB")
//!     .with_max_retries(3)
//!     .with_backoff(Duration::from_secs(5));
//!
//! let link = ScriptedLink::new(0).with_attempt([1, 2, 3]);
//! let manager = ConnectionManager::new(link, RecordingNotifier::new(), config)?;
//!
//! if manager.ensure_network_access().await {
//!     println!("{}", manager.ip_config());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Hardware
//!
//! The manager only sees the radio through [`driver::LinkStatusSource`] and
//! the status LED through [`driver::NotificationSink`]. Implement both for
//! your board; the [`sim`] module provides scripted stand-ins for tests and
//! host-side runs.
//!
//! # Error Handling
//!
//! Fallible operations return `Result<T, LinkError>`. Errors raised inside a
//! connect attempt are wrapped, not replaced, so the chip's own verdict (bad
//! password, no such network) stays reachable through
//! [`LinkError::root_cause`].
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```
//!
//! Passwords are never logged.

// Internal implementation modules
mod core;
mod monitoring;
mod util;

// Public API modules
pub mod api;
pub mod driver;
pub mod sim;
pub mod types;

// Re-exported public API
pub use api::config::{ConfigError, ConnectionConfig};
pub use api::connection_manager::ConnectionManager;
pub use api::models::{
    ConnectOutcome, IpConfig, LinkError, LinkState, StatusReport, WaitOutcome, describe_code,
};
pub use monitoring::monitor::MonitorHandle;

/// A specialized `Result` type for connection operations.
pub type Result<T> = std::result::Result<T, LinkError>;
