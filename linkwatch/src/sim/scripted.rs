use log::debug;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::models::IpConfig;
use crate::driver::{LinkStatusSource, format_mac};
use crate::types::constants::link_status;

/// A [`LinkStatusSource`] that replays scripted status codes.
///
/// Each call to [`status`](LinkStatusSource::status) consumes the next queued
/// code, if any, and returns the current one. Scripts are queued three ways:
///
/// - per connect: every `connect` command loads the next attempt script
///   added with [`with_attempt`](Self::with_attempt) or
///   [`push_attempt`](Self::push_attempt); without one the link stays put
/// - per disconnect: every `disconnect` command loads the disconnect script,
///   `[Down]` by default
/// - directly, with [`play`](Self::play)
///
/// # Example
///
/// ```rust
/// use linkwatch::driver::LinkStatusSource;
/// use linkwatch::sim::ScriptedLink;
///
/// let link = ScriptedLink::new(0).with_attempt([1, 2, 3]);
/// link.connect("HomeWiFi", "hunter22");
///
/// assert_eq!(link.status(), 1);
/// assert_eq!(link.status(), 2);
/// assert_eq!(link.status(), 3);
/// assert_eq!(link.status(), 3);
/// assert_eq!(link.connects(), vec!["HomeWiFi".to_string()]);
/// ```
#[derive(Debug)]
pub struct ScriptedLink {
    mac: String,
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    current: i32,
    pending: VecDeque<i32>,
    attempts: VecDeque<Vec<i32>>,
    disconnect_script: Vec<i32>,
    ifconfig: IpConfig,
    connects: Vec<String>,
    disconnects: u32,
    polls: u32,
    configured: Option<(String, u32)>,
}

impl ScriptedLink {
    /// Creates a link that currently reports `initial`.
    pub fn new(initial: i32) -> Self {
        Self {
            mac: format_mac(&[0x28, 0xcd, 0xc1, 0x00, 0x00, 0x01]),
            inner: Mutex::new(Inner {
                current: initial,
                pending: VecDeque::new(),
                attempts: VecDeque::new(),
                disconnect_script: vec![link_status::DOWN],
                ifconfig: IpConfig::default(),
                connects: Vec::new(),
                disconnects: 0,
                polls: 0,
                configured: None,
            }),
        }
    }

    #[must_use]
    pub fn with_mac(mut self, mac: impl Into<String>) -> Self {
        self.mac = mac.into();
        self
    }

    #[must_use]
    pub fn with_ifconfig(self, ifconfig: IpConfig) -> Self {
        self.lock().ifconfig = ifconfig;
        self
    }

    /// Queues the status script played after the next unclaimed connect.
    #[must_use]
    pub fn with_attempt(self, script: impl IntoIterator<Item = i32>) -> Self {
        self.push_attempt(script);
        self
    }

    /// Sets the script played after every disconnect command.
    #[must_use]
    pub fn with_disconnect_script(self, script: impl IntoIterator<Item = i32>) -> Self {
        self.lock().disconnect_script = script.into_iter().collect();
        self
    }

    /// Queues an attempt script at runtime.
    pub fn push_attempt(&self, script: impl IntoIterator<Item = i32>) {
        self.lock().attempts.push_back(script.into_iter().collect());
    }

    /// Appends codes to play on the next polls, without any command.
    pub fn play(&self, script: impl IntoIterator<Item = i32>) {
        self.lock().pending.extend(script);
    }

    /// Forces the current status and drops anything still queued to play,
    /// e.g. to simulate the access point disappearing.
    pub fn set_status(&self, code: i32) {
        let mut inner = self.lock();
        inner.pending.clear();
        inner.current = code;
    }

    /// SSIDs passed to `connect`, in order.
    pub fn connects(&self) -> Vec<String> {
        self.lock().connects.clone()
    }

    /// Number of `disconnect` commands received.
    pub fn disconnects(&self) -> u32 {
        self.lock().disconnects
    }

    /// Number of status samples taken.
    pub fn polls(&self) -> u32 {
        self.lock().polls
    }

    /// Country and power policy passed to `configure`, if it was called.
    pub fn configured(&self) -> Option<(String, u32)> {
        self.lock().configured.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LinkStatusSource for ScriptedLink {
    fn status(&self) -> i32 {
        let mut inner = self.lock();
        inner.polls += 1;
        if let Some(next) = inner.pending.pop_front() {
            inner.current = next;
        }
        inner.current
    }

    fn hardware_address(&self) -> String {
        self.mac.clone()
    }

    fn ifconfig(&self) -> IpConfig {
        self.lock().ifconfig.clone()
    }

    fn connect(&self, ssid: &str, _password: &str) {
        let mut inner = self.lock();
        inner.connects.push(ssid.to_string());
        let script = inner.attempts.pop_front().unwrap_or_default();
        debug!("Scripted connect #{} to {ssid}: {script:?}", inner.connects.len());
        inner.pending = script.into();
    }

    fn disconnect(&self) {
        let mut inner = self.lock();
        inner.disconnects += 1;
        inner.pending = inner.disconnect_script.iter().copied().collect();
    }

    fn configure(&self, country: &str, power_management: u32) {
        self.lock().configured = Some((country.to_string(), power_management));
    }
}
