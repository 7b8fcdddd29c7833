use log::info;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};

use crate::Result;
use crate::api::config::ConnectionConfig;
use crate::api::models::{ConnectOutcome, IpConfig, LinkState, StatusReport, WaitOutcome};
use crate::core::connection::{connect_wifi, disconnect, disconnect_if_joined_or_better};
use crate::core::retry::ensure_network_access;
use crate::core::session::Session;
use crate::core::state_wait::wait_for_status;
use crate::driver::{LinkStatusSource, NotificationSink};
use crate::monitoring::info::{current_state, status_code, status_description, status_report};
use crate::monitoring::monitor::{MonitorHandle, monitor_connection};

/// Keeps a Wi-Fi link alive.
///
/// This is the main entry point. It drives the link through a
/// [`LinkStatusSource`], reports progress on a [`NotificationSink`] and
/// recovers a dropped link with bounded, visibly signalled retries.
///
/// LED patterns:
/// - 1 flash at 2 Hz: connected
/// - 2 flashes at 2 Hz: connect attempt failed
/// - steady 4 Hz flashing: backing off before the next attempt
///
/// # Creating an Instance
///
/// ```rust
/// use linkwatch::{ConnectionConfig, ConnectionManager};
/// use linkwatch::sim::{RecordingNotifier, ScriptedLink};
///
/// # fn example() -> linkwatch::Result<()> {
/// let config = ConnectionConfig::new("HomeWiFi", "hunter22", "GB");
/// let manager = ConnectionManager::new(ScriptedLink::new(0), RecordingNotifier::new(), config)?;
///
/// assert_eq!(manager.status_description(), "Link is down");
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
///
/// # Making Sure the Network Is Usable
///
/// ```rust
/// use linkwatch::{ConnectionConfig, ConnectionManager, IpConfig};
/// use linkwatch::sim::{RecordingNotifier, ScriptedLink};
///
/// # async fn example() -> linkwatch::Result<()> {
/// let link = ScriptedLink::new(0)
///     .with_attempt([1, 2, 3])
///     .with_ifconfig(IpConfig::new("192.168.1.50", "255.255.255.0", "192.168.1.1", "8.8.8.8"));
/// let config = ConnectionConfig::new("HomeWiFi", "hunter22", "GB");
/// let manager = ConnectionManager::new(link, RecordingNotifier::new(), config)?;
///
/// if manager.ensure_network_access().await {
///     println!("{}", manager.ip_config());
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Concurrency
///
/// Connect, disconnect and retry operations share a single in-flight guard,
/// so a manual call racing the monitor waits for the current operation
/// instead of interleaving with it. Accessors never take the guard.
#[derive(Debug)]
pub struct ConnectionManager<S, N> {
    source: S,
    sink: N,
    config: ConnectionConfig,
    mac: String,
    session: Session,
    in_flight: Mutex<()>,
}

impl<S, N> ConnectionManager<S, N>
where
    S: LinkStatusSource,
    N: NotificationSink,
{
    /// Configures the radio and creates the manager.
    ///
    /// Writes the country code and power management policy to the radio and
    /// reads the hardware address once.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::InvalidConfig` if the configuration fails
    /// validation; the radio is left untouched in that case.
    pub fn new(source: S, sink: N, config: ConnectionConfig) -> Result<Self> {
        config.validate()?;

        source.configure(&config.country, config.power_management);
        let mac = source.hardware_address();
        info!("MAC: {mac}");

        Ok(Self {
            source,
            sink,
            config,
            mac,
            session: Session::default(),
            in_flight: Mutex::new(()),
        })
    }

    /// The configuration this manager was created with.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// The underlying status source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The notification sink.
    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Polls until the link reaches `expected` or `timeout` runs out.
    ///
    /// Samples every poll interval. Returns `WaitOutcome::TimedOut` if the
    /// budget runs out.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::LinkRejected` as soon as a failure code is
    /// sampled, and `LinkError::UnknownStatus` for codes outside the table.
    pub async fn wait_for_status(
        &self,
        expected: LinkState,
        timeout: Duration,
    ) -> Result<WaitOutcome> {
        wait_for_status(&self.source, expected, timeout, self.config.poll_interval).await
    }

    /// Disconnects if the link is Joining, NoIp or Up; otherwise does nothing.
    pub async fn disconnect_if_joined_or_better(&self) -> Result<()> {
        let _guard = self.in_flight.lock().await;
        disconnect_if_joined_or_better(&self.source, &self.config).await
    }

    /// Disconnects the link, e.g. when the network is no longer needed.
    ///
    /// Stop any monitor first, or it will reconnect on its next pass.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::DisconnectFailed` if the link does not report Down
    /// within the disconnect timeout.
    pub async fn disconnect_wifi(&self) -> Result<()> {
        let _guard = self.in_flight.lock().await;
        disconnect(&self.source, &self.config).await
    }

    /// Makes a single connect attempt.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::ConnectionEstablishFailed` wrapping the reason
    /// the attempt failed; use [`LinkError::root_cause`](crate::LinkError::root_cause)
    /// to inspect it.
    pub async fn connect_wifi(&self) -> Result<ConnectOutcome> {
        let _guard = self.in_flight.lock().await;
        connect_wifi(&self.source, &self.sink, &self.config, &self.session).await
    }

    /// Starts or confirms network connectivity.
    ///
    /// Call this ahead of any network-dependent work. Returns `false` once
    /// `max_retries + 1` attempts have failed and the link is still down.
    pub async fn ensure_network_access(&self) -> bool {
        let _guard = self.in_flight.lock().await;
        ensure_network_access(&self.source, &self.sink, &self.config, &self.session).await
    }

    /// Re-asserts connectivity every monitor interval until `shutdown` fires.
    ///
    /// Never returns an error; a link that cannot be restored just produces
    /// another round of attempts on the next pass.
    pub async fn monitor_connection(&self, shutdown: watch::Receiver<()>) {
        monitor_connection(self.config.monitor_interval, shutdown, || {
            self.ensure_network_access()
        })
        .await
    }

    /// Returns the raw status code reported by the chip.
    pub fn status_code(&self) -> i32 {
        status_code(&self.source)
    }

    /// Returns the current link state.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::UnknownStatus` for codes outside the table.
    pub fn status(&self) -> Result<LinkState> {
        current_state(&self.source)
    }

    /// Returns a human-readable description of the current status.
    pub fn status_description(&self) -> String {
        status_description(&self.source)
    }

    /// Returns the hardware address read at construction.
    pub fn hardware_address(&self) -> &str {
        &self.mac
    }

    /// Returns the addressing recorded by the last successful connect.
    pub fn ip_config(&self) -> IpConfig {
        self.session.ip_config()
    }

    /// Returns the failed attempts since the last successful connect.
    pub fn retries(&self) -> u32 {
        self.session.retries()
    }

    /// Returns how long the last successful connect took.
    pub fn last_connect_elapsed(&self) -> Option<Duration> {
        self.session.last_elapsed()
    }

    /// Returns `true` while a connect, disconnect or retry pass is running.
    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Returns the connection record for a monitoring API.
    pub fn status_report(&self) -> StatusReport {
        status_report(&self.source, &self.mac, &self.session)
    }
}

impl<S, N> ConnectionManager<S, N>
where
    S: LinkStatusSource + 'static,
    N: NotificationSink + 'static,
{
    /// Spawns [`monitor_connection`](Self::monitor_connection) on the tokio
    /// runtime.
    ///
    /// # Example
    ///
    /// ```rust
    /// use linkwatch::{ConnectionConfig, ConnectionManager};
    /// use linkwatch::sim::{RecordingNotifier, ScriptedLink};
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> linkwatch::Result<()> {
    /// let config = ConnectionConfig::new("HomeWiFi", "hunter22", "GB");
    /// let manager = Arc::new(ConnectionManager::new(
    ///     ScriptedLink::new(0).with_attempt([1, 2, 3]),
    ///     RecordingNotifier::new(),
    ///     config,
    /// )?);
    ///
    /// let monitor = manager.spawn_monitor();
    /// // ... network-dependent work ...
    /// monitor.shutdown().await;
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn_monitor(self: &Arc<Self>) -> MonitorHandle {
        let (tx, rx) = watch::channel(());
        let manager = Arc::clone(self);
        let task = tokio::spawn(async move { manager.monitor_connection(rx).await });
        MonitorHandle::new(tx, task)
    }
}
