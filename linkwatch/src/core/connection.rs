use log::{debug, info, warn};
use tokio::time::Instant;

use crate::Result;
use crate::api::config::ConnectionConfig;
use crate::api::models::{ConnectOutcome, LinkError, LinkState};
use crate::core::session::Session;
use crate::core::state_wait::{sample_status, wait_for_status_or_fail};
use crate::driver::{LinkStatusSource, NotificationSink};
use crate::types::constants::notification;

/// Disconnects only if the link is associating or associated.
///
/// A link that is down or in a failure state needs no teardown; no command
/// is issued and the call returns after a single sample. An unrecognised
/// code is torn down so the next attempt starts from Down.
pub(crate) async fn disconnect_if_joined_or_better<S>(
    source: &S,
    config: &ConnectionConfig,
) -> Result<()>
where
    S: LinkStatusSource + ?Sized,
{
    match sample_status(source) {
        Ok(state) if state.is_joined_or_better() => disconnect(source, config).await,
        Ok(state) => {
            debug!("No disconnect needed, link state: {state}");
            Ok(())
        }
        Err(e) => {
            warn!("Resetting link before connecting: {e}");
            disconnect(source, config).await
        }
    }
}

/// Issues a disconnect and waits for the link to report Down.
///
/// Runs to completion so a new connect never races a stale disconnect.
pub(crate) async fn disconnect<S>(source: &S, config: &ConnectionConfig) -> Result<()>
where
    S: LinkStatusSource + ?Sized,
{
    info!("Disconnecting wifi...");
    source.disconnect();

    wait_for_status_or_fail(
        source,
        LinkState::Down,
        config.disconnect_timeout,
        config.poll_interval,
    )
    .await
    .map_err(|e| {
        warn!("Failed to disconnect wifi: {e}");
        LinkError::DisconnectFailed(Box::new(e))
    })?;

    info!("Wifi disconnected");
    Ok(())
}

/// Makes one connect attempt against the configured access point.
///
/// The flow:
/// 1. Tear down any existing association
/// 2. Issue the connect command
/// 3. Wait for the link to come up
/// 4. Flash the failure or success pattern
pub(crate) async fn attempt_connect<S, N>(
    source: &S,
    sink: &N,
    config: &ConnectionConfig,
) -> Result<()>
where
    S: LinkStatusSource + ?Sized,
    N: NotificationSink + ?Sized,
{
    info!("Connecting to SSID {}...", config.ssid);
    disconnect_if_joined_or_better(source, config).await?;

    source.connect(&config.ssid, &config.password);

    if let Err(e) = wait_for_status_or_fail(
        source,
        LinkState::Up,
        config.connect_timeout,
        config.poll_interval,
    )
    .await
    {
        sink.flash(notification::FAILURE_FLASHES, notification::SIGNAL_HZ)
            .await;
        return Err(LinkError::ConnectFailed {
            ssid: config.ssid.clone(),
            source: Box::new(e),
        });
    }

    sink.flash(notification::SUCCESS_FLASHES, notification::SIGNAL_HZ)
        .await;
    info!("Connected successfully!");
    Ok(())
}

/// Connects and records the result in `session`.
///
/// Failures are wrapped in [`LinkError::ConnectionEstablishFailed`] with the
/// attempt's error kept as the cause. On success the addressing is read from
/// the stack and the retry counter is reset.
pub(crate) async fn connect_wifi<S, N>(
    source: &S,
    sink: &N,
    config: &ConnectionConfig,
    session: &Session,
) -> Result<ConnectOutcome>
where
    S: LinkStatusSource + ?Sized,
    N: NotificationSink + ?Sized,
{
    info!("Connecting to wifi");
    let start = Instant::now();

    attempt_connect(source, sink, config)
        .await
        .map_err(|e| LinkError::ConnectionEstablishFailed(Box::new(e)))?;

    let elapsed = start.elapsed();
    let ip_config = source.ifconfig();
    info!("{ip_config}");
    info!("Elapsed: {}ms", elapsed.as_millis());
    if elapsed > config.slow_connect_threshold {
        warn!(
            "took {} milliseconds to connect to wifi",
            elapsed.as_millis()
        );
    }

    let outcome = ConnectOutcome { elapsed, ip_config };
    session.record_success(&outcome);
    Ok(outcome)
}
