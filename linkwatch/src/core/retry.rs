//! Bounded retry with visually signalled backoff.

use log::{info, warn};

use crate::api::config::ConnectionConfig;
use crate::api::models::LinkState;
use crate::core::connection::connect_wifi;
use crate::core::session::Session;
use crate::core::state_wait::sample_status;
use crate::driver::{LinkStatusSource, NotificationSink};
use crate::util::utils::backoff_flashes;

/// Returns `true` if a single status sample reports the link as Up.
///
/// Unknown codes count as "not up".
pub(crate) fn is_up<S>(source: &S) -> bool
where
    S: LinkStatusSource + ?Sized,
{
    matches!(sample_status(source), Ok(LinkState::Up))
}

/// Makes sure the link is usable, connecting if needed.
///
/// Makes at most `max_retries + 1` connect attempts and returns on the first
/// success. Each failed attempt except the last is followed by a backoff
/// whose length is shown on the LED. Returns `false` once the attempts are
/// exhausted and the link is still not up.
pub(crate) async fn ensure_network_access<S, N>(
    source: &S,
    sink: &N,
    config: &ConnectionConfig,
    session: &Session,
) -> bool
where
    S: LinkStatusSource + ?Sized,
    N: NotificationSink + ?Sized,
{
    info!("Checking for network access");
    session.reset_retries();

    let allowed = u64::from(config.max_retries) + 1;
    let mut attempts: u64 = 0;

    while !is_up(source) && attempts < allowed {
        attempts += 1;
        match connect_wifi(source, sink, config, session).await {
            Ok(_) => return true,
            Err(e) => {
                warn!("Error connecting to wifi on attempt {attempts} of {allowed}: {e}");
                session.record_failure();
                if attempts < allowed {
                    backoff(sink, config).await;
                }
            }
        }
    }

    if is_up(source) {
        info!("Connected to wireless network");
        true
    } else {
        warn!("Unable to connect to wireless network");
        false
    }
}

/// Waits out the backoff by flashing it at the backoff frequency.
async fn backoff<N>(sink: &N, config: &ConnectionConfig)
where
    N: NotificationSink + ?Sized,
{
    info!(
        "Backing off retry for {} seconds",
        config.backoff.as_secs_f32()
    );
    sink.flash(backoff_flashes(config.backoff, config.backoff_hz), config.backoff_hz)
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{RecordingNotifier, ScriptedLink};
    use std::time::Duration;

    fn config() -> ConnectionConfig {
        ConnectionConfig::new("Lab", "secret", "GB")
    }

    #[tokio::test(start_paused = true)]
    async fn already_up_makes_no_attempt() {
        let link = ScriptedLink::new(3);
        let led = RecordingNotifier::new();

        assert!(ensure_network_access(&link, &led, &config(), &Session::default()).await);
        assert!(link.connects().is_empty());
        assert!(led.flashes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn first_success_short_circuits() {
        let link = ScriptedLink::new(0)
            .with_attempt([1, 2, 3])
            .with_attempt([1, 2, 3]);
        let led = RecordingNotifier::new();

        assert!(ensure_network_access(&link, &led, &config(), &Session::default()).await);
        assert_eq!(link.connects().len(), 1);
        assert_eq!(led.flashes(), vec![(1, 2.0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn never_up_exhausts_attempts() {
        let link = ScriptedLink::new(0);
        let led = RecordingNotifier::new();
        let session = Session::default();
        let cfg = config().with_max_retries(3);

        assert!(!ensure_network_access(&link, &led, &cfg, &session).await);
        assert_eq!(link.connects().len(), 4);
        assert_eq!(session.retries(), 4);

        let backoffs = led.flashes().iter().filter(|(_, hz)| *hz == 4.0).count();
        let failures = led.flashes().iter().filter(|f| **f == (2, 2.0)).count();
        assert_eq!(backoffs, 3);
        assert_eq!(failures, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_retry_budget_stops_on_success() {
        let link = ScriptedLink::new(0)
            .with_attempt([-1])
            .with_attempt([-2])
            .with_attempt([1, 3]);
        let led = RecordingNotifier::new();
        let session = Session::default();
        let cfg = config().with_max_retries(u32::MAX);

        assert!(ensure_network_access(&link, &led, &cfg, &session).await);
        assert_eq!(link.connects().len(), 3);
        assert_eq!(session.retries(), 0);
        assert_eq!(led.flashes().iter().filter(|(_, hz)| *hz == 4.0).count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_one_attempt() {
        let link = ScriptedLink::new(0).with_attempt([-1]);
        let led = RecordingNotifier::new();
        let cfg = config().with_max_retries(0);

        assert!(!ensure_network_access(&link, &led, &cfg, &Session::default()).await);
        assert_eq!(link.connects().len(), 1);
        assert_eq!(led.flashes(), vec![(2, 2.0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_scales_with_duration() {
        for secs in [5u64, 10] {
            let link = ScriptedLink::new(0).with_attempt([-3]);
            let led = RecordingNotifier::new();
            let cfg = config().with_backoff(Duration::from_secs(secs));

            ensure_network_access(&link, &led, &cfg, &Session::default()).await;

            let backoff: Vec<_> = led
                .flashes()
                .into_iter()
                .filter(|(_, hz)| *hz == 4.0)
                .collect();
            assert_eq!(backoff, vec![(secs as u32 * 4, 4.0)]);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_lasts_its_duration() {
        let link = ScriptedLink::new(0).with_attempt([-3]).with_attempt([3]);
        let led = RecordingNotifier::new().with_timing();

        let start = tokio::time::Instant::now();
        assert!(ensure_network_access(&link, &led, &config(), &Session::default()).await);

        // poll + failure flash (1s) + backoff (5s) + poll + success flash (0.5s)
        assert_eq!(start.elapsed(), Duration::from_millis(500 + 1000 + 5000 + 500 + 500));
    }

    #[tokio::test(start_paused = true)]
    async fn late_success_is_seen_after_loop() {
        // The only attempt is rejected, but the link comes up on its own
        // before the final check.
        let link = ScriptedLink::new(0).with_attempt([1, -1, 3]);
        let led = RecordingNotifier::new();
        let cfg = config().with_max_retries(0);

        assert!(ensure_network_access(&link, &led, &cfg, &Session::default()).await);
        assert_eq!(link.connects().len(), 1);
        assert_eq!(led.flashes(), vec![(2, 2.0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_status_counts_as_down() {
        let link = ScriptedLink::new(9).with_attempt([1, 3]);
        let led = RecordingNotifier::new();

        assert!(!is_up(&link));
        assert!(ensure_network_access(&link, &led, &config(), &Session::default()).await);
    }
}
