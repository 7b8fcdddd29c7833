//! Link state polling.
//!
//! The chip offers no state-change notifications, so waits sample
//! [`LinkStatusSource::status`] on a fixed tick. Each iteration sleeps one
//! tick before sampling; a wait of `timeout` makes at most
//! `ceil(timeout / tick)` samples.
//!
//! Outcomes:
//! - the expected state was sampled: `Ok(WaitOutcome::Reached)`
//! - a negative failure code was sampled: `Err(LinkError::LinkRejected)`,
//!   regardless of remaining budget
//! - a code outside the table was sampled: `Err(LinkError::UnknownStatus)`;
//!   negative ones still count as rejections
//! - the budget ran out: `Ok(WaitOutcome::TimedOut)`

use log::{debug, warn};
use std::time::Duration;
use tokio::time::sleep;

use crate::Result;
use crate::api::models::{LinkError, LinkState, WaitOutcome, describe_code};
use crate::driver::LinkStatusSource;
use crate::util::utils::poll_ticks;

/// Samples the current link state once, logging the raw code.
pub(crate) fn sample_status<S>(source: &S) -> Result<LinkState>
where
    S: LinkStatusSource + ?Sized,
{
    let code = source.status();
    debug!("status: {code} ({})", describe_code(code));
    LinkState::try_from(code)
}

/// Polls until the link reaches `expected`, the chip rejects the link, or
/// `timeout` runs out.
pub(crate) async fn wait_for_status<S>(
    source: &S,
    expected: LinkState,
    timeout: Duration,
    tick: Duration,
) -> Result<WaitOutcome>
where
    S: LinkStatusSource + ?Sized,
{
    let ticks = poll_ticks(timeout, tick);
    debug!("Waiting up to {timeout:?} ({ticks} polls) for: {expected}");

    for _ in 0..ticks {
        sleep(tick).await;

        let state = sample_status(source)?;
        if state == expected {
            return Ok(WaitOutcome::Reached);
        }
        if state.is_failure() {
            warn!("Link rejected while waiting for '{expected}': {state}");
            return Err(LinkError::LinkRejected(state));
        }
    }

    debug!("Gave up after {timeout:?} waiting for: {expected}");
    Ok(WaitOutcome::TimedOut)
}

/// Like [`wait_for_status`], but a timeout becomes
/// [`LinkError::TimeoutExceeded`].
pub(crate) async fn wait_for_status_or_fail<S>(
    source: &S,
    expected: LinkState,
    timeout: Duration,
    tick: Duration,
) -> Result<()>
where
    S: LinkStatusSource + ?Sized,
{
    match wait_for_status(source, expected, timeout, tick).await? {
        WaitOutcome::Reached => Ok(()),
        WaitOutcome::TimedOut => Err(LinkError::TimeoutExceeded {
            expected,
            waited: timeout,
        }),
    }
}
