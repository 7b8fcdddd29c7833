//! Timing helpers shared by the polling and notification code.

use std::time::Duration;

/// Number of samples a wait of `timeout` makes at one sample per `tick`.
///
/// This is `ceil(timeout / tick)`. A zero tick yields zero samples; config
/// validation keeps that case away from the wait loop.
pub(crate) fn poll_ticks(timeout: Duration, tick: Duration) -> u32 {
    let tick_ns = tick.as_nanos();
    if tick_ns == 0 {
        return 0;
    }
    let ticks = timeout.as_nanos().div_ceil(tick_ns);
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

/// Number of flashes that fill `backoff` at `hz`.
///
/// Rounded to the nearest whole flash, so a 5 s backoff at 4 Hz is 20.
pub(crate) fn backoff_flashes(backoff: Duration, hz: f32) -> u32 {
    if !(hz.is_finite() && hz > 0.0) {
        return 0;
    }
    let flashes = (backoff.as_secs_f64() * f64::from(hz)).round();
    if flashes >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        flashes as u32
    }
}

/// Half of one on/off period at `hz`; an LED spends this long in each state.
pub(crate) fn half_period(hz: f32) -> Duration {
    if !(hz.is_finite() && hz > 0.0) {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(0.5 / f64::from(hz))
}
