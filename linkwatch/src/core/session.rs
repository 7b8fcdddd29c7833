//! Mutable connection bookkeeping.
//!
//! Everything here is readable without waiting on an in-flight connect:
//! counters are atomics and the small records sit behind a std mutex that is
//! never held across an await.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::api::models::{ConnectOutcome, IpConfig};

#[derive(Debug, Default)]
pub(crate) struct Session {
    retries: AtomicU32,
    last: Mutex<LastConnect>,
}

#[derive(Debug, Default)]
struct LastConnect {
    ip_config: IpConfig,
    elapsed: Option<Duration>,
}

impl Session {
    pub(crate) fn retries(&self) -> u32 {
        self.retries.load(Ordering::Relaxed)
    }

    pub(crate) fn reset_retries(&self) {
        self.retries.store(0, Ordering::Relaxed);
    }

    /// Counts a failed attempt and returns the new total, saturating at
    /// `u32::MAX`.
    pub(crate) fn record_failure(&self) -> u32 {
        let previous = self
            .retries
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |r| {
                Some(r.saturating_add(1))
            })
            .unwrap_or_else(|r| r);
        previous.saturating_add(1)
    }

    pub(crate) fn record_success(&self, outcome: &ConnectOutcome) {
        self.reset_retries();
        let mut last = self.lock();
        last.ip_config = outcome.ip_config.clone();
        last.elapsed = Some(outcome.elapsed);
    }

    pub(crate) fn ip_config(&self) -> IpConfig {
        self.lock().ip_config.clone()
    }

    pub(crate) fn last_elapsed(&self) -> Option<Duration> {
        self.lock().elapsed
    }

    fn lock(&self) -> MutexGuard<'_, LastConnect> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
