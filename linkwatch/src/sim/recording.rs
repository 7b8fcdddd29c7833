use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::sleep;

use crate::driver::NotificationSink;
use crate::util::utils::half_period;

/// One request received by a [`RecordingNotifier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    /// A bounded `flash(count, hz)` request.
    Flash { count: u32, hz: f32 },
    /// An unbounded `constant_flash(hz)` request.
    Constant { hz: f32 },
}

/// A [`NotificationSink`] that records every request.
///
/// By default requests complete immediately. With
/// [`with_timing`](Self::with_timing) a flash sleeps for as long as a real LED
/// would, which lets tests observe backoff duration on a paused clock.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    timed: bool,
    log: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Creates a notifier whose flashes complete immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes flashes take their real duration.
    #[must_use]
    pub fn with_timing(mut self) -> Self {
        self.timed = true;
        self
    }

    /// Everything received so far, in order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Bounded flash requests as `(count, hz)` pairs.
    pub fn flashes(&self) -> Vec<(u32, f32)> {
        self.lock()
            .iter()
            .filter_map(|n| match *n {
                Notification::Flash { count, hz } => Some((count, hz)),
                Notification::Constant { .. } => None,
            })
            .collect()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn flash(&self, count: u32, hz: f32) {
        self.lock().push(Notification::Flash { count, hz });
        if self.timed {
            sleep(half_period(hz) * 2 * count).await;
        }
    }

    async fn constant_flash(&self, hz: f32) {
        self.lock().push(Notification::Constant { hz });
        std::future::pending::<()>().await;
    }
}
