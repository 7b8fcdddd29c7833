//! Background connectivity monitor.
//!
//! Re-asserts network access on a fixed interval for as long as the process
//! wants the link. Failures are never surfaced: a link that cannot be
//! restored simply produces another round of attempts, with the backoff
//! visible on the LED, on the next pass.
//!
//! The loop stops when its shutdown channel changes or its sender is dropped.
//! Shutdown is observed at every suspension point, including in the middle of
//! a connect attempt; the attempt is dropped.

use futures::{FutureExt, select};
use log::{debug, info, warn};
use std::future::Future;
use std::pin::pin;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Handle to a monitor spawned with
/// [`ConnectionManager::spawn_monitor`](crate::ConnectionManager::spawn_monitor).
///
/// Dropping the handle also stops the monitor, since the loop treats a
/// dropped shutdown sender as a shutdown request.
#[derive(Debug)]
pub struct MonitorHandle {
    shutdown: watch::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub(crate) fn new(shutdown: watch::Sender<()>, task: JoinHandle<()>) -> Self {
        Self { shutdown, task }
    }

    /// Returns `true` once the monitor task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signals the monitor to stop and waits for it to exit.
    pub async fn shutdown(self) {
        // An error means the loop already exited and dropped its receiver.
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            warn!("Network monitor task ended abnormally: {e}");
        }
    }
}

/// Runs `check` every `interval` until `shutdown` fires.
///
/// `check` returns whether the link is usable after the pass.
pub(crate) async fn monitor_connection<F, Fut>(
    interval: Duration,
    mut shutdown: watch::Receiver<()>,
    mut check: F,
) where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    info!("Starting network monitor (interval {interval:?})");
    let mut passes: u64 = 0;

    loop {
        {
            let mut pass = pin!(check().fuse());
            let mut stop = pin!(shutdown.changed().fuse());
            select! {
                _ = stop => {
                    info!("Network monitor stopped during a check after {passes} passes");
                    return;
                }
                connected = pass => {
                    passes += 1;
                    if connected {
                        debug!("Monitor pass {passes}: network available");
                    } else {
                        warn!("Monitor pass {passes}: network unavailable, retrying in {interval:?}");
                    }
                }
            }
        }

        let mut delay = pin!(sleep(interval).fuse());
        let mut stop = pin!(shutdown.changed().fuse());
        select! {
            _ = stop => {
                info!("Network monitor stopped after {passes} passes");
                return;
            }
            _ = delay => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::advance;

    const INTERVAL: Duration = Duration::from_secs(5);

    fn counting_check(count: Arc<AtomicU32>) -> impl FnMut() -> std::future::Ready<bool> {
        move || {
            count.fetch_add(1, Ordering::SeqCst);
            std::future::ready(true)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn checks_every_interval_until_shutdown() {
        let (tx, rx) = watch::channel(());
        let count = Arc::new(AtomicU32::new(0));

        let task = tokio::spawn(monitor_connection(INTERVAL, rx, counting_check(count.clone())));

        tokio::task::yield_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        advance(INTERVAL).await;
        tokio::task::yield_now().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tx.send(()).unwrap();
        task.await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_sender_stops_the_loop() {
        let (tx, rx) = watch::channel(());
        let count = Arc::new(AtomicU32::new(0));

        let task = tokio::spawn(monitor_connection(INTERVAL, rx, counting_check(count.clone())));
        drop(tx);

        task.await.unwrap();
        assert!(count.load(Ordering::SeqCst) <= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn handle_reports_finished_once_signalled() {
        let (tx, rx) = watch::channel(());
        let count = Arc::new(AtomicU32::new(0));
        let task = tokio::spawn(monitor_connection(INTERVAL, rx, counting_check(count)));
        let handle = MonitorHandle::new(tx, task);

        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        handle.shutdown.send(()).unwrap();
        sleep(Duration::from_millis(1)).await;
        assert!(handle.is_finished());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_a_running_check() {
        let (tx, rx) = watch::channel(());

        let task = tokio::spawn(monitor_connection(INTERVAL, rx, || async {
            sleep(Duration::from_secs(3600)).await;
            true
        }));

        tokio::task::yield_now().await;
        tx.send(()).unwrap();

        let start = tokio::time::Instant::now();
        task.await.unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
