use async_trait::async_trait;
use log::debug;
use tokio::time::sleep;

use crate::util::utils::half_period;

/// Fire-and-forget visual notifications, typically a status LED.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Flashes `count` times at `hz`, returning once the pattern is done.
    async fn flash(&self, count: u32, hz: f32);

    /// Flashes at `hz` until the caller drops the returned future.
    async fn constant_flash(&self, hz: f32);
}

/// A status LED that exists only in the log.
///
/// Each on/off edge is logged at debug level and the half periods are really
/// slept, so callers observe the same timing a physical LED would impose.
#[derive(Debug, Clone)]
pub struct LoggingLed {
    pin: String,
}

impl LoggingLed {
    /// Creates an LED labelled with `pin` in log output.
    pub fn new(pin: impl Into<String>) -> Self {
        Self { pin: pin.into() }
    }

    /// The onboard LED.
    pub fn onboard() -> Self {
        Self::new("LED")
    }

    fn on(&self) {
        debug!("Pin {}: LED on", self.pin);
    }

    fn off(&self) {
        debug!("Pin {}: LED off", self.pin);
    }

    async fn cycle(&self, hz: f32) {
        let half = half_period(hz);
        sleep(half).await;
        self.on();
        sleep(half).await;
        self.off();
    }
}

#[async_trait]
impl NotificationSink for LoggingLed {
    async fn flash(&self, count: u32, hz: f32) {
        self.off();
        for _ in 0..count {
            self.cycle(hz).await;
        }
    }

    async fn constant_flash(&self, hz: f32) {
        self.off();
        loop {
            self.cycle(hz).await;
        }
    }
}
