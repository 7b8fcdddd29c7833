//! In-memory collaborators for tests and the simulator.
//!
//! [`ScriptedLink`] stands in for the chip driver and [`RecordingNotifier`]
//! for the status LED, so the full connection state machine can run on a
//! host without hardware.

mod recording;
mod scripted;

pub use recording::{Notification, RecordingNotifier};
pub use scripted::ScriptedLink;
