//! Interfaces to the collaborators the connection manager drives.
//!
//! The manager never talks to hardware directly. It samples and commands the
//! network stack through [`LinkStatusSource`] and reports progress through a
//! [`NotificationSink`].

mod notify;
mod source;

pub use notify::{LoggingLed, NotificationSink};
pub use source::{LinkStatusSource, format_mac};
