//! Connectivity monitoring and status reporting.
//!
//! This module provides the background monitor loop and the read-only
//! accessors used to report the current connection.

pub(crate) mod info;
pub(crate) mod monitor;
