//! Core internal logic for connection management.
//!
//! This module contains the status polling primitive, connect/disconnect
//! orchestration, the retry loop and the bookkeeping they share.

pub(crate) mod connection;
pub(crate) mod retry;
pub(crate) mod session;
pub(crate) mod state_wait;
