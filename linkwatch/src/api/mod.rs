//! Public API module.
//!
//! This module contains the high-level user-facing API for the `linkwatch` crate.

pub mod config;
pub mod connection_manager;
pub mod models;
