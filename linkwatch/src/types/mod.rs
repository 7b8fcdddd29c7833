//! Type definitions and constants.
//!
//! This module contains chip status codes and connection manager defaults.

pub mod constants;
