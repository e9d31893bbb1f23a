//! Utility functions
//!
//! Provides logging and network address utilities.

pub mod logging;
pub mod network;
