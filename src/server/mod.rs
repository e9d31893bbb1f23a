//! Echo server
//!
//! The application that consumes the socket utility layer: its accept
//! loop, liveness scheduling and configuration.

pub mod config;
pub mod core;

pub use config::ServerConfig;
pub use core::Server;
