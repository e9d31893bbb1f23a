//! Error handling
//!
//! Defines error types and handling for the socket layer and the server.

pub mod handlers;
pub mod types;

pub use types::*;
