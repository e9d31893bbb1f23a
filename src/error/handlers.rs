//! Error handlers
//!
//! Provides error reporting and triage functions.

use crate::error::types::{SocketError, TcpSockError};
use log::error;

/// Log an error
pub fn handle_error(err: &TcpSockError) {
    error!("tcp-sock error: {}", err);
}

/// Whether the error must stop the server.
///
/// Listener setup failures (socket creation, options, bind, listen) and
/// configuration errors are fatal. Errors on a single client connection,
/// including options applied to an accepted stream, are not.
pub fn is_fatal(err: &TcpSockError) -> bool {
    match err {
        TcpSockError::Socket(e) => matches!(
            e,
            SocketError::Create(_)
                | SocketError::Configuration { .. }
                | SocketError::Bind { .. }
                | SocketError::Listen(_)
        ),
        TcpSockError::Client(_) => false,
        TcpSockError::Config(_) => true,
        TcpSockError::IoError(_) => false,
    }
}
