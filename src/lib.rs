//! tcp-sock
//!
//! Small TCP socket utilities: keep-alive tuned server sockets, outbound
//! client sockets, blocking and timeout-bounded receives, socket buffer
//! sizing, and liveness checks over a fixed pool of client connections.
//! An echo server built on them lives in [`server`].

pub mod client;
pub mod error;
pub mod server;
pub mod socket;
pub mod utils;

pub use client::{ClientPool, Liveness, LivenessReport};
pub use error::{ClientError, SocketError, TcpSockError};
pub use server::{Server, ServerConfig};
pub use socket::RecvOutcome;
