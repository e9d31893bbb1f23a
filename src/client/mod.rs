//! Client management
//!
//! Tracks accepted client connections in a fixed-size pool, detects
//! disconnected peers, and serves each client an echo session.

pub mod pool;
pub mod results;
pub mod session;

pub use pool::{ClientPool, handle_client_disconnection, probe_connection};
pub use results::{Liveness, LivenessReport};
pub use session::run_echo_session;
