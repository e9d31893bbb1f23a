//! Socket utility layer
//!
//! Synchronous wrappers over the BSD socket calls: each function performs
//! one OS operation and returns its error instead of retrying.

pub mod buffers;
pub mod client;
pub mod listener;
pub mod probe;
pub mod transfer;

pub use buffers::{set_socket_buffer_size, socket_buffer_size};
pub use client::create_client_socket;
pub use listener::{
    KEEPALIVE_IDLE, KEEPALIVE_INTERVAL, KEEPALIVE_PROBES, create_server_socket, keepalive_params,
};
pub use probe::is_port_available;
pub use transfer::{RecvOutcome, recv_msg_blocking, recv_msg_timeout, send_message};
