//! Listening server sockets
//!
//! Server sockets reuse their address and probe idle peers with TCP
//! keep-alive: a silent peer is declared dead after roughly
//! `KEEPALIVE_IDLE + KEEPALIVE_PROBES * KEEPALIVE_INTERVAL` (25 s).

use log::{error, info};
use socket2::{Domain, Protocol, SockAddr, Socket, TcpKeepalive, Type};
use std::net::TcpListener;
use std::time::Duration;

use crate::error::SocketError;
use crate::utils::network::any_ipv4;

/// Idle time before the first keep-alive probe (`TCP_KEEPIDLE`)
pub const KEEPALIVE_IDLE: Duration = Duration::from_secs(10);
/// Time between probes (`TCP_KEEPINTVL`)
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(5);
/// Unanswered probes before the connection is dropped (`TCP_KEEPCNT`)
pub const KEEPALIVE_PROBES: u32 = 3;

/// Keep-alive timers applied to every server socket.
pub fn keepalive_params() -> TcpKeepalive {
    TcpKeepalive::new()
        .with_time(KEEPALIVE_IDLE)
        .with_interval(KEEPALIVE_INTERVAL)
        .with_retries(KEEPALIVE_PROBES)
}

/// Creates a TCP/IPv4 socket listening on `INADDR_ANY:port`.
///
/// # Arguments
///
/// * `port` - Port to listen on; `0` picks an ephemeral port
/// * `max_clients` - Listen backlog
///
/// # Returns
///
/// * `Ok(TcpListener)` - Bound, listening socket with keep-alive enabled
/// * `Err(SocketError)` - The first step that failed; nothing is left open
pub fn create_server_socket(port: u16, max_clients: i32) -> Result<TcpListener, SocketError> {
    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP)).map_err(|e| {
        error!("Socket failed: {}", e);
        SocketError::Create(e)
    })?;

    socket
        .set_reuse_address(true)
        .map_err(|e| setsockopt_failed("SO_REUSEADDR", e))?;
    socket
        .set_reuse_port(true)
        .map_err(|e| setsockopt_failed("SO_REUSEPORT", e))?;

    socket
        .set_keepalive(true)
        .map_err(|e| setsockopt_failed("SO_KEEPALIVE", e))?;
    socket
        .set_tcp_keepalive(&keepalive_params())
        .map_err(|e| setsockopt_failed("TCP_KEEPIDLE/TCP_KEEPINTVL/TCP_KEEPCNT", e))?;

    let addr = any_ipv4(port);
    socket.bind(&SockAddr::from(addr)).map_err(|e| {
        error!("Bind failed on {}: {}", addr, e);
        SocketError::Bind { addr, source: e }
    })?;

    socket.listen(max_clients).map_err(|e| {
        error!("Listen failed: {}", e);
        SocketError::Listen(e)
    })?;

    let listener: TcpListener = socket.into();
    info!(
        "Server socket listening on {} (backlog {})",
        listener.local_addr().map(|a| a.to_string()).unwrap_or_else(|_| addr.to_string()),
        max_clients
    );
    Ok(listener)
}

fn setsockopt_failed(option: &'static str, e: std::io::Error) -> SocketError {
    error!("Setsockopt {} failed: {}", option, e);
    SocketError::configuration(option, e)
}
