//! Outbound client sockets

use log::{debug, error};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::net::{SocketAddr, SocketAddrV4, TcpStream};

use crate::error::SocketError;
use crate::utils::network::parse_ipv4_literal;

/// Creates a TCP/IPv4 socket and connects it to `ip:port`.
///
/// `ip` must be a dotted-quad literal. The connect blocks until it
/// completes or the OS gives up; there is no retry.
pub fn create_client_socket(ip: &str, port: u16) -> Result<TcpStream, SocketError> {
    let Some(ip_addr) = parse_ipv4_literal(ip) else {
        error!("Invalid address/ Address not supported: {}", ip);
        return Err(SocketError::InvalidAddress(ip.to_string()));
    };
    let addr = SocketAddr::V4(SocketAddrV4::new(ip_addr, port));

    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP)).map_err(|e| {
        error!("Socket creation error: {}", e);
        SocketError::Create(e)
    })?;

    socket.connect(&SockAddr::from(addr)).map_err(|e| {
        error!("Connection to {} failed: {}", addr, e);
        SocketError::Connect { addr, source: e }
    })?;

    debug!("Connected to {}", addr);
    Ok(socket.into())
}
