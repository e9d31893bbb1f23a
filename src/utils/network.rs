//! Network utilities
//!
//! Address helpers shared by the socket constructors.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// `INADDR_ANY:port`
pub fn any_ipv4(port: u16) -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port))
}

/// Parse a dotted-quad IPv4 literal. Host names and IPv6 are rejected;
/// no name resolution is attempted.
pub fn parse_ipv4_literal(ip: &str) -> Option<Ipv4Addr> {
    ip.parse::<Ipv4Addr>().ok()
}
