//! Port availability probe

use log::debug;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::utils::network::any_ipv4;

/// Checks whether `INADDR_ANY:port` can currently be bound.
///
/// A throwaway socket is bound and closed again whatever the outcome. The
/// answer is only a hint: another process may take the port before the
/// caller binds it.
pub fn is_port_available(port: u16) -> bool {
    let socket = match Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP)) {
        Ok(socket) => socket,
        Err(e) => {
            debug!("Port probe could not create a socket: {}", e);
            return false;
        }
    };

    match socket.bind(&SockAddr::from(any_ipv4(port))) {
        Ok(()) => true,
        Err(e) => {
            debug!("Port {} is not available: {}", port, e);
            false
        }
    }
}
