//! OS socket buffer sizing

use log::{debug, error};
use socket2::SockRef;
use std::os::fd::AsFd;

use crate::error::SocketError;

/// Sets `SO_RCVBUF` to `rx` and `SO_SNDBUF` to `tx` bytes.
///
/// The kernel may round or double the values; read them back with
/// [`socket_buffer_size`].
pub fn set_socket_buffer_size<S: AsFd>(sock: &S, rx: usize, tx: usize) -> Result<(), SocketError> {
    let sock = SockRef::from(sock);

    sock.set_recv_buffer_size(rx).map_err(|e| {
        error!("Setsockopt SO_RCVBUF failed: {}", e);
        SocketError::configuration("SO_RCVBUF", e)
    })?;

    sock.set_send_buffer_size(tx).map_err(|e| {
        error!("Setsockopt SO_SNDBUF failed: {}", e);
        SocketError::configuration("SO_SNDBUF", e)
    })?;

    debug!("Socket buffers set to rx={} tx={}", rx, tx);
    Ok(())
}

/// Effective `(SO_RCVBUF, SO_SNDBUF)` sizes.
pub fn socket_buffer_size<S: AsFd>(sock: &S) -> Result<(usize, usize), SocketError> {
    let sock = SockRef::from(sock);
    let rx = sock
        .recv_buffer_size()
        .map_err(|e| SocketError::configuration("SO_RCVBUF", e))?;
    let tx = sock
        .send_buffer_size()
        .map_err(|e| SocketError::configuration("SO_SNDBUF", e))?;
    Ok((rx, tx))
}
