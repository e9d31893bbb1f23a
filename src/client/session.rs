//! Echo session
//!
//! Serves one accepted client: everything received is sent back until the
//! peer disconnects.

use log::{debug, info};
use std::io;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use crate::error::SocketError;
use crate::socket::{RecvOutcome, recv_msg_timeout, send_message};

/// Runs the echo loop on a blocking stream and returns the number of bytes
/// echoed. Timeouts only re-arm the wait.
pub fn run_echo_session(
    stream: TcpStream,
    client_addr: SocketAddr,
    recv_timeout: Duration,
    buffer_size: usize,
) -> Result<u64, SocketError> {
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut echoed = 0u64;

    loop {
        match recv_msg_timeout(&stream, &mut buf, recv_timeout)? {
            RecvOutcome::Received(n) => {
                debug!("Received {} bytes from {}", n, client_addr);
                send_all(&stream, &buf[..n])?;
                echoed += n as u64;
            }
            RecvOutcome::TimedOut => continue,
            RecvOutcome::Disconnected => {
                info!("Connection closed by client {}", client_addr);
                return Ok(echoed);
            }
        }
    }
}

/// `send_message` reports short sends; loop until everything is out.
fn send_all(stream: &TcpStream, mut data: &[u8]) -> Result<(), SocketError> {
    while !data.is_empty() {
        let sent = send_message(stream, data)?;
        if sent == 0 {
            return Err(SocketError::Send(io::Error::from(io::ErrorKind::WriteZero)));
        }
        data = &data[sent..];
    }
    Ok(())
}
