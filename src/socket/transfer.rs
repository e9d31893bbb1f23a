//! Message transfer
//!
//! Thin wrappers over a single `send` or `recv`. There is no framing and no
//! retry: a short send or receive is returned to the caller as is.

use log::{debug, error};
use std::io::{self, Read, Write};
use std::mem::MaybeUninit;
use std::net::TcpStream;
use std::os::fd::{AsRawFd, RawFd};
use std::ptr;
use std::time::Duration;

use crate::error::SocketError;

/// Result of a timeout-bounded receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvOutcome {
    /// `n` bytes were written to the front of the buffer
    Received(usize),
    /// Nothing became readable before the timeout
    TimedOut,
    /// The peer closed the connection
    Disconnected,
}

impl RecvOutcome {
    /// Byte count for `Received`, `None` otherwise.
    pub fn bytes(&self) -> Option<usize> {
        match self {
            RecvOutcome::Received(n) => Some(*n),
            _ => None,
        }
    }
}

/// Sends `buf` with one `send` call and returns how many bytes the OS took.
pub fn send_message(stream: &TcpStream, buf: &[u8]) -> Result<usize, SocketError> {
    let mut writer = stream;
    writer.write(buf).map_err(|e| {
        error!("send failed: {}", e);
        SocketError::Send(e)
    })
}

/// Blocks until one `recv` completes. `Ok(0)` means the peer closed.
pub fn recv_msg_blocking(stream: &TcpStream, buf: &mut [u8]) -> Result<usize, SocketError> {
    let mut reader = stream;
    reader.read(buf).map_err(|e| {
        error!("recv failed: {}", e);
        SocketError::Recv(e)
    })
}

/// Waits up to `timeout` for `stream` to become readable, then performs
/// exactly one `recv`.
pub fn recv_msg_timeout(
    stream: &TcpStream,
    buf: &mut [u8],
    timeout: Duration,
) -> Result<RecvOutcome, SocketError> {
    if !wait_readable(stream.as_raw_fd(), timeout)? {
        debug!(
            "Timeout: no data received within {} ms",
            timeout.as_millis()
        );
        return Ok(RecvOutcome::TimedOut);
    }

    if buf.is_empty() {
        return Ok(RecvOutcome::Received(0));
    }

    let mut reader = stream;
    match reader.read(buf) {
        Ok(0) => Ok(RecvOutcome::Disconnected),
        Ok(n) => Ok(RecvOutcome::Received(n)),
        Err(e) => {
            error!("recv failed: {}", e);
            Err(SocketError::Recv(e))
        }
    }
}

/// Splits `timeout` into whole seconds and the remaining microseconds.
pub fn timeout_to_timeval(timeout: Duration) -> libc::timeval {
    libc::timeval {
        tv_sec: timeout.as_secs().min(libc::time_t::MAX as u64) as libc::time_t,
        tv_usec: timeout.subsec_micros() as libc::suseconds_t,
    }
}

fn wait_readable(fd: RawFd, timeout: Duration) -> Result<bool, SocketError> {
    if fd < 0 || fd as usize >= libc::FD_SETSIZE as usize {
        return Err(SocketError::DescriptorOutOfRange(fd));
    }

    let mut read_fds = MaybeUninit::<libc::fd_set>::uninit();
    let mut tv = timeout_to_timeval(timeout);

    // SAFETY: FD_ZERO initialises the set before FD_SET and select use it,
    // and fd was checked against FD_SETSIZE above.
    let ret = unsafe {
        libc::FD_ZERO(read_fds.as_mut_ptr());
        libc::FD_SET(fd, read_fds.as_mut_ptr());
        libc::select(
            fd + 1,
            read_fds.as_mut_ptr(),
            ptr::null_mut(),
            ptr::null_mut(),
            &mut tv,
        )
    };

    if ret < 0 {
        let e = io::Error::last_os_error();
        error!("select error: {}", e);
        return Err(SocketError::Wait(e));
    }
    Ok(ret > 0)
}
