//! Error types
//!
//! Defines the error types for the socket layer, the client pool and the
//! echo server application.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::os::fd::RawFd;

/// Socket layer errors
///
/// Each variant names the step that failed and keeps the OS error that
/// caused it.
#[derive(Debug)]
pub enum SocketError {
    /// `socket()` failed
    Create(io::Error),
    /// A socket option could not be applied
    Configuration {
        option: &'static str,
        source: io::Error,
    },
    Bind {
        addr: SocketAddr,
        source: io::Error,
    },
    Listen(io::Error),
    /// The address is not a dotted-quad IPv4 literal
    InvalidAddress(String),
    Connect {
        addr: SocketAddr,
        source: io::Error,
    },
    Send(io::Error),
    Recv(io::Error),
    /// Waiting for readability failed
    Wait(io::Error),
    /// The descriptor cannot be placed in an `fd_set`
    DescriptorOutOfRange(RawFd),
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketError::Create(e) => write!(f, "Socket creation failed: {}", e),
            SocketError::Configuration { option, source } => {
                write!(f, "Setsockopt {} failed: {}", option, source)
            }
            SocketError::Bind { addr, source } => write!(f, "Bind to {} failed: {}", addr, source),
            SocketError::Listen(e) => write!(f, "Listen failed: {}", e),
            SocketError::InvalidAddress(a) => {
                write!(f, "Invalid address / address not supported: {}", a)
            }
            SocketError::Connect { addr, source } => {
                write!(f, "Connection to {} failed: {}", addr, source)
            }
            SocketError::Send(e) => write!(f, "send failed: {}", e),
            SocketError::Recv(e) => write!(f, "recv failed: {}", e),
            SocketError::Wait(e) => write!(f, "select error: {}", e),
            SocketError::DescriptorOutOfRange(fd) => {
                write!(f, "Descriptor {} exceeds FD_SETSIZE", fd)
            }
        }
    }
}

impl std::error::Error for SocketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SocketError::Create(e)
            | SocketError::Listen(e)
            | SocketError::Send(e)
            | SocketError::Recv(e)
            | SocketError::Wait(e) => Some(e),
            SocketError::Configuration { source, .. }
            | SocketError::Bind { source, .. }
            | SocketError::Connect { source, .. } => Some(source),
            SocketError::InvalidAddress(_) | SocketError::DescriptorOutOfRange(_) => None,
        }
    }
}

impl SocketError {
    /// Shorthand for a failed `setsockopt`.
    pub fn configuration(option: &'static str, source: io::Error) -> Self {
        SocketError::Configuration { option, source }
    }

    /// Kind of the underlying OS error, if there is one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            SocketError::Create(e)
            | SocketError::Listen(e)
            | SocketError::Send(e)
            | SocketError::Recv(e)
            | SocketError::Wait(e) => Some(e.kind()),
            SocketError::Configuration { source, .. }
            | SocketError::Bind { source, .. }
            | SocketError::Connect { source, .. } => Some(source.kind()),
            SocketError::InvalidAddress(_) | SocketError::DescriptorOutOfRange(_) => None,
        }
    }
}

/// Client pool errors
#[derive(Debug)]
pub enum ClientError {
    PoolFull { capacity: usize },
    SlotOutOfRange(usize),
    /// Options could not be applied to one accepted connection
    StreamSetup {
        addr: SocketAddr,
        source: SocketError,
    },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::PoolFull { capacity } => {
                write!(f, "Client pool is full ({} slots)", capacity)
            }
            ClientError::SlotOutOfRange(idx) => write!(f, "Client slot {} is out of range", idx),
            ClientError::StreamSetup { addr, source } => {
                write!(f, "Setup of client {} failed: {}", addr, source)
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::StreamSetup { source, .. } => Some(source),
            ClientError::PoolFull { .. } | ClientError::SlotOutOfRange(_) => None,
        }
    }
}

/// General error that encompasses all error types
#[derive(Debug)]
pub enum TcpSockError {
    Socket(SocketError),
    Client(ClientError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for TcpSockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TcpSockError::Socket(e) => write!(f, "Socket error: {}", e),
            TcpSockError::Client(e) => write!(f, "Client error: {}", e),
            TcpSockError::Config(e) => write!(f, "Configuration error: {}", e),
            TcpSockError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for TcpSockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TcpSockError::Socket(e) => Some(e),
            TcpSockError::Client(e) => Some(e),
            TcpSockError::Config(e) => Some(e),
            TcpSockError::IoError(e) => Some(e),
        }
    }
}

impl From<SocketError> for TcpSockError {
    fn from(error: SocketError) -> Self {
        TcpSockError::Socket(error)
    }
}

impl From<ClientError> for TcpSockError {
    fn from(error: ClientError) -> Self {
        TcpSockError::Client(error)
    }
}

impl From<config::ConfigError> for TcpSockError {
    fn from(error: config::ConfigError) -> Self {
        TcpSockError::Config(error)
    }
}

impl From<io::Error> for TcpSockError {
    fn from(error: io::Error) -> Self {
        TcpSockError::IoError(error)
    }
}
