use log::{debug, error, info, warn};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::MissedTickBehavior;

use crate::client::{ClientPool, Liveness, handle_client_disconnection, run_echo_session};
use crate::error::handlers::{handle_error, is_fatal};
use crate::error::{ClientError, TcpSockError};
use crate::server::config::ServerConfig;
use crate::socket::{create_server_socket, is_port_available, set_socket_buffer_size};

/// Echo server built on the socket utility layer.
///
/// One task runs the accept loop and the periodic liveness scan; each
/// client's echo session runs on tokio's blocking pool.
pub struct Server {
    listener: TcpListener,
    pool: ClientPool,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Creates the listening socket described by `config`.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn new(config: ServerConfig) -> Result<Self, TcpSockError> {
        config.validate()?;

        if !is_port_available(config.port) {
            warn!(
                "Port {} is already in use; binding may fail",
                config.port
            );
        }

        let listener = create_server_socket(config.port, config.backlog())?;
        set_socket_buffer_size(&listener, config.rx_buffer_size, config.tx_buffer_size)?;
        listener.set_nonblocking(true)?;
        let listener = TcpListener::from_std(listener)?;

        info!("Server bound to {}", listener.local_addr()?);

        Ok(Self {
            listener,
            pool: ClientPool::new(config.max_clients),
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves clients until Ctrl-C.
    pub async fn start(&mut self) -> Result<(), TcpSockError> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
        })
        .await
    }

    /// Serves clients until `shutdown` completes or a fatal error occurs,
    /// then closes every pooled client.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<(), TcpSockError>
    where
        F: Future<Output = ()>,
    {
        let Server {
            listener,
            pool,
            config,
        } = self;

        info!(
            "Starting tcp-sock server on {} (max {} clients)",
            listener.local_addr()?,
            config.max_clients
        );

        let mut ticker = tokio::time::interval(config.liveness_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break Ok(());
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        if let Err(e) = register_client(pool, config, stream, addr) {
                            if is_fatal(&e) {
                                handle_error(&e);
                                break Err(e);
                            }
                            warn!("Failed to register client {}: {}", addr, e);
                        }
                    }
                    Err(e) => error!("Error accepting connection: {}", e),
                },
                _ = ticker.tick() => scan_clients(pool),
            }
        };

        let closed = pool.shutdown_all();
        info!("Closed {} client connection(s)", closed);
        result
    }
}

/// Moves an accepted connection into the pool and starts its echo session.
fn register_client(
    pool: &mut ClientPool,
    config: &Arc<ServerConfig>,
    stream: TcpStream,
    addr: SocketAddr,
) -> Result<(), TcpSockError> {
    let stream = stream.into_std()?;
    stream.set_nonblocking(false)?;

    if pool.is_full() {
        return Err(ClientError::PoolFull {
            capacity: pool.capacity(),
        }
        .into());
    }

    configure_client_stream(&stream, config, addr)?;
    let session_stream = stream.try_clone()?;
    let slot = pool.insert(stream)?;

    info!(
        "Accepted client {} in slot {} ({}/{} clients)",
        addr,
        slot,
        pool.len(),
        pool.capacity()
    );

    let recv_timeout = config.recv_timeout();
    let buffer_size = config.message_buffer_size;
    tokio::task::spawn_blocking(move || {
        match run_echo_session(session_stream, addr, recv_timeout, buffer_size) {
            Ok(echoed) => info!("Session {} ended after echoing {} bytes", addr, echoed),
            Err(e) => handle_error(&e.into()),
        }
    });

    Ok(())
}

/// Applies the configured buffer sizes to one accepted client.
///
/// Failures belong to that client alone and never stop the server.
fn configure_client_stream(
    stream: &std::net::TcpStream,
    config: &ServerConfig,
    addr: SocketAddr,
) -> Result<(), ClientError> {
    set_socket_buffer_size(stream, config.rx_buffer_size, config.tx_buffer_size)
        .map_err(|source| ClientError::StreamSetup { addr, source })
}

/// Runs the liveness scan and evicts clients whose probe failed.
fn scan_clients(pool: &mut ClientPool) {
    if pool.is_empty() {
        return;
    }

    for report in pool.check_client_connections() {
        match report.liveness {
            Liveness::StillConnected => {}
            Liveness::Disconnected => debug!("Slot {} freed", report.slot),
            Liveness::Error(e) => {
                warn!(
                    "Evicting client in slot {} after failed probe: {}",
                    report.slot, e
                );
                if let Ok(Some(stream)) = pool.remove(report.slot) {
                    handle_client_disconnection(stream, report.peer);
                }
            }
        }
    }
}
