//! Client pool
//!
//! A fixed number of slots, each either empty or holding one connected
//! client stream. The pool never grows past the capacity it was built with.

use log::{debug, info, warn};
use socket2::SockRef;
use std::io::ErrorKind;
use std::mem::MaybeUninit;
use std::net::{SocketAddr, Shutdown, TcpStream};

use crate::client::results::{Liveness, LivenessReport};
use crate::error::ClientError;

struct PooledClient {
    stream: TcpStream,
    peer: Option<SocketAddr>,
}

pub struct ClientPool {
    slots: Vec<Option<PooledClient>>,
}

impl ClientPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    /// Stores `stream` in the first free slot and returns its index.
    ///
    /// When every slot is taken the stream is dropped, which closes it.
    pub fn insert(&mut self, stream: TcpStream) -> Result<usize, ClientError> {
        let Some(slot) = self.slots.iter().position(|slot| slot.is_none()) else {
            return Err(ClientError::PoolFull {
                capacity: self.capacity(),
            });
        };

        let peer = stream.peer_addr().ok();
        self.slots[slot] = Some(PooledClient { stream, peer });
        Ok(slot)
    }

    /// Takes the stream out of `slot`, leaving it empty.
    pub fn remove(&mut self, slot: usize) -> Result<Option<TcpStream>, ClientError> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(ClientError::SlotOutOfRange(slot))?;
        Ok(entry.take().map(|client| client.stream))
    }

    pub fn get(&self, slot: usize) -> Option<&TcpStream> {
        self.slots
            .get(slot)
            .and_then(|entry| entry.as_ref())
            .map(|client| &client.stream)
    }

    /// Peer address recorded when the client was inserted.
    pub fn peer_addr(&self, slot: usize) -> Option<SocketAddr> {
        self.slots
            .get(slot)
            .and_then(|entry| entry.as_ref())
            .and_then(|client| client.peer)
    }

    /// Occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &TcpStream)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| entry.as_ref().map(|client| (idx, &client.stream)))
    }

    /// Probes every occupied slot once.
    ///
    /// Clients that closed their end are passed to
    /// [`handle_client_disconnection`] and their slot is emptied. Slots whose
    /// probe fails with an error are reported but kept; what to do with them
    /// is up to the caller.
    pub fn check_client_connections(&mut self) -> Vec<LivenessReport> {
        let mut reports = Vec::new();

        for (slot, entry) in self.slots.iter_mut().enumerate() {
            let Some(client) = entry.as_ref() else {
                continue;
            };

            let liveness = probe_connection(&client.stream);
            let peer = client.peer;

            if liveness.is_disconnected() {
                debug!("Client socket in slot {} appears to have disconnected", slot);
                if let Some(client) = entry.take() {
                    handle_client_disconnection(client.stream, peer);
                }
            }

            reports.push(LivenessReport {
                slot,
                peer,
                liveness,
            });
        }

        reports
    }

    /// Shuts down and drops every pooled stream. Returns how many were closed.
    ///
    /// Shutting the socket down also wakes any other handle to the same
    /// connection that is blocked in a receive.
    pub fn shutdown_all(&mut self) -> usize {
        let mut closed = 0;
        for entry in self.slots.iter_mut() {
            if let Some(client) = entry.take() {
                if let Err(e) = client.stream.shutdown(Shutdown::Both) {
                    debug!("Shutdown of {} failed: {}", describe_peer(client.peer), e);
                }
                closed += 1;
            }
        }
        closed
    }
}

/// Non-blocking, non-consuming one-byte peek.
pub fn probe_connection(stream: &TcpStream) -> Liveness {
    let mut byte = [MaybeUninit::<u8>::uninit(); 1];
    match SockRef::from(stream).recv_with_flags(&mut byte, libc::MSG_PEEK | libc::MSG_DONTWAIT) {
        Ok(0) => Liveness::Disconnected,
        Ok(_) => Liveness::StillConnected,
        Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
            Liveness::StillConnected
        }
        Err(e) => {
            warn!("Liveness probe failed: {}", e);
            Liveness::Error(e)
        }
    }
}

/// Closes a client connection whose peer has gone away.
///
/// `peer` is the address recorded while the connection was alive; a closed
/// socket may no longer report one.
pub fn handle_client_disconnection(stream: TcpStream, peer: Option<SocketAddr>) {
    info!("Client {} disconnected, closing socket", describe_peer(peer));
    drop(stream);
}

fn describe_peer(peer: Option<SocketAddr>) -> String {
    peer.map(|addr| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
