//! Client result types
//!
//! Defines the outcomes reported by the liveness scan.

use std::io;
use std::net::SocketAddr;

/// Outcome of probing one pooled connection
#[derive(Debug)]
pub enum Liveness {
    /// The peer performed an orderly close
    Disconnected,
    /// Data is pending or the probe would block
    StillConnected,
    /// The probe failed for another reason
    Error(io::Error),
}

impl Liveness {
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Liveness::Disconnected)
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Liveness::StillConnected)
    }
}

/// Result of probing a single slot during a scan
#[derive(Debug)]
pub struct LivenessReport {
    pub slot: usize,
    pub peer: Option<SocketAddr>,
    pub liveness: Liveness,
}
