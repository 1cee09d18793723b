//! Error types for portblock

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by the port allocators
#[derive(Debug, Error)]
pub enum PortError {
    /// The OS refused to bind the requested port (0 means "any port")
    #[error("port {port} is unavailable: {source}")]
    PortUnavailable {
        port: u16,
        #[source]
        source: io::Error,
    },

    /// No contiguous block could be assembled before the deadline
    #[error(
        "can't find a place in the pool of {limit} ports for {count} port(s), in {:.3}s",
        .elapsed.as_secs_f64()
    )]
    AcquisitionTimeout {
        count: usize,
        limit: usize,
        elapsed: Duration,
    },

    /// The request can never be satisfied by this allocator
    #[error("invalid request for {count} port(s) from a pool of {limit} ports")]
    InvalidRequest { count: usize, limit: usize },

    /// The sequential range allocator has nothing left
    #[error("no available ports in the range {start} to {end}")]
    NoAvailablePorts { start: u16, end: u16 },
}
