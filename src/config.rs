//! Pool allocator configuration

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Default maximum number of concurrently reserved ports
pub const DEFAULT_LIMIT: usize = 65536;

/// Default probe address (wildcard, like a plain listening socket)
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Options for a PoolAllocator
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum number of ports reserved at once
    pub limit: usize,

    /// Whether acquisition attempts are serialized by a lock
    pub synchronized: bool,

    /// Address probes bind on
    pub host: IpAddr,

    /// Upper bound of the random pause between failed attempts,
    /// `None` retries immediately
    pub backoff: Option<Duration>,

    /// Reject requests larger than `limit` up front instead of
    /// spinning until the deadline
    pub fail_fast: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            limit: DEFAULT_LIMIT,
            synchronized: true,
            host: DEFAULT_HOST,
            backoff: None,
            fail_fast: true,
        }
    }
}

impl PoolConfig {
    /// Set the reservation limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set whether attempts are serialized
    pub fn with_synchronized(mut self, synchronized: bool) -> Self {
        self.synchronized = synchronized;
        self
    }

    /// Set the probe address
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Set the maximum backoff between attempts
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = Some(backoff);
        self
    }

    /// Set whether oversized requests are rejected immediately
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}
