//! Contiguous port block allocator
//!
//! The pool allocator seeds each attempt with an OS-assigned ephemeral port
//! and then asks for the following numbers one by one. Whether the run ends
//! up contiguous is down to luck, so attempts are retried until one succeeds
//! or the deadline passes.

use crate::block::{is_contiguous, PortBlock};
use crate::config::PoolConfig;
use crate::error::PortError;
use crate::guard::Guard;
use crate::probe::{OsProbe, Probe};
use crate::reservation::ReservationSet;
use log::{debug, trace, warn};
use rand::Rng;
use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};

/// PoolAllocator hands out contiguous blocks of free TCP ports
///
/// Reserved ports are tracked in-process only. Other processes on the host
/// are free to bind them.
#[derive(Debug)]
pub struct PoolAllocator<P: Probe = OsProbe> {
    limit: usize,
    fail_fast: bool,
    backoff: Option<Duration>,
    guard: Guard,
    reserved: ReservationSet,
    probe: P,
}

/// Create an allocator probing the wildcard address
pub fn new_pool_allocator(synchronized: bool, limit: usize) -> PoolAllocator {
    PoolAllocator::new(
        PoolConfig::default()
            .with_synchronized(synchronized)
            .with_limit(limit),
    )
}

impl PoolAllocator {
    /// Create an allocator backed by OS probes on `config.host`
    pub fn new(config: PoolConfig) -> Self {
        let probe = OsProbe::new(config.host);
        Self::with_probe(config, probe)
    }
}

impl Default for PoolAllocator {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl<P: Probe> PoolAllocator<P> {
    /// Create an allocator with a custom probe
    pub fn with_probe(config: PoolConfig, probe: P) -> Self {
        PoolAllocator {
            limit: config.limit,
            fail_fast: config.fail_fast,
            backoff: config.backoff,
            guard: Guard::new(config.synchronized),
            reserved: ReservationSet::new(),
            probe,
        }
    }

    /// Reserve `count` contiguous ports, retrying until `timeout` elapses
    ///
    /// At least one attempt is always made, so a zero timeout means exactly
    /// one try. Only `AcquisitionTimeout` and `InvalidRequest` are returned;
    /// probe failures just trigger another attempt. A timeout too large to
    /// represent as an instant means no deadline at all.
    pub fn acquire(&self, count: usize, timeout: Duration) -> Result<PortBlock, PortError> {
        let start = Instant::now();
        let deadline = start.checked_add(timeout);

        if count == 0 || (self.fail_fast && count > self.limit) {
            return Err(PortError::InvalidRequest {
                count,
                limit: self.limit,
            });
        }

        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            if let Some(block) = self.guard.run_exclusive(|| self.try_block(count)) {
                debug!(
                    "Acquired {} port(s) starting at {} after {} attempt(s)",
                    count,
                    block.base(),
                    attempts
                );
                return Ok(block);
            }

            let now = Instant::now();
            if deadline.map_or(false, |deadline| now >= deadline) {
                let elapsed = now.duration_since(start);
                warn!(
                    "Gave up acquiring {} port(s) after {} attempt(s) in {:?}",
                    count, attempts, elapsed
                );
                return Err(PortError::AcquisitionTimeout {
                    count,
                    limit: self.limit,
                    elapsed,
                });
            }

            if let Some(max) = self.backoff {
                let mut pause = random_pause(max);
                if let Some(deadline) = deadline {
                    pause = pause.min(deadline.saturating_duration_since(now));
                }
                thread::sleep(pause);
            }
        }
    }

    /// Reserve a single port
    pub fn acquire_one(&self, timeout: Duration) -> Result<u16, PortError> {
        self.acquire(1, timeout).map(|block| block.base())
    }

    /// One candidate block; `None` when this attempt did not pan out.
    /// Must run inside the guard.
    fn try_block(&self, count: usize) -> Option<PortBlock> {
        if self.reserved.len() + count > self.limit {
            trace!("Pool full: {} reserved, limit {}", self.reserved.len(), self.limit);
            return None;
        }

        let mut ports = Vec::with_capacity(count);
        let mut next = None;
        for _ in 0..count {
            match self.probe.probe(next) {
                Ok(port) => ports.push(port),
                Err(err) => {
                    trace!("Abandoned attempt: {}", err);
                    return None;
                }
            }
            // Running off the end of the port space ends the attempt
            next = match ports.last().and_then(|p| p.checked_add(1)) {
                Some(port) => Some(port),
                None if ports.len() < count => return None,
                None => None,
            };
        }

        let mut seen = HashSet::with_capacity(count);
        if !ports.iter().all(|p| seen.insert(*p)) {
            trace!("Abandoned attempt: duplicate ports {:?}", ports);
            return None;
        }

        if let Some(taken) = ports.iter().find(|p| self.reserved.contains(**p)) {
            trace!("Abandoned attempt: port {} already reserved", taken);
            return None;
        }

        if !is_contiguous(&ports) {
            trace!("Abandoned attempt: {:?} is not contiguous", ports);
            return None;
        }

        self.reserved.add_all(ports.iter().copied());
        Some(PortBlock::new(ports))
    }

    /// Give a port back, returns false if it was not reserved
    pub fn release(&self, port: u16) -> bool {
        let removed = self.guard.run_exclusive(|| self.reserved.remove(port));
        if removed {
            debug!("Released port {}", port);
        }
        removed
    }

    /// Give back every port of `block`
    pub fn release_block(&self, block: &PortBlock) {
        self.guard.run_exclusive(|| {
            for port in block.iter() {
                self.reserved.remove(port);
            }
        });
        debug!("Released {} port(s) starting at {}", block.len(), block.base());
    }

    /// Check if a port is currently reserved
    pub fn is_reserved(&self, port: u16) -> bool {
        self.reserved.contains(port)
    }

    /// Number of reserved ports
    pub fn len(&self) -> usize {
        self.reserved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty()
    }

    /// Sorted list of reserved ports
    pub fn reserved_ports(&self) -> Vec<u16> {
        self.reserved.snapshot()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_synchronized(&self) -> bool {
        self.guard.is_engaged()
    }
}

fn random_pause(max: Duration) -> Duration {
    let nanos = u64::try_from(max.as_nanos()).unwrap_or(u64::MAX);
    Duration::from_nanos(rand::thread_rng().gen_range(0..=nanos))
}
