//! Sequential range allocator
//!
//! Hands out the lowest free port of a fixed inclusive range. It never talks
//! to the OS; a port being "free" only means nobody in this process holds it.

use crate::error::PortError;
use log::debug;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// RangeAllocator manages the ports of a bounded range
pub struct RangeAllocator {
    start: u16,
    end: u16,
    used: Arc<Mutex<HashSet<u16>>>,
}

impl RangeAllocator {
    /// Create a new RangeAllocator over `start..=end`
    pub fn new_from_range(start: u16, end: u16) -> Self {
        RangeAllocator {
            start,
            end,
            used: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Create a new RangeAllocator with the default range (10000-10010)
    pub fn new_default() -> Self {
        Self::new_from_range(10000, 10010)
    }

    fn used(&self) -> MutexGuard<'_, HashSet<u16>> {
        self.used.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn in_range(&self, port: u16) -> bool {
        port >= self.start && port <= self.end
    }

    /// Allocate a port
    /// If preferred is Some and free, that port is used, otherwise the
    /// lowest free port in the range
    pub fn allocate(&self, preferred: Option<u16>) -> Result<u16, PortError> {
        let mut used = self.used();

        if let Some(port) = preferred {
            if self.in_range(port) && used.insert(port) {
                debug!("Allocated preferred port {}", port);
                return Ok(port);
            }
        }

        for port in self.start..=self.end {
            if used.insert(port) {
                debug!("Allocated port {}", port);
                return Ok(port);
            }
        }

        Err(PortError::NoAvailablePorts {
            start: self.start,
            end: self.end,
        })
    }

    /// Return a port to the range, ports outside it are ignored
    pub fn release(&self, port: u16) {
        if self.in_range(port) && self.used().remove(&port) {
            debug!("Released port {}", port);
        }
    }

    /// Check if a port is in use
    pub fn is_used(&self, port: u16) -> bool {
        self.used().contains(&port)
    }

    /// Get the number of used ports
    pub fn used_count(&self) -> usize {
        self.used().len()
    }

    /// Get the number of available ports
    pub fn available_count(&self) -> usize {
        (usize::from(self.end) + 1).saturating_sub(usize::from(self.start)) - self.used_count()
    }
}

impl Default for RangeAllocator {
    fn default() -> Self {
        Self::new_default()
    }
}

impl Clone for RangeAllocator {
    fn clone(&self) -> Self {
        RangeAllocator {
            start: self.start,
            end: self.end,
            used: self.used.clone(),
        }
    }
}
