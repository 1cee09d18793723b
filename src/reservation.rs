//! In-process reservation set

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// ReservationSet records the ports currently handed out to callers
///
/// Membership only means "do not give this number to anyone else"; the OS
/// socket used to discover the port is already closed.
#[derive(Debug, Default)]
pub struct ReservationSet {
    ports: Mutex<HashSet<u16>>,
}

impl ReservationSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<u16>> {
        // Every mutation is a single insert or remove, so a poisoned set is
        // still consistent
        self.ports.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check if a port is reserved
    pub fn contains(&self, port: u16) -> bool {
        self.lock().contains(&port)
    }

    /// Reserve every port in `ports`
    ///
    /// The caller has already checked the ports are distinct and absent.
    pub fn add_all<I>(&self, ports: I)
    where
        I: IntoIterator<Item = u16>,
    {
        self.lock().extend(ports);
    }

    /// Drop a reservation, returns false if the port was not reserved
    pub fn remove(&self, port: u16) -> bool {
        self.lock().remove(&port)
    }

    /// Number of reserved ports
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Sorted copy of the reserved ports
    pub fn snapshot(&self) -> Vec<u16> {
        let mut ports: Vec<u16> = self.lock().iter().copied().collect();
        ports.sort_unstable();
        ports
    }
}
