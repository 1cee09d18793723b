//! Optional mutual exclusion for allocator critical sections

use std::sync::{Mutex, PoisonError};

/// Guard serializes critical sections of a single allocator instance
///
/// When disabled the section runs without any locking and concurrent
/// callers may interleave.
#[derive(Debug)]
pub struct Guard {
    lock: Option<Mutex<()>>,
}

impl Guard {
    /// Create a guard, engaged when `synchronized` is true
    pub fn new(synchronized: bool) -> Self {
        Guard {
            lock: synchronized.then(|| Mutex::new(())),
        }
    }

    /// Whether the guard takes a lock
    pub fn is_engaged(&self) -> bool {
        self.lock.is_some()
    }

    /// Run `critical_section`, exclusively if the guard is engaged
    ///
    /// The lock is held by a scoped guard value, so it is released on every
    /// exit path including unwinding. A panic in an earlier section does not
    /// wedge the allocator.
    pub fn run_exclusive<T, F>(&self, critical_section: F) -> T
    where
        F: FnOnce() -> T,
    {
        match &self.lock {
            Some(lock) => {
                let _held = lock.lock().unwrap_or_else(PoisonError::into_inner);
                critical_section()
            }
            None => critical_section(),
        }
    }
}
