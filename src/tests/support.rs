//! Scripted probe for deterministic allocator tests

use crate::error::PortError;
use crate::probe::Probe;
use std::collections::{HashSet, VecDeque};
use std::io;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// FakeProbe hands out scripted seed ports and grants every specific port
/// request except the blocked ones
pub struct FakeProbe {
    bases: Box<dyn Fn() -> u16 + Send + Sync>,
    blocked: HashSet<u16>,
    script: Mutex<VecDeque<u16>>,
    calls: AtomicUsize,
}

impl FakeProbe {
    /// Seed ports are served in order, the last one repeats forever
    pub fn with_bases(bases: Vec<u16>) -> Self {
        let queue = Mutex::new(VecDeque::from(bases));
        Self::from_fn(move || {
            let mut queue = queue.lock().unwrap();
            if queue.len() > 1 {
                queue.pop_front().unwrap()
            } else {
                *queue.front().expect("no seed ports scripted")
            }
        })
    }

    /// Seed ports walk the range and wrap around
    pub fn cycling(range: RangeInclusive<u16>) -> Self {
        let start = *range.start();
        let span = usize::from(*range.end() - start) + 1;
        let counter = AtomicUsize::new(0);
        Self::from_fn(move || {
            let offset = counter.fetch_add(1, Ordering::SeqCst) % span;
            start + offset as u16
        })
    }

    fn from_fn<F>(bases: F) -> Self
    where
        F: Fn() -> u16 + Send + Sync + 'static,
    {
        FakeProbe {
            bases: Box::new(bases),
            blocked: HashSet::new(),
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Make specific requests for `port` fail
    pub fn block(mut self, port: u16) -> Self {
        self.blocked.insert(port);
        self
    }

    /// The next probes return these ports whatever was asked for
    pub fn answering(self, ports: Vec<u16>) -> Self {
        self.script.lock().unwrap().extend(ports);
        self
    }

    /// Number of probe calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Probe for FakeProbe {
    fn probe(&self, preferred: Option<u16>) -> Result<u16, PortError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(port) = self.script.lock().unwrap().pop_front() {
            return Ok(port);
        }
        match preferred {
            None | Some(0) => Ok((self.bases)()),
            Some(port) if self.blocked.contains(&port) => Err(PortError::PortUnavailable {
                port,
                source: io::Error::from(io::ErrorKind::AddrInUse),
            }),
            Some(port) => Ok(port),
        }
    }
}
