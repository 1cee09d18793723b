//! Port blocks and the contiguity check

use serde::Serialize;

/// PortBlock is a set of contiguous ports handed out by one acquisition
///
/// Ports are kept in the order they were probed, which for blocks built by
/// the pool allocator is ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortBlock {
    ports: Vec<u16>,
}

impl PortBlock {
    pub(crate) fn new(ports: Vec<u16>) -> Self {
        debug_assert!(!ports.is_empty());
        PortBlock { ports }
    }

    /// Smallest port of the block
    pub fn base(&self) -> u16 {
        self.ports.iter().copied().min().unwrap_or_default()
    }

    pub fn ports(&self) -> &[u16] {
        &self.ports
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn contains(&self, port: u16) -> bool {
        self.ports.contains(&port)
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.ports.iter().copied()
    }

    pub fn into_vec(self) -> Vec<u16> {
        self.ports
    }
}

impl IntoIterator for PortBlock {
    type Item = u16;
    type IntoIter = std::vec::IntoIter<u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.ports.into_iter()
    }
}

/// Check that distinct `ports` form a single ascending run once sorted
///
/// For `n` distinct integers with minimum `m` the run `m..m+n` is the only
/// set whose sum is `n*m + n*(n-1)/2`, so no sort is needed. The identity
/// does not hold for inputs with duplicates.
pub fn is_contiguous(ports: &[u16]) -> bool {
    let count = ports.len() as u64;
    let Some(min) = ports.iter().copied().min() else {
        return false;
    };

    let sum: u64 = ports.iter().map(|&p| u64::from(p)).sum();
    sum - count * u64::from(min) == count * (count - 1) / 2
}
