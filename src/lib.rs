//! Contiguous TCP port block reservation

pub mod allocator;
pub mod block;
pub mod cli;
pub mod config;
pub mod error;
pub mod guard;
pub mod probe;
pub mod range;
pub mod reservation;
pub mod version;


// Re-export commonly used items
pub use crate::allocator::{new_pool_allocator, PoolAllocator};
pub use crate::block::PortBlock;
pub use crate::config::PoolConfig;
pub use crate::error::PortError;
pub use crate::probe::{OsProbe, Probe};
pub use crate::range::RangeAllocator;
pub use crate::version::VERSION;

lazy_static::lazy_static! {
    static ref GLOBAL_ALLOCATOR: PoolAllocator = PoolAllocator::new(PoolConfig::default());
}

/// Process-wide allocator shared by every caller that does not bring its own
///
/// Synchronized, with a limit of 65536 ports. Created on first use and never
/// torn down.
pub fn global() -> &'static PoolAllocator {
    &GLOBAL_ALLOCATOR
}
