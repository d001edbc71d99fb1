/*!
 * Memory Traits
 * Partition allocation abstractions
 */

use super::types::*;
use crate::core::types::{Pid, Size};

/// Partition allocator interface
pub trait Allocator {
    /// Carve a contiguous block of `size` units for `pid`
    fn allocate(&mut self, size: Size, pid: Pid, strategy: FitStrategy)
        -> MemoryResult<Placement>;

    /// Release the block held by `pid` and coalesce it with neighbouring holes
    fn deallocate(&mut self, pid: Pid) -> MemoryResult<MemoryBlock>;

    /// Look up the block held by a process
    fn block(&self, pid: Pid) -> Option<MemoryBlock>;

    /// Check if a process currently holds a block
    fn is_allocated(&self, pid: Pid) -> bool;
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Size of the whole address space
    fn capacity(&self) -> Size;

    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Ordered listing of allocated blocks and holes
    fn report(&self) -> MemoryReport;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}
