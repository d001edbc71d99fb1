/*!
 * Memory Management
 *
 * Dynamic-partition allocator over a fixed address space `[0, capacity)`.
 *
 * ## Layout
 *
 * - **Allocation table**: process ID -> allocated block, one block per process
 * - **Free list**: holes keyed by start address (BTreeMap)
 *   - O(log n) predecessor/successor lookup on release
 *   - Adjacent holes are merged immediately, never lazily
 *
 * ## Placement strategies
 *
 * - **First fit**: lowest-addressed hole that fits, scan stops early
 * - **Best fit**: smallest leftover
 * - **Worst fit**: largest leftover
 *
 * Every mutation either commits fully or leaves both collections untouched.
 */

mod allocator;
mod free_list;
mod stats;

use super::traits::{Allocator, MemoryInfo};
use super::types::{FitStrategy, MemoryBlock, MemoryReport, MemoryResult, MemoryStats, Placement};
use crate::core::limits::DEFAULT_MEMORY_MAX;
use crate::core::types::{Pid, Size};
use free_list::FreeList;
use std::collections::BTreeMap;
use tracing::info;

/// Memory manager
///
/// Owned by the simulation driver and mutated only through
/// `allocate`/`deallocate`. Not shared across threads; a concurrent
/// driver would have to guard the table and free list as one unit.
#[derive(Debug, Clone)]
pub struct MemoryManager {
    capacity: Size,
    used: Size,
    blocks: BTreeMap<Pid, MemoryBlock>,
    free_list: FreeList,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_MAX)
    }

    /// Create memory manager with a single hole spanning `capacity`
    pub fn with_capacity(capacity: Size) -> Self {
        info!(capacity, "Memory manager initialized");
        Self {
            capacity,
            used: 0,
            blocks: BTreeMap::new(),
            free_list: FreeList::new(capacity),
        }
    }

    pub fn capacity(&self) -> Size {
        self.capacity
    }

    pub fn used(&self) -> Size {
        self.used
    }

    pub fn available(&self) -> Size {
        self.capacity - self.used
    }

    /// Number of processes currently holding a block
    pub fn process_count(&self) -> usize {
        self.blocks.len()
    }
}

// Implement trait interfaces
impl Allocator for MemoryManager {
    fn allocate(
        &mut self,
        size: Size,
        pid: Pid,
        strategy: FitStrategy,
    ) -> MemoryResult<Placement> {
        MemoryManager::allocate(self, size, pid, strategy)
    }

    fn deallocate(&mut self, pid: Pid) -> MemoryResult<MemoryBlock> {
        MemoryManager::deallocate(self, pid)
    }

    fn block(&self, pid: Pid) -> Option<MemoryBlock> {
        MemoryManager::block(self, pid)
    }

    fn is_allocated(&self, pid: Pid) -> bool {
        MemoryManager::is_allocated(self, pid)
    }
}

impl MemoryInfo for MemoryManager {
    fn capacity(&self) -> Size {
        self.capacity
    }

    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn report(&self) -> MemoryReport {
        MemoryManager::report(self)
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}
