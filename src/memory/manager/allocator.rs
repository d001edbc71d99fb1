/*!
 * Memory Allocator Implementation
 * Allocation and deallocation logic
 */

use super::super::types::{
    FitStrategy, FreeBlock, MemoryBlock, MemoryError, MemoryPressure, MemoryResult, Placement,
};
use super::MemoryManager;
use crate::core::types::{Pid, Size};
use tracing::{debug, warn};

impl MemoryManager {
    /// Allocate a contiguous block for `pid` using the given placement strategy
    ///
    /// Requests are validated before the free list is scanned; a rejected
    /// request leaves the table and free list untouched.
    pub fn allocate(
        &mut self,
        size: Size,
        pid: Pid,
        strategy: FitStrategy,
    ) -> MemoryResult<Placement> {
        if size == 0 {
            warn!(pid, "Rejected zero-sized allocation");
            return Err(MemoryError::InvalidSize(size));
        }

        if self.blocks.contains_key(&pid) {
            warn!(pid, "Rejected allocation: process already holds a block");
            return Err(MemoryError::DuplicateIdentifier(pid));
        }

        let Some(hole) = self.free_list.find(size, strategy) else {
            let largest_free = self.free_list.largest();
            warn!(
                pid,
                size,
                largest_free,
                %strategy,
                "No free block large enough"
            );
            return Err(MemoryError::NoFitAvailable {
                requested: size,
                largest_free,
            });
        };

        // The hole was just located by key, so carving cannot miss
        let leftover = self.free_list.carve(hole.start, size).ok_or_else(|| {
            MemoryError::Corruption(format!(
                "hole at {} vanished while placing {} units",
                hole.start, size
            ))
        })?;

        let pressure_before = self.current_pressure();
        let block = MemoryBlock::new(pid, hole.start, size);
        self.blocks.insert(pid, block);
        self.used += size;

        debug!(
            pid,
            start = block.start,
            size,
            leftover,
            %strategy,
            "Allocated block"
        );

        let pressure = self.current_pressure();
        if pressure > pressure_before && pressure >= MemoryPressure::High {
            warn!(
                pid,
                used = self.used,
                capacity = self.capacity,
                "Memory pressure {}",
                pressure
            );
        }

        debug_assert_eq!(self.verify(), Ok(()));

        Ok(Placement {
            pid,
            start: block.start,
            size,
            leftover,
        })
    }

    /// Release the block held by `pid` and coalesce it into the free list
    pub fn deallocate(&mut self, pid: Pid) -> MemoryResult<MemoryBlock> {
        let Some(block) = self.blocks.remove(&pid) else {
            warn!(pid, "Attempted to deallocate unknown process");
            return Err(MemoryError::UnknownProcess(pid));
        };

        self.used -= block.size;
        let hole = self
            .free_list
            .release(FreeBlock::new(block.start, block.size));

        debug!(
            pid,
            start = block.start,
            size = block.size,
            hole_start = hole.start,
            hole_size = hole.size,
            "Deallocated block"
        );

        debug_assert_eq!(self.verify(), Ok(()));

        Ok(block)
    }

    /// Get the block held by a process
    pub fn block(&self, pid: Pid) -> Option<MemoryBlock> {
        self.blocks.get(&pid).copied()
    }

    /// Check if a process currently holds a block
    pub fn is_allocated(&self, pid: Pid) -> bool {
        self.blocks.contains_key(&pid)
    }

    fn current_pressure(&self) -> MemoryPressure {
        if self.capacity == 0 {
            return MemoryPressure::Low;
        }
        MemoryPressure::from_usage(self.used as f64 / self.capacity as f64)
    }
}
