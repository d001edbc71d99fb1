/*!
 * Memory Statistics and Layout Checks
 * Read-only views over the allocation table and free list
 */

use super::super::types::{MemoryError, MemoryReport, MemoryResult, MemoryStats};
use super::MemoryManager;
use crate::core::types::{Address, Size};

impl MemoryManager {
    /// Get overall memory statistics
    pub fn stats(&self) -> MemoryStats {
        let available = self.available();
        let largest = self.free_list.largest();

        let usage_percentage = if self.capacity == 0 {
            0.0
        } else {
            (self.used as f64 / self.capacity as f64) * 100.0
        };
        let fragmentation = if self.free_list.is_empty() {
            0.0
        } else {
            1.0 - largest as f64 / available as f64
        };

        MemoryStats {
            total_memory: self.capacity,
            used_memory: self.used,
            available_memory: available,
            usage_percentage,
            allocated_blocks: self.blocks.len(),
            free_blocks: self.free_list.len(),
            largest_free_block: largest,
            fragmentation,
        }
    }

    /// Snapshot of allocated blocks (by pid) followed by holes (by address)
    pub fn report(&self) -> MemoryReport {
        MemoryReport {
            capacity: self.capacity,
            allocated: self.blocks.values().copied().collect(),
            free: self.free_list.iter().collect(),
        }
    }

    /// Check every layout invariant
    ///
    /// - table keys match block owners and no block is empty
    /// - allocated plus free sizes add up to the capacity
    /// - no two blocks overlap and everything lies inside `[0, capacity)`
    /// - no two holes are contiguous
    pub fn verify(&self) -> MemoryResult<()> {
        let mut extents: Vec<(Address, Size, bool)> =
            Vec::with_capacity(self.blocks.len() + self.free_list.len());

        for (&pid, block) in &self.blocks {
            if block.pid != pid {
                return Err(MemoryError::Corruption(format!(
                    "table entry {} holds block owned by {}",
                    pid, block.pid
                )));
            }
            extents.push((block.start, block.size, false));
        }
        extents.extend(self.free_list.iter().map(|hole| (hole.start, hole.size, true)));
        extents.sort_unstable_by_key(|&(start, _, _)| start);

        let allocated: Size = self.blocks.values().map(|b| b.size).sum();
        if allocated != self.used {
            return Err(MemoryError::Corruption(format!(
                "used counter {} disagrees with allocated total {}",
                self.used, allocated
            )));
        }

        let total = allocated + self.free_list.total();
        if total != self.capacity {
            return Err(MemoryError::Corruption(format!(
                "blocks cover {} units of a {} unit address space",
                total, self.capacity
            )));
        }

        let mut cursor: Address = 0;
        let mut previous_free = false;
        for (start, size, free) in extents {
            if size == 0 {
                return Err(MemoryError::Corruption(format!(
                    "zero-sized block at {}",
                    start
                )));
            }
            if start < cursor {
                return Err(MemoryError::Corruption(format!(
                    "block at {} overlaps the block ending at {}",
                    start, cursor
                )));
            }
            // Contiguous holes must already have been merged
            if free && previous_free && start == cursor {
                return Err(MemoryError::Corruption(format!(
                    "contiguous holes meet at {}",
                    start
                )));
            }
            cursor = start + size;
            previous_free = free;
        }

        if cursor > self.capacity {
            return Err(MemoryError::Corruption(format!(
                "block extends to {} past capacity {}",
                cursor, self.capacity
            )));
        }

        Ok(())
    }
}
