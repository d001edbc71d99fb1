/*!
 * Address-Ordered Free List
 * Holes keyed by start address with eager coalescing
 */

use super::super::types::{FitStrategy, FreeBlock};
use crate::core::types::{Address, Size};
use std::collections::BTreeMap;

/// Free holes ordered by start address
///
/// Invariants: entries never overlap, never have zero size, and no entry
/// ends exactly where the next one starts (such pairs are merged on insert).
#[derive(Debug, Clone, Default)]
pub(super) struct FreeList {
    holes: BTreeMap<Address, Size>,
}

impl FreeList {
    /// A single hole spanning `[0, capacity)`
    pub fn new(capacity: Size) -> Self {
        let mut holes = BTreeMap::new();
        if capacity > 0 {
            holes.insert(0, capacity);
        }
        Self { holes }
    }

    /// Pick the hole a request of `size` should be carved from
    pub fn find(&self, size: Size, strategy: FitStrategy) -> Option<FreeBlock> {
        let mut fits = self
            .holes
            .iter()
            .filter(|(_, hole)| **hole >= size)
            .map(|(&start, &hole)| FreeBlock::new(start, hole));

        match strategy {
            FitStrategy::First => fits.next(),
            FitStrategy::Best => fits.fold(None, |chosen: Option<FreeBlock>, hole| match chosen {
                // Strictly smaller only, so ties keep the lower address
                Some(current) if current.size <= hole.size => Some(current),
                _ => Some(hole),
            }),
            FitStrategy::Worst => fits.fold(None, |chosen: Option<FreeBlock>, hole| match chosen {
                Some(current) if current.size >= hole.size => Some(current),
                _ => Some(hole),
            }),
        }
    }

    /// Take `size` units from the front of the hole starting at `start`
    ///
    /// Returns the leftover, or `None` if no such hole exists or it is too small.
    pub fn carve(&mut self, start: Address, size: Size) -> Option<Size> {
        let hole = *self.holes.get(&start)?;
        let leftover = hole.checked_sub(size)?;

        self.holes.remove(&start);
        if leftover > 0 {
            self.holes.insert(start + size, leftover);
        }
        Some(leftover)
    }

    /// Return a block to the list, merging with the predecessor then the successor
    ///
    /// Returns the hole the block ended up in.
    pub fn release(&mut self, block: FreeBlock) -> FreeBlock {
        let mut merged = block;

        // Predecessor: the last hole starting below this block
        let prev = self
            .holes
            .range(..block.start)
            .next_back()
            .map(|(&start, &size)| (start, size));
        if let Some((prev_start, prev_size)) = prev {
            if prev_start + prev_size == merged.start {
                self.holes.remove(&prev_start);
                merged = FreeBlock::new(prev_start, prev_size + merged.size);
            }
        }

        // Successor: a hole starting exactly at our end
        if let Some(next_size) = self.holes.remove(&merged.end()) {
            merged.size += next_size;
        }

        self.holes.insert(merged.start, merged.size);
        merged
    }

    /// Holes in ascending address order
    pub fn iter(&self) -> impl Iterator<Item = FreeBlock> + '_ {
        self.holes
            .iter()
            .map(|(&start, &size)| FreeBlock::new(start, size))
    }

    pub fn len(&self) -> usize {
        self.holes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holes.is_empty()
    }

    /// Sum of all hole sizes
    pub fn total(&self) -> Size {
        self.holes.values().sum()
    }

    pub fn largest(&self) -> Size {
        self.holes.values().copied().max().unwrap_or(0)
    }
}
