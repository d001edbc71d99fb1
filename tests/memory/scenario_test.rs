/*!
 * Allocation Scenario Tests
 * Step-by-step walkthrough of a 1024-unit address space
 */

use memsim::memory::{
    Allocator, FitStrategy, FreeBlock, MemoryBlock, MemoryError, MemoryInfo, MemoryManager,
    Placement,
};
use pretty_assertions::assert_eq;

fn holes(mgr: &MemoryManager) -> Vec<FreeBlock> {
    mgr.report().free
}

/// Two 512-unit processes filling the whole space
fn full_memory() -> MemoryManager {
    let mut mgr = MemoryManager::with_capacity(1024);
    mgr.allocate(512, 1, FitStrategy::First).unwrap();
    mgr.allocate(512, 2, FitStrategy::First).unwrap();
    mgr
}

#[test]
fn test_first_half_allocation() {
    let mut mgr = MemoryManager::with_capacity(1024);

    let placement = mgr.allocate(512, 1, FitStrategy::First).unwrap();
    assert_eq!(
        placement,
        Placement {
            pid: 1,
            start: 0,
            size: 512,
            leftover: 512
        }
    );
    assert_eq!(holes(&mgr), vec![FreeBlock::new(512, 512)]);
}

#[test]
fn test_second_half_allocation_empties_free_list() {
    let mut mgr = MemoryManager::with_capacity(1024);
    mgr.allocate(512, 1, FitStrategy::First).unwrap();

    let placement = mgr.allocate(512, 2, FitStrategy::First).unwrap();
    assert_eq!(placement.start, 512);
    assert_eq!(placement.size, 512);
    assert_eq!(placement.leftover, 0);
    assert!(holes(&mgr).is_empty());
}

#[test]
fn test_full_memory_rejects_any_request() {
    let mut mgr = full_memory();
    let before = mgr.report();

    for strategy in [FitStrategy::First, FitStrategy::Best, FitStrategy::Worst] {
        assert_eq!(
            mgr.allocate(1, 3, strategy),
            Err(MemoryError::NoFitAvailable {
                requested: 1,
                largest_free: 0
            })
        );
    }
    assert_eq!(mgr.report(), before);
}

#[test]
fn test_release_first_block_without_merge() {
    let mut mgr = full_memory();

    let released = mgr.deallocate(1).unwrap();
    assert_eq!(released, MemoryBlock::new(1, 0, 512));
    assert_eq!(holes(&mgr), vec![FreeBlock::new(0, 512)]);
    assert!(mgr.is_allocated(2));
}

#[test]
fn test_release_second_block_merges_whole_space() {
    let mut mgr = full_memory();
    mgr.deallocate(1).unwrap();

    mgr.deallocate(2).unwrap();
    assert_eq!(holes(&mgr), vec![FreeBlock::new(0, 1024)]);
    assert_eq!(mgr.used(), 0);
}

#[test]
fn test_release_tail_block_first_then_head() {
    let mut mgr = full_memory();

    // Highest-addressed block goes back first and lands at the tail
    mgr.deallocate(2).unwrap();
    assert_eq!(holes(&mgr), vec![FreeBlock::new(512, 512)]);

    mgr.deallocate(1).unwrap();
    assert_eq!(holes(&mgr), vec![FreeBlock::new(0, 1024)]);
}

#[test]
fn test_unknown_process_changes_nothing() {
    let mut mgr = full_memory();
    mgr.deallocate(1).unwrap();
    let before = mgr.report();

    assert_eq!(mgr.deallocate(42), Err(MemoryError::UnknownProcess(42)));
    assert_eq!(mgr.report(), before);
}

#[test]
fn test_selector_convention() {
    assert_eq!(FitStrategy::from_selector(0), FitStrategy::First);
    assert_eq!(FitStrategy::from_selector(3), FitStrategy::Best);
    assert_eq!(FitStrategy::from_selector(-1), FitStrategy::Worst);
}

#[test]
fn test_report_text_layout() {
    let mut mgr = MemoryManager::with_capacity(1024);
    mgr.allocate(100, 1, FitStrategy::First).unwrap();
    mgr.allocate(200, 2, FitStrategy::First).unwrap();

    let expected = "\
Memory Usage:
==============
Process 1 starts at address 0 with size 100.
Process 2 starts at address 100 with size 200.
Free Holes:
===========
Free hole starts at address 300 with size 724.
";
    assert_eq!(mgr.report().to_string(), expected);
}

#[test]
fn test_report_omits_hole_section_when_full() {
    let mgr = full_memory();
    let text = mgr.report().to_string();

    assert!(!text.contains("Free Holes:"));
    assert!(text.ends_with("Process 2 starts at address 512 with size 512.\n"));
}

#[test]
fn test_report_json_shape() {
    let mut mgr = MemoryManager::with_capacity(64);
    mgr.allocate(16, 4, FitStrategy::Best).unwrap();

    let value = serde_json::to_value(mgr.report()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "capacity": 64,
            "allocated": [{ "pid": 4, "start": 0, "size": 16 }],
            "free": [{ "start": 16, "size": 48 }],
        })
    );
}

#[test]
fn test_error_serialization() {
    let value = serde_json::to_value(MemoryError::UnknownProcess(7)).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "error_type": "unknown_process", "details": 7 })
    );
}

#[test]
fn test_trait_objects_drive_manager() {
    fn churn(alloc: &mut dyn Allocator) -> MemoryBlock {
        alloc.allocate(10, 1, FitStrategy::First).unwrap();
        alloc.allocate(20, 2, FitStrategy::First).unwrap();
        let released = alloc.deallocate(1).unwrap();
        assert!(!alloc.is_allocated(1));
        assert!(alloc.is_allocated(2));
        released
    }

    let mut mgr = MemoryManager::with_capacity(100);
    assert_eq!(churn(&mut mgr), MemoryBlock::new(1, 0, 10));

    let info: &dyn MemoryInfo = &mgr;
    assert_eq!(info.capacity(), 100);
    assert_eq!(info.stats().used_memory, 20);
}
