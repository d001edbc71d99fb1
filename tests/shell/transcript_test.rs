/*!
 * Shell Transcript Tests
 * Drive a whole session through in-memory input and output
 */

use memsim::memory::{FitStrategy, MemoryManager};
use memsim::{MemoryReport, Session, SimulationConfig};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Cursor;

fn run(memory: MemoryManager, strategy: FitStrategy, script: &str) -> (MemoryManager, String) {
    let mut session = Session::new(memory, Cursor::new(script.to_string()), Vec::<u8>::new())
        .with_strategy(strategy);
    session.run().unwrap();
    let (memory, output) = session.into_parts();
    (memory, String::from_utf8(output).unwrap())
}

#[test]
fn test_allocate_report_and_quit() {
    let (_, output) = run(
        MemoryManager::with_capacity(1024),
        FitStrategy::First,
        "A 512\nA\n512\nA 1\nR\nQ\nA 5\n",
    );

    let expected = "\
Enter command (A = allocate, D = deallocate, R = report, S = stats, H = help, Q = quit):
Allocated process 1 at address 0 with size 512.
Enter command (A = allocate, D = deallocate, R = report, S = stats, H = help, Q = quit):
Enter process size: Allocated process 2 at address 512 with size 512.
Enter command (A = allocate, D = deallocate, R = report, S = stats, H = help, Q = quit):
Allocation failed: No free block can hold 1 units (largest free block: 0)
Enter command (A = allocate, D = deallocate, R = report, S = stats, H = help, Q = quit):
Memory Usage:
==============
Process 1 starts at address 0 with size 512.
Process 2 starts at address 512 with size 512.
Enter command (A = allocate, D = deallocate, R = report, S = stats, H = help, Q = quit):
Simulation terminated.
";
    assert_eq!(output, expected);
}

#[test]
fn test_deallocate_coalesces_through_shell() {
    let (memory, output) = run(
        MemoryManager::with_capacity(1024),
        FitStrategy::First,
        "A 512\nA 512\nD 1\nD\n2\n",
    );

    assert!(output.contains("Deallocated process 1 from address 0 with size 512."));
    assert!(output.contains("Enter process ID: Deallocated process 2 from address 512 with size 512."));
    assert_eq!(memory.stats().largest_free_block, 1024);
    assert_eq!(memory.stats().free_blocks, 1);
}

#[test]
fn test_session_strategy_applies_to_bare_allocations() {
    // Holes after setup: [0,100) and [150,1024)
    let mut memory = MemoryManager::with_capacity(1024);
    memory.allocate(100, 900, FitStrategy::First).unwrap();
    memory.allocate(50, 901, FitStrategy::First).unwrap();
    memory.deallocate(900).unwrap();

    let (memory, _) = run(memory.clone(), FitStrategy::Worst, "A 10\nA 10 first\n");
    assert_eq!(memory.block(1).map(|b| b.start), Some(150));
    assert_eq!(memory.block(2).map(|b| b.start), Some(0));
}

#[test]
fn test_json_report() {
    let (_, output) = run(
        MemoryManager::with_capacity(256),
        FitStrategy::Best,
        "A 64\nR json\nQ\n",
    );

    let start = output.find('{').unwrap();
    let end = output.rfind('}').unwrap();
    let report: MemoryReport = serde_json::from_str(&output[start..=end]).unwrap();
    assert_eq!(report.capacity, 256);
    assert_eq!(report.allocated.len(), 1);
    assert_eq!(report.free.len(), 1);
    assert_eq!(report.free[0].start, 64);
}

#[test]
fn test_stats_and_help() {
    let (_, output) = run(
        MemoryManager::with_capacity(100),
        FitStrategy::First,
        "A 50\nS\nH\n",
    );

    assert!(output.contains("Used:           50 (50.0%, pressure LOW)"));
    assert!(output.contains("A [size [first|best|worst]]"));
}

#[test]
fn test_seeded_startup_matches_configuration() {
    let config = SimulationConfig::default().with_num_proc(5).with_proc_size_max(64).with_seed(99);

    let mut session = Session::new(
        MemoryManager::with_capacity(config.memory_max),
        Cursor::new("Q\n".to_string()),
        Vec::<u8>::new(),
    )
    .with_strategy(config.strategy);

    let mut rng = StdRng::seed_from_u64(config.seed.unwrap());
    let placed = session.seed(&mut rng, config.num_proc, config.proc_size_max);
    assert_eq!(placed, 5);
    assert_eq!(session.next_pid(), 6);

    session.run().unwrap();
    let (memory, _) = session.into_parts();
    assert_eq!(memory.process_count(), 5);
    assert!(memory.verify().is_ok());
}
