/*!
 * Memory Partition Simulator Library
 * Dynamic-partition allocation over a fixed address space
 */

pub mod config;
pub mod core;
pub mod memory;
pub mod monitoring;
pub mod shell;

// Re-exports
pub use config::{ConfigError, SimulationConfig};
pub use memory::{
    Allocator, FitStrategy, MemoryBlock, MemoryError, MemoryInfo, MemoryManager, MemoryReport,
    MemoryResult, MemoryStats, Placement,
};
pub use monitoring::init_tracing;
pub use shell::{Command, Session};
