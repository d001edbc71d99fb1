/*!
 * Memory Module
 * Partition allocation over a simulated address space
 */

pub mod manager;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::MemoryManager;
pub use traits::*;
pub use types::*;
