/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Address type for memory operations
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;
