/*!
 * Memory Types
 * Common types for partition allocation
 */

use crate::core::limits::{
    PRESSURE_CRITICAL_THRESHOLD, PRESSURE_HIGH_THRESHOLD, PRESSURE_MEDIUM_THRESHOLD,
};
use crate::core::types::{Address, Pid, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("No free block can hold {requested} units (largest free block: {largest_free})")]
    #[diagnostic(
        code(memory::no_fit),
        help("Deallocate a process or request a smaller size.")
    )]
    NoFitAvailable { requested: Size, largest_free: Size },

    #[error("Process {0} already holds an allocation")]
    #[diagnostic(
        code(memory::duplicate_identifier),
        help("Deallocate the existing block first or use a fresh process ID.")
    )]
    DuplicateIdentifier(Pid),

    #[error("Process {0} has no allocation")]
    #[diagnostic(
        code(memory::unknown_process),
        help("Run a report to list the process IDs currently holding memory.")
    )]
    UnknownProcess(Pid),

    #[error("Invalid allocation size: {0}")]
    #[diagnostic(code(memory::invalid_size), help("Allocation sizes must be positive."))]
    InvalidSize(Size),

    #[error("Memory layout corrupted: {0}")]
    #[diagnostic(code(memory::corruption))]
    Corruption(String),
}

/// An allocated block owned by a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub pid: Pid,
    pub start: Address,
    pub size: Size,
}

impl MemoryBlock {
    pub fn new(pid: Pid, start: Address, size: Size) -> Self {
        Self { pid, start, size }
    }

    /// One past the last address of the block
    pub fn end(&self) -> Address {
        self.start + self.size
    }
}

/// A hole in the address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeBlock {
    pub start: Address,
    pub size: Size,
}

impl FreeBlock {
    pub fn new(start: Address, size: Size) -> Self {
        Self { start, size }
    }

    pub fn end(&self) -> Address {
        self.start + self.size
    }
}

/// Outcome of a successful allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub pid: Pid,
    pub start: Address,
    pub size: Size,
    /// Space left in the hole the block was carved from (0 = exact fit)
    pub leftover: Size,
}

impl Placement {
    pub fn block(&self) -> MemoryBlock {
        MemoryBlock::new(self.pid, self.start, self.size)
    }
}

/// Rule used to pick among fitting free blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitStrategy {
    /// Lowest-addressed block that fits, scan stops at the first match
    #[default]
    First,
    /// Smallest leftover, ties to the lowest address
    Best,
    /// Largest leftover, ties to the lowest address
    Worst,
}

impl FitStrategy {
    /// Map the signed selector convention: 0 is first-fit, positive is
    /// best-fit, negative is worst-fit
    pub fn from_selector(selector: i32) -> Self {
        match selector.signum() {
            0 => FitStrategy::First,
            1 => FitStrategy::Best,
            _ => FitStrategy::Worst,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FitStrategy::First => "first",
            FitStrategy::Best => "best",
            FitStrategy::Worst => "worst",
        }
    }
}

impl fmt::Display for FitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown fit strategy '{0}' (expected first, best or worst)")]
pub struct ParseStrategyError(pub String);

impl FromStr for FitStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "f" => Ok(FitStrategy::First),
            "best" | "b" => Ok(FitStrategy::Best),
            "worst" | "w" => Ok(FitStrategy::Worst),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Memory statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub available_memory: Size,
    pub usage_percentage: f64,
    pub allocated_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_block: Size,
    /// 1 - largest_free / available; 0 when nothing is free
    pub fragmentation: f64,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_usage(self.usage_percentage / 100.0)
    }
}

impl fmt::Display for MemoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory Statistics:")?;
        writeln!(f, "==================")?;
        writeln!(f, "Total:          {}", self.total_memory)?;
        writeln!(
            f,
            "Used:           {} ({:.1}%, pressure {})",
            self.used_memory,
            self.usage_percentage,
            self.memory_pressure()
        )?;
        writeln!(f, "Available:      {}", self.available_memory)?;
        writeln!(f, "Processes:      {}", self.allocated_blocks)?;
        writeln!(f, "Free holes:     {}", self.free_blocks)?;
        writeln!(f, "Largest hole:   {}", self.largest_free_block)?;
        write!(f, "Fragmentation:  {:.1}%", self.fragmentation * 100.0)
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_usage(ratio: f64) -> Self {
        if ratio >= PRESSURE_CRITICAL_THRESHOLD {
            MemoryPressure::Critical
        } else if ratio >= PRESSURE_HIGH_THRESHOLD {
            MemoryPressure::High
        } else if ratio >= PRESSURE_MEDIUM_THRESHOLD {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Point-in-time listing of the address space
///
/// Allocated blocks appear in allocation-table order (ascending pid),
/// free blocks in ascending address order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryReport {
    pub capacity: Size,
    pub allocated: Vec<MemoryBlock>,
    pub free: Vec<FreeBlock>,
}

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory Usage:")?;
        writeln!(f, "==============")?;
        for block in &self.allocated {
            writeln!(
                f,
                "Process {} starts at address {} with size {}.",
                block.pid, block.start, block.size
            )?;
        }
        if !self.free.is_empty() {
            writeln!(f, "Free Holes:")?;
            writeln!(f, "===========")?;
            for hole in &self.free {
                writeln!(
                    f,
                    "Free hole starts at address {} with size {}.",
                    hole.start, hole.size
                )?;
            }
        }
        Ok(())
    }
}
