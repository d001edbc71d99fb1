/*!
 * Simulation Limits and Defaults
 *
 * Centralized location for the bounds used when no configuration is
 * supplied, and for the memory pressure thresholds.
 */

// =============================================================================
// SIMULATION DEFAULTS
// =============================================================================

/// Total simulated address space (1KB)
pub const DEFAULT_MEMORY_MAX: usize = 1024;

/// Largest size the seeding phase will request for a single process
pub const DEFAULT_PROC_SIZE_MAX: usize = 512;

/// Number of processes allocated before the interactive loop starts
pub const DEFAULT_NUM_PROC: usize = 10;

/// Upper bound on simulated process duration
/// Carried for driver scripting, never consulted by the allocator
pub const DEFAULT_MAX_PROC_DURATION: u64 = 10_000;

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.properties";

/// Environment variable overriding the configuration file path
pub const CONFIG_PATH_ENV: &str = "MEMSIM_CONFIG";

// =============================================================================
// MEMORY PRESSURE
// =============================================================================

/// Usage ratio at which pressure is reported as medium
pub const PRESSURE_MEDIUM_THRESHOLD: f64 = 0.60;

/// Usage ratio at which pressure is reported as high
pub const PRESSURE_HIGH_THRESHOLD: f64 = 0.80;

/// Usage ratio at which pressure is reported as critical
pub const PRESSURE_CRITICAL_THRESHOLD: f64 = 0.95;
