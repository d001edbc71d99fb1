/*!
 * Configuration Types
 */

use crate::core::limits::{
    DEFAULT_MAX_PROC_DURATION, DEFAULT_MEMORY_MAX, DEFAULT_NUM_PROC, DEFAULT_PROC_SIZE_MAX,
};
use crate::core::types::Size;
use crate::memory::FitStrategy;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    #[diagnostic(code(config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid value '{value}' for {key}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Numeric keys take non-negative integers; FIT_STRATEGY takes first, best or worst.")
    )]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(config::invalid))]
    Invalid(String),
}

/// Simulation bounds
///
/// `max_proc_duration` is carried for driver scripting only; the allocator
/// never reads it. `proc_size_max` bounds the seeding phase and is advisory
/// for interactive requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub memory_max: Size,
    pub proc_size_max: Size,
    pub num_proc: usize,
    pub max_proc_duration: u64,
    pub strategy: FitStrategy,
    /// Seed for the seeding phase; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            memory_max: DEFAULT_MEMORY_MAX,
            proc_size_max: DEFAULT_PROC_SIZE_MAX,
            num_proc: DEFAULT_NUM_PROC,
            max_proc_duration: DEFAULT_MAX_PROC_DURATION,
            strategy: FitStrategy::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_memory_max(mut self, memory_max: Size) -> Self {
        self.memory_max = memory_max;
        self
    }

    pub fn with_proc_size_max(mut self, proc_size_max: Size) -> Self {
        self.proc_size_max = proc_size_max;
        self
    }

    pub fn with_num_proc(mut self, num_proc: usize) -> Self {
        self.num_proc = num_proc;
        self
    }

    pub fn with_strategy(mut self, strategy: FitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject bounds the simulation cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.memory_max == 0 {
            return Err(ConfigError::Invalid("MEMORY_MAX must be positive".into()));
        }
        if self.proc_size_max == 0 {
            return Err(ConfigError::Invalid("PROC_SIZE_MAX must be positive".into()));
        }
        Ok(())
    }
}
