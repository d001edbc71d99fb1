/*!
 * Configuration Loader
 *
 * Reads `KEY=VALUE` properties files. A missing file falls back to the
 * defaults, and so does any single value that fails to parse.
 */

use super::types::{ConfigError, ConfigResult, SimulationConfig};
use crate::core::limits::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Split properties text into trimmed key/value pairs
///
/// The key ends at the first `=`, `:` or whitespace. Lines starting with
/// `#` or `!` are comments.
pub fn parse_properties(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .map(|line| match line.find(|c: char| c == '=' || c == ':' || c.is_whitespace()) {
            Some(idx) => {
                let value = line[idx..].trim_start();
                // Whitespace around `=` or `:` is not part of the value
                let value = value
                    .strip_prefix(|c: char| c == '=' || c == ':')
                    .unwrap_or(value);
                (line[..idx].to_string(), value.trim().to_string())
            }
            None => (line.to_string(), String::new()),
        })
        .collect()
}

/// Resolve the configuration file: explicit argument, then `MEMSIM_CONFIG`,
/// then `config.properties` in the working directory
pub fn config_path(arg: Option<&str>) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl SimulationConfig {
    /// Apply one recognized key; unknown keys are ignored
    fn apply(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        match key {
            "MEMORY_MAX" => self.memory_max = parse_value(key, value)?,
            "PROC_SIZE_MAX" => self.proc_size_max = parse_value(key, value)?,
            "NUM_PROC" => self.num_proc = parse_value(key, value)?,
            "MAX_PROC_SIZE" => self.max_proc_duration = parse_value(key, value)?,
            "FIT_STRATEGY" => self.strategy = parse_value(key, value)?,
            "SEED" => self.seed = Some(parse_value(key, value)?),
            _ => debug!(key, "Ignoring unknown configuration key"),
        }
        Ok(())
    }

    /// Parse properties text, failing on the first bad value
    pub fn from_properties(text: &str) -> ConfigResult<Self> {
        let mut config = Self::default();
        for (key, value) in parse_properties(text) {
            config.apply(&key, &value)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse properties text, keeping the default for any bad value
    pub fn from_properties_lenient(text: &str) -> ConfigResult<Self> {
        let mut config = Self::default();
        for (key, value) in parse_properties(text) {
            if let Err(e) = config.apply(&key, &value) {
                warn!(error = %e, "Keeping default value");
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a properties file
    ///
    /// An unreadable file yields the defaults. Bounds that cannot run a
    /// simulation (zero memory or process size) are an error.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) => {
                let err = ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                };
                warn!(error = %err, "Using default configuration");
                return Ok(Self::default());
            }
        };

        let config = Self::from_properties_lenient(&text)?;
        if config.proc_size_max > config.memory_max {
            warn!(
                proc_size_max = config.proc_size_max,
                memory_max = config.memory_max,
                "PROC_SIZE_MAX exceeds MEMORY_MAX; oversized seed requests will not fit"
            );
        }
        info!(path = %path.display(), ?config, "Configuration loaded");
        Ok(config)
    }
}
