/*!
 * Simulation Configuration
 * Bounds for the address space and the seeding phase
 */

mod loader;
mod types;

pub use loader::{config_path, parse_properties};
pub use types::{ConfigError, ConfigResult, SimulationConfig};
