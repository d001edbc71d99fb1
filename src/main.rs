/*!
 * Memory Partition Simulator - Main Entry Point
 *
 * Loads the simulation bounds, seeds the address space with random
 * processes, then hands stdin/stdout to the interactive shell.
 */

use anyhow::{Context, Result};
use memsim::config::config_path;
use memsim::{init_tracing, MemoryManager, Session, SimulationConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let arg = std::env::args().nth(1);
    let path = config_path(arg.as_deref());
    let config = SimulationConfig::load(&path)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    info!(
        memory_max = config.memory_max,
        proc_size_max = config.proc_size_max,
        num_proc = config.num_proc,
        max_proc_duration = config.max_proc_duration,
        strategy = %config.strategy,
        "Starting simulation"
    );

    let memory = MemoryManager::with_capacity(config.memory_max);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session =
        Session::new(memory, stdin.lock(), stdout.lock()).with_strategy(config.strategy);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    session.seed(&mut rng, config.num_proc, config.proc_size_max);

    session.run()
}
