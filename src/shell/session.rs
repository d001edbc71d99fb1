/*!
 * Shell Session
 *
 * Owns the memory manager for the whole run and feeds it commands read
 * from any `BufRead`, writing the transcript to any `Write`.
 */

use super::command::{parse_pid, parse_size, Command, CommandError};
use crate::core::types::{Address, Pid, Size};
use crate::memory::{Allocator, FitStrategy, MemoryError, MemoryInfo, MemoryResult};
use crate::monitoring::span_command;
use anyhow::{Context, Result};
use rand::Rng;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

const PROMPT: &str = "Enter command (A = allocate, D = deallocate, R = report, S = stats, H = help, Q = quit):";

const HELP: &str = "\
Commands:
  A [size [first|best|worst]]  - Allocate a block for a new process
  D [pid]                      - Deallocate the block held by a process
  R [json]                     - Report allocated blocks and free holes
  S                            - Show memory statistics
  H                            - Show this help message
  Q                            - Quit the simulation";

/// Interactive simulation driver
pub struct Session<A, R, W> {
    memory: A,
    input: R,
    output: W,
    strategy: FitStrategy,
    next_pid: Pid,
    commands: u64,
}

impl<A, R, W> Session<A, R, W>
where
    A: Allocator + MemoryInfo,
    R: BufRead,
    W: Write,
{
    pub fn new(memory: A, input: R, output: W) -> Self {
        Self {
            memory,
            input,
            output,
            strategy: FitStrategy::default(),
            next_pid: 1,
            commands: 0,
        }
    }

    /// Strategy used when an allocate command does not name one
    pub fn with_strategy(mut self, strategy: FitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn memory(&self) -> &A {
        &self.memory
    }

    /// Next identifier the counter will propose
    pub fn next_pid(&self) -> Pid {
        self.next_pid
    }

    /// Consume the session, returning the manager and output sink
    pub fn into_parts(self) -> (A, W) {
        (self.memory, self.output)
    }

    /// Allocate `count` processes with random sizes in `1..=max_size`
    ///
    /// Requests that do not fit are logged and skipped. Returns the number
    /// of processes placed.
    pub fn seed<G: Rng + ?Sized>(&mut self, rng: &mut G, count: usize, max_size: Size) -> usize {
        if max_size == 0 {
            warn!("Seeding skipped: maximum process size is zero");
            return 0;
        }

        let mut placed = 0;
        for _ in 0..count {
            let size = rng.gen_range(1..=max_size);
            match self.allocate(size, self.strategy) {
                Ok(_) => placed += 1,
                Err(e) => warn!(size, error = %e, "Seed allocation skipped"),
            }
        }
        info!(requested = count, placed, "Seeding complete");
        placed
    }

    /// Run the command loop until `Q` or end of input
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            self.commands += 1;
            let span = span_command(line.trim(), self.commands);
            let _entered = span.enter();

            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    if !self.execute(command)? {
                        break;
                    }
                }
                Err(e) => {
                    debug!(error = %e, "Rejected input");
                    writeln!(self.output, "{}", e)?;
                }
            }
        }

        writeln!(self.output, "Simulation terminated.")?;
        self.output.flush()?;
        Ok(())
    }

    /// Execute one command; returns false when input ran out mid-command
    pub fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Allocate { size, strategy } => {
                let size = match size {
                    Some(size) => size,
                    None => match self.prompt("Enter process size: ")? {
                        Some(text) => match parse_size(&text) {
                            Ok(size) => size,
                            Err(e) => return self.reject(e),
                        },
                        None => return Ok(false),
                    },
                };
                let strategy = strategy.unwrap_or(self.strategy);
                match self.allocate(size, strategy) {
                    Ok((pid, start)) => writeln!(
                        self.output,
                        "Allocated process {} at address {} with size {}.",
                        pid, start, size
                    )?,
                    Err(e) => writeln!(self.output, "Allocation failed: {}", e)?,
                }
            }

            Command::Deallocate { pid } => {
                let pid = match pid {
                    Some(pid) => pid,
                    None => match self.prompt("Enter process ID: ")? {
                        Some(text) => match parse_pid(&text) {
                            Ok(pid) => pid,
                            Err(e) => return self.reject(e),
                        },
                        None => return Ok(false),
                    },
                };
                match self.memory.deallocate(pid) {
                    Ok(block) => writeln!(
                        self.output,
                        "Deallocated process {} from address {} with size {}.",
                        block.pid, block.start, block.size
                    )?,
                    Err(e) => writeln!(self.output, "Deallocation failed: {}", e)?,
                }
            }

            Command::Report { json } => {
                let report = self.memory.report();
                if json {
                    let text = serde_json::to_string_pretty(&report)
                        .context("Failed to serialize memory report")?;
                    writeln!(self.output, "{}", text)?;
                } else {
                    write!(self.output, "{}", report)?;
                }
            }

            Command::Stats => writeln!(self.output, "{}", self.memory.stats())?,

            Command::Help => writeln!(self.output, "{}", HELP)?,

            Command::Quit => return Ok(false),
        }

        self.output.flush()?;
        Ok(true)
    }

    /// Allocate under a fresh identifier
    ///
    /// Identifiers already held in the table are skipped first. Otherwise the
    /// counter only advances on success.
    fn allocate(&mut self, size: Size, strategy: FitStrategy) -> MemoryResult<(Pid, Address)> {
        while self.memory.is_allocated(self.next_pid) {
            self.next_pid = self
                .next_pid
                .checked_add(1)
                .ok_or(MemoryError::DuplicateIdentifier(self.next_pid))?;
        }

        let pid = self.next_pid;
        let placement = self.memory.allocate(size, pid, strategy)?;
        self.next_pid = pid.saturating_add(1);
        Ok((pid, placement.start))
    }

    fn reject(&mut self, error: CommandError) -> Result<bool> {
        writeln!(self.output, "{}", error)?;
        Ok(true)
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
