/*!
 * Simulation Shell
 * Interactive command loop driving the memory manager
 */

mod command;
mod session;

pub use command::{Command, CommandError};
pub use session::Session;
