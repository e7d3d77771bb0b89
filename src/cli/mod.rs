//! CLI command handlers
//!
//! - `args` - argument parsing structures
//! - `commands` - convert, setup and teardown
//! - `help` - banner and log level helpers
//! - `prompt` - y/N confirmation and value prompts

pub mod args;
pub mod commands;
pub mod help;
pub mod prompt;
pub mod router;

pub use args::{Cli, Commands};
pub use help::get_log_level;
pub use router::execute_command;
