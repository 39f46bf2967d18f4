//! Command-line interface for pkgres.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, QueryArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
