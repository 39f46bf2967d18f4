//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait and writes its report to
//! the output it is given. [`CommandDispatcher`] routes subcommands to
//! their implementations over one shared [`crate::Context`].

pub mod dispatcher;
pub mod handle;
pub mod list;
pub mod load;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
