//! Command dispatching.

use std::io::Write;

use crate::cli::args::Commands;
use crate::context::Context;
use crate::error::Result;

/// Trait for command implementations.
pub trait Command {
    /// Run the command against `ctx`, writing its report to `out`.
    fn execute(&self, ctx: &Context, out: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    ctx: Context,
}

impl CommandDispatcher {
    /// Create a dispatcher over a resolution context.
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, command: &Commands, out: &mut dyn Write) -> Result<CommandResult> {
        match command {
            Commands::List(args) => super::list::ListCommand::new(args.clone()).execute(&self.ctx, out),
            Commands::Load(args) => super::load::LoadCommand::new(args.clone()).execute(&self.ctx, out),
            Commands::Handle(args) => {
                super::handle::HandleCommand::new(args.clone()).execute(&self.ctx, out)
            }
        }
    }
}
