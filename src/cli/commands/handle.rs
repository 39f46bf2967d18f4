//! Handle command implementation.
//!
//! `pkgres handle` resolves exactly one resource and prints its handle as
//! JSON, suitable for feeding back through [`crate::Context::from_handle`].

use std::io::Write;

use crate::cli::args::QueryArgs;
use crate::context::Context;
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// The handle command implementation.
pub struct HandleCommand {
    args: QueryArgs,
}

impl HandleCommand {
    pub fn new(args: QueryArgs) -> Self {
        Self { args }
    }
}

impl Command for HandleCommand {
    fn execute(&self, ctx: &Context, out: &mut dyn Write) -> Result<CommandResult> {
        let resource = ctx.get_resource(&self.args.to_query())?;
        writeln!(out, "{}", resource.handle().to_json()?)?;
        Ok(CommandResult::success())
    }
}
