//! Load command implementation.
//!
//! `pkgres load` resolves exactly one resource and prints its validated
//! content as YAML.

use std::io::Write;

use crate::cli::args::QueryArgs;
use crate::context::Context;
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// The load command implementation.
pub struct LoadCommand {
    args: QueryArgs,
}

impl LoadCommand {
    pub fn new(args: QueryArgs) -> Self {
        Self { args }
    }
}

impl Command for LoadCommand {
    fn execute(&self, ctx: &Context, out: &mut dyn Write) -> Result<CommandResult> {
        let resource = ctx.get_resource(&self.args.to_query())?;
        let data = resource.load(ctx)?;
        let yaml = serde_yaml::to_string(&data)?;
        write!(out, "{}", yaml)?;
        Ok(CommandResult::success())
    }
}
