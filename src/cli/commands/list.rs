//! List command implementation.
//!
//! `pkgres list` prints one line per matching resource: its key and path,
//! plus the entry variable for resources decomposed from a combined file.

use std::io::Write;

use crate::cli::args::QueryArgs;
use crate::context::Context;
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    args: QueryArgs,
}

impl ListCommand {
    pub fn new(args: QueryArgs) -> Self {
        Self { args }
    }
}

impl Command for ListCommand {
    fn execute(&self, ctx: &Context, out: &mut dyn Write) -> Result<CommandResult> {
        let query = self.args.to_query();
        let mut count = 0usize;
        for resource in ctx.iter_resources(&query)? {
            let resource = resource?;
            let written = match resource.resource_type().entry_variable {
                Some(var) => writeln!(
                    out,
                    "{}\t{}\t{}={}",
                    resource.key(),
                    resource.path().display(),
                    var,
                    resource.get_or(var, "")
                ),
                None => writeln!(out, "{}\t{}", resource.key(), resource.path().display()),
            };
            written?;
            count += 1;
        }
        if count == 0 {
            tracing::info!("No resources match {}", query);
            return Ok(CommandResult::failure(1));
        }
        tracing::debug!("Listed {} resources for {}", count, query);
        Ok(CommandResult::success())
    }
}
