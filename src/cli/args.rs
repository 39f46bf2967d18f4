//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct.

use crate::config::PACKAGES_PATH_ENV;
use crate::resolver::Query;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pkgres - Inspect package resources.
#[derive(Debug, Parser)]
#[command(name = "pkgres")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Package search path (repeatable; overrides settings)
    #[arg(
        short = 'p',
        long = "packages-path",
        global = true,
        env = PACKAGES_PATH_ENV,
        value_delimiter = if cfg!(windows) { ';' } else { ':' }
    )]
    pub packages_path: Vec<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List matching resources
    List(QueryArgs),

    /// Load and print the content of a single resource
    Load(QueryArgs),

    /// Print the handle of a single resource as JSON
    Handle(QueryArgs),
}

/// Query flags shared by every subcommand.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct QueryArgs {
    /// Resource key pattern, e.g. `package.*` (repeatable)
    #[arg(short, long = "key")]
    pub keys: Vec<String>,

    /// Root resource key to start from
    #[arg(short, long)]
    pub root: Option<String>,

    /// Variable constraint as NAME=VALUE (repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Search path binding every root
    #[arg(short, long)]
    pub search_path: Option<PathBuf>,

    /// A file the result must live in
    #[arg(short, long)]
    pub filepath: Option<PathBuf>,
}

impl QueryArgs {
    /// Build the library query.
    pub fn to_query(&self) -> Query {
        let mut query = Query::new()
            .keys(self.keys.iter().cloned())
            .variables(self.vars.iter().cloned().collect());
        query.root = self.root.clone();
        query.search_path = self.search_path.clone();
        query.filepath = self.filepath.clone();
        query
    }
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_flags() {
        let cli = Cli::parse_from([
            "pkgres",
            "list",
            "--key",
            "package.*",
            "--root",
            "folder.packages_root",
            "--var",
            "name=foo",
            "--var",
            "version=1.0",
        ]);
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        let query = args.to_query();
        assert_eq!(query.keys, ["package.*"]);
        assert_eq!(query.root.as_deref(), Some("folder.packages_root"));
        assert_eq!(query.variables.get("version").unwrap(), "1.0");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pkgres", "load", "--debug", "-p", "/a", "-p", "/b"]);
        assert!(cli.debug);
        assert_eq!(cli.packages_path, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn rejects_malformed_var() {
        assert!(Cli::try_parse_from(["pkgres", "list", "--var", "novalue"]).is_err());
        assert_eq!(parse_var("ext=").unwrap(), ("ext".to_string(), String::new()));
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["pkgres"]).is_err());
    }
}
