//! pkgres CLI entry point.

use std::io;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use pkgres::cli::{Cli, CommandDispatcher};
use pkgres::config::load_settings;
use pkgres::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pkgres=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pkgres=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    let mut settings = load_settings(cli.config.as_deref()).context("Failed to load settings")?;
    if !cli.packages_path.is_empty() {
        settings.packages_path = cli.packages_path.clone();
    }
    tracing::debug!("Using packages path {:?}", settings.packages_path);

    let dispatcher = CommandDispatcher::new(Context::new(settings));
    let mut stdout = io::stdout().lock();
    let result = dispatcher.dispatch(&cli.command, &mut stdout)?;
    Ok(result.exit_code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("pkgres starting with args: {:?}", cli);

    match run(&cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
