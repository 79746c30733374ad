//! Nodestrap CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use console::style;
use nodestrap::cli::{self, Cli};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("nodestrap=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nodestrap=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("nodestrap starting with args: {:?}", cli);

    match cli::run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            ExitCode::from(1)
        }
    }
}
