//! vigil - Deployment verification sweep
//!
//! Loads a JSON config, runs every check through the ops crate, writes the
//! digest manifest and the audit log, then maps the verdict to an exit code.

mod cli;
mod display;
mod error;

use crate::cli::Cli;
use crate::display::OutputRenderer;
use crate::error::{CliError, EXIT_FAILURE};
use clap::error::ErrorKind;
use clap::Parser;
use std::process;
use std::sync::Arc;
use tracing::{error, info};
use vigil_config::Config;
use vigil_events::Logger;
use vigil_ops::VerifyContextBuilder;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_FAILURE,
            };
            // Nothing useful left to do if stderr is closed
            let _ = e.print();
            process::exit(code);
        }
    };

    init_tracing(cli.debug);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_FAILURE),
        Err(e) => {
            error!("Application error: {}", e);
            eprintln!("Error: {e}");
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic; returns whether the sweep passed
async fn run(cli: Cli) -> Result<bool, CliError> {
    info!("Starting vigil v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&cli.config).await?;
    let options = cli.run_options();

    let log = Logger::open(&options.log_file)?.with_echo(!cli.json);
    info!(path = %log.path().display(), "Audit log opened");

    let ctx = VerifyContextBuilder::new()
        .with_config(config)
        .with_options(options)
        .with_log(Arc::new(log))
        .build()?;

    let renderer = OutputRenderer::new(cli.json);
    renderer.render_header()?;

    let report = vigil_ops::run(&ctx).await?;

    renderer.render_report(&report)?;

    let verdict = report.verdict();
    info!(
        checked = verdict.checked,
        failed = verdict.failed,
        drifted = verdict.drifted,
        "Sweep completed"
    );
    Ok(verdict.passed())
}

/// Initialize diagnostic tracing on stderr
fn init_tracing(debug_enabled: bool) {
    let default_filter = if debug_enabled {
        "info,vigil=debug,vigil_ops=debug"
    } else {
        "warn,vigil::audit=off"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(debug_enabled)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}
