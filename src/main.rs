use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod domain;
mod services;

use cli::Cli;

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mut out = services::output::stdout();
    match commands::run(&cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "run failed");
            // Nothing useful left to do if stdout itself is gone.
            let _ = out.error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout carries only workflow commands.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
