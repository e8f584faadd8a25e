//! cfgdeploy console entry point.

mod args;
mod config;
mod console;
mod run;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    // Diagnostics go to stderr; progress lines are printed by the sink.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = args::Args::parse();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting cfgdeploy");

    let settings = config::Config::load(args.config.as_deref())?.merge(&args);
    let sink = console::ConsoleSink::new(settings.json);
    let mut prompter = console::stdio(settings.json);

    let status = run::run(
        &settings,
        cfgdeploy_steam::default_sources(),
        &mut prompter,
        &sink,
    )?;
    tracing::debug!(status = ?status, "finished");
    Ok(status.into())
}
