use anyhow::{Context, Result};
use balance_race::application::conclude;
use balance_race::cli::Cli;
use balance_race::config::Settings;
use balance_race::harness::{ProgressReporter, SilentProgress};
use balance_race::infrastructure::ConsoleProgress;
use balance_race::Application;
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

/// Level used until the configured one is known
const BOOTSTRAP_LOG_LEVEL: &str = "warn";

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Installed before configuration loads so its events are not lost.
    // RUST_LOG wins over the configured level; logs go to stderr.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) = reload::Layer::new(
        env_filter.unwrap_or_else(|| EnvFilter::new(BOOTSTRAP_LOG_LEVEL)),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let settings = Settings::load(cli.config.as_deref(), &cli.overrides())
        .context("failed to load configuration")?;
    if !from_env {
        filter_handle
            .reload(EnvFilter::new(&settings.logging.level))
            .context("failed to apply configured log level")?;
    }

    let experiment = settings.validate()?;
    let format = experiment.report.format;
    let app = Application::new(experiment);

    let mut progress: Box<dyn ProgressReporter> = if cli.no_progress {
        Box::new(SilentProgress)
    } else {
        Box::new(ConsoleProgress::new())
    };

    let result = app.run(&mut io::stdout().lock(), progress.as_mut());
    let status = conclude(
        result,
        format,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;
    Ok(status.exit_code())
}
