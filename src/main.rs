mod cli;

use crate::cli::Cli;
use clap::Parser;
use exn::ResultExt;
use slidearc_config::Config;
use slidearc_library::{Context, process};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, derive_more::Display, derive_more::Error)]
enum Fatal {
    #[display("configuration")]
    Config,
    #[display("slide archive run")]
    Run,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())))
        .with_target(false)
        .init();

    exit_code(run(&cli))
}

/// Fatal errors fail the process; per-file failures inside a finished run don't.
fn exit_code(result: Result<(), exn::Exn<Fatal>>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<(), exn::Exn<Fatal>> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| Fatal::Config)?;
    let config = cli.apply(config);
    config.validate().or_raise(|| Fatal::Config)?;

    let ctx = Context::new(&config).or_raise(|| Fatal::Run)?;
    let report = process(&ctx).or_raise(|| Fatal::Run)?;

    tracing::info!(
        discovered = report.discovered,
        converted = report.converted(),
        skipped = report.skipped(),
        renamed = report.renamed(),
        failed = report.failures.len(),
        dates = report.index.len(),
        "Done"
    );
    for failure in &report.failures {
        if failure.error.is_retryable() {
            tracing::warn!(name = %failure.file.display(), "Left in source directory; will be retried next run");
        } else {
            tracing::warn!(name = %failure.file.display(), "Left in source directory; fix or remove it and run again");
        }
    }
    Ok(())
}
