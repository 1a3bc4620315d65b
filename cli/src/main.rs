use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shardcrypt_core::crypto::CryptoError;
use shardcrypt_core::prelude::*;

mod args;

use args::Cli;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok((operation, path, stats)) => {
            println!("Operation '{operation}' completed, output file: {}", path.display());
            if let Some(json) = stats {
                println!("{json}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<(Operation, PathBuf, Option<String>)> {
    let file = cli.file.clone().ok_or(CryptoError::MissingArgument("file"))?;
    let operation: Operation = required(&cli.operation, "operation")?.parse()?;
    let mode: CipherMode = required(&cli.mode, "mode")?.parse()?;
    let key = required(&cli.key, "key")?;
    let chaining: Chaining = cli.chaining.parse()?;

    let params = CipherParams::from_text(mode, cli.keylen, key, cli.iv.as_deref(), operation)?
        .with_chaining(chaining);
    let profile = resolve_profile(cli);
    tracing::debug!("[CLI] {:?} with {:?}", params, profile);

    let report = run_pipeline(
        InputSource::File(file.clone()),
        OutputSink::Derived,
        &params,
        &profile,
    )
    .with_context(|| format!("{operation} of {} failed", file.display()))?;

    let path = report
        .output_path
        .unwrap_or_else(|| output_path_for(&file, operation));
    let stats = if cli.stats {
        Some(report.telemetry.to_json().context("serialising telemetry")?)
    } else {
        None
    };

    Ok((operation, path, stats))
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, CryptoError> {
    value.as_deref().ok_or(CryptoError::MissingArgument(name))
}

/// Explicit flags win; anything left unset comes from the host profile.
fn resolve_profile(cli: &Cli) -> ParallelismProfile {
    let host = ParallelismProfile::dynamic();
    ParallelismProfile::new(
        cli.workers.unwrap_or(host.worker_count),
        cli.threads.unwrap_or(host.threads_per_worker),
    )
}
