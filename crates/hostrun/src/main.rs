//! hostrun
//!
//! Runs a list of `sudo`-elevated commands on every host of a host list over
//! SSH, one host and one command at a time, and appends a transcript to a
//! report file.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use eyre::WrapErr;
use hostrun_core::{ReportSink, RunAggregator, RunSummary, Shutdown, prepare_commands};
use hostrun_exec::SshConnector;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;

use cli::Args;
use config::{HostSource, Settings};

/// Exit code for a run that finished with failed hosts or commands
const PARTIAL_FAILURE: u8 = 2;

/// Exit code when a second interrupt aborts the run (128 + SIGINT)
const INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    init_tracing(&args.log_level, args.log_json);

    let summary = run(&args).await?;

    if summary.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(PARTIAL_FAILURE))
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout is for the operator summary
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Forward interrupts to the run
///
/// The first interrupt flips `stop` so the run winds down after the current
/// command. Returns `true` when a second interrupt arrives, `false` if the
/// signal source fails first.
async fn relay_interrupts<F, Fut>(mut interrupted: F, stop: watch::Sender<bool>) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if interrupted().await.is_err() {
        return false;
    }
    warn!("interrupt received, stopping after the current command (press Ctrl-C again to abort)");
    let _ = stop.send(true);

    interrupted().await.is_ok()
}

async fn run(args: &Args) -> Result<RunSummary> {
    config::load_env_file(&args.env_file)?;
    let settings = Settings::from_env()?;

    let (hosts, source) =
        config::resolve_hosts(&args.hosts_file, settings.default_host.as_deref())?;
    match source {
        HostSource::File => {
            println!("Scanned Ip addresses from .txt file are below:");
            for host in &hosts {
                println!("{host}");
            }
        }
        HostSource::Default => println!("Hostname {} found in .env file", hosts[0]),
    }

    let (raw_commands, from_file) =
        config::resolve_commands(args.command_file.as_deref(), args.commands.as_deref())?;
    if from_file {
        println!("Loaded {} commands from file", raw_commands.len());
    }
    let commands = prepare_commands(&raw_commands, settings.credential.elevation_password());
    if commands.is_empty() {
        warn!("no commands given, hosts will only be connected to");
    }

    // Open the sink before touching the network so an unwritable report
    // aborts the run up front
    let mut sink = ReportSink::open(&args.name)
        .wrap_err_with(|| format!("error creating or opening file {}", args.name.display()))?;

    let (stop_tx, shutdown) = Shutdown::new();
    tokio::spawn(async move {
        if relay_interrupts(tokio::signal::ctrl_c, stop_tx).await {
            error!("second interrupt received, aborting without writing the report");
            std::process::exit(INTERRUPTED);
        }
    });

    let aggregator = RunAggregator::new(Arc::new(SshConnector::new()), &args.run_config())
        .with_shutdown(shutdown);
    let summary = aggregator
        .run(&hosts, &settings.credential, &commands)
        .await;

    sink.write_report(&summary.report)?;
    let path = sink.finish()?;

    info!(path = %path.display(), blocks = summary.report.len(), "report written");
    println!("Successfully created file {}!", path.display());
    println!(
        "{} host(s), {} unreachable; {} command(s) succeeded, {} failed{}",
        summary.hosts_attempted,
        summary.unreachable.len(),
        summary.succeeded(),
        summary.failed(),
        if summary.cancelled { " (interrupted)" } else { "" }
    );

    Ok(summary)
}
