//! mirrorsync - One-way periodic directory mirroring.
//!
//! Usage:
//!   mirrorsync <SOURCE> <REPLICA> <LOG_FILE> <INTERVAL>   Mirror every INTERVAL seconds
//!   mirrorsync ... --once                                 Run a single pass and exit
//!   mirrorsync --help                                     Show help

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use mirrorsync_core::{DriverSummary, SyncConfig};
use mirrorsync_sync::{Journal, SyncDriver};

#[derive(Parser)]
#[command(
    name = "mirrorsync",
    version,
    about = "One-way periodic directory mirroring",
    long_about = "mirrorsync keeps a replica directory identical to a source directory.\n\n\
                  Every INTERVAL seconds the replica is compared with the source by content \
                  hash; new and changed files are copied, orphaned files and folders are \
                  removed, and each change is appended to LOG_FILE."
)]
struct Cli {
    /// Root of the tree to mirror from
    source: PathBuf,

    /// Root of the tree to mirror to (created if missing)
    replica: PathBuf,

    /// Append-only log of every change made to the replica
    log_file: PathBuf,

    /// Seconds between synchronization passes
    #[arg(value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Run a single synchronization pass and exit
    #[arg(long)]
    once: bool,

    /// Treat symbolic links as the files and folders they point to
    #[arg(long)]
    follow_symlinks: bool,

    /// Hash every candidate file even when lengths already differ
    #[arg(long)]
    full_compare: bool,

    /// Do not echo log lines to stdout
    #[arg(short, long)]
    quiet: bool,

    /// Summary format printed on exit
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut builder = SyncConfig::builder();
    builder
        .source(cli.source)
        .replica(cli.replica)
        .log_file(cli.log_file)
        .interval_secs(cli.interval)
        .follow_symlinks(cli.follow_symlinks)
        .quick_compare(!cli.full_compare)
        .echo_to_console(!cli.quiet);
    if cli.once {
        builder.max_ticks(1u64);
    }
    let config = builder.build().context("Invalid configuration")?;

    println!(
        "Synchronization started. Source: {}, Replica: {}, Sync Interval: {} seconds",
        config.source.display(),
        config.replica.display(),
        config.interval_secs
    );

    let journal = Journal::new(&config.log_file).echo(config.echo_to_console);
    let mut driver = SyncDriver::new(&config, journal);

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted, stopping after the current pass...");
            interrupt.cancel();
        }
    });

    let summary = driver.run(cancel).await.context("Synchronization stopped")?;
    print_summary(&summary, cli.format)?;

    Ok(())
}

/// Install the stderr diagnostics subscriber.
fn init_tracing(verbose: u8) -> Result<()> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {e}"))
}

/// Print the totals of every pass that ran.
fn print_summary(summary: &DriverSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            eprintln!();
            eprintln!("{}", "─".repeat(60));
            eprintln!(
                " {} pass(es), {} skipped",
                summary.ticks, summary.skipped_ticks
            );
            eprintln!(
                " {} file(s) copied ({}), {} deleted",
                summary.files_copied,
                format_size(summary.bytes_copied),
                summary.files_deleted
            );
            eprintln!(
                " {} folder(s) created, {} deleted",
                summary.folders_created, summary.folders_deleted
            );
            if summary.mutations() == 0 && summary.failures == 0 && summary.ticks > 0 {
                eprintln!(" Replica already matched the source");
            }
            if summary.failures > 0 {
                eprintln!(" {} folder(s) could not be synchronized", summary.failures);
            }
            eprintln!("{}", "─".repeat(60));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
    }

    Ok(())
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
