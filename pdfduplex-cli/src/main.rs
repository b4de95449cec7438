//! pdfduplex - Reorder duplex scans into reading order.
//!
//! Command-line front end for the `pdfduplex` library.

mod cli;

use clap::Parser;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfduplex::error::DuplexError;
use pdfduplex::io::PendingWrites;
use pdfduplex::output::{OutputFormatter, display_event};
use pdfduplex::{BatchProcessor, NAME, VERSION};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log to stderr, filtered by `RUST_LOG` when set.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "pdfduplex=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), DuplexError> {
    cli.validate()?;
    let config = cli.to_config()?;

    let formatter = if cli.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    if formatter.is_verbose() {
        formatter.section(&format!("{NAME} v{VERSION}"));
        formatter.detail("Directory", &config.directory.display().to_string());
        formatter.detail("Jobs", &config.effective_jobs().to_string());
    }

    if config.dry_run && formatter.should_print() {
        formatter.info("Dry run: outputs are planned but not written");
    }

    let processor = BatchProcessor::new(config);
    watch_for_interrupt(processor.cancel_handle(), processor.pending_writes());

    let report = processor
        .run_with_events(|event| display_event(&formatter, &event))
        .await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| DuplexError::other(format!("Failed to serialize report: {e}")))?;
        println!("{json}");
    }

    Ok(())
}

/// Stop the batch after the files in progress on the first Ctrl-C. On the
/// second, remove the partial outputs still being written and exit.
fn watch_for_interrupt(cancelled: Arc<AtomicBool>, pending: PendingWrites) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        cancelled.store(true, Ordering::SeqCst);
        eprintln!("Interrupted: finishing files in progress (Ctrl-C again to abort)");

        if tokio::signal::ctrl_c().await.is_ok() {
            let removed = pending.discard_all();
            tracing::debug!(removed, "Removed partial outputs");
            process::exit(DuplexError::Cancelled.exit_code());
        }
    });
}
