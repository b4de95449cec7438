//! CLI argument parsing for pdfduplex.
//!
//! This module defines the command-line interface using `clap`. It is also
//! included by the build script to render the man page.

use clap::Parser;
use std::path::PathBuf;

use pdfduplex::config::{Config, EmptyDocumentPolicy, OverwriteMode};
use pdfduplex::error::{DuplexError, Result};

/// Reorder duplex scans into reading order.
///
/// A scanner without duplex support captures a stack in two passes: all
/// fronts first, then, after the stack is flipped, all backs in reverse
/// order. pdfduplex interleaves every such scan in a directory back into
/// front/back reading order and writes it next to the original as
/// `<name>_ordered.pdf`.
#[derive(Parser, Debug)]
#[command(name = "pdfduplex")]
#[command(version)]
#[command(about = "Reorder duplex scans into reading order", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Directory containing the scanned PDFs
    ///
    /// Only files directly in this directory are considered. Files ending
    /// in `_ordered.pdf` are outputs of earlier runs and are ignored.
    #[arg(value_name = "DIRECTORY", default_value = ".")]
    pub directory: PathBuf,

    /// Dry run - validate scans and show planned outputs without writing
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show sizes, paths and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    ///
    /// Skipped files are still reported as warnings.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never overwrite an existing `_ordered.pdf`
    ///
    /// By default outputs of earlier runs are replaced. With this flag the
    /// scan is skipped instead.
    #[arg(long)]
    pub no_clobber: bool,

    /// Skip scans without any pages instead of writing an empty output
    #[arg(long)]
    pub skip_empty: bool,

    /// Write outputs without compressing their streams
    #[arg(long)]
    pub no_compress: bool,

    /// Number of scans processed concurrently
    ///
    /// Default is one scan at a time.
    #[arg(short, long, value_name = "N", env = "PDFDUPLEX_JOBS")]
    pub jobs: Option<usize>,

    /// Print the batch report as JSON on stdout
    ///
    /// Progress lines are suppressed; warnings still go to stderr.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting configuration is invalid.
    pub fn to_config(&self) -> Result<Config> {
        let overwrite_mode = if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Overwrite
        };

        let empty_policy = if self.skip_empty {
            EmptyDocumentPolicy::Skip
        } else {
            EmptyDocumentPolicy::Write
        };

        let config = Config {
            directory: self.directory.clone(),
            dry_run: self.dry_run,
            verbose: self.verbose && !self.json,
            quiet: self.quiet || self.json,
            overwrite_mode,
            empty_policy,
            compress: !self.no_compress,
            jobs: self.jobs,
        };

        config.validate().map_err(|e| {
            DuplexError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// # Errors
    ///
    /// Returns an error if the job count is zero.
    pub fn validate(&self) -> Result<()> {
        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(DuplexError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        Ok(())
    }
}
