//! Configuration module for pdfduplex.
//!
//! This module holds the validated, normalized settings that drive a batch
//! run. The CLI builds a [`Config`] from its arguments; library users can
//! construct one directly or start from [`Config::for_directory`].

use anyhow::{Result, bail};
use serde::Serialize;

use crate::io::WriteOptions;
use std::path::PathBuf;

/// What to do when an output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverwriteMode {
    /// Replace the existing file (default).
    #[default]
    Overwrite,
    /// Leave the existing file alone and skip the input.
    NoClobber,
}

/// How to treat documents without any pages.
///
/// Zero is even, so an empty document passes the page count check. By
/// default it produces an empty output like any other even document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyDocumentPolicy {
    /// Write an empty output document (default).
    #[default]
    Write,
    /// Skip the document with a diagnostic.
    Skip,
}

/// Complete configuration for a reorder run.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory whose PDFs are reordered.
    pub directory: PathBuf,

    /// Validate and plan without writing any output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Behavior when an output file exists.
    pub overwrite_mode: OverwriteMode,

    /// Handling of zero-page documents.
    pub empty_policy: EmptyDocumentPolicy,

    /// Compress output streams.
    pub compress: bool,

    /// Number of files processed concurrently (None = one at a time).
    pub jobs: Option<usize>,
}

impl Config {
    /// Default configuration for `directory`.
    pub fn for_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            dry_run: false,
            verbose: false,
            quiet: false,
            overwrite_mode: OverwriteMode::default(),
            empty_policy: EmptyDocumentPolicy::default(),
            compress: true,
            jobs: None,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory path is empty
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    pub fn validate(&self) -> Result<()> {
        if self.directory.as_os_str().is_empty() {
            bail!("No directory specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        Ok(())
    }

    /// Get the effective number of concurrent files.
    ///
    /// Processing is sequential unless a job count was given.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or(1).max(1)
    }

    /// Options for the PDF writer.
    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            compress: self.compress,
            ..WriteOptions::default()
        }
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::for_directory(".")
    }
}
