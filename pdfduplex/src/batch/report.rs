//! Per-file outcomes and the batch summary.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{DuplexError, ErrorCategory};

/// Why a file was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipKind {
    /// Odd page count.
    OddPages,
    /// Unreadable, encrypted, empty or structurally broken document.
    Invalid,
    /// Output could not or must not be written.
    Write,
}

impl SkipKind {
    /// Classify a per-file error.
    pub fn of(err: &DuplexError) -> Self {
        match err {
            DuplexError::OddPageCount { .. } => Self::OddPages,
            _ if err.category() == ErrorCategory::Write => Self::Write,
            _ => Self::Invalid,
        }
    }
}

/// A file that was skipped, with the diagnostic shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    /// Input file.
    pub path: PathBuf,
    /// Skip category.
    pub kind: SkipKind,
    /// Human-readable reason.
    pub message: String,
}

impl FileFailure {
    /// Record `err` against `path`.
    pub fn new(path: impl Into<PathBuf>, err: &DuplexError) -> Self {
        Self {
            path: path.into(),
            kind: SkipKind::of(err),
            message: err.to_string(),
        }
    }
}

/// Result of handling one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FileOutcome {
    /// Reordered output was written.
    #[serde(rename_all = "camelCase")]
    Reordered {
        /// Scanned input.
        input: PathBuf,
        /// Written output.
        output: PathBuf,
        /// Pages in the output.
        page_count: usize,
        /// Size of the output in bytes.
        bytes_written: u64,
    },
    /// Dry run: the file would have been reordered.
    #[serde(rename_all = "camelCase")]
    Planned {
        /// Scanned input.
        input: PathBuf,
        /// Output that would be written.
        output: PathBuf,
        /// Pages in the input.
        page_count: usize,
    },
    /// The file was skipped.
    Skipped(FileFailure),
}

impl FileOutcome {
    /// Input file this outcome belongs to.
    pub fn input(&self) -> &Path {
        match self {
            Self::Reordered { input, .. } | Self::Planned { input, .. } => input,
            Self::Skipped(failure) => &failure.path,
        }
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Directory that was processed.
    pub directory: PathBuf,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Candidate PDFs found.
    pub discovered: usize,
    /// Files reordered, or planned in a dry run.
    pub processed: usize,
    /// Files skipped for an odd page count.
    pub skipped_odd_pages: usize,
    /// Files skipped as unreadable or invalid.
    pub skipped_invalid: usize,
    /// Files whose output could not be written.
    pub skipped_write: usize,
    /// Outputs created.
    pub outputs: Vec<PathBuf>,
    /// Outputs a dry run would create.
    pub planned: Vec<PathBuf>,
    /// Skipped files with reasons.
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    /// Empty report for `directory`.
    pub fn new(directory: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            directory: directory.into(),
            dry_run,
            ..Self::default()
        }
    }

    /// Fold one outcome into the counters.
    pub fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Reordered { output, .. } => {
                self.processed += 1;
                self.outputs.push(output.clone());
            }
            FileOutcome::Planned { output, .. } => {
                self.processed += 1;
                self.planned.push(output.clone());
            }
            FileOutcome::Skipped(failure) => {
                match failure.kind {
                    SkipKind::OddPages => self.skipped_odd_pages += 1,
                    SkipKind::Invalid => self.skipped_invalid += 1,
                    SkipKind::Write => self.skipped_write += 1,
                }
                self.failures.push(failure.clone());
            }
        }
    }

    /// Total number of skipped files.
    pub fn skipped(&self) -> usize {
        self.skipped_odd_pages + self.skipped_invalid + self.skipped_write
    }

    /// Whether every candidate was handled without a skip.
    pub fn is_clean(&self) -> bool {
        self.skipped() == 0
    }
}
