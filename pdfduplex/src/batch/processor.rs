//! Batch driver: discover, validate, reorder and write every scan in a
//! directory.
//!
//! Each file runs through load, validation, reordering and an atomic write in
//! its own future. Per-file failures become [`FileOutcome::Skipped`] and the
//! batch moves on; only directory errors, cancellation and unexpected
//! failures end the run early.

use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::task;
use tracing::{debug, info, instrument, warn};

use crate::batch::report::{BatchReport, FileFailure, FileOutcome};
use crate::config::Config;
use crate::discovery::{Candidate, discover_candidates};
use crate::error::{DuplexError, Result};
use crate::io::{PdfReader, PdfWriter, PendingWrites};
use crate::reorder::{PageList, PageTreeSink, reorder_in_background};
use crate::validation::Validator;

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone, Copy)]
pub enum BatchEvent<'a> {
    /// Candidates were found in the directory.
    Discovered {
        /// Number of candidate PDFs.
        count: usize,
    },
    /// The directory holds no candidate PDFs.
    NoFilesFound {
        /// Directory that was searched.
        directory: &'a std::path::Path,
    },
    /// A file was handled.
    FileCompleted {
        /// 1-based position in discovery order.
        index: usize,
        /// Number of candidates.
        total: usize,
        /// What happened to the file.
        outcome: &'a FileOutcome,
    },
    /// All files were handled.
    Finished {
        /// Final summary.
        report: &'a BatchReport,
    },
}

/// Reorders every duplex scan in a directory.
///
/// # Examples
///
/// ```no_run
/// use pdfduplex::{BatchProcessor, Config};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let processor = BatchProcessor::new(Config::for_directory("scans"));
/// let report = processor.run().await?;
/// println!("{} reordered, {} skipped", report.processed, report.skipped());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    config: Config,
    reader: PdfReader,
    writer: PdfWriter,
    validator: Validator,
    cancelled: Arc<AtomicBool>,
}

impl BatchProcessor {
    /// Create a processor for `config`.
    pub fn new(config: Config) -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::with_options(config.write_options()),
            validator: Validator::from_config(&config),
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops the batch before the next file when set.
    ///
    /// Files already in progress are completed.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Temporary outputs currently being written.
    ///
    /// A caller that has to exit before the batch finishes removes them
    /// with [`PendingWrites::discard_all`].
    pub fn pending_writes(&self) -> PendingWrites {
        self.writer.pending_writes()
    }

    /// Run the batch without progress notifications.
    ///
    /// # Errors
    ///
    /// See [`BatchProcessor::run_with_events`].
    pub async fn run(&self) -> Result<BatchReport> {
        self.run_with_events(|_| {}).await
    }

    /// Run the batch, calling `on_event` as it progresses.
    ///
    /// Outcomes are reported in discovery order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid
    /// - The directory is missing, not a directory or unreadable
    /// - The run was cancelled
    /// - A file failed in a way that is not specific to that file
    #[instrument(skip_all, fields(directory = %self.config.directory.display()))]
    pub async fn run_with_events<F>(&self, mut on_event: F) -> Result<BatchReport>
    where
        F: FnMut(BatchEvent<'_>),
    {
        let start = Instant::now();

        self.config
            .validate()
            .map_err(|e| DuplexError::invalid_config(e.to_string()))?;

        let directory = self.config.directory.clone();
        let discovery = {
            let directory = directory.clone();
            task::spawn_blocking(move || discover_candidates(&directory))
                .await
                .map_err(|e| DuplexError::other(format!("Discovery task failed: {e}")))??
        };

        let mut report = BatchReport::new(&directory, self.config.dry_run);
        report.discovered = discovery.total();

        if discovery.is_empty() {
            info!("No candidate PDFs found");
            on_event(BatchEvent::NoFilesFound {
                directory: &directory,
            });
            on_event(BatchEvent::Finished { report: &report });
            return Ok(report);
        }

        let total = discovery.total();
        info!(count = total, "Discovered candidate PDFs");
        on_event(BatchEvent::Discovered { count: total });

        let mut index = 0;

        for collision in &discovery.collisions {
            index += 1;
            let path = collision.path().map(PathBuf::from).unwrap_or_default();
            warn!(error = %collision, "Output collision");
            let outcome = FileOutcome::Skipped(FileFailure::new(path, collision));
            report.record(&outcome);
            on_event(BatchEvent::FileCompleted {
                index,
                total,
                outcome: &outcome,
            });
        }

        let mut outcomes = stream::iter(discovery.candidates.iter())
            .map(|candidate| self.handle_candidate(candidate))
            .buffered(self.config.effective_jobs());

        while let Some(outcome) = outcomes.next().await {
            let Some(outcome) = outcome? else {
                continue;
            };

            index += 1;
            report.record(&outcome);
            on_event(BatchEvent::FileCompleted {
                index,
                total,
                outcome: &outcome,
            });
        }

        if index < total && self.cancelled.load(Ordering::SeqCst) {
            warn!(handled = index, total, "Batch cancelled");
            return Err(DuplexError::Cancelled);
        }

        info!(
            processed = report.processed,
            skipped = report.skipped(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch finished"
        );
        on_event(BatchEvent::Finished { report: &report });

        Ok(report)
    }

    /// Handle one candidate, turning per-file errors into skips.
    ///
    /// Returns `None` if the batch was cancelled before the file started.
    async fn handle_candidate(&self, candidate: &Candidate) -> Result<Option<FileOutcome>> {
        if self.cancelled.load(Ordering::SeqCst) {
            return Ok(None);
        }

        match self.process_file(candidate).await {
            Ok(outcome) => Ok(Some(outcome)),
            Err(err) if err.is_skippable() => {
                warn!(file = %candidate.input.display(), error = %err, "Skipping file");
                Ok(Some(FileOutcome::Skipped(FileFailure::new(
                    &candidate.input,
                    &err,
                ))))
            }
            Err(err) => Err(err),
        }
    }

    /// Load, validate, reorder and write a single scan.
    #[instrument(skip_all, fields(file = %candidate.input.display()))]
    async fn process_file(&self, candidate: &Candidate) -> Result<FileOutcome> {
        let loaded = self.reader.load(&candidate.input).await?;
        let validation = self.validator.validate_document(&loaded)?;
        self.validator.validate_output(&candidate.output).await?;
        debug!(
            pages = validation.page_count,
            sheets = validation.sheet_count(),
            "Scan is ready to reorder"
        );

        if self.config.dry_run {
            debug!(output = %candidate.output.display(), "Planned output");
            return Ok(FileOutcome::Planned {
                input: candidate.input.clone(),
                output: candidate.output.clone(),
                page_count: validation.page_count,
            });
        }

        let path = loaded.path;
        let document = loaded.document;
        let pages = PageList::from_document(&document);
        let reordered = reorder_in_background(pages, PageTreeSink::new(document))
            .await
            .map_err(|e| DuplexError::from_reorder(path.clone(), e))?;

        let stats = self.writer.save(reordered, &candidate.output).await?;

        info!(
            output = %stats.output_path.display(),
            pages = validation.page_count,
            size = %stats.format_file_size(),
            elapsed_ms = stats.write_time.as_millis() as u64,
            "Wrote reordered PDF"
        );

        Ok(FileOutcome::Reordered {
            input: path,
            output: stats.output_path,
            page_count: validation.page_count,
            bytes_written: stats.file_size,
        })
    }
}
