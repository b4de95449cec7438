//! User-facing output for batch runs.
//!
//! [`display_event`] turns [`BatchEvent`]s into console lines as the batch
//! progresses; [`display_report`] prints the closing summary, including
//! every output path.
//!
//! # Examples
//!
//! ```no_run
//! use pdfduplex::output::{OutputFormatter, display_event};
//! use pdfduplex::{BatchProcessor, Config};
//!
//! # async fn example(config: Config) -> Result<(), Box<dyn std::error::Error>> {
//! let formatter = OutputFormatter::from_config(&config);
//! BatchProcessor::new(config)
//!     .run_with_events(|event| display_event(&formatter, &event))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::batch::{BatchEvent, BatchReport, FileOutcome};
use crate::utils::{display_name, format_file_size};

/// Print a progress event.
pub fn display_event(formatter: &OutputFormatter, event: &BatchEvent<'_>) {
    match event {
        BatchEvent::Discovered { count } => {
            formatter.info(&format!("Found {count} PDF file(s)"));
        }
        BatchEvent::NoFilesFound { directory } => {
            formatter.warning(&format!("No PDF files found in {}", directory.display()));
        }
        BatchEvent::FileCompleted {
            index,
            total,
            outcome,
        } => display_outcome(formatter, *index, *total, outcome),
        BatchEvent::Finished { report } => display_report(formatter, report),
    }
}

fn display_outcome(formatter: &OutputFormatter, index: usize, total: usize, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Reordered {
            input,
            output,
            page_count,
            bytes_written,
        } => {
            formatter.success(&format!(
                "[{index}/{total}] {} -> {} ({page_count} pages)",
                display_name(input),
                display_name(output)
            ));
            formatter.detail("Size", &format_file_size(*bytes_written));
        }
        FileOutcome::Planned {
            input,
            output,
            page_count,
        } => {
            formatter.info(&format!(
                "[{index}/{total}] {} -> {} ({page_count} pages, not written)",
                display_name(input),
                display_name(output)
            ));
        }
        FileOutcome::Skipped(failure) => {
            formatter.warning(&format!(
                "[{index}/{total}] Skipped {}: {}",
                display_name(&failure.path),
                failure.message
            ));
        }
    }
}

/// Print the closing summary of a batch.
pub fn display_report(formatter: &OutputFormatter, report: &BatchReport) {
    if report.discovered == 0 {
        return;
    }

    formatter.section("Summary");

    for (i, line) in summary_lines(report).iter().enumerate() {
        formatter.list_item(i + 1, line);
    }

    if report.dry_run {
        formatter.info("Dry run: no files were written");
    } else if report.is_clean() {
        formatter.success("All files reordered");
    }
}

/// Lines of the closing summary: counters first, then every output path.
pub fn summary_lines(report: &BatchReport) -> Vec<String> {
    let verb = if report.dry_run { "Would reorder" } else { "Reordered" };

    let mut lines = vec![
        format!("{verb}: {}", report.processed),
        format!("Skipped (odd page count): {}", report.skipped_odd_pages),
        format!("Skipped (invalid): {}", report.skipped_invalid),
        format!("Skipped (write): {}", report.skipped_write),
    ];

    lines.extend(
        report
            .outputs
            .iter()
            .map(|output| format!("Created {}", output.display())),
    );
    lines.extend(
        report
            .planned
            .iter()
            .map(|output| format!("Would create {}", output.display())),
    );

    lines
}
