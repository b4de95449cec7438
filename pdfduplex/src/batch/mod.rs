//! Directory-level batch processing.

pub mod processor;
pub mod report;

pub use processor::{BatchEvent, BatchProcessor};
pub use report::{BatchReport, FileFailure, FileOutcome, SkipKind};
