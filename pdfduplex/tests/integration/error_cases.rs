//! Integration tests for error handling and edge cases.

use lopdf::{Document, ObjectId};
use pdfduplex::batch::{BatchEvent, SkipKind};
use pdfduplex::io::writer::temp_path_for;
use pdfduplex::reorder::{
    PageList, PageSink, PageTreeSink, ReorderError, reorder_in_background, reorder_pages,
};
use pdfduplex::{BatchProcessor, DuplexError, ErrorCategory};
use std::sync::atomic::Ordering;
use tempfile::TempDir;

use crate::common::{file_names, test_config, write_scan};

#[tokio::test]
async fn test_missing_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = BatchProcessor::new(test_config(&missing))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, DuplexError::DirectoryNotFound { .. }));
    assert_eq!(err.category(), ErrorCategory::UserInput);
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_file_instead_of_directory() {
    let dir = TempDir::new().unwrap();
    let file = write_scan(dir.path(), "scan.pdf", 2);

    let err = BatchProcessor::new(test_config(&file))
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, DuplexError::NotADirectory { .. }));
    assert!(!dir.path().join("scan_ordered.pdf").exists());
}

#[tokio::test]
async fn test_invalid_config_rejected() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.jobs = Some(0);

    let err = BatchProcessor::new(config).run().await.unwrap_err();

    assert!(matches!(err, DuplexError::InvalidConfig { .. }));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_no_files_found() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
    write_scan(dir.path(), "done_ordered.pdf", 2);

    let mut saw_no_files = false;
    let report = BatchProcessor::new(test_config(dir.path()))
        .run_with_events(|event| {
            if let BatchEvent::NoFilesFound { .. } = event {
                saw_no_files = true;
            }
        })
        .await
        .unwrap();

    assert!(saw_no_files);
    assert_eq!(report.discovered, 0);
    assert_eq!(report.processed, 0);
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_write_failure_leaves_no_partial_output() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "scan.pdf", 4);
    write_scan(dir.path(), "other.pdf", 2);

    // A directory where the output file should go makes the final rename fail.
    let blocked = dir.path().join("scan_ordered.pdf");
    std::fs::create_dir(&blocked).unwrap();

    let report = BatchProcessor::new(test_config(dir.path()))
        .run()
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped_write, 1);
    assert_eq!(report.failures[0].kind, SkipKind::Write);
    assert!(blocked.is_dir());
    assert!(!temp_path_for(&blocked).exists());
    assert!(dir.path().join("other_ordered.pdf").exists());
}

/// Sink that gives up after a number of pages.
struct FailAfter {
    inner: PageTreeSink,
    remaining: usize,
}

impl PageSink<ObjectId> for FailAfter {
    type Output = Document;

    fn append(&mut self, page: ObjectId) -> Result<(), ReorderError> {
        if self.remaining == 0 {
            return Err(ReorderError::page_tree("sink gave up"));
        }
        self.remaining -= 1;
        self.inner.append(page)
    }

    fn finish(self) -> Result<Document, ReorderError> {
        self.inner.finish()
    }
}

#[tokio::test]
async fn test_failing_sink_produces_no_document() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(dir.path(), "scan.pdf", 6);

    let document = Document::load(&input).unwrap();
    let pages = PageList::from_document(&document);
    let sink = FailAfter {
        inner: PageTreeSink::new(document),
        remaining: 3,
    };

    let err = reorder_pages(&pages, sink).unwrap_err();
    assert_eq!(err, ReorderError::page_tree("sink gave up"));

    let lifted = DuplexError::from_reorder(input.clone(), err);
    assert!(matches!(lifted, DuplexError::ReorderFailed { .. }));
    assert!(lifted.is_skippable());
    assert_eq!(file_names(dir.path()), vec!["scan.pdf"]);
}

/// Sink that panics partway through, like a parser bug on a malformed page.
struct PanicAfter {
    inner: PageTreeSink,
    remaining: usize,
}

impl PageSink<ObjectId> for PanicAfter {
    type Output = Document;

    fn append(&mut self, page: ObjectId) -> Result<(), ReorderError> {
        assert!(self.remaining > 0, "malformed page {page:?}");
        self.remaining -= 1;
        self.inner.append(page)
    }

    fn finish(self) -> Result<Document, ReorderError> {
        self.inner.finish()
    }
}

#[tokio::test]
async fn test_panicking_sink_is_skippable() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(dir.path(), "scan.pdf", 4);

    let document = Document::load(&input).unwrap();
    let pages = PageList::from_document(&document);
    let sink = PanicAfter {
        inner: PageTreeSink::new(document),
        remaining: 2,
    };

    let err = reorder_in_background(pages, sink).await.unwrap_err();
    assert!(matches!(err, ReorderError::Aborted { .. }));

    let lifted = DuplexError::from_reorder(input.clone(), err);
    assert!(matches!(lifted, DuplexError::ReorderFailed { .. }));
    assert!(lifted.is_skippable());
    assert_eq!(lifted.path(), Some(input.as_path()));
    assert_eq!(file_names(dir.path()), vec!["scan.pdf"]);
}

#[tokio::test]
async fn test_aborted_writes_leave_no_partial_output() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "a.pdf", 2);
    write_scan(dir.path(), "b.pdf", 4);

    let processor = BatchProcessor::new(test_config(dir.path()));
    processor.pending_writes().discard_all();

    let report = processor.run().await.unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.skipped_write, 2);
    assert!(processor.pending_writes().paths().is_empty());
    assert_eq!(file_names(dir.path()), vec!["a.pdf", "b.pdf"]);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "a.pdf", 2);
    write_scan(dir.path(), "b.pdf", 2);

    let processor = BatchProcessor::new(test_config(dir.path()));
    processor.cancel_handle().store(true, Ordering::SeqCst);

    let err = processor.run().await.unwrap_err();

    assert!(matches!(err, DuplexError::Cancelled));
    assert_eq!(err.exit_code(), 130);
    assert_eq!(file_names(dir.path()), vec!["a.pdf", "b.pdf"]);
}

#[tokio::test]
async fn test_subdirectories_ignored() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("nested");
    std::fs::create_dir(&nested).unwrap();
    write_scan(&nested, "deep.pdf", 2);

    let report = BatchProcessor::new(test_config(dir.path()))
        .run()
        .await
        .unwrap();

    assert_eq!(report.discovered, 0);
    assert!(!nested.join("deep_ordered.pdf").exists());
}
