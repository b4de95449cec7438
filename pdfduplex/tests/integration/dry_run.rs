//! Integration tests for dry-run mode.

use pdfduplex::{BatchProcessor, FileOutcome, OverwriteMode};
use tempfile::TempDir;

use crate::common::{file_names, test_config, write_corrupt, write_scan};

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "a.pdf", 4);
    write_scan(dir.path(), "b.pdf", 2);

    let mut config = test_config(dir.path());
    config.dry_run = true;

    let mut outcomes = Vec::new();
    let report = BatchProcessor::new(config)
        .run_with_events(|event| {
            if let pdfduplex::BatchEvent::FileCompleted { outcome, .. } = event {
                outcomes.push(outcome.clone());
            }
        })
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.processed, 2);
    assert!(report.outputs.is_empty());
    assert_eq!(
        report.planned,
        vec![
            dir.path().join("a_ordered.pdf"),
            dir.path().join("b_ordered.pdf")
        ]
    );
    assert!(matches!(
        outcomes[0],
        FileOutcome::Planned { page_count: 4, .. }
    ));
    assert_eq!(file_names(dir.path()), vec!["a.pdf", "b.pdf"]);
}

#[tokio::test]
async fn test_dry_run_still_validates() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "odd.pdf", 3);
    write_corrupt(dir.path(), "broken.pdf");
    write_scan(dir.path(), "good.pdf", 2);

    let mut config = test_config(dir.path());
    config.dry_run = true;

    let report = BatchProcessor::new(config).run().await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped_odd_pages, 1);
    assert_eq!(report.skipped_invalid, 1);
    assert_eq!(
        file_names(dir.path()),
        vec!["broken.pdf", "good.pdf", "odd.pdf"]
    );
}

#[tokio::test]
async fn test_dry_run_reports_no_clobber_conflict() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "scan.pdf", 2);
    std::fs::write(dir.path().join("scan_ordered.pdf"), b"existing").unwrap();

    let mut config = test_config(dir.path());
    config.dry_run = true;
    config.overwrite_mode = OverwriteMode::NoClobber;

    let report = BatchProcessor::new(config).run().await.unwrap();

    assert_eq!(report.skipped_write, 1);
    assert!(report.planned.is_empty());
}
