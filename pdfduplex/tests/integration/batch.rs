//! Integration tests for directory batches.

use pdfduplex::batch::{BatchEvent, SkipKind};
use pdfduplex::{BatchProcessor, EmptyDocumentPolicy, FileOutcome, OverwriteMode};
use rstest::rstest;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{
    BASE_WIDTH, expected_widths, file_names, page_widths, test_config, write_corrupt, write_scan,
};

#[tokio::test]
async fn test_reorders_six_page_scan() {
    let dir = TempDir::new().unwrap();
    let input = write_scan(dir.path(), "letter.pdf", 6);

    let report = BatchProcessor::new(test_config(dir.path()))
        .run()
        .await
        .unwrap();

    let output = dir.path().join("letter_ordered.pdf");
    assert_eq!(report.processed, 1);
    assert_eq!(report.outputs, vec![output.clone()]);
    assert_eq!(page_widths(&output), vec![100, 105, 101, 104, 102, 103]);

    // Input is left untouched.
    assert_eq!(page_widths(&input), vec![100, 101, 102, 103, 104, 105]);
}

#[rstest]
#[case(2)]
#[case(4)]
#[case(10)]
#[case(24)]
#[tokio::test]
async fn test_output_matches_permutation(#[case] pages: usize) {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "scan.pdf", pages);

    BatchProcessor::new(test_config(dir.path()))
        .run()
        .await
        .unwrap();

    let widths = page_widths(&dir.path().join("scan_ordered.pdf"));
    assert_eq!(widths, expected_widths(pages));
    assert_eq!(widths[0], BASE_WIDTH);
    assert_eq!(widths[1], BASE_WIDTH + pages as i64 - 1);
}

#[tokio::test]
async fn test_batch_isolation() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "a.pdf", 4);
    write_corrupt(dir.path(), "b.pdf");
    write_scan(dir.path(), "c.pdf", 2);

    let report = BatchProcessor::new(test_config(dir.path()))
        .run()
        .await
        .unwrap();

    assert_eq!(report.discovered, 3);
    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped_invalid, 1);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failures[0].path, dir.path().join("b.pdf"));
    assert_eq!(report.failures[0].kind, SkipKind::Invalid);

    assert_eq!(
        file_names(dir.path()),
        vec!["a.pdf", "a_ordered.pdf", "b.pdf", "c.pdf", "c_ordered.pdf"]
    );
}

#[tokio::test]
async fn test_odd_page_count_skipped() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "odd.pdf", 5);
    write_scan(dir.path(), "even.pdf", 4);

    let report = BatchProcessor::new(test_config(dir.path()))
        .run()
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped_odd_pages, 1);
    assert!(report.failures[0].message.contains("odd.pdf"));
    assert!(report.failures[0].message.contains('5'));
    assert!(!dir.path().join("odd_ordered.pdf").exists());
}

#[tokio::test]
async fn test_outputs_never_become_inputs() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "scan.pdf", 4);
    let processor = BatchProcessor::new(test_config(dir.path()));

    let first = processor.run().await.unwrap();
    let second = processor.run().await.unwrap();

    assert_eq!(first.discovered, 1);
    assert_eq!(second.discovered, 1);
    assert_eq!(second.outputs, first.outputs);
    assert_eq!(file_names(dir.path()), vec!["scan.pdf", "scan_ordered.pdf"]);
    assert_eq!(
        page_widths(&dir.path().join("scan_ordered.pdf")),
        expected_widths(4)
    );
}

#[tokio::test]
async fn test_existing_output_overwritten_by_default() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "scan.pdf", 2);
    let output = dir.path().join("scan_ordered.pdf");
    std::fs::write(&output, b"stale").unwrap();

    let report = BatchProcessor::new(test_config(dir.path()))
        .run()
        .await
        .unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(page_widths(&output), vec![100, 101]);
}

#[tokio::test]
async fn test_no_clobber_keeps_existing_output() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "scan.pdf", 2);
    let output = dir.path().join("scan_ordered.pdf");
    std::fs::write(&output, b"keep me").unwrap();

    let mut config = test_config(dir.path());
    config.overwrite_mode = OverwriteMode::NoClobber;

    let report = BatchProcessor::new(config).run().await.unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.skipped_write, 1);
    assert_eq!(std::fs::read(&output).unwrap(), b"keep me");
}

#[tokio::test]
async fn test_empty_document_written_by_default() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "blank.pdf", 0);

    let report = BatchProcessor::new(test_config(dir.path()))
        .run()
        .await
        .unwrap();

    let output = dir.path().join("blank_ordered.pdf");
    assert_eq!(report.processed, 1);
    assert!(output.exists());
    assert!(page_widths(&output).is_empty());
}

#[tokio::test]
async fn test_empty_document_skipped_on_request() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "blank.pdf", 0);

    let mut config = test_config(dir.path());
    config.empty_policy = EmptyDocumentPolicy::Skip;

    let report = BatchProcessor::new(config).run().await.unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.skipped_invalid, 1);
    assert!(!dir.path().join("blank_ordered.pdf").exists());
}

#[tokio::test]
async fn test_output_collision_reported() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "a.PDF", 2);
    write_scan(dir.path(), "a.pdf", 4);

    // Case-insensitive filesystems hold only one of the two.
    if file_names(dir.path()).len() < 2 {
        return;
    }

    let report = BatchProcessor::new(test_config(dir.path()))
        .run()
        .await
        .unwrap();

    assert_eq!(report.discovered, 2);
    assert_eq!(report.processed, 1);
    assert_eq!(report.skipped_write, 1);
    assert_eq!(report.failures[0].path, dir.path().join("a.pdf"));
    assert_eq!(page_widths(&dir.path().join("a_ordered.pdf")), vec![100, 101]);
}

#[tokio::test]
async fn test_concurrent_jobs_report_in_discovery_order() {
    let dir = TempDir::new().unwrap();
    let names = ["a.pdf", "b.pdf", "c.pdf", "d.pdf", "e.pdf"];
    for (i, name) in names.iter().enumerate() {
        write_scan(dir.path(), name, 2 * (5 - i));
    }

    let mut config = test_config(dir.path());
    config.jobs = Some(3);

    let mut seen: Vec<(usize, PathBuf)> = Vec::new();
    let report = BatchProcessor::new(config)
        .run_with_events(|event| {
            if let BatchEvent::FileCompleted { index, outcome, .. } = event {
                seen.push((index, outcome.input().to_path_buf()));
            }
        })
        .await
        .unwrap();

    assert_eq!(report.processed, 5);
    let expected: Vec<(usize, PathBuf)> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (i + 1, dir.path().join(name)))
        .collect();
    assert_eq!(seen, expected);

    for (i, name) in names.iter().enumerate() {
        let output = dir.path().join(name.replace(".pdf", "_ordered.pdf"));
        assert_eq!(page_widths(&output), expected_widths(2 * (5 - i)));
    }
}

#[tokio::test]
async fn test_events_sequence() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "scan.pdf", 2);

    let mut events = Vec::new();
    BatchProcessor::new(test_config(dir.path()))
        .run_with_events(|event| {
            events.push(match event {
                BatchEvent::Discovered { count } => format!("discovered {count}"),
                BatchEvent::NoFilesFound { .. } => "none".to_string(),
                BatchEvent::FileCompleted { outcome, .. } => match outcome {
                    FileOutcome::Reordered { page_count, .. } => format!("reordered {page_count}"),
                    other => format!("{other:?}"),
                },
                BatchEvent::Finished { report } => format!("finished {}", report.processed),
            })
        })
        .await
        .unwrap();

    assert_eq!(events, vec!["discovered 1", "reordered 2", "finished 1"]);
}

#[tokio::test]
async fn test_uncompressed_output() {
    let dir = TempDir::new().unwrap();
    write_scan(dir.path(), "scan.pdf", 4);

    let mut config = test_config(dir.path());
    config.compress = false;

    BatchProcessor::new(config).run().await.unwrap();

    assert_eq!(
        page_widths(&dir.path().join("scan_ordered.pdf")),
        expected_widths(4)
    );
}
