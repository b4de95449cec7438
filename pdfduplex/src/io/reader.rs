//! PDF reading and loading operations.
//!
//! Parsing runs on tokio's blocking pool so the batch driver stays
//! responsive while large scans load.
//!
//! # Examples
//!
//! ```no_run
//! use pdfduplex::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("scan.pdf")).await?;
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::error::{DuplexError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

impl LoadedPdf {
    fn new(document: Document, path: PathBuf, load_time: Duration) -> Self {
        let page_count = document.get_pages().len();
        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        Self {
            document,
            path,
            page_count,
            load_time,
            file_size,
        }
    }
}

/// PDF reader.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File cannot be read
    /// - File is not a valid PDF
    /// - PDF is encrypted
    pub async fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let path_buf = path.to_path_buf();

        task::spawn_blocking(move || Self::load_blocking(path_buf))
            .await
            .map_err(|e| DuplexError::failed_to_load_pdf(path.to_path_buf(), e.to_string()))?
    }

    fn load_blocking(path: PathBuf) -> Result<LoadedPdf> {
        let start = Instant::now();

        let doc = Document::load(&path).map_err(|e| {
            let err_msg = e.to_string();
            if err_msg.contains("encrypt") || err_msg.contains("password") {
                DuplexError::encrypted_pdf(path.clone())
            } else {
                DuplexError::failed_to_load_pdf(path.clone(), err_msg)
            }
        })?;

        let load_time = start.elapsed();
        let loaded = LoadedPdf::new(doc, path, load_time);

        debug!(
            path = %loaded.path.display(),
            pages = loaded.page_count,
            bytes = loaded.file_size,
            elapsed_ms = loaded.load_time.as_millis() as u64,
            "Loaded PDF"
        );

        Ok(loaded)
    }
}
