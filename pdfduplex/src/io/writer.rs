//! PDF writing and saving operations.
//!
//! Documents are serialized to a temporary sibling file and renamed into
//! place once complete. A failure at any point removes the temporary file, so
//! the destination either holds a complete document or is left untouched.
//! Temporary files still being written are tracked in [`PendingWrites`] so an
//! aborting process can remove them before it exits.
//!
//! # Examples
//!
//! ```no_run
//! use pdfduplex::io::writer::PdfWriter;
//! use lopdf::Document;
//! use std::path::Path;
//!
//! # async fn example(doc: Document) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let stats = writer.save(doc, Path::new("scan_ordered.pdf")).await?;
//! println!("Wrote {}", stats.format_file_size());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, warn};

use crate::error::{DuplexError, Result};

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Compress streams before writing.
    pub compress: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compress: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        crate::utils::format_file_size(self.file_size)
    }
}

#[derive(Debug, Default)]
struct PendingState {
    paths: HashSet<PathBuf>,
    closed: bool,
}

/// Registry of temporary files that are being written.
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct PendingWrites {
    state: Arc<Mutex<PendingState>>,
}

impl PendingWrites {
    fn lock(&self) -> MutexGuard<'_, PendingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create `path` and track it until [`PendingWrites::release`].
    ///
    /// Fails once [`PendingWrites::discard_all`] was called.
    fn create(&self, path: &Path) -> std::io::Result<File> {
        let mut state = self.lock();
        if state.closed {
            return Err(std::io::Error::new(
                std::io::ErrorKind::Interrupted,
                "writes were aborted",
            ));
        }

        let file = File::create(path)?;
        state.paths.insert(path.to_path_buf());
        Ok(file)
    }

    fn release(&self, path: &Path) {
        self.lock().paths.remove(path);
    }

    /// Temporary files currently being written.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.lock().paths.iter().cloned().collect()
    }

    /// Remove every tracked temporary file and refuse new ones.
    ///
    /// Returns the number of files removed.
    pub fn discard_all(&self) -> usize {
        let mut state = self.lock();
        state.closed = true;

        let mut removed = 0;
        for path in state.paths.drain() {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to remove partial output");
                }
            }
        }
        removed
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
    pending: PendingWrites,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self {
            options,
            pending: PendingWrites::default(),
        }
    }

    /// Registry of the temporary files this writer has in flight.
    pub fn pending_writes(&self) -> PendingWrites {
        self.pending.clone()
    }

    /// Save a PDF document to a file.
    ///
    /// An existing file at `path` is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`DuplexError::FailedToCreateOutput`] or
    /// [`DuplexError::FailedToWrite`]. In both cases nothing is left at
    /// `path` that was not there before, even if the write task panicked.
    pub async fn save(&self, doc: Document, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();
        let pending = self.pending.clone();

        task::spawn_blocking(move || Self::save_blocking(doc, path_buf, &options, &pending))
            .await
            .map_err(|e| {
                let temp = temp_path_for(path);
                discard(&temp);
                self.pending.release(&temp);
                DuplexError::FailedToWrite {
                    path: path.to_path_buf(),
                    source: std::io::Error::other(e),
                }
            })?
    }

    fn save_blocking(
        mut doc: Document,
        path: PathBuf,
        options: &WriteOptions,
        pending: &PendingWrites,
    ) -> Result<WriteStatistics> {
        let start = Instant::now();

        if options.compress {
            doc.compress();
        }
        doc.renumber_objects();

        let write_path = temp_path_for(&path);

        let written = Self::write_file(&mut doc, &write_path, options.buffer_size, pending)
            .and_then(|()| {
                std::fs::rename(&write_path, &path).map_err(|e| DuplexError::FailedToWrite {
                    path: path.clone(),
                    source: e,
                })
            });

        if written.is_err() {
            discard(&write_path);
        }
        pending.release(&write_path);
        written?;

        let file_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let write_time = start.elapsed();

        debug!(
            path = %path.display(),
            bytes = file_size,
            elapsed_ms = write_time.as_millis() as u64,
            "Wrote PDF"
        );

        Ok(WriteStatistics {
            write_time,
            file_size,
            output_path: path,
        })
    }

    fn write_file(
        doc: &mut Document,
        write_path: &Path,
        buffer_size: usize,
        pending: &PendingWrites,
    ) -> Result<()> {
        let file = pending
            .create(write_path)
            .map_err(|e| DuplexError::FailedToCreateOutput {
                path: write_path.to_path_buf(),
                source: e,
            })?;

        let mut writer = std::io::BufWriter::with_capacity(buffer_size, file);

        doc.save_to(&mut writer)
            .map_err(|e| DuplexError::FailedToWrite {
                path: write_path.to_path_buf(),
                source: std::io::Error::other(e),
            })?;

        writer.flush().map_err(|e| DuplexError::FailedToWrite {
            path: write_path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

}

/// Temporary sibling used while a document is being written.
///
/// The name never ends in `.pdf`, so an interrupted run cannot leave behind
/// something that looks like a finished output or a new candidate.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "Failed to remove partial output");
    }
}
