//! Error types for pdfduplex.
//!
//! Errors fall into four categories that drive how a batch reacts to them:
//!
//! - **User input**: bad directory or configuration. The batch aborts.
//! - **Skippable document**: odd page count, unparseable or encrypted PDF.
//!   The file is skipped and the batch continues.
//! - **Write**: the output could not be created. The file is skipped and the
//!   batch continues.
//! - **Fatal**: cancellation and unexpected I/O failures.

use std::io;
use std::path::PathBuf;

use crate::reorder::ReorderError;

/// Result type alias for pdfduplex operations.
pub type Result<T> = std::result::Result<T, DuplexError>;

/// How an error affects the surrounding batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad directory path or configuration.
    UserInput,
    /// The document cannot be reordered.
    SkippableDocument,
    /// The reordered document could not be written.
    Write,
    /// Anything that should stop the run.
    Fatal,
}

/// Main error type for pdfduplex operations.
#[derive(Debug, thiserror::Error)]
pub enum DuplexError {
    /// Target directory does not exist.
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// Target path exists but is not a directory.
    #[error("Not a directory: {}", path.display())]
    NotADirectory {
        /// Path that was requested.
        path: PathBuf,
    },

    /// Target directory could not be listed.
    #[error("Cannot read directory: {}\n  Reason: {source}", path.display())]
    DirectoryNotReadable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to load PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF file is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools",
        path.display()
    )]
    EncryptedPdf {
        /// Path to the encrypted PDF.
        path: PathBuf,
    },

    /// Page count is odd, so fronts and backs cannot pair up.
    #[error(
        "Odd page count ({page_count}) in {}: a duplex scan needs as many backs as fronts",
        path.display()
    )]
    OddPageCount {
        /// Path to the PDF file.
        path: PathBuf,
        /// Number of pages found.
        page_count: usize,
    },

    /// Document has no pages and empty documents are configured to be skipped.
    #[error("PDF has no pages: {}", path.display())]
    EmptyDocument {
        /// Path to the PDF file.
        path: PathBuf,
    },

    /// Building the reordered page sequence failed.
    #[error("Failed to reorder pages of {}\n  Reason: {source}", path.display())]
    ReorderFailed {
        /// Path to the PDF file.
        path: PathBuf,
        /// What went wrong while assembling pages.
        source: ReorderError,
    },

    /// Output file already exists and overwriting is disabled.
    #[error(
        "Output file already exists: {}\n  \
         Remove --no-clobber to overwrite it",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Another candidate in the same batch already writes this output.
    #[error(
        "Output {} of {} would also be written by {}",
        output.display(),
        path.display(),
        claimed_by.display()
    )]
    OutputCollision {
        /// Input that was skipped.
        path: PathBuf,
        /// Derived output path.
        output: PathBuf,
        /// Input that claimed the output first.
        claimed_by: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for DuplexError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl DuplexError {
    /// Create a DirectoryNotFound error.
    pub fn directory_not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    /// Create a NotADirectory error.
    pub fn not_a_directory(path: PathBuf) -> Self {
        Self::NotADirectory { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(path: PathBuf) -> Self {
        Self::EncryptedPdf { path }
    }

    /// Create an OddPageCount error.
    pub fn odd_page_count(path: PathBuf, page_count: usize) -> Self {
        Self::OddPageCount { path, page_count }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Attach a file path to an error raised while assembling pages.
    ///
    /// An odd page count detected by the permutation is reported the same way
    /// as one detected during validation.
    pub fn from_reorder(path: PathBuf, err: ReorderError) -> Self {
        match err {
            ReorderError::OddPageCount { page_count } => Self::OddPageCount { path, page_count },
            source => Self::ReorderFailed { path, source },
        }
    }

    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DirectoryNotFound { .. }
            | Self::NotADirectory { .. }
            | Self::DirectoryNotReadable { .. }
            | Self::InvalidConfig { .. } => ErrorCategory::UserInput,
            Self::FailedToLoadPdf { .. }
            | Self::EncryptedPdf { .. }
            | Self::OddPageCount { .. }
            | Self::EmptyDocument { .. }
            | Self::ReorderFailed { .. } => ErrorCategory::SkippableDocument,
            Self::OutputExists { .. }
            | Self::OutputCollision { .. }
            | Self::FailedToCreateOutput { .. }
            | Self::FailedToWrite { .. } => ErrorCategory::Write,
            Self::Cancelled | Self::Io { .. } | Self::Other { .. } => ErrorCategory::Fatal,
        }
    }

    /// Check if the batch can continue past this error.
    ///
    /// Returns true for per-file errors: the file is skipped, others proceed.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::SkippableDocument | ErrorCategory::Write
        )
    }

    /// Path of the file this error concerns, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::DirectoryNotFound { path }
            | Self::NotADirectory { path }
            | Self::DirectoryNotReadable { path, .. }
            | Self::FailedToLoadPdf { path, .. }
            | Self::EncryptedPdf { path }
            | Self::OddPageCount { path, .. }
            | Self::EmptyDocument { path }
            | Self::ReorderFailed { path, .. }
            | Self::OutputExists { path }
            | Self::FailedToCreateOutput { path, .. }
            | Self::OutputCollision { path, .. }
            | Self::FailedToWrite { path, .. } => Some(path),
            Self::InvalidConfig { .. } | Self::Cancelled | Self::Io { .. } | Self::Other { .. } => {
                None
            }
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DirectoryNotFound { .. } => 2,
            Self::NotADirectory { .. } => 2,
            Self::DirectoryNotReadable { .. } => 2,
            Self::InvalidConfig { .. } => 1,
            Self::FailedToLoadPdf { .. }
            | Self::EncryptedPdf { .. }
            | Self::OddPageCount { .. }
            | Self::EmptyDocument { .. }
            | Self::ReorderFailed { .. } => 3,
            Self::OutputExists { .. } | Self::OutputCollision { .. } => 4,
            Self::FailedToCreateOutput { .. } | Self::FailedToWrite { .. } => 5,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
