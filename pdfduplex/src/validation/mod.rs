//! Per-file validation before reordering.
//!
//! A loaded scan is checked for a page count that can be split into equal
//! front and back passes, and against the configured policies for empty
//! documents and existing outputs.
//!
//! # Examples
//!
//! ```no_run
//! use pdfduplex::io::PdfReader;
//! use pdfduplex::validation::Validator;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loaded = PdfReader::new().load(Path::new("scan.pdf")).await?;
//! let result = Validator::new().validate_document(&loaded)?;
//! println!("{} sheets", result.sheet_count());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use crate::config::{Config, EmptyDocumentPolicy, OverwriteMode};
use crate::error::{DuplexError, Result};
use crate::io::LoadedPdf;

/// Facts about a scan that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Path to the validated file.
    pub path: PathBuf,

    /// Number of pages in the PDF.
    pub page_count: usize,
}

impl ValidationResult {
    /// Number of physical sheets in the stack that was scanned.
    pub fn sheet_count(&self) -> usize {
        self.page_count / 2
    }
}

/// Validator for scanned documents and their outputs.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    empty_policy: EmptyDocumentPolicy,
    overwrite_mode: OverwriteMode,
}

impl Validator {
    /// Create a validator with default policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator following the policies in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            empty_policy: config.empty_policy,
            overwrite_mode: config.overwrite_mode,
        }
    }

    /// Check that a loaded scan can be reordered.
    ///
    /// # Errors
    ///
    /// - [`DuplexError::OddPageCount`] if the page count is odd
    /// - [`DuplexError::EmptyDocument`] if the document has no pages and
    ///   empty documents are skipped
    pub fn validate_document(&self, loaded: &LoadedPdf) -> Result<ValidationResult> {
        let page_count = loaded.page_count;

        if page_count % 2 != 0 {
            return Err(DuplexError::odd_page_count(loaded.path.clone(), page_count));
        }

        if page_count == 0 && self.empty_policy == EmptyDocumentPolicy::Skip {
            return Err(DuplexError::EmptyDocument {
                path: loaded.path.clone(),
            });
        }

        Ok(ValidationResult {
            path: loaded.path.clone(),
            page_count,
        })
    }

    /// Check whether `output` may be written.
    ///
    /// # Errors
    ///
    /// Returns [`DuplexError::OutputExists`] if the file exists and
    /// overwriting is disabled.
    pub async fn validate_output(&self, output: &Path) -> Result<()> {
        if self.overwrite_mode == OverwriteMode::NoClobber
            && tokio::fs::try_exists(output).await.unwrap_or(false)
        {
            return Err(DuplexError::output_exists(output.to_path_buf()));
        }

        Ok(())
    }
}
