//! Candidate discovery and output naming.
//!
//! A candidate is a regular file directly inside the target directory whose
//! name ends in `.pdf` (any case) and does not already carry the
//! [`OUTPUT_SUFFIX`]. Outputs of earlier runs are therefore never picked up
//! again.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{DuplexError, Result};

/// File name ending reserved for reordered outputs.
pub const OUTPUT_SUFFIX: &str = "_ordered.pdf";

const PDF_EXTENSION: &str = ".pdf";

/// A file selected for reordering together with its output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Scanned input PDF.
    pub input: PathBuf,
    /// Sibling path the reordered PDF is written to.
    pub output: PathBuf,
}

/// Candidate files of one directory.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Files to reorder, sorted by path.
    pub candidates: Vec<Candidate>,
    /// Files whose output path is already claimed by an earlier candidate.
    pub collisions: Vec<DuplexError>,
}

impl Discovery {
    /// Total number of PDFs found, colliding ones included.
    pub fn total(&self) -> usize {
        self.candidates.len() + self.collisions.len()
    }

    /// Whether nothing qualified.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Whether a file name qualifies as reorder input.
pub fn is_candidate_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(PDF_EXTENSION) && !lower.ends_with(OUTPUT_SUFFIX)
}

/// Output path for `input`: the extension is replaced by [`OUTPUT_SUFFIX`].
///
/// `scans/letter.PDF` becomes `scans/letter_ordered.pdf`.
pub fn output_path_for(input: &Path) -> PathBuf {
    let mut name = input.file_stem().map(OsStr::to_os_string).unwrap_or_default();
    name.push(OUTPUT_SUFFIX);
    input.with_file_name(name)
}

/// Check that `directory` exists and is a directory.
///
/// # Errors
///
/// - [`DuplexError::DirectoryNotFound`] if nothing exists at the path
/// - [`DuplexError::NotADirectory`] if the path is a file
/// - [`DuplexError::DirectoryNotReadable`] if its metadata cannot be read
pub fn check_directory(directory: &Path) -> Result<()> {
    let exists = directory
        .try_exists()
        .map_err(|e| DuplexError::DirectoryNotReadable {
            path: directory.to_path_buf(),
            source: e,
        })?;

    if !exists {
        return Err(DuplexError::directory_not_found(directory.to_path_buf()));
    }

    if !directory.is_dir() {
        return Err(DuplexError::not_a_directory(directory.to_path_buf()));
    }

    Ok(())
}

/// List the candidate PDFs directly inside `directory`.
///
/// Subdirectories are not descended into. Candidates are sorted by path.
///
/// # Errors
///
/// Returns an error if the directory is missing, not a directory, or cannot
/// be listed.
pub fn discover_candidates(directory: &Path) -> Result<Discovery> {
    check_directory(directory)?;

    let mut inputs = Vec::new();

    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| directory.to_path_buf());
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            DuplexError::DirectoryNotReadable { path, source }
        })?;

        if !entry.path().is_file() {
            continue;
        }

        // Names that are not valid UTF-8 are matched on their lossy form.
        let qualifies = is_candidate_name(&entry.file_name().to_string_lossy());

        if qualifies {
            inputs.push(entry.into_path());
        } else {
            debug!(path = %entry.path().display(), "Ignoring non-candidate");
        }
    }

    inputs.sort();

    Ok(assign_outputs(inputs))
}

/// Pair each input with its output path, rejecting inputs whose output is
/// already taken by an earlier input (e.g. `a.pdf` and `a.PDF`).
fn assign_outputs(inputs: Vec<PathBuf>) -> Discovery {
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut discovery = Discovery::default();

    for input in inputs {
        let output = output_path_for(&input);

        if let Some(first) = claimed.get(&output) {
            discovery.collisions.push(DuplexError::OutputCollision {
                path: input,
                output,
                claimed_by: first.clone(),
            });
            continue;
        }

        claimed.insert(output.clone(), input.clone());
        discovery.candidates.push(Candidate { input, output });
    }

    discovery
}
