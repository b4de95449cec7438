//! I/O operations for pdfduplex.
//!
//! - Loading scanned PDFs from disk
//! - Writing reordered PDFs atomically
//!
//! # Examples
//!
//! ```no_run
//! use pdfduplex::io::{PdfReader, PdfWriter};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("scan.pdf")).await?;
//!
//! let writer = PdfWriter::new();
//! writer.save(loaded.document, Path::new("copy.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, PendingWrites, WriteOptions, WriteStatistics};
