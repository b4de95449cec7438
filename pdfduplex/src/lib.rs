//! pdfduplex - Put duplex scans back into reading order.
//!
//! A sheet feeder without duplex support scans a stack in two passes: all
//! fronts, then, after flipping the stack, all backs in reverse. This library
//! interleaves such scans back into front/back reading order:
//!
//! - Pure page permutation, independent of any PDF code
//! - Page source / sink abstraction with an `lopdf` implementation
//! - Directory discovery with idempotent output naming
//! - Atomic output writes
//! - Best-effort batch processing with per-file diagnostics
//!
//! # Examples
//!
//! ## Reorder a directory
//!
//! ```no_run
//! use pdfduplex::{BatchProcessor, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let report = BatchProcessor::new(Config::for_directory("scans")).run().await?;
//! for output in &report.outputs {
//!     println!("{}", output.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Reorder plain values
//!
//! ```
//! use pdfduplex::reorder::reorder_pages;
//!
//! let scanned = vec!["1", "3", "5", "6", "4", "2"];
//! let ordered = reorder_pages(&scanned, Vec::new()).unwrap();
//! assert_eq!(ordered, ["1", "2", "3", "4", "5", "6"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod config;
pub mod discovery;
pub mod error;
pub mod io;
pub mod output;
pub mod reorder;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use batch::{BatchEvent, BatchProcessor, BatchReport, FileOutcome};
pub use config::{Config, EmptyDocumentPolicy, OverwriteMode};
pub use error::{DuplexError, ErrorCategory, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
