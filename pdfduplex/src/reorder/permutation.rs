//! Page permutation for front-pass/back-pass duplex scans.
//!
//! A stack scanned fronts-first and then flipped arrives as
//! `front1, front2, ..., frontN/2, backN/2, ..., back2, back1`. Reading order
//! interleaves them again: `front1, back1, front2, back2, ...`.
//!
//! # Examples
//!
//! ```
//! use pdfduplex::reorder::permutation::DuplexOrder;
//!
//! let order: Vec<usize> = DuplexOrder::new(4).unwrap().collect();
//! assert_eq!(order, vec![0, 3, 1, 2]);
//! ```

use super::ReorderError;

/// Source page index for output slot `slot` of an `page_count`-page scan.
///
/// Even slots walk forward through the fronts, odd slots walk backward from
/// the end through the backs. `slot` must be below `page_count`.
pub fn source_index(slot: usize, page_count: usize) -> usize {
    debug_assert!(slot < page_count);
    if slot % 2 == 0 {
        slot / 2
    } else {
        page_count - 1 - (slot - 1) / 2
    }
}

/// Iterator over source page indices in reading order.
///
/// Yields exactly `page_count` indices, each of `0..page_count` once.
#[derive(Debug, Clone)]
pub struct DuplexOrder {
    page_count: usize,
    slot: usize,
}

impl DuplexOrder {
    /// Create the permutation for a document with `page_count` pages.
    ///
    /// # Errors
    ///
    /// Returns [`ReorderError::OddPageCount`] when `page_count` is odd, since
    /// fronts and backs cannot pair up.
    pub fn new(page_count: usize) -> Result<Self, ReorderError> {
        if page_count % 2 != 0 {
            return Err(ReorderError::OddPageCount { page_count });
        }
        Ok(Self {
            page_count,
            slot: 0,
        })
    }

    /// Number of pages the permutation covers.
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

impl Iterator for DuplexOrder {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.slot >= self.page_count {
            return None;
        }
        let index = source_index(self.slot, self.page_count);
        self.slot += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.page_count - self.slot;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DuplexOrder {}

/// Collect the full permutation for `page_count` pages.
///
/// # Errors
///
/// Returns [`ReorderError::OddPageCount`] for odd page counts.
pub fn duplex_order(page_count: usize) -> Result<Vec<usize>, ReorderError> {
    Ok(DuplexOrder::new(page_count)?.collect())
}
