//! Duplex page reordering.
//!
//! The algorithm is split from PDF handling by two small traits:
//!
//! - [`PageSource`] hands out opaque page handles by index.
//! - [`PageSink`] receives handles in output order and produces the result
//!   only once every page has been appended.
//!
//! `Vec<T>` and slices implement both, so the ordering can be exercised on
//! plain values. [`pages`] implements them over `lopdf` documents.
//!
//! # Examples
//!
//! ```
//! use pdfduplex::reorder::reorder_pages;
//!
//! let scanned = vec!["front1", "front2", "back2", "back1"];
//! let ordered = reorder_pages(&scanned, Vec::new()).unwrap();
//! assert_eq!(ordered, vec!["front1", "back1", "front2", "back2"]);
//! ```

pub mod pages;
pub mod permutation;

pub use pages::{PageList, PageTreeSink};
pub use permutation::{DuplexOrder, duplex_order, source_index};

/// Errors raised while assembling a reordered page sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReorderError {
    /// Fronts and backs cannot pair up.
    #[error("page count {page_count} is odd")]
    OddPageCount {
        /// Number of pages in the source.
        page_count: usize,
    },

    /// The source has no page at an index the permutation asked for.
    #[error("source has no page at index {index}")]
    MissingPage {
        /// Requested index.
        index: usize,
    },

    /// The page tree of the document could not be rebuilt.
    #[error("page tree: {reason}")]
    PageTree {
        /// Details about the failure.
        reason: String,
    },

    /// The blocking task assembling the pages panicked or was cancelled.
    #[error("reordering aborted: {reason}")]
    Aborted {
        /// Details from the task runtime.
        reason: String,
    },
}

impl ReorderError {
    /// Create a PageTree error.
    pub fn page_tree(reason: impl Into<String>) -> Self {
        Self::PageTree {
            reason: reason.into(),
        }
    }
}

/// Ordered, indexable collection of page handles.
pub trait PageSource {
    /// Opaque page handle.
    type Page;

    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Handle for the page at `index`, if present.
    fn page(&self, index: usize) -> Option<Self::Page>;
}

/// Receiver of page handles in output order.
///
/// Implementations must not publish anything before [`PageSink::finish`];
/// a sink dropped after a failed `append` leaves no trace.
pub trait PageSink<P> {
    /// Assembled result.
    type Output;

    /// Append the next page.
    fn append(&mut self, page: P) -> Result<(), ReorderError>;

    /// Consume the sink once every page has been appended.
    fn finish(self) -> Result<Self::Output, ReorderError>;
}

impl<T: Clone> PageSource for [T] {
    type Page = T;

    fn page_count(&self) -> usize {
        self.len()
    }

    fn page(&self, index: usize) -> Option<T> {
        self.get(index).cloned()
    }
}

impl<T: Clone> PageSource for Vec<T> {
    type Page = T;

    fn page_count(&self) -> usize {
        self.len()
    }

    fn page(&self, index: usize) -> Option<T> {
        self.get(index).cloned()
    }
}

impl<T> PageSink<T> for Vec<T> {
    type Output = Vec<T>;

    fn append(&mut self, page: T) -> Result<(), ReorderError> {
        self.push(page);
        Ok(())
    }

    fn finish(self) -> Result<Vec<T>, ReorderError> {
        Ok(self)
    }
}

/// Feed `source` into `sink` in duplex reading order.
///
/// The sink only produces output after the whole sequence was appended. Any
/// failure along the way is returned before `finish` is reached.
///
/// # Errors
///
/// - [`ReorderError::OddPageCount`] if the source has an odd number of pages
/// - [`ReorderError::MissingPage`] if the source cannot provide a page
/// - whatever the sink reports from `append` or `finish`
pub fn reorder_pages<S, K>(source: &S, mut sink: K) -> Result<K::Output, ReorderError>
where
    S: PageSource + ?Sized,
    K: PageSink<S::Page>,
{
    let order = DuplexOrder::new(source.page_count())?;

    for index in order {
        let page = source
            .page(index)
            .ok_or(ReorderError::MissingPage { index })?;
        sink.append(page)?;
    }

    sink.finish()
}

/// Run [`reorder_pages`] on tokio's blocking pool.
///
/// A panic inside the source or sink is reported as
/// [`ReorderError::Aborted`] instead of unwinding into the caller.
///
/// # Errors
///
/// Everything [`reorder_pages`] returns, plus [`ReorderError::Aborted`].
pub async fn reorder_in_background<S, K>(source: S, sink: K) -> Result<K::Output, ReorderError>
where
    S: PageSource + Send + 'static,
    K: PageSink<S::Page> + Send + 'static,
    K::Output: Send + 'static,
{
    tokio::task::spawn_blocking(move || reorder_pages(&source, sink))
        .await
        .map_err(|e| ReorderError::Aborted {
            reason: e.to_string(),
        })?
}
