// External Dependencies ------------------------------------------------------
use thiserror::Error;

/// Errors returned by [`ExpandableListAdapter`](struct.ExpandableListAdapter.html)
/// and its host view.
#[derive(Debug, Error, Eq, PartialEq, Clone, Copy)]
pub enum ListError {
    /// A flat position or an ordinal lies outside the current bounds.
    #[error("index {index} is out of range for {len} entries")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of entries at the time of the request.
        len: usize,
    },

    /// A view holder of the wrong kind reached a bind call.
    #[error("view holder of type {view_type} cannot bind the {expected} row at {position}")]
    InconsistentViewKind {
        /// The flat position being bound.
        position: usize,
        /// The view type the holder was created for.
        view_type: usize,
        /// The kind of row found at `position`.
        expected: &'static str,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ListError>;

pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(ListError::IndexOutOfRange { index, len })
    }
}

pub(crate) fn check_insert_index(index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(ListError::IndexOutOfRange { index, len })
    }
}
