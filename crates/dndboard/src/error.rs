#![forbid(unsafe_code)]

//! Board operation errors.

use dndboard_core::{ColumnId, RowId};
use thiserror::Error;

/// Errors returned by structural repository operations.
///
/// Per-tick drag operations never return these; they resolve to `None`
/// or `false` instead so a frame is never aborted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("unknown column `{0}`")]
    UnknownColumn(ColumnId),
    #[error("unknown row `{0}`")]
    UnknownRow(RowId),
    #[error("column `{0}` already exists")]
    DuplicateColumn(ColumnId),
    #[error("row `{0}` already exists")]
    DuplicateRow(RowId),
    #[error("column index {index} out of range for {len} columns")]
    ColumnIndexOutOfRange { index: usize, len: usize },
    #[error("row `{0}` is already being dragged")]
    DragInProgress(RowId),
}

pub type Result<T> = std::result::Result<T, BoardError>;
