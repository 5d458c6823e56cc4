#![forbid(unsafe_code)]

//! Board initialization input.
//!
//! ```json
//! [
//!   { "id": "1", "name": "Todo", "rows": [ { "id": "11", "title": "Write docs" } ] }
//! ]
//! ```
//!
//! Every row field other than `id` is kept as the row payload.

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::id::{ColumnId, RowId};
use crate::row::Row;

/// One column of initialization input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnData<P> {
    pub id: ColumnId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rows: Vec<RowData<P>>,
}

/// One row of initialization input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowData<P> {
    pub id: RowId,
    #[serde(flatten)]
    pub payload: P,
}

impl<P> ColumnData<P> {
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>, rows: Vec<RowData<P>>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rows,
        }
    }

    /// Build a live column at `index`.
    pub fn into_column(self, index: usize) -> Column<P> {
        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.into_row(self.id.clone(), i))
            .collect();
        Column::new(self.id, index, self.name, rows)
    }
}

impl<P> RowData<P> {
    pub fn new(id: impl Into<RowId>, payload: P) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }

    /// Build a live row owned by `column_id` at `index`.
    pub fn into_row(self, column_id: ColumnId, index: usize) -> Row<P> {
        Row::new(self.id, column_id, index, self.payload)
    }
}
