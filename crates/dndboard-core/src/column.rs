#![forbid(unsafe_code)]

//! An ordered, independently indexed group of rows.

use std::time::Duration;

use futures::future::join_all;

use crate::geometry::Rect;
use crate::id::{ColumnId, RowId};
use crate::measure::{
    ElementHandle, LayoutHost, Measurement, ScrollHandle, ScrollOffset, measure_element,
};
use crate::row::Row;

/// A column on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<P> {
    pub id: ColumnId,
    pub index: usize,
    pub name: String,
    pub layout: Option<Rect>,
    pub element: Option<ElementHandle>,
    /// Scroll container holding the rows.
    pub scroll: Option<ScrollHandle>,
    pub rows: Vec<Row<P>>,
}

impl<P> Column<P> {
    /// Create an unmeasured column. Rows are adopted and reindexed.
    pub fn new(id: ColumnId, index: usize, name: impl Into<String>, rows: Vec<Row<P>>) -> Self {
        let mut column = Self {
            id,
            index,
            name: name.into(),
            layout: None,
            element: None,
            scroll: None,
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            column.push_row(row);
        }
        column
    }

    /// Append a row at the end, taking ownership of it.
    pub fn push_row(&mut self, mut row: Row<P>) {
        row.column_id = self.id.clone();
        row.index = self.rows.len();
        self.rows.push(row);
    }

    /// Restore `row.index == position` for every row.
    pub fn reindex_rows(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.index = index;
        }
    }

    /// Position of the row with the given id.
    #[must_use]
    pub fn position_of(&self, id: &RowId) -> Option<usize> {
        self.rows.iter().position(|row| &row.id == id)
    }

    #[must_use]
    pub fn row(&self, id: &RowId) -> Option<&Row<P>> {
        self.rows.iter().find(|row| &row.id == id)
    }

    pub fn row_mut(&mut self, id: &RowId) -> Option<&mut Row<P>> {
        self.rows.iter_mut().find(|row| &row.id == id)
    }

    /// Command the bound scroll container to an absolute offset.
    ///
    /// Returns `false` when no scroll handle is bound.
    pub fn scroll_to(&self, host: &dyn LayoutHost, offset: f32) -> bool {
        match self.scroll {
            Some(scroll) => {
                host.scroll_to_offset(scroll, offset);
                true
            }
            None => false,
        }
    }

    /// Re-measure every row concurrently. Returns how many were measured.
    pub async fn measure_row_layout(
        &mut self,
        host: &dyn LayoutHost,
        offset: ScrollOffset,
        wait: Duration,
    ) -> usize {
        let results = join_all(
            self.rows
                .iter_mut()
                .map(|row| row.measure_layout(host, offset, wait)),
        )
        .await;
        results.into_iter().filter(|m| m.is_measured()).count()
    }

    /// Measure the column itself and, once known, cascade to its rows.
    pub async fn measure_layout(
        &mut self,
        host: &dyn LayoutHost,
        offset: ScrollOffset,
        wait: Duration,
    ) -> Measurement {
        let measurement = measure_element(host, self.element, offset, wait).await;
        if let Measurement::Measured(rect) = measurement {
            self.layout = Some(rect);
            let rows = self.measure_row_layout(host, offset, wait).await;
            tracing::trace!(column = %self.id, rows, "column measured");
        }
        measurement
    }
}
