#![forbid(unsafe_code)]

//! The live board and its only mutation surface.
//!
//! # Role
//! [`Repository`] owns every [`Column`] and [`Row`], the layout host used to
//! measure them, the listener registry, and the baseline [`BoardSnapshot`]
//! that [`Repository::items_changed`] diffs against.
//!
//! Columns are stored in an insertion-ordered map that is always kept in
//! index order, so hit testing walks them without sorting.
//!
//! # Error policy
//! - Structural operations (add, update, delete, move column) return
//!   [`BoardError`].
//! - Ref, layout, visibility and scroll updates return `false` or
//!   [`Measurement::Unknown`] for unknown ids.
//! - [`Repository::move_row`] returns `None`. It never fails a frame.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dndboard_core::{
    Column, ColumnData, ColumnId, DEFAULT_MEASURE_TIMEOUT, ElementHandle, LayoutHost,
    Measurement, Row, RowData, RowId, ScrollHandle, ScrollOffset,
};
use futures::future::join_all;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::mover::Mover;
use crate::notify::{BoardEvent, ListenerRegistry, SubscriptionId};
use crate::snapshot::{BoardSnapshot, ItemsChanged};

/// Identifies the row being dragged and the column it currently lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowRef {
    pub id: RowId,
    pub column_id: ColumnId,
}

impl RowRef {
    pub fn new(id: impl Into<RowId>, column_id: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            column_id: column_id.into(),
        }
    }
}

pub struct Repository<P = serde_json::Value> {
    pub(crate) columns: IndexMap<ColumnId, Column<P>>,
    original: BoardSnapshot,
    pub(crate) listeners: ListenerRegistry,
    mover: Mover,
    host: Arc<dyn LayoutHost>,
    measure_timeout: Duration,
}

impl<P: fmt::Debug> fmt::Debug for Repository<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("columns", &self.columns)
            .field("listeners", &self.listeners)
            .field("mover", &self.mover)
            .field("measure_timeout", &self.measure_timeout)
            .finish_non_exhaustive()
    }
}

impl<P> Repository<P> {
    /// Build a board with default tuning.
    pub fn new(host: Arc<dyn LayoutHost>, data: Vec<ColumnData<P>>) -> Result<Self> {
        let mover = Mover::default();
        let columns = build_columns(data)?;
        let original = BoardSnapshot::capture(columns.values());
        Ok(Self {
            columns,
            original,
            listeners: ListenerRegistry::new(),
            mover,
            host,
            measure_timeout: DEFAULT_MEASURE_TIMEOUT,
        })
    }

    /// Build a board tuned by `config`.
    pub fn with_config(
        host: Arc<dyn LayoutHost>,
        data: Vec<ColumnData<P>>,
        config: &BoardConfig,
    ) -> Result<Self> {
        let mut repository = Self::new(host, data)?;
        repository.mover = Mover::new(config.hit_test.column_threshold);
        repository.measure_timeout = config.measure.timeout();
        Ok(repository)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Columns in index order.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &Column<P>> + '_ {
        self.columns.values()
    }

    #[must_use]
    pub fn column(&self, id: &ColumnId) -> Option<&Column<P>> {
        self.columns.get(id)
    }

    #[must_use]
    pub fn rows(&self, column_id: &ColumnId) -> Option<&[Row<P>]> {
        self.columns.get(column_id).map(|column| column.rows.as_slice())
    }

    #[must_use]
    pub fn find_row(&self, column_id: &ColumnId, row_id: &RowId) -> Option<&Row<P>> {
        self.columns.get(column_id)?.row(row_id)
    }

    #[must_use]
    pub fn mover(&self) -> Mover {
        self.mover
    }

    #[must_use]
    pub fn measure_timeout(&self) -> Duration {
        self.measure_timeout
    }

    fn contains_row(&self, row_id: &RowId) -> bool {
        self.columns
            .values()
            .any(|column| column.position_of(row_id).is_some())
    }

    // -----------------------------------------------------------------------
    // Column CRUD
    // -----------------------------------------------------------------------

    /// Append a column at the end of the board.
    pub fn add_column(&mut self, data: ColumnData<P>) -> Result<()> {
        if self.columns.contains_key(&data.id) {
            return Err(BoardError::DuplicateColumn(data.id));
        }
        let mut seen = FxHashSet::default();
        for row in &data.rows {
            if self.contains_row(&row.id) || !seen.insert(row.id.clone()) {
                return Err(BoardError::DuplicateRow(row.id.clone()));
            }
        }

        let column = data.into_column(self.columns.len());
        tracing::debug!(column = %column.id, rows = column.rows.len(), "column added");
        self.columns.insert(column.id.clone(), column);
        self.listeners.reload();
        Ok(())
    }

    /// Rename a column.
    pub fn update_column(&mut self, id: &ColumnId, name: impl Into<String>) -> Result<()> {
        let column = self
            .columns
            .get_mut(id)
            .ok_or_else(|| BoardError::UnknownColumn(id.clone()))?;
        column.name = name.into();
        self.listeners.notify(id, BoardEvent::Reload);
        self.listeners.reload();
        Ok(())
    }

    /// Remove a column with all its rows. Remaining columns are reindexed.
    pub fn delete_column(&mut self, id: &ColumnId) -> Result<Column<P>> {
        let column = self
            .columns
            .shift_remove(id)
            .ok_or_else(|| BoardError::UnknownColumn(id.clone()))?;
        self.reindex_columns();
        tracing::debug!(column = %id, "column deleted");
        self.listeners.reload();
        Ok(column)
    }

    /// Move a column to `to_index`, shifting the columns in between.
    pub fn move_column(&mut self, id: &ColumnId, to_index: usize) -> Result<()> {
        let from = self
            .columns
            .get_index_of(id)
            .ok_or_else(|| BoardError::UnknownColumn(id.clone()))?;
        let len = self.columns.len();
        if to_index >= len {
            return Err(BoardError::ColumnIndexOutOfRange {
                index: to_index,
                len,
            });
        }
        if from == to_index {
            return Ok(());
        }
        self.columns.move_index(from, to_index);
        self.reindex_columns();
        tracing::debug!(column = %id, from, to = to_index, "column moved");
        self.listeners.reload();
        Ok(())
    }

    fn reindex_columns(&mut self) {
        for (index, column) in self.columns.values_mut().enumerate() {
            column.index = index;
        }
    }

    // -----------------------------------------------------------------------
    // Row CRUD
    // -----------------------------------------------------------------------

    /// Append a row at the end of a column.
    pub fn add_row(&mut self, column_id: &ColumnId, data: RowData<P>) -> Result<()> {
        if !self.columns.contains_key(column_id) {
            return Err(BoardError::UnknownColumn(column_id.clone()));
        }
        if self.contains_row(&data.id) {
            return Err(BoardError::DuplicateRow(data.id));
        }
        let column = self
            .columns
            .get_mut(column_id)
            .ok_or_else(|| BoardError::UnknownColumn(column_id.clone()))?;
        let index = column.rows.len();
        column.push_row(data.into_row(column_id.clone(), index));
        tracing::debug!(column = %column_id, index, "row added");
        self.listeners.notify(column_id, BoardEvent::Reload);
        self.listeners.reload();
        Ok(())
    }

    /// Replace a row's payload. The first column holding the id wins.
    pub fn update_row(&mut self, row_id: &RowId, payload: P) -> Result<()> {
        let column = self
            .columns
            .values_mut()
            .find(|column| column.position_of(row_id).is_some())
            .ok_or_else(|| BoardError::UnknownRow(row_id.clone()))?;
        if let Some(row) = column.row_mut(row_id) {
            row.payload = payload;
        }
        let column_id = column.id.clone();
        self.listeners.notify(&column_id, BoardEvent::Reload);
        self.listeners.reload();
        Ok(())
    }

    /// Remove a row. The first column holding the id wins.
    pub fn delete_row(&mut self, row_id: &RowId) -> Result<Row<P>> {
        let (column, position) = self
            .columns
            .values_mut()
            .find_map(|column| column.position_of(row_id).map(|pos| (column, pos)))
            .ok_or_else(|| BoardError::UnknownRow(row_id.clone()))?;
        let row = column.rows.remove(position);
        column.reindex_rows();
        let column_id = column.id.clone();
        tracing::debug!(column = %column_id, row = %row_id, "row deleted");
        self.listeners.notify(&column_id, BoardEvent::Reload);
        self.listeners.reload();
        Ok(row)
    }

    // -----------------------------------------------------------------------
    // Refs, layout, visibility
    // -----------------------------------------------------------------------

    /// Bind or clear a column's element handle.
    pub fn update_column_ref(&mut self, id: &ColumnId, element: Option<ElementHandle>) -> bool {
        match self.columns.get_mut(id) {
            Some(column) => {
                column.element = element;
                true
            }
            None => false,
        }
    }

    /// Measure one column and cascade to its rows.
    pub async fn update_column_layout(
        &mut self,
        id: &ColumnId,
        offset: ScrollOffset,
    ) -> Measurement {
        let host = Arc::clone(&self.host);
        let wait = self.measure_timeout;
        match self.columns.get_mut(id) {
            Some(column) => column.measure_layout(host.as_ref(), offset, wait).await,
            None => Measurement::Unknown,
        }
    }

    /// Measure every column concurrently. Returns how many were measured.
    pub async fn measure_columns_layout(&mut self, offset: ScrollOffset) -> usize {
        let host = Arc::clone(&self.host);
        let wait = self.measure_timeout;
        let results = join_all(
            self.columns
                .values_mut()
                .map(|column| column.measure_layout(host.as_ref(), offset, wait)),
        )
        .await;
        let measured = results.into_iter().filter(|m| m.is_measured()).count();
        tracing::trace!(measured, total = self.columns.len(), "columns measured");
        measured
    }

    /// Bind or clear a row's element handle.
    pub fn update_row_ref(
        &mut self,
        column_id: &ColumnId,
        row_id: &RowId,
        element: Option<ElementHandle>,
    ) -> bool {
        match self.row_mut(column_id, row_id) {
            Some(row) => {
                row.element = element;
                true
            }
            None => false,
        }
    }

    /// Measure one row.
    pub async fn update_row_layout(
        &mut self,
        column_id: &ColumnId,
        row_id: &RowId,
        offset: ScrollOffset,
    ) -> Measurement {
        let host = Arc::clone(&self.host);
        let wait = self.measure_timeout;
        match self.row_mut(column_id, row_id) {
            Some(row) => row.measure_layout(host.as_ref(), offset, wait).await,
            None => Measurement::Unknown,
        }
    }

    /// Mark the lifted row hidden. Every other row becomes visible.
    pub fn hide_row(&mut self, column_id: &ColumnId, row_id: &RowId) -> bool {
        if self.find_row(column_id, row_id).is_none() {
            return false;
        }
        for column in self.columns.values_mut() {
            for row in &mut column.rows {
                row.hidden = column.id == *column_id && row.id == *row_id;
            }
        }
        true
    }

    pub fn show_row(&mut self, column_id: &ColumnId, row_id: &RowId) -> bool {
        match self.row_mut(column_id, row_id) {
            Some(row) => {
                row.hidden = false;
                true
            }
            None => false,
        }
    }

    fn row_mut(&mut self, column_id: &ColumnId, row_id: &RowId) -> Option<&mut Row<P>> {
        self.columns.get_mut(column_id)?.row_mut(row_id)
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    pub fn set_column_scroll_ref(&mut self, id: &ColumnId, scroll: Option<ScrollHandle>) -> bool {
        match self.columns.get_mut(id) {
            Some(column) => {
                column.scroll = scroll;
                true
            }
            None => false,
        }
    }

    /// Scroll a column's row container to an absolute offset.
    pub fn scroll_column(&self, id: &ColumnId, offset: f32) -> bool {
        self.columns
            .get(id)
            .is_some_and(|column| column.scroll_to(self.host.as_ref(), offset))
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    pub fn add_listener(
        &mut self,
        column_id: ColumnId,
        event: BoardEvent,
        callback: impl FnMut() + Send + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(column_id, event, callback)
    }

    pub fn remove_listener(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn notify(&mut self, column_id: &ColumnId, event: BoardEvent) -> usize {
        self.listeners.notify(column_id, event)
    }

    /// Set the board-wide reload callback.
    pub fn set_reload(&mut self, callback: impl FnMut() + Send + 'static) {
        self.listeners.set_reload(callback);
    }

    // -----------------------------------------------------------------------
    // Change tracking
    // -----------------------------------------------------------------------

    /// Make the current order the new baseline.
    pub fn update_original_data(&mut self) {
        self.original = self.snapshot();
    }

    #[must_use]
    pub fn original_data(&self) -> &BoardSnapshot {
        &self.original
    }

    /// Positions of the live board right now.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(self.columns.values())
    }

    /// Entities whose position differs from the baseline.
    #[must_use]
    pub fn items_changed(&self) -> ItemsChanged {
        self.original.diff(&self.snapshot())
    }

    /// Replace the board from fresh input.
    ///
    /// Columns keep their layout, element and scroll handles when their id
    /// survives. Rows keep layout, element and hidden flag when they stay in
    /// the same column. The baseline is reset to the new order.
    pub fn update_data(&mut self, data: Vec<ColumnData<P>>) -> Result<()> {
        let mut columns = build_columns(data)?;
        for column in columns.values_mut() {
            let Some(old) = self.columns.get(&column.id) else {
                continue;
            };
            column.layout = old.layout;
            column.element = old.element;
            column.scroll = old.scroll;
            for row in &mut column.rows {
                if let Some(old_row) = old.row(&row.id) {
                    row.layout = old_row.layout;
                    row.element = old_row.element;
                    row.hidden = old_row.hidden;
                }
            }
        }
        self.columns = columns;
        self.update_original_data();
        tracing::debug!(columns = self.columns.len(), "board data replaced");
        self.listeners.reload();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Drag tick
    // -----------------------------------------------------------------------

    /// Apply one drag tick at container-relative `(x, y)`.
    ///
    /// Moves `dragged` into the column under the pointer if it changed,
    /// invoking `on_column_change(from, to)`, then shifts it into the row
    /// slot under the pointer. Returns the column under the pointer, or
    /// `None` if the row is unknown or the pointer is outside every column.
    pub fn move_row(
        &mut self,
        dragged: &RowRef,
        x: f32,
        y: f32,
        mut on_column_change: impl FnMut(&ColumnId, &ColumnId),
    ) -> Option<&Column<P>> {
        let mover = self.mover;
        self.find_row(&dragged.column_id, &dragged.id)?;
        let target_id = mover
            .find_column_at_position(self.columns.values(), x, y)?
            .id
            .clone();

        if target_id != dragged.column_id
            && mover.move_to_other_column(self, &dragged.id, &dragged.column_id, &target_id)
        {
            on_column_change(&dragged.column_id, &target_id);
        }

        let (dragged_index, candidate) = {
            let column = self.columns.get(&target_id)?;
            let dragged_index = column.position_of(&dragged.id)?;
            let dragged_row = &column.rows[dragged_index];
            let candidate = mover
                .find_row_at_position(&column.rows, x, y, dragged_row.layout)
                .filter(|&candidate| {
                    candidate != dragged_index
                        && dragged_row.hidden
                        && !column.rows[candidate].hidden
                });
            (dragged_index, candidate)
        };

        if let Some(candidate) = candidate {
            tracing::trace!(
                column = %target_id,
                row = %dragged.id,
                from = dragged_index,
                to = candidate,
                "row slot changed"
            );
            mover.switch_items_between(self, dragged_index, candidate, &target_id);
        }
        self.columns.get(&target_id)
    }

    #[cfg(test)]
    pub(crate) fn force_layouts_for_tests(&mut self, row_height: f32) {
        use dndboard_core::Rect;
        for (c, column) in self.columns.values_mut().enumerate() {
            let x = c as f32 * 200.0;
            let height = row_height * column.rows.len().max(1) as f32;
            column.layout = Some(Rect::new(x, 0.0, 150.0, height));
            for (r, row) in column.rows.iter_mut().enumerate() {
                row.layout = Some(Rect::new(x, r as f32 * row_height, 150.0, row_height));
            }
        }
    }
}

/// Build live columns from input, rejecting duplicate ids anywhere.
fn build_columns<P>(data: Vec<ColumnData<P>>) -> Result<IndexMap<ColumnId, Column<P>>> {
    let mut columns = IndexMap::with_capacity(data.len());
    let mut rows = FxHashSet::default();
    for (index, column) in data.into_iter().enumerate() {
        if columns.contains_key(&column.id) {
            return Err(BoardError::DuplicateColumn(column.id));
        }
        for row in &column.rows {
            if !rows.insert(row.id.clone()) {
                return Err(BoardError::DuplicateRow(row.id.clone()));
            }
        }
        let column = column.into_column(index);
        columns.insert(column.id.clone(), column);
    }
    Ok(columns)
}
