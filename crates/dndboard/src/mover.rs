#![forbid(unsafe_code)]

//! Geometric hit testing and in-place row reordering.
//!
//! [`Mover`] holds no board state. It answers "which column / slot is under
//! the pointer" from measured rectangles, and shifts rows between slots.
//!
//! # Slot model
//!
//! A column's rows are slots with fixed geometry. Reordering swaps the
//! identity, payload, index and hidden flag between neighbouring slots while
//! each slot keeps its element handle and layout. The rendered element in a
//! slot therefore stays put while the data flows through it.
//!
//! # Hit-test hysteresis
//!
//! - Columns are matched with a vertical slack of `threshold` above and below.
//! - Rows are matched with a correction for the lifted row: neighbours sit
//!   shifted by the dragged row's height, so the matching band is narrowed by
//!   the height difference on the side facing the dragged row.

use dndboard_core::{Column, ColumnId, Rect, Row, RowId};

use crate::notify::BoardEvent;
use crate::repository::Repository;

/// Default vertical slack for column hit testing.
pub const COLUMN_HIT_THRESHOLD: f32 = 35.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    threshold: f32,
}

impl Default for Mover {
    fn default() -> Self {
        Self::new(COLUMN_HIT_THRESHOLD)
    }
}

impl Mover {
    #[must_use]
    pub const fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }

    // -----------------------------------------------------------------------
    // Hit testing
    // -----------------------------------------------------------------------

    /// First column (in iteration order) whose expanded frame contains the point.
    pub fn find_column_at_position<'a, P: 'a>(
        &self,
        columns: impl IntoIterator<Item = &'a Column<P>>,
        x: f32,
        y: f32,
    ) -> Option<&'a Column<P>> {
        columns.into_iter().find(|column| {
            column
                .layout
                .is_some_and(|layout| layout.expand_vertical(self.threshold).contains(x, y))
        })
    }

    /// Position of the row slot under the pointer.
    ///
    /// `dragged` is the lifted row's last known frame. When nothing matches
    /// directly, a pointer at or above the first row resolves to the first
    /// slot and a pointer at or below the last row's top resolves to the last.
    pub fn find_row_at_position<P>(
        &self,
        rows: &[Row<P>],
        x: f32,
        y: f32,
        dragged: Option<Rect>,
    ) -> Option<usize> {
        if let Some(dragged) = dragged {
            let hit = rows.iter().position(|row| {
                row.layout
                    .is_some_and(|candidate| slot_contains(dragged, candidate, x, y))
            });
            if hit.is_some() {
                return hit;
            }
        }

        let first = rows.first().and_then(|row| row.layout);
        if first.is_some_and(|layout| y <= layout.top()) {
            return Some(0);
        }
        let last = rows.last().and_then(|row| row.layout);
        if last.is_some_and(|layout| y >= layout.top()) {
            return Some(rows.len() - 1);
        }
        None
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Move a row to the end of another column.
    ///
    /// Returns `false` and changes nothing if either column or the row is
    /// missing, or if `from == to`.
    pub fn move_to_other_column<P>(
        &self,
        repository: &mut Repository<P>,
        row_id: &RowId,
        from: &ColumnId,
        to: &ColumnId,
    ) -> bool {
        if from == to || !repository.columns.contains_key(to) {
            return false;
        }
        let Some(source) = repository.columns.get_mut(from) else {
            return false;
        };
        let Some(position) = source.position_of(row_id) else {
            return false;
        };
        let row = source.rows.remove(position);
        source.reindex_rows();

        let Some(target) = repository.columns.get_mut(to) else {
            return false;
        };
        target.push_row(row);
        tracing::debug!(row = %row_id, from = %from, to = %to, "row moved to other column");

        repository.listeners.notify(from, BoardEvent::Reload);
        repository.listeners.notify(to, BoardEvent::Reload);
        repository.listeners.reload();
        true
    }

    /// Exchange identity, payload, index and hidden flag between two slots.
    ///
    /// Element handles and layouts stay where they are. Nothing happens
    /// unless both slots have been measured.
    pub fn switch_items<P>(first: &mut Row<P>, second: &mut Row<P>) {
        if first.layout.is_none() || second.layout.is_none() {
            return;
        }
        std::mem::swap(&mut first.id, &mut second.id);
        std::mem::swap(&mut first.payload, &mut second.payload);
        std::mem::swap(&mut first.index, &mut second.index);
        std::mem::swap(&mut first.hidden, &mut second.hidden);
    }

    /// Carry the row at `dragged_index` to `target_index`, shifting every
    /// row in between by one slot.
    ///
    /// Returns `false` if the column is missing or an index is out of range.
    pub fn switch_items_between<P>(
        &self,
        repository: &mut Repository<P>,
        dragged_index: usize,
        target_index: usize,
        column_id: &ColumnId,
    ) -> bool {
        let Some(column) = repository.columns.get_mut(column_id) else {
            return false;
        };
        let len = column.rows.len();
        if dragged_index >= len || target_index >= len {
            return false;
        }

        if dragged_index > target_index {
            for i in (target_index..dragged_index).rev() {
                swap_adjacent(&mut column.rows, i);
            }
        } else {
            for i in dragged_index..target_index {
                swap_adjacent(&mut column.rows, i);
            }
        }
        column.reindex_rows();
        tracing::trace!(
            column = %column_id,
            from = dragged_index,
            to = target_index,
            "rows shifted"
        );

        repository.listeners.notify(column_id, BoardEvent::Reload);
        true
    }
}

fn swap_adjacent<P>(rows: &mut [Row<P>], i: usize) {
    let (head, tail) = rows.split_at_mut(i + 1);
    Mover::switch_items(&mut head[i], &mut tail[0]);
}

/// Row hit test corrected for the lifted row's height.
fn slot_contains(dragged: Rect, candidate: Rect, x: f32, y: f32) -> bool {
    if !candidate.spans_x(x) {
        return false;
    }
    let height_diff = (dragged.height - candidate.height).abs();
    if height_diff > candidate.height {
        return candidate.spans_y(y);
    }
    if y < dragged.top() {
        y > candidate.top() && y < candidate.bottom() - height_diff
    } else {
        y > candidate.top() + height_diff && y < candidate.bottom()
    }
}
