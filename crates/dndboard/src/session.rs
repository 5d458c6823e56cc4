#![forbid(unsafe_code)]

//! Drag lifecycle driver.
//!
//! A [`DragSession`] turns raw gesture callbacks into repository calls:
//!
//! ```text
//! Idle --arm--> Armed --drag_to--> Dragging --finish--> Idle
//!                 |                                      ^
//!                 +----------------finish----------------+
//! ```
//!
//! Every termination (end, cancel, failure, undetermined) settles the same
//! way: the row becomes visible where it currently is and that order is
//! committed as the new baseline. There is no rollback.
//!
//! While dragging near the left or right viewport edge the session also
//! produces an [`AutoScroll`] request. After applying it the caller should
//! re-measure with [`Repository::measure_columns_layout`], since every frame
//! is stale once the board scrolls.
//!
//! # Coordinate frames
//!
//! The host reports frames in board content coordinates. Pointer positions
//! are relative to the visible container, so a board scrolled right by
//! `offset` shows content `x` at `x - offset`. Every measurement taken while
//! dragging, including the lifted row in [`DragSession::arm`], must use
//! [`DragSession::measure_offset`] so all rows share one frame:
//!
//! ```ignore
//! repository.measure_columns_layout(session.measure_offset()).await;
//! ```

use dndboard_core::{ColumnId, RowId, ScrollOffset};
use serde::{Deserialize, Serialize};

use crate::config::AutoScrollConfig;
use crate::error::{BoardError, Result};
use crate::repository::{Repository, RowRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Row lifted and measured, no pointer movement yet.
    Armed,
    Dragging,
}

/// How the gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTermination {
    End,
    Cancel,
    Fail,
    Undetermined,
}

/// Result reported when a drag settles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragCompletion {
    pub from_column: ColumnId,
    pub to_column: ColumnId,
    pub row: RowId,
    pub termination: DragTermination,
}

/// Horizontal scroll request for the board container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScroll {
    pub offset: f32,
}

/// What one drag tick did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickOutcome {
    /// Column under the pointer, if any.
    pub column: Option<ColumnId>,
    pub autoscroll: Option<AutoScroll>,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    row: RowRef,
    from_column: ColumnId,
    phase: DragPhase,
}

#[derive(Debug, Clone)]
pub struct DragSession {
    config: AutoScrollConfig,
    viewport_width: f32,
    scroll_offset: f32,
    active: Option<ActiveDrag>,
}

impl DragSession {
    #[must_use]
    pub fn new(config: AutoScrollConfig, viewport_width: f32) -> Self {
        Self {
            config,
            viewport_width,
            scroll_offset: 0.0,
            active: None,
        }
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width;
    }

    /// Sync with a scroll the user performed outside a drag.
    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset.max(0.0);
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Correction that maps host frames into pointer coordinates.
    #[must_use]
    pub fn measure_offset(&self) -> ScrollOffset {
        ScrollOffset::horizontal(-self.scroll_offset)
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.active.as_ref().map_or(DragPhase::Idle, |drag| drag.phase)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// The lifted row and the column it currently lives in.
    #[must_use]
    pub fn dragged(&self) -> Option<&RowRef> {
        self.active.as_ref().map(|drag| &drag.row)
    }

    /// Lift a row: hide it and measure its current frame.
    pub async fn arm<P>(
        &mut self,
        repository: &mut Repository<P>,
        column_id: &ColumnId,
        row_id: &RowId,
    ) -> Result<()> {
        if let Some(drag) = &self.active {
            return Err(BoardError::DragInProgress(drag.row.id.clone()));
        }
        if repository.column(column_id).is_none() {
            return Err(BoardError::UnknownColumn(column_id.clone()));
        }
        if !repository.hide_row(column_id, row_id) {
            return Err(BoardError::UnknownRow(row_id.clone()));
        }
        repository
            .update_row_layout(column_id, row_id, self.measure_offset())
            .await;

        tracing::debug!(column = %column_id, row = %row_id, "drag armed");
        self.active = Some(ActiveDrag {
            row: RowRef {
                id: row_id.clone(),
                column_id: column_id.clone(),
            },
            from_column: column_id.clone(),
            phase: DragPhase::Armed,
        });
        Ok(())
    }

    /// Apply one pointer position. Ignored while idle and at exactly `(0, 0)`.
    pub fn drag_to<P>(&mut self, repository: &mut Repository<P>, x: f32, y: f32) -> TickOutcome {
        let Some(drag) = self.active.as_mut() else {
            return TickOutcome::default();
        };
        if x == 0.0 && y == 0.0 {
            return TickOutcome::default();
        }
        drag.phase = DragPhase::Dragging;

        let row = drag.row.clone();
        let mut moved_to = None;
        let column = repository
            .move_row(&row, x, y, |_, to| moved_to = Some(to.clone()))
            .map(|column| column.id.clone());
        if let Some(to) = moved_to {
            drag.row.column_id = to;
        }

        let autoscroll = column.as_ref().and_then(|_| self.autoscroll(x));
        TickOutcome { column, autoscroll }
    }

    fn autoscroll(&mut self, x: f32) -> Option<AutoScroll> {
        let AutoScrollConfig {
            x_threshold,
            step,
            drag_speed_factor,
        } = self.config;

        let offset = if x + x_threshold > self.viewport_width {
            self.scroll_offset += step;
            self.scroll_offset * drag_speed_factor
        } else if x < x_threshold {
            self.scroll_offset = (self.scroll_offset - step).max(0.0);
            self.scroll_offset / drag_speed_factor
        } else {
            return None;
        };
        tracing::trace!(x, offset, "autoscroll");
        Some(AutoScroll { offset })
    }

    /// Settle the drag and commit the current order as the baseline.
    ///
    /// Returns `None` if no drag was active.
    pub fn finish<P>(
        &mut self,
        repository: &mut Repository<P>,
        termination: DragTermination,
    ) -> Option<DragCompletion> {
        let drag = self.active.take()?;
        repository.show_row(&drag.row.column_id, &drag.row.id);
        repository.update_original_data();

        tracing::debug!(
            row = %drag.row.id,
            from = %drag.from_column,
            to = %drag.row.column_id,
            ?termination,
            "drag settled"
        );
        Some(DragCompletion {
            from_column: drag.from_column,
            to_column: drag.row.column_id,
            row: drag.row.id,
            termination,
        })
    }
}
