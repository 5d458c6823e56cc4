#![forbid(unsafe_code)]

//! Drag-and-drop board engine.
//!
//! # Role in dndboard
//! This crate decides where a dragged row belongs. It owns the live board
//! ([`Repository`]), finds the column and row slot under the pointer
//! ([`Mover`]), shifts rows into place, tells column views when to re-render
//! ([`ListenerRegistry`]), and reports which entities moved since the last
//! committed order ([`BoardSnapshot`], [`ItemsChanged`]).
//!
//! Geometry, entities and layout measurement come from `dndboard-core` and
//! are re-exported here.
//!
//! # Tick flow
//! 1. [`DragSession::arm`] hides and measures the lifted row.
//! 2. Each pointer move calls [`DragSession::drag_to`], which runs
//!    [`Repository::move_row`] and may request an autoscroll.
//! 3. [`DragSession::finish`] shows the row and commits the order.
//! 4. [`Repository::items_changed`] yields what a persistence layer must store.

pub mod config;
pub mod error;
pub mod mover;
pub mod notify;
pub mod repository;
pub mod session;
pub mod snapshot;

pub use config::{AutoScrollConfig, BoardConfig, ConfigError, HitTestConfig, MeasureConfig};
pub use dndboard_core::{
    Column, ColumnData, ColumnId, DEFAULT_MEASURE_TIMEOUT, DetachedHost, ElementHandle,
    LayoutHost, MeasureReply, Measurement, Rect, Row, RowData, RowId, ScrollHandle, ScrollOffset,
};
pub use error::{BoardError, Result};
pub use mover::{COLUMN_HIT_THRESHOLD, Mover};
pub use notify::{BoardEvent, ListenerRegistry, SubscriptionId};
pub use repository::{Repository, RowRef};
pub use session::{AutoScroll, DragCompletion, DragPhase, DragSession, DragTermination, TickOutcome};
pub use snapshot::{
    BoardSnapshot, ColumnChange, ColumnSnapshot, ItemsChanged, RowChange, RowSnapshot,
};
