#![forbid(unsafe_code)]

//! Core: geometry, board entities, and bounded layout measurement.
//!
//! # Role in dndboard
//! `dndboard-core` holds the leaf types the drag engine works on. It knows
//! nothing about hit testing or reordering; that lives in `dndboard`.
//!
//! # Primary responsibilities
//! - **Rect**: absolute frames with open-interval hit tests.
//! - **Row / Column**: plain mutable records with an order index, last
//!   measured layout, and a non-owning element handle.
//! - **Measurement**: a bounded, cancellable request to the presentation
//!   layer through [`LayoutHost`], resolving to `Measured(Rect)` or `Unknown`.
//! - **Input data**: serde-friendly initialization records.

pub mod column;
pub mod data;
pub mod geometry;
pub mod id;
pub mod measure;
pub mod row;

pub use column::Column;
pub use data::{ColumnData, RowData};
pub use geometry::Rect;
pub use id::{ColumnId, RowId};
pub use measure::{
    DEFAULT_MEASURE_TIMEOUT, DetachedHost, ElementHandle, LayoutHost, MeasureReply, Measurement,
    ScrollHandle, ScrollOffset, measure_element,
};
pub use row::Row;
