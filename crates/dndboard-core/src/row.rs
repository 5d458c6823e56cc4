#![forbid(unsafe_code)]

//! A single orderable item on the board.

use std::time::Duration;

use crate::geometry::Rect;
use crate::id::{ColumnId, RowId};
use crate::measure::{ElementHandle, LayoutHost, Measurement, ScrollOffset, measure_element};

/// A row owned by exactly one column.
///
/// `index` mirrors the row's position in its column after every reindex.
/// `hidden` is set on the single row currently lifted by a drag.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<P> {
    pub id: RowId,
    pub column_id: ColumnId,
    pub index: usize,
    /// Last measured frame. `None` until the first successful measurement.
    pub layout: Option<Rect>,
    pub hidden: bool,
    pub element: Option<ElementHandle>,
    pub payload: P,
}

impl<P> Row<P> {
    /// Create an unmeasured, visible row.
    pub fn new(id: RowId, column_id: ColumnId, index: usize, payload: P) -> Self {
        Self {
            id,
            column_id,
            index,
            layout: None,
            hidden: false,
            element: None,
            payload,
        }
    }

    /// Measure the bound element and store the result.
    ///
    /// On [`Measurement::Unknown`] the previous layout is left untouched.
    pub async fn measure_layout(
        &mut self,
        host: &dyn LayoutHost,
        offset: ScrollOffset,
        wait: Duration,
    ) -> Measurement {
        let measurement = measure_element(host, self.element, offset, wait).await;
        if let Measurement::Measured(rect) = measurement {
            self.layout = Some(rect);
        }
        measurement
    }
}
