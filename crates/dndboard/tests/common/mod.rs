//! Shared fixtures for dndboard integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dndboard::{
    ColumnData, ColumnId, ElementHandle, LayoutHost, MeasureReply, Rect, Repository, RowData,
    ScrollHandle, ScrollOffset,
};

pub const COLUMN_WIDTH: f32 = 150.0;
pub const COLUMN_STRIDE: f32 = 200.0;
pub const ROW_HEIGHT: f32 = 50.0;

/// Answers measurements from a fixed frame table and records scroll commands.
#[derive(Default)]
pub struct GridHost {
    frames: Mutex<HashMap<u64, Rect>>,
    pub scrolled: Mutex<Vec<(u64, f32)>>,
}

impl GridHost {
    pub fn set_frame(&self, element: u64, frame: Rect) {
        self.frames.lock().unwrap().insert(element, frame);
    }
}

impl LayoutHost for GridHost {
    fn measure(&self, element: ElementHandle, reply: MeasureReply) {
        if let Some(frame) = self.frames.lock().unwrap().get(&element.get()) {
            reply.send(*frame);
        }
    }

    fn scroll_to_offset(&self, scroll: ScrollHandle, offset: f32) {
        self.scrolled.lock().unwrap().push((scroll.get(), offset));
    }
}

pub fn column_element(column: usize) -> u64 {
    1_000 + column as u64
}

pub fn row_element(column: usize, slot: usize) -> u64 {
    (column as u64 + 1) * 100 + slot as u64
}

pub fn board(layout: &[(&str, &[&str])]) -> Vec<ColumnData<()>> {
    layout
        .iter()
        .map(|(id, rows)| {
            ColumnData::new(*id, *id, rows.iter().map(|r| RowData::new(*r, ())).collect())
        })
        .collect()
}

/// Build a repository whose columns sit side by side and whose rows are
/// stacked `ROW_HEIGHT` apart, with every element bound and measured.
pub async fn mounted(layout: &[(&str, &[&str])]) -> (Repository<()>, Arc<GridHost>) {
    let host = Arc::new(GridHost::default());
    let mut repo = Repository::new(host.clone(), board(layout)).unwrap();

    let ids: Vec<(ColumnId, Vec<_>)> = repo
        .columns()
        .map(|c| (c.id.clone(), c.rows.iter().map(|r| r.id.clone()).collect()))
        .collect();
    for (c, (column_id, rows)) in ids.iter().enumerate() {
        let x = c as f32 * COLUMN_STRIDE;
        let height = ROW_HEIGHT * rows.len().max(1) as f32;
        host.set_frame(column_element(c), Rect::new(x, 0.0, COLUMN_WIDTH, height));
        repo.update_column_ref(column_id, Some(ElementHandle::new(column_element(c))));
        for (r, row_id) in rows.iter().enumerate() {
            host.set_frame(
                row_element(c, r),
                Rect::new(x, r as f32 * ROW_HEIGHT, COLUMN_WIDTH, ROW_HEIGHT),
            );
            repo.update_row_ref(column_id, row_id, Some(ElementHandle::new(row_element(c, r))));
        }
    }
    repo.measure_columns_layout(ScrollOffset::default()).await;
    (repo, host)
}

pub fn order(repo: &Repository<()>) -> Vec<Vec<String>> {
    repo.columns()
        .map(|c| c.rows.iter().map(|r| r.id.to_string()).collect())
        .collect()
}
