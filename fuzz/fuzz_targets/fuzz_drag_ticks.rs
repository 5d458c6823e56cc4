#![no_main]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arbitrary::Arbitrary;
use dndboard::{
    AutoScrollConfig, ColumnData, DragSession, DragTermination, ElementHandle, LayoutHost,
    MeasureReply, Rect, Repository, RowData, ScrollOffset,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    /// Rows per column (each taken modulo 8, at most 6 columns).
    shape: Vec<u8>,
    /// Row heights in pixels (modulo 120, at least 1).
    heights: Vec<u8>,
    pick: u16,
    ticks: Vec<(i16, i16)>,
    termination: u8,
}

#[derive(Default)]
struct Frames(Mutex<HashMap<u64, Rect>>);

impl LayoutHost for Frames {
    fn measure(&self, element: ElementHandle, reply: MeasureReply) {
        if let Some(frame) = self.0.lock().unwrap().get(&element.get()) {
            reply.send(*frame);
        }
    }
}

fuzz_target!(|input: Input| {
    let shape: Vec<usize> = input.shape.iter().take(6).map(|n| usize::from(n % 8)).collect();
    let total: usize = shape.iter().sum();
    if total == 0 {
        return;
    }

    let data: Vec<ColumnData<()>> = shape
        .iter()
        .enumerate()
        .map(|(c, &n)| {
            let rows = (0..n).map(|r| RowData::new(format!("{c}-{r}"), ())).collect();
            ColumnData::new(format!("c{c}"), "", rows)
        })
        .collect();

    let host = Arc::new(Frames::default());
    let mut repo = Repository::new(host.clone(), data).unwrap();

    // Variable row heights exercise the height-difference hit test.
    let mut height_at = input
        .heights
        .iter()
        .map(|h| f32::from(h % 120).max(1.0))
        .cycle();
    let bindings: Vec<_> = repo
        .columns()
        .map(|c| (c.id.clone(), c.rows.iter().map(|r| r.id.clone()).collect::<Vec<_>>()))
        .collect();
    let mut next = 1u64;
    for (c, (column_id, rows)) in bindings.iter().enumerate() {
        let x = c as f32 * 200.0;
        let mut y = 0.0;
        for row_id in rows {
            let h = height_at.next().unwrap_or(40.0);
            host.0.lock().unwrap().insert(next, Rect::new(x, y, 150.0, h));
            repo.update_row_ref(column_id, row_id, Some(ElementHandle::new(next)));
            next += 1;
            y += h;
        }
        host.0.lock().unwrap().insert(next, Rect::new(x, 0.0, 150.0, y.max(40.0)));
        repo.update_column_ref(column_id, Some(ElementHandle::new(next)));
        next += 1;
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    rt.block_on(async {
        repo.measure_columns_layout(ScrollOffset::default()).await;

        let all: Vec<_> = repo
            .columns()
            .flat_map(|c| c.rows.iter().map(|r| (c.id.clone(), r.id.clone())))
            .collect();
        let (column_id, row_id) = all[usize::from(input.pick) % all.len()].clone();

        let mut session = DragSession::new(AutoScrollConfig::default(), 800.0);
        session.arm(&mut repo, &column_id, &row_id).await.unwrap();
        for &(x, y) in input.ticks.iter().take(256) {
            session.drag_to(&mut repo, f32::from(x) / 8.0, f32::from(y) / 8.0);
        }
        let termination = match input.termination % 4 {
            0 => DragTermination::End,
            1 => DragTermination::Cancel,
            2 => DragTermination::Fail,
            _ => DragTermination::Undetermined,
        };
        session.finish(&mut repo, termination);
    });

    // Post-conditions that must always hold:
    let mut rows_seen = 0;
    for (c, column) in repo.columns().enumerate() {
        assert_eq!(column.index, c, "column index not dense");
        for (i, row) in column.rows.iter().enumerate() {
            assert_eq!(row.index, i, "row index not dense");
            assert!(!row.hidden, "row still hidden after finish");
        }
        rows_seen += column.rows.len();
    }
    assert_eq!(rows_seen, total, "rows lost or duplicated");
    assert!(repo.items_changed().is_empty());
});
