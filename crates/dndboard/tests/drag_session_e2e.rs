//! End-to-end drag scenarios against a measured board.
//!
//! Every test mounts a board through [`common::GridHost`], so layouts come
//! from the real measurement path rather than being poked in by hand.

mod common;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use common::{COLUMN_WIDTH, column_element, mounted, order};
use dndboard::{
    AutoScrollConfig, BoardEvent, ColumnId, DragPhase, DragSession, DragTermination, Rect,
    RowChange, RowId, RowRef, ScrollHandle, ScrollOffset,
};
use tracing_subscriber::layer::SubscriberExt;

fn ids(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|col| col.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[tokio::test]
async fn drag_first_row_into_second_column_over_its_first_row() {
    let (mut repo, _host) =
        mounted(&[("1", &["A", "B", "C"]), ("2", &["D", "E"]), ("3", &["F"])]).await;
    let mut session = DragSession::new(AutoScrollConfig::default(), 1_000.0);

    session
        .arm(&mut repo, &ColumnId::from("1"), &RowId::from("A"))
        .await
        .unwrap();
    let tick = session.drag_to(&mut repo, 210.0, 40.0);
    assert_eq!(tick.column, Some(ColumnId::from("2")));
    assert_eq!(tick.autoscroll, None);

    assert_eq!(order(&repo), ids(&[&["B", "C"], &["A", "D", "E"], &["F"]]));
    for column in repo.columns() {
        let indices: Vec<_> = column.rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..column.rows.len()).collect::<Vec<_>>());
    }

    let changed = repo.items_changed();
    assert!(changed.columns.is_empty());
    assert!(changed.rows.contains(&RowChange {
        id: RowId::from("A"),
        column_id: ColumnId::from("2"),
        index: 0,
    }));
    assert!(!changed.rows.iter().any(|r| r.id.as_str() == "F"));

    let done = session.finish(&mut repo, DragTermination::End).unwrap();
    assert_eq!(
        (done.from_column.as_str(), done.to_column.as_str(), done.row.as_str()),
        ("1", "2", "A")
    );
    assert_eq!(session.phase(), DragPhase::Idle);
    assert!(repo.items_changed().is_empty());
}

#[tokio::test]
async fn column_threshold_band_on_measured_column() {
    let (mut repo, host) = mounted(&[("1", &["a"])]).await;
    host.set_frame(column_element(0), Rect::new(0.0, 100.0, COLUMN_WIDTH, 200.0));
    repo.update_column_layout(&ColumnId::from("1"), ScrollOffset::default())
        .await;

    let mover = repo.mover();
    assert!(mover.find_column_at_position(repo.columns(), 50.0, 70.0).is_some());
    assert!(mover.find_column_at_position(repo.columns(), 50.0, 60.0).is_none());
}

#[tokio::test]
async fn repeated_tick_on_same_slot_changes_nothing() {
    let (mut repo, _host) = mounted(&[("1", &["a", "b", "c"])]).await;
    repo.hide_row(&ColumnId::from("1"), &RowId::from("a"));
    let dragged = RowRef::new("a", "1");

    repo.move_row(&dragged, 10.0, 75.0, |_, _| {});
    let after_first = repo.snapshot();
    let reloads = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&reloads);
    repo.add_listener(ColumnId::from("1"), BoardEvent::Reload, move || {
        *counter.lock().unwrap() += 1;
    });

    let located = repo.move_row(&dragged, 10.0, 75.0, |_, _| {});
    assert_eq!(located.map(|c| c.id.as_str()), Some("1"));
    assert_eq!(repo.snapshot(), after_first);
    assert_eq!(*reloads.lock().unwrap(), 0);
}

#[tokio::test]
async fn cross_column_moves_preserve_row_count() {
    let (mut repo, _host) = mounted(&[("1", &["a", "b"]), ("2", &["c"]), ("3", &[])]).await;
    let mut session = DragSession::new(AutoScrollConfig::default(), 2_000.0);
    let total = |repo: &dndboard::Repository<()>| {
        repo.columns().map(|c| c.rows.len()).sum::<usize>()
    };

    session
        .arm(&mut repo, &ColumnId::from("1"), &RowId::from("b"))
        .await
        .unwrap();
    for x in [210.0, 410.0, 10.0, 410.0] {
        session.drag_to(&mut repo, x, 20.0);
        assert_eq!(total(&repo), 3);
    }
    let done = session.finish(&mut repo, DragTermination::Fail).unwrap();
    assert_eq!(done.to_column.as_str(), "3");
    assert_eq!(order(&repo), ids(&[&["a"], &["c"], &["b"]]));
}

#[tokio::test]
async fn autoscroll_request_then_remeasure() {
    let (mut repo, host) = mounted(&[("1", &["a"]), ("2", &["b"])]).await;
    repo.set_column_scroll_ref(&ColumnId::from("2"), Some(ScrollHandle::new(9)));
    let mut session = DragSession::new(AutoScrollConfig::default(), 260.0);

    session
        .arm(&mut repo, &ColumnId::from("2"), &RowId::from("b"))
        .await
        .unwrap();
    let tick = session.drag_to(&mut repo, 220.0, 20.0);
    let scroll = tick.autoscroll.expect("right edge should scroll");
    assert_eq!(scroll.offset, 8.0);

    repo.measure_columns_layout(session.measure_offset()).await;
    let column = repo.column(&ColumnId::from("2")).unwrap();
    assert_eq!(column.layout.unwrap().x, 192.0);

    assert!(repo.scroll_column(&ColumnId::from("2"), 0.0));
    assert_eq!(*host.scrolled.lock().unwrap(), vec![(9, 0.0)]);
}

#[tokio::test]
async fn lifted_row_after_scroll_can_return_to_its_slot() {
    let (mut repo, _host) = mounted(&[("1", &["a", "b", "c"]), ("2", &["d"])]).await;
    let mut session = DragSession::new(AutoScrollConfig::default(), 1_000.0);
    session.set_scroll_offset(60.0);
    repo.measure_columns_layout(session.measure_offset()).await;

    let (c1, a) = (ColumnId::from("1"), RowId::from("a"));
    session.arm(&mut repo, &c1, &a).await.unwrap();
    let lifted = repo.find_row(&c1, &a).unwrap().layout.unwrap();
    let below = repo.find_row(&c1, &RowId::from("b")).unwrap().layout.unwrap();
    assert_eq!(lifted.x, -60.0);
    assert_eq!(lifted.x, below.x);

    let tick = session.drag_to(&mut repo, 55.0, 75.0);
    assert_eq!(tick.autoscroll, None);
    assert_eq!(order(&repo), ids(&[&["b", "a", "c"], &["d"]]));

    session.drag_to(&mut repo, 55.0, 25.0);
    assert_eq!(order(&repo), ids(&[&["a", "b", "c"], &["d"]]));
}

// ---------------------------------------------------------------------------
// Tracing capture
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
struct EventCapture(Arc<Mutex<Vec<HashMap<String, String>>>>);

struct FieldVisitor(HashMap<String, String>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(HashMap::new());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(visitor.0);
    }
}

#[tokio::test]
async fn cross_column_tick_emits_structured_events() {
    let (mut repo, _host) = mounted(&[("1", &["a"]), ("2", &["b"])]).await;
    repo.hide_row(&ColumnId::from("1"), &RowId::from("a"));

    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, || {
        repo.move_row(&RowRef::new("a", "1"), 210.0, 20.0, |_, _| {});
    });

    let events = capture.0.lock().unwrap();
    let moved = events
        .iter()
        .find(|e| e.get("message").is_some_and(|m| m.contains("moved to other column")))
        .expect("cross-column move event");
    assert_eq!(moved.get("from").map(String::as_str), Some("1"));
    assert_eq!(moved.get("to").map(String::as_str), Some("2"));
    assert!(
        events
            .iter()
            .any(|e| e.get("message").is_some_and(|m| m.contains("row slot changed")))
    );
}
