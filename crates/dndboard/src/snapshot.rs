#![forbid(unsafe_code)]

//! Immutable order snapshots and the changeset between two of them.
//!
//! A [`BoardSnapshot`] records every column and row position at one moment.
//! [`BoardSnapshot::diff`] is a pure function of two snapshots, so the live
//! board and the baseline can never drift apart through shared mutation.

use dndboard_core::{Column, ColumnId, RowId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    columns: Vec<ColumnSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub id: ColumnId,
    pub index: usize,
    pub rows: Vec<RowSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSnapshot {
    pub id: RowId,
    pub index: usize,
}

/// A column whose index moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnChange {
    pub id: ColumnId,
    pub index: usize,
}

/// A row whose index or owning column moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowChange {
    pub id: RowId,
    pub column_id: ColumnId,
    pub index: usize,
}

/// Minimal changeset for a persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemsChanged {
    pub columns: Vec<ColumnChange>,
    pub rows: Vec<RowChange>,
}

impl ItemsChanged {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }
}

impl BoardSnapshot {
    /// Record the positions of `columns`, which must be in index order.
    pub fn capture<'a, P: 'a>(columns: impl IntoIterator<Item = &'a Column<P>>) -> Self {
        let columns = columns
            .into_iter()
            .map(|column| ColumnSnapshot {
                id: column.id.clone(),
                index: column.index,
                rows: column
                    .rows
                    .iter()
                    .map(|row| RowSnapshot {
                        id: row.id.clone(),
                        index: row.index,
                    })
                    .collect(),
            })
            .collect();
        Self { columns }
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSnapshot] {
        &self.columns
    }

    /// Entries of `live` whose position differs from `self`.
    ///
    /// Columns and rows that `self` does not know about are left out.
    /// Output follows `live` order.
    #[must_use]
    pub fn diff(&self, live: &BoardSnapshot) -> ItemsChanged {
        let mut column_index: FxHashMap<&ColumnId, usize> = FxHashMap::default();
        let mut row_position: FxHashMap<&RowId, (&ColumnId, usize)> = FxHashMap::default();
        for column in &self.columns {
            column_index.insert(&column.id, column.index);
            for row in &column.rows {
                row_position.insert(&row.id, (&column.id, row.index));
            }
        }

        let mut changed = ItemsChanged::default();
        for column in &live.columns {
            if column_index
                .get(&column.id)
                .is_some_and(|&index| index != column.index)
            {
                changed.columns.push(ColumnChange {
                    id: column.id.clone(),
                    index: column.index,
                });
            }
            for row in &column.rows {
                let Some(&(was_column, was_index)) = row_position.get(&row.id) else {
                    continue;
                };
                if was_column != &column.id || was_index != row.index {
                    changed.rows.push(RowChange {
                        id: row.id.clone(),
                        column_id: column.id.clone(),
                        index: row.index,
                    });
                }
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dndboard_core::ColumnData;
    use dndboard_core::RowData;

    fn board(layout: &[(&str, &[&str])]) -> Vec<Column<()>> {
        layout
            .iter()
            .enumerate()
            .map(|(i, (id, rows))| {
                ColumnData::new(
                    *id,
                    *id,
                    rows.iter().map(|r| RowData::new(*r, ())).collect(),
                )
                .into_column(i)
            })
            .collect()
    }

    #[test]
    fn identical_snapshots_have_no_changes() {
        let cols = board(&[("1", &["a", "b"]), ("2", &["c"])]);
        let snap = BoardSnapshot::capture(&cols);
        assert!(snap.diff(&snap.clone()).is_empty());
    }

    #[test]
    fn reports_reordered_rows_only() {
        let before = board(&[("1", &["a", "b", "c"])]);
        let after = board(&[("1", &["b", "a", "c"])]);
        let changed = BoardSnapshot::capture(&before).diff(&BoardSnapshot::capture(&after));
        assert!(changed.columns.is_empty());
        let ids: Vec<_> = changed.rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn cross_column_move_reports_new_owner() {
        let before = board(&[("1", &["a", "b"]), ("2", &["c"])]);
        let after = board(&[("1", &["b"]), ("2", &["c", "a"])]);
        let changed = BoardSnapshot::capture(&before).diff(&BoardSnapshot::capture(&after));
        assert_eq!(
            changed.rows,
            vec![
                RowChange {
                    id: RowId::from("b"),
                    column_id: ColumnId::from("1"),
                    index: 0
                },
                RowChange {
                    id: RowId::from("a"),
                    column_id: ColumnId::from("2"),
                    index: 1
                },
            ]
        );
    }

    #[test]
    fn owner_change_is_reported_at_unchanged_index() {
        let before = board(&[("1", &["a"]), ("2", &[])]);
        let after = board(&[("1", &[]), ("2", &["a"])]);
        let changed = BoardSnapshot::capture(&before).diff(&BoardSnapshot::capture(&after));
        assert_eq!(
            changed.rows,
            vec![RowChange {
                id: RowId::from("a"),
                column_id: ColumnId::from("2"),
                index: 0
            }]
        );
    }

    #[test]
    fn unknown_entities_are_excluded() {
        let before = board(&[("1", &["a"])]);
        let after = board(&[("0", &["new"]), ("1", &["a"])]);
        let changed = BoardSnapshot::capture(&before).diff(&BoardSnapshot::capture(&after));
        assert_eq!(
            changed.columns,
            vec![ColumnChange {
                id: ColumnId::from("1"),
                index: 1
            }]
        );
        assert!(changed.rows.is_empty());
    }
}
