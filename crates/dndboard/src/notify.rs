#![forbid(unsafe_code)]

//! Per-column change notifications.
//!
//! Subscribers register for a `(column, event)` pair and get a
//! [`SubscriptionId`] back. Several subscribers may watch the same pair;
//! registering again never replaces an earlier subscriber. A single global
//! reload callback covers structural changes to the whole board.

use std::fmt;

use dndboard_core::ColumnId;
use rustc_hash::FxHashMap;

/// Events a column can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardEvent {
    /// The column's visible row sequence changed and must be re-rendered.
    Reload,
}

/// Handle used to remove a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub type Callback = Box<dyn FnMut() + Send>;

#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    subscribers: FxHashMap<(ColumnId, BoardEvent), Vec<(SubscriptionId, Callback)>>,
    reload: Option<Callback>,
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("pairs", &self.subscribers.len())
            .field("has_reload", &self.reload.is_some())
            .finish()
    }
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event` on `column`.
    pub fn subscribe(
        &mut self,
        column: ColumnId,
        event: BoardEvent,
        callback: impl FnMut() + Send + 'static,
    ) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers
            .entry((column, event))
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove one subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut emptied = None;
        let mut removed = false;
        for (key, subs) in &mut self.subscribers {
            if let Some(pos) = subs.iter().position(|(sub, _)| *sub == id) {
                subs.remove(pos);
                removed = true;
                if subs.is_empty() {
                    emptied = Some(key.clone());
                }
                break;
            }
        }
        if let Some(key) = emptied {
            self.subscribers.remove(&key);
        }
        removed
    }

    /// Invoke every subscriber of `(column, event)` in registration order.
    ///
    /// Returns how many callbacks ran.
    pub fn notify(&mut self, column: &ColumnId, event: BoardEvent) -> usize {
        let Some(subs) = self.subscribers.get_mut(&(column.clone(), event)) else {
            return 0;
        };
        for (_, callback) in subs.iter_mut() {
            callback();
        }
        subs.len()
    }

    /// Set the board-wide reload callback, replacing any previous one.
    pub fn set_reload(&mut self, callback: impl FnMut() + Send + 'static) {
        self.reload = Some(Box::new(callback));
    }

    /// Invoke the board-wide reload callback, if set.
    pub fn reload(&mut self) {
        if let Some(callback) = self.reload.as_mut() {
            callback();
        }
    }

    /// Number of subscribers for a pair.
    #[must_use]
    pub fn subscriber_count(&self, column: &ColumnId, event: BoardEvent) -> usize {
        self.subscribers
            .get(&(column.clone(), event))
            .map_or(0, Vec::len)
    }
}
