use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::sys::geometry::Rect;
use crate::sys::window_system::WindowId;

/// A captured window. `frame` is where the window was when it was captured and
/// is what restore puts back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub frame: Rect,
    /// 1-based, dense, rewritten on every reorder or removal.
    pub ordinal: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

impl MoveDirection {
    pub fn offset(self) -> isize {
        match self {
            MoveDirection::Up => -1,
            MoveDirection::Down => 1,
        }
    }
}

/// Ordered set of captured windows. Order is placement order and display order.
#[derive(Debug, Default)]
pub struct WindowStore {
    records: Vec<WindowRecord>,
}

impl WindowStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    pub fn records(&self) -> &[WindowRecord] { &self.records }

    pub fn get(&self, position: usize) -> Option<&WindowRecord> { self.records.get(position) }

    pub fn contains(&self, id: WindowId) -> bool { self.records.iter().any(|r| r.id == id) }

    /// Appends a record unless the window is already captured. Returns whether
    /// anything was added.
    pub fn push(&mut self, id: WindowId, title: String, frame: Rect) -> bool {
        if self.contains(id) {
            return false;
        }
        let ordinal = self.records.len() + 1;
        self.records.push(WindowRecord { id, title, frame, ordinal });
        true
    }

    pub fn clear(&mut self) { self.records.clear(); }

    /// Drops every record whose window fails `is_live` and returns them in
    /// their former order.
    pub fn retain_live(&mut self, mut is_live: impl FnMut(WindowId) -> bool) -> Vec<WindowRecord> {
        let (live, dead) = std::mem::take(&mut self.records)
            .into_iter()
            .partition::<Vec<_>, _>(|r| is_live(r.id));
        self.records = live;
        self.renumber();
        dead
    }

    /// Swaps the record at `position` with its neighbour in `direction`. Out of
    /// range or past either end does nothing and returns false.
    pub fn move_record(&mut self, position: usize, direction: MoveDirection) -> bool {
        if position >= self.records.len() {
            return false;
        }
        let Some(target) = position.checked_add_signed(direction.offset()) else {
            return false;
        };
        if target >= self.records.len() {
            return false;
        }
        self.records.swap(position, target);
        self.renumber();
        true
    }

    fn renumber(&mut self) {
        for (i, record) in self.records.iter_mut().enumerate() {
            record.ordinal = i + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn store_of(ids: &[u64]) -> WindowStore {
        let mut store = WindowStore::new();
        for &id in ids {
            store.push(WindowId::new(id), format!("w{id}"), Rect::new(0, 0, 10, 10));
        }
        store
    }

    fn ids(store: &WindowStore) -> Vec<u64> { store.records().iter().map(|r| r.id.get()).collect() }

    fn ordinals(store: &WindowStore) -> Vec<usize> {
        store.records().iter().map(|r| r.ordinal).collect()
    }

    #[test]
    fn push_ignores_duplicates() {
        let mut store = store_of(&[1, 2]);
        assert!(!store.push(WindowId::new(1), "again".into(), Rect::default()));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).map(|r| r.title.as_str()), Some("w1"));
    }

    #[test]
    fn moving_down_then_up_is_identity() {
        let mut store = store_of(&[1, 2, 3, 4]);
        for position in 0..3 {
            assert!(store.move_record(position, MoveDirection::Down));
            assert!(store.move_record(position + 1, MoveDirection::Up));
            assert_eq!(ids(&store), vec![1, 2, 3, 4]);
        }
    }

    #[test]
    fn moves_at_the_edges_do_nothing() {
        let mut store = store_of(&[1, 2, 3]);
        assert!(!store.move_record(0, MoveDirection::Up));
        assert!(!store.move_record(2, MoveDirection::Down));
        assert!(!store.move_record(7, MoveDirection::Up));
        assert_eq!(ids(&store), vec![1, 2, 3]);
    }

    #[test]
    fn ordinals_stay_dense() {
        let mut store = store_of(&[1, 2, 3, 4]);
        store.move_record(3, MoveDirection::Up);
        assert_eq!(ids(&store), vec![1, 2, 4, 3]);
        assert_eq!(ordinals(&store), vec![1, 2, 3, 4]);

        let removed = store.retain_live(|id| id.get() % 2 == 1);
        assert_eq!(removed.iter().map(|r| r.id.get()).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(ids(&store), vec![1, 3]);
        assert_eq!(ordinals(&store), vec![1, 2]);
    }

    #[test]
    fn direction_parses_from_console_words() {
        assert_eq!("up".parse::<MoveDirection>(), Ok(MoveDirection::Up));
        assert_eq!(MoveDirection::Down.to_string(), "down");
    }
}
