use std::collections::VecDeque;
use std::sync::Arc;

use image::RgbaImage;

pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Bounded snapshot history with a cursor.
///
/// Entries are evicted oldest-first once the limit is exceeded. Pushing after an
/// undo drops every entry past the cursor.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Arc<RgbaImage>>,
    position: usize,
    limit: usize,
}

impl History {
    pub fn new(initial: Arc<RgbaImage>, limit: usize) -> Self {
        let mut entries = VecDeque::with_capacity(limit.max(1));
        entries.push_back(initial);
        Self {
            entries,
            position: 0,
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> &Arc<RgbaImage> {
        &self.entries[self.position]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position + 1 < self.entries.len()
    }

    /// Appends a snapshot and makes it current. Returns how many entries were evicted.
    pub fn push(&mut self, snapshot: Arc<RgbaImage>) -> usize {
        self.entries.truncate(self.position + 1);
        self.entries.push_back(snapshot);

        let mut evicted = 0;
        while self.entries.len() > self.limit {
            self.entries.pop_front();
            evicted += 1;
        }
        self.position = self.entries.len() - 1;
        if evicted > 0 {
            tracing::debug!(evicted, limit = self.limit, "evicted oldest history snapshots");
        }
        evicted
    }

    pub fn undo(&mut self) -> Option<&Arc<RgbaImage>> {
        if !self.can_undo() {
            return None;
        }
        self.position -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&Arc<RgbaImage>> {
        if !self.can_redo() {
            return None;
        }
        self.position += 1;
        Some(self.current())
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> impl Iterator<Item = &Arc<RgbaImage>> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(width: u32) -> Arc<RgbaImage> {
        Arc::new(RgbaImage::new(width, 1))
    }

    #[test]
    fn push_evicts_oldest_entries_past_limit() {
        let mut history = History::new(snapshot(1), 3);
        assert_eq!(history.push(snapshot(2)), 0);
        assert_eq!(history.push(snapshot(3)), 0);
        assert_eq!(history.push(snapshot(4)), 1);

        let widths = history.entries().map(|s| s.width()).collect::<Vec<_>>();
        assert_eq!(widths, vec![2, 3, 4]);
        assert_eq!(history.position(), 2);
    }

    #[test]
    fn undo_and_redo_move_the_cursor_within_bounds() {
        let mut history = History::new(snapshot(1), 5);
        history.push(snapshot(2));

        assert_eq!(history.undo().map(|s| s.width()), Some(1));
        assert!(history.undo().is_none());
        assert_eq!(history.redo().map(|s| s.width()), Some(2));
        assert!(history.redo().is_none());
    }

    #[test]
    fn push_after_undo_discards_forward_entries() {
        let mut history = History::new(snapshot(1), 5);
        history.push(snapshot(2));
        history.push(snapshot(3));
        history.undo();
        history.undo();
        history.push(snapshot(9));

        let widths = history.entries().map(|s| s.width()).collect::<Vec<_>>();
        assert_eq!(widths, vec![1, 9]);
        assert!(!history.can_redo());
        assert_eq!(history.current().width(), 9);
    }

    #[test]
    fn zero_limit_still_keeps_the_current_entry() {
        let mut history = History::new(snapshot(1), 0);
        assert_eq!(history.limit(), 1);
        history.push(snapshot(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.current().width(), 2);
    }
}
