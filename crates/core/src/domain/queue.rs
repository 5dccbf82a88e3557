// Print Queue Domain Model

use super::count::CountInput;
use super::label::envelope_count;
use super::queue_item::QueueItem;
use serde::Serialize;

/// Ordered, session-local print queue
///
/// Newest additions come first. Every operation either applies completely or
/// leaves the queue untouched.
#[derive(Debug, Clone, Default)]
pub struct QueueManager {
    items: Vec<QueueItem>,
}

/// Totals shown next to the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueSummary {
    pub items: usize,
    pub labels: u64,
    pub registered: u64,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `items`, keeping their relative order
    pub fn add_many(&mut self, items: Vec<QueueItem>) -> &[QueueItem] {
        self.items.splice(0..0, items);
        &self.items
    }

    /// Replace an item's count from raw input
    ///
    /// Returns `None` (and changes nothing) when `id` is not queued.
    pub fn update_count(&mut self, id: &str, raw: &str) -> Option<CountInput> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        let input = CountInput::parse(raw);
        item.count = input.value();
        Some(input)
    }

    /// Remove an item, returning it if it was queued
    pub fn remove(&mut self, id: &str) -> Option<QueueItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Empty the queue, returning how many items were dropped
    ///
    /// Irreversible; callers must obtain confirmation first.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }

    pub fn get(&self, id: &str) -> Option<&QueueItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueueItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn summary(&self) -> QueueSummary {
        QueueSummary {
            items: self.items.len(),
            labels: self
                .items
                .iter()
                .map(|item| u64::from(envelope_count(item.count)))
                .sum(),
            registered: self.items.iter().map(|item| u64::from(item.count)).sum(),
        }
    }
}

impl<'a> IntoIterator for &'a QueueManager {
    type Item = &'a QueueItem;
    type IntoIter = std::slice::Iter<'a, QueueItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::count::MAX_COUNT;
    use crate::domain::label::expand_all;
    use crate::domain::queue_item::PaperLabel;

    fn item(id: &str, count: u32) -> QueueItem {
        QueueItem {
            id: id.to_string(),
            school_name: "GTHS KUMBA".to_string(),
            region: "SOUTH WEST".to_string(),
            division: "MEME".to_string(),
            exam_name: "CAP".to_string(),
            subject_name: "ELECTRICITY".to_string(),
            subject_code: "-".to_string(),
            paper: PaperLabel::Paper1,
            count,
        }
    }

    fn ids(queue: &QueueManager) -> Vec<&str> {
        queue.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_add_many_prepends_preserving_batch_order() {
        let mut queue = QueueManager::new();
        queue.add_many(vec![item("a", 1), item("b", 2)]);
        assert_eq!(ids(&queue), vec!["a", "b"]);

        let items = queue.add_many(vec![item("c", 3)]);
        assert_eq!(items.len(), 3);
        assert_eq!(ids(&queue), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_update_count_parses_and_coerces() {
        let mut queue = QueueManager::new();
        queue.add_many(vec![item("a", 10)]);

        assert_eq!(queue.update_count("a", "42"), Some(CountInput::Parsed(42)));
        assert_eq!(queue.get("a").unwrap().count, 42);

        assert_eq!(queue.update_count("a", "abc"), Some(CountInput::Invalid));
        assert_eq!(queue.get("a").unwrap().count, 0);
    }

    #[test]
    fn test_update_count_clamps_negative() {
        let mut queue = QueueManager::new();
        queue.add_many(vec![item("a", 10)]);

        let outcome = queue.update_count("a", "-5").unwrap();
        assert!(outcome.was_coerced());
        assert_eq!(queue.get("a").unwrap().count, 0);
    }

    #[test]
    fn test_update_count_above_bound_is_clamped() {
        let mut queue = QueueManager::new();
        queue.add_many(vec![item("a", 10)]);

        let outcome = queue.update_count("a", "99999999999").unwrap();
        assert!(outcome.was_coerced());
        assert_eq!(queue.get("a").unwrap().count, MAX_COUNT);

        let labels = expand_all(queue.items());
        assert_eq!(labels.len(), 200);
        assert_eq!(labels[0].supplied_count, u64::from(MAX_COUNT) + 2);
    }

    #[test]
    fn test_update_count_unknown_id_is_noop() {
        let mut queue = QueueManager::new();
        queue.add_many(vec![item("a", 10)]);

        assert_eq!(queue.update_count("zzz", "5"), None);
        assert_eq!(queue.get("a").unwrap().count, 10);
    }

    #[test]
    fn test_remove() {
        let mut queue = QueueManager::new();
        queue.add_many(vec![item("a", 1), item("b", 2)]);

        let removed = queue.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(ids(&queue), vec!["b"]);
    }

    #[test]
    fn test_remove_unknown_id_leaves_queue_identical() {
        let mut queue = QueueManager::new();
        queue.add_many(vec![item("a", 1), item("b", 2)]);
        let before = queue.items().to_vec();

        assert!(queue.remove("missing").is_none());
        assert_eq!(queue.items(), before.as_slice());
    }

    #[test]
    fn test_clear_then_expand_is_empty() {
        let mut queue = QueueManager::new();
        queue.add_many(vec![item("a", 120), item("b", 0)]);

        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
        assert!(expand_all(queue.items()).is_empty());
    }

    #[test]
    fn test_summary_counts_labels() {
        let mut queue = QueueManager::new();
        queue.add_many(vec![item("a", 0), item("b", 51), item("c", 101)]);

        let summary = queue.summary();
        assert_eq!(summary.items, 3);
        assert_eq!(summary.labels, 1 + 2 + 3);
        assert_eq!(summary.registered, 152);
    }
}
