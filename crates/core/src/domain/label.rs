// Label Expansion Engine
//
// Pure functions from queue items to envelope label records. No I/O, no
// clock, no shared state.

use super::queue_item::{PaperLabel, QueueItem};
use serde::{Deserialize, Serialize};

/// Registered students represented per envelope
pub const ENVELOPE_CAPACITY: u32 = 50;

/// Extra copies supplied on top of the registered count
pub const SUPPLY_MARGIN: u32 = 2;

/// Exam-name markers and the level printed for them, checked in order
const LEVELS: [(&str, &str); 3] = [
    ("CAP", "ORDINARY LEVEL (CAP)"),
    ("ATVEE", "ADVANCED LEVEL (ATVEE)"),
    ("ITVEE", "INTERMEDIATE LEVEL (ITVEE)"),
];

/// One physical envelope's printable fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub region: String,
    pub division: String,
    pub school_name: String,
    pub subject_name: String,
    pub subject_code: String,
    pub level_name: String,
    pub paper: PaperLabel,
    pub registered_count: u32,
    pub supplied_count: u64,
    /// 1-based
    pub envelope_index: u32,
    pub total_envelopes: u32,
}

/// Output of one generation run, handed to a `LabelRenderer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelBatch {
    /// Epoch ms
    pub generated_at: i64,
    pub labels: Vec<LabelRecord>,
}

/// Envelopes needed for `count` registered students (never below 1)
pub fn envelope_count(count: u32) -> u32 {
    count.max(1).div_ceil(ENVELOPE_CAPACITY).max(1)
}

/// Copies supplied for `count` registered students
///
/// Widened so the margin is kept for every `u32` count.
pub fn supplied_count(count: u32) -> u64 {
    u64::from(count) + u64::from(SUPPLY_MARGIN)
}

/// Printed level for an exam name; unknown exams pass through unchanged
pub fn derive_level(exam_name: &str) -> String {
    LEVELS
        .iter()
        .find(|(marker, _)| exam_name.contains(marker))
        .map(|(_, level)| (*level).to_string())
        .unwrap_or_else(|| exam_name.to_string())
}

/// Expand one item into its envelope labels, envelope 1 first
pub fn expand(item: &QueueItem) -> Vec<LabelRecord> {
    let total_envelopes = envelope_count(item.count);
    let supplied = supplied_count(item.count);
    let level_name = derive_level(&item.exam_name);

    (1..=total_envelopes)
        .map(|envelope_index| LabelRecord {
            region: item.region.clone(),
            division: item.division.clone(),
            school_name: item.school_name.clone(),
            subject_name: item.subject_name.clone(),
            subject_code: item.subject_code.clone(),
            level_name: level_name.clone(),
            paper: item.paper,
            registered_count: item.count,
            supplied_count: supplied,
            envelope_index,
            total_envelopes,
        })
        .collect()
}

/// Expand a whole queue, keeping queue order
pub fn expand_all<'a, I>(items: I) -> Vec<LabelRecord>
where
    I: IntoIterator<Item = &'a QueueItem>,
{
    items.into_iter().flat_map(expand).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::count::MAX_COUNT;

    fn item(id: &str, exam: &str, count: u32) -> QueueItem {
        QueueItem {
            id: id.to_string(),
            school_name: "GBHS LIMBE".to_string(),
            region: "SOUTH WEST".to_string(),
            division: "FAKO".to_string(),
            exam_name: exam.to_string(),
            subject_name: "BUILDING CONSTRUCTION".to_string(),
            subject_code: "7010".to_string(),
            paper: PaperLabel::Paper2,
            count,
        }
    }

    #[test]
    fn test_envelope_and_supply_table() {
        let cases = [
            (0, 1, 2),
            (1, 1, 3),
            (50, 1, 52),
            (51, 2, 53),
            (100, 2, 102),
            (101, 3, 103),
        ];
        for (count, envelopes, supplied) in cases {
            assert_eq!(envelope_count(count), envelopes, "count={}", count);
            assert_eq!(supplied_count(count), supplied, "count={}", count);
        }
    }

    #[test]
    fn test_supplied_count_keeps_margin_at_the_top() {
        assert_eq!(supplied_count(MAX_COUNT), u64::from(MAX_COUNT) + 2);
        assert_eq!(supplied_count(u32::MAX), u64::from(u32::MAX) + 2);
    }

    #[test]
    fn test_expand_at_max_count() {
        let labels = expand(&item("a", "CAP", MAX_COUNT));
        assert_eq!(labels.len(), 200);
        assert_eq!(labels[199].envelope_index, 200);
        assert!(labels.iter().all(|l| l.supplied_count == 10_002));
    }

    #[test]
    fn test_derive_level() {
        assert_eq!(derive_level("GCE O/L CAP 2024"), "ORDINARY LEVEL (CAP)");
        assert_eq!(derive_level("ATVEE"), "ADVANCED LEVEL (ATVEE)");
        assert_eq!(derive_level("ITVEE 2025"), "INTERMEDIATE LEVEL (ITVEE)");
        assert_eq!(derive_level("UNKNOWN EXAM"), "UNKNOWN EXAM");
    }

    #[test]
    fn test_expand_indices_ascending() {
        let labels = expand(&item("a", "CAP", 101));
        assert_eq!(labels.len(), 3);
        let indices: Vec<u32> = labels.iter().map(|l| l.envelope_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert!(labels.iter().all(|l| l.total_envelopes == 3));
        assert!(labels.iter().all(|l| l.supplied_count == 103));
        assert!(labels.iter().all(|l| l.registered_count == 101));
    }

    #[test]
    fn test_expand_zero_count_still_prints_one_label() {
        let labels = expand(&item("a", "ITVEE", 0));
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].envelope_index, 1);
        assert_eq!(labels[0].supplied_count, 2);
        assert_eq!(labels[0].level_name, "INTERMEDIATE LEVEL (ITVEE)");
    }

    #[test]
    fn test_expand_copies_item_fields() {
        let label = expand(&item("a", "CAP", 10)).remove(0);
        assert_eq!(label.school_name, "GBHS LIMBE");
        assert_eq!(label.region, "SOUTH WEST");
        assert_eq!(label.division, "FAKO");
        assert_eq!(label.subject_code, "7010");
        assert_eq!(label.paper, PaperLabel::Paper2);
    }

    #[test]
    fn test_expand_all_preserves_queue_order() {
        let items = vec![item("a", "CAP", 60), item("b", "ATVEE", 5)];
        let labels = expand_all(&items);

        let pairs: Vec<(String, u32)> = labels
            .iter()
            .map(|l| (l.level_name.clone(), l.envelope_index))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("ORDINARY LEVEL (CAP)".to_string(), 1),
                ("ORDINARY LEVEL (CAP)".to_string(), 2),
                ("ADVANCED LEVEL (ATVEE)".to_string(), 1),
            ]
        );
    }
}
