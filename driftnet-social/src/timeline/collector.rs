use crate::timeline::item::TimelineItem;
use std::collections::HashSet;

/// Items in discovery order, unique by value.
///
/// Container identity is not tracked: two posts with identical text and
/// identical (or both unknown) timestamps collapse into one.
#[derive(Debug, Default, Clone)]
pub struct DedupCollector {
    items: Vec<TimelineItem>,
    seen: HashSet<TimelineItem>,
}

impl DedupCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` unless an equal item is already stored.
    ///
    /// Returns `true` if the item was new.
    ///
    /// ```
    /// use driftnet_social::timeline::{DedupCollector, TimelineItem, Timestamp};
    ///
    /// let mut collector = DedupCollector::new();
    /// assert!(collector.offer(TimelineItem::new("gm", Timestamp::Unknown)));
    /// assert!(!collector.offer(TimelineItem::new("gm", Timestamp::Unknown)));
    /// assert_eq!(collector.len(), 1);
    /// ```
    pub fn offer(&mut self, item: TimelineItem) -> bool {
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<TimelineItem> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::item::Timestamp;

    fn item(text: &str, ts: Option<&str>) -> TimelineItem {
        TimelineItem::new(text, Timestamp::from_attribute(ts.map(String::from)))
    }

    #[test]
    fn keeps_discovery_order() {
        let mut c = DedupCollector::new();
        for t in ["c", "a", "b"] {
            assert!(c.offer(item(t, None)));
        }
        let texts: Vec<_> = c.items().iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
    }

    #[test]
    fn same_text_different_timestamps_are_both_kept() {
        let mut c = DedupCollector::new();
        assert!(c.offer(item("gm", Some("2024-01-01T00:00:00Z"))));
        assert!(c.offer(item("gm", Some("2024-01-02T00:00:00Z"))));
        assert!(c.offer(item("gm", None)));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn never_stores_equal_items() {
        let mut c = DedupCollector::new();
        let inputs = [
            item("a", None),
            item("b", Some("t1")),
            item("a", None),
            item("b", Some("t1")),
            item("b", Some("t2")),
            item("a", None),
        ];
        for i in inputs {
            c.offer(i);
        }
        assert_eq!(c.len(), 3);
        let unique: HashSet<_> = c.items().iter().collect();
        assert_eq!(unique.len(), c.len());
    }
}
