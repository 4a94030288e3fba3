//! Global video-id dedup gate

use rustc_hash::FxHashSet;

use crate::record::Record;

/// The set of every video id ever admitted by any prior run.
///
/// Loaded once at pipeline start, extended in place as records are
/// admitted, persisted by the caller when it grew. It only ever
/// grows; nothing is ever removed.
#[derive(Debug, Default)]
pub struct SeenIds {
    set: FxHashSet<String>,
}

impl SeenIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.set.contains(id)
    }

    /// Add an id; returns true if it was not yet present.
    pub fn insert(&mut self, id: String) -> bool {
        self.set.insert(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.set.iter().map(String::as_str)
    }
}

impl FromIterator<String> for SeenIds {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            set: iter.into_iter().collect(),
        }
    }
}

/// Keep exactly the records whose id is not yet in `seen`, inserting
/// each admitted id as it is accepted. The caller observes the delta
/// via `seen.len()` before and after.
///
/// There is no locking: two invocations racing on the same snapshot
/// can both admit an id and both report it as new. Callers needing
/// strict dedup serialize invocations externally.
pub fn admit_new(records: Vec<Record>, seen: &mut SeenIds) -> Vec<Record> {
    let total = records.len();
    let admitted: Vec<Record> = records
        .into_iter()
        .filter(|r| seen.insert(r.video_id.clone()))
        .collect();
    log::debug!(
        "dedup gate: admitted {} of {total} records ({} already seen)",
        admitted.len(),
        total - admitted.len()
    );
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Category, OccurredAt};

    fn rec(id: &str) -> Record {
        Record {
            video_id: id.to_string(),
            title: String::new(),
            channel_name: String::new(),
            category: Category::Watch,
            occurred_at: OccurredAt::parse("2024-01-01T00:00:00Z"),
        }
    }

    #[test]
    fn admits_only_unseen_and_grows_set() {
        let mut seen: SeenIds = ["abc12345678".to_string()].into_iter().collect();
        let before = seen.len();

        let input = vec![
            rec("abc12345678"),
            rec("new00000001"),
            rec("new00000002"),
            rec("new00000003"),
        ];
        let total = input.len();
        let admitted = admit_new(input, &mut seen);

        assert_eq!(admitted.len(), 3);
        let new_added = seen.len() - before;
        assert_eq!(new_added, 3);
        assert_eq!(new_added + (total - admitted.len()), total);
        assert_eq!(seen.len(), 4);
        assert!(seen.contains("new00000002"));
    }

    #[test]
    fn set_is_monotonic() {
        let mut seen = SeenIds::new();
        let _ = admit_new(vec![rec("aaaaaaaaaaa")], &mut seen);
        let len_after_first = seen.len();
        let _ = admit_new(vec![rec("aaaaaaaaaaa")], &mut seen);
        assert_eq!(seen.len(), len_after_first);
    }

    #[test]
    fn same_run_duplicates_excluded_by_same_mechanism() {
        let mut seen = SeenIds::new();
        let admitted = admit_new(vec![rec("aaaaaaaaaaa"), rec("aaaaaaaaaaa")], &mut seen);
        assert_eq!(admitted.len(), 1);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn empty_input_empty_output() {
        let mut seen = SeenIds::new();
        assert!(admit_new(Vec::new(), &mut seen).is_empty());
        assert!(seen.is_empty());
    }
}
