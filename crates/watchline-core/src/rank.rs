//! Ranking engine for the multi-type export
//!
//! Orders records so the most recently relevant items come first,
//! then promotes explicit likes above everything else. Sort keys are
//! computed as explicit derived columns (group recency rank,
//! within-group recency rank) and discarded after the sort.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::record::{Category, Record};

/// Rank the canonical record set and drop duplicate ids.
///
/// 1. groups records by channel, ranking groups by their most recent
///    parsed timestamp (ties by first-seen order; a group with only
///    invalid timestamps ranks last);
/// 2. ranks records within each group by their own timestamp
///    (same tie rules);
/// 3. sorts by (within-group rank, group rank, category label);
/// 4. stable-partitions likes to the front;
/// 5. keeps the first surviving occurrence of each video id.
pub fn rank(records: Vec<Record>) -> Vec<Record> {
    let mut group_of = Vec::with_capacity(records.len());
    let mut group_index: FxHashMap<String, usize> = FxHashMap::default();
    let mut group_latest: Vec<Option<DateTime<Utc>>> = Vec::new();
    for record in &records {
        let next = group_latest.len();
        let gi = *group_index
            .entry(record.channel_name.clone())
            .or_insert(next);
        if gi == next {
            group_latest.push(None);
        }
        group_of.push(gi);
        if let Some(t) = record.occurred_at.time() {
            if group_latest[gi].is_none_or(|cur| t > cur) {
                group_latest[gi] = Some(t);
            }
        }
    }

    // Rank 1 = most recently active group.
    let mut order: Vec<usize> = (0..group_latest.len()).collect();
    order.sort_by(|&a, &b| cmp_recent(group_latest[a], group_latest[b]).then(a.cmp(&b)));
    let mut group_rank = vec![0usize; group_latest.len()];
    for (pos, &gi) in order.iter().enumerate() {
        group_rank[gi] = pos + 1;
    }

    // Rank 1 = most recent record within its group.
    let mut within_rank = vec![0usize; records.len()];
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); group_latest.len()];
    for (i, &gi) in group_of.iter().enumerate() {
        members[gi].push(i);
    }
    for idxs in &mut members {
        idxs.sort_by(|&a, &b| {
            cmp_recent(records[a].occurred_at.time(), records[b].occurred_at.time())
                .then(a.cmp(&b))
        });
        for (pos, &i) in idxs.iter().enumerate() {
            within_rank[i] = pos + 1;
        }
    }

    // Recency-within-group dominates, group recency second, category
    // label breaks the remaining ties. The sort is stable, so equal
    // keys keep first-seen order.
    let mut indexed: Vec<(usize, Record)> = records.into_iter().enumerate().collect();
    indexed.sort_by(|(a, ra), (b, rb)| {
        within_rank[*a]
            .cmp(&within_rank[*b])
            .then(group_rank[group_of[*a]].cmp(&group_rank[group_of[*b]]))
            .then(ra.category.label().cmp(rb.category.label()))
    });

    let (likes, others): (Vec<Record>, Vec<Record>) = indexed
        .into_iter()
        .map(|(_, r)| r)
        .partition(|r| r.category == Category::Like);

    let mut seen = FxHashSet::default();
    likes
        .into_iter()
        .chain(others)
        .filter(|r| seen.insert(r.video_id.clone()))
        .collect()
}

/// Descending recency: newer first, invalid (None) last.
fn cmp_recent(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OccurredAt;

    fn rec(id: &str, channel: &str, category: Category, ts: Option<&str>) -> Record {
        Record {
            video_id: id.to_string(),
            title: format!("title {id}"),
            channel_name: channel.to_string(),
            category,
            occurred_at: match ts {
                Some(t) => OccurredAt::parse(t),
                None => OccurredAt::Invalid(String::new()),
            },
        }
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.video_id.as_str()).collect()
    }

    fn sample() -> Vec<Record> {
        vec![
            rec("like0000001", "Alpha", Category::Like, Some("2024-03-02T10:00:00Z")),
            rec("like0000002", "Beta", Category::Like, Some("2024-03-01T10:00:00Z")),
            rec("subs0000001", "Alpha", Category::Subscribe, Some("2024-03-03T10:00:00Z")),
            rec("subs0000002", "Gamma", Category::Subscribe, None),
        ]
    }

    #[test]
    fn likes_first_then_recency_order() {
        let ranked = rank(sample());
        assert_eq!(
            ids(&ranked),
            ["like0000002", "like0000001", "subs0000001", "subs0000002"]
        );
    }

    #[test]
    fn all_likes_precede_other_categories() {
        let ranked = rank(sample());
        let first_non_like = ranked
            .iter()
            .position(|r| r.category != Category::Like)
            .unwrap();
        assert!(
            ranked[first_non_like..]
                .iter()
                .all(|r| r.category != Category::Like)
        );
    }

    #[test]
    fn ranking_is_idempotent() {
        let once = rank(sample());
        let twice = rank(once.clone());
        assert_eq!(ids(&twice), ids(&once));
    }

    #[test]
    fn most_recent_of_most_recent_group_first() {
        // No likes, so the recency ordering shows through untouched.
        let records = vec![
            rec("old00000001", "Quiet", Category::Subscribe, Some("2024-01-01T00:00:00Z")),
            rec("new00000001", "Busy", Category::Subscribe, Some("2024-06-01T00:00:00Z")),
            rec("new00000002", "Busy", Category::Subscribe, Some("2024-05-01T00:00:00Z")),
        ];
        let ranked = rank(records);
        assert_eq!(ids(&ranked)[0], "new00000001");
    }

    #[test]
    fn invalid_timestamps_sort_last_within_group() {
        let records = vec![
            rec("invalid0001", "Chan", Category::Subscribe, None),
            rec("parsed00001", "Chan", Category::Subscribe, Some("2024-01-01T00:00:00Z")),
        ];
        let ranked = rank(records);
        assert_eq!(ids(&ranked), ["parsed00001", "invalid0001"]);
    }

    #[test]
    fn duplicate_ids_keep_first_surviving() {
        let records = vec![
            rec("same0000001", "Alpha", Category::Like, Some("2024-03-01T10:00:00Z")),
            rec("same0000001", "Alpha", Category::Like, Some("2024-02-01T10:00:00Z")),
            rec("othr0000001", "Alpha", Category::Like, Some("2024-01-01T10:00:00Z")),
        ];
        let ranked = rank(records);
        assert_eq!(ids(&ranked), ["same0000001", "othr0000001"]);
        // The newer duplicate is the one that survives.
        assert_eq!(
            ranked[0].occurred_at,
            OccurredAt::parse("2024-03-01T10:00:00Z")
        );
    }

    #[test]
    fn empty_input() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn group_tie_broken_by_first_seen() {
        let records = vec![
            rec("bgroup00001", "B", Category::Subscribe, Some("2024-03-01T10:00:00Z")),
            rec("agroup00001", "A", Category::Subscribe, Some("2024-03-01T10:00:00Z")),
        ];
        let ranked = rank(records);
        assert_eq!(ids(&ranked), ["bgroup00001", "agroup00001"]);
    }
}
