//! Batch builder: deduplicated records to position-tagged work units

use serde::Serialize;

use crate::record::{Category, Record};

/// Status stamped on every freshly built work unit.
pub const NEW_STATUS: &str = "NEW";

/// Message body for one downstream work unit.
#[derive(Debug, Clone, Serialize)]
pub struct WorkPayload {
    pub file_id: String,
    pub video_id: String,
    pub channel_name: String,
    pub status: &'static str,
    pub category: Category,
    pub title: String,
    pub occurred_at: String,
    /// 1-based position within the deduplicated set for this run,
    /// independent of how delivery later chunks the batch.
    pub position_in_batch: usize,
    pub batch_total: usize,
}

/// One message destined for the downstream queue.
#[derive(Debug, Clone, Serialize)]
pub struct WorkUnit {
    /// Per-item queue identifier: the record's video id.
    pub key: String,
    pub payload: WorkPayload,
}

/// Build work units from the deduplicated, ordered record set.
pub fn build_units(records: &[Record], file_id: &str) -> Vec<WorkUnit> {
    let batch_total = records.len();
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| WorkUnit {
            key: record.video_id.clone(),
            payload: WorkPayload {
                file_id: file_id.to_string(),
                video_id: record.video_id.clone(),
                channel_name: record.channel_name.clone(),
                status: NEW_STATUS,
                category: record.category,
                title: record.title.clone(),
                occurred_at: record.occurred_at.to_string(),
                position_in_batch: idx + 1,
                batch_total,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OccurredAt;

    fn rec(id: &str) -> Record {
        Record {
            video_id: id.to_string(),
            title: format!("title {id}"),
            channel_name: "Chan".to_string(),
            category: Category::Like,
            occurred_at: OccurredAt::parse("2024-01-01T00:00:00.50Z"),
        }
    }

    #[test]
    fn positions_are_contiguous_one_based() {
        let records: Vec<Record> = (0..7).map(|i| rec(&format!("id{i}aaaaaaaa"))).collect();
        let units = build_units(&records, "export-1");

        assert_eq!(units.len(), 7);
        for (idx, unit) in units.iter().enumerate() {
            assert_eq!(unit.payload.position_in_batch, idx + 1);
            assert_eq!(unit.payload.batch_total, 7);
        }
    }

    #[test]
    fn unit_carries_record_fields() {
        let units = build_units(&[rec("abcdefghijk")], "uploads/export-1");
        let unit = &units[0];

        assert_eq!(unit.key, "abcdefghijk");
        assert_eq!(unit.payload.file_id, "uploads/export-1");
        assert_eq!(unit.payload.status, "NEW");
        assert_eq!(unit.payload.occurred_at, "2024-01-01T00:00:00.500Z");

        let json = serde_json::to_value(unit).unwrap();
        assert_eq!(json["payload"]["category"], "like");
        assert_eq!(json["payload"]["channel_name"], "Chan");
    }

    #[test]
    fn empty_records_build_no_units() {
        assert!(build_units(&[], "export-1").is_empty());
    }
}
