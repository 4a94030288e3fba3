//! Trigger event parsing
//!
//! Ingest is driven by a queue envelope whose body is a storage
//! notification naming the uploaded object. Missing required fields
//! at any level are fatal: no partial run starts from a broken event.

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Records")]
    records: Vec<EnvelopeRecord>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeRecord {
    body: String,
}

#[derive(Debug, Deserialize)]
struct Notification {
    #[serde(rename = "Records")]
    records: Vec<NotificationRecord>,
}

#[derive(Debug, Deserialize)]
struct NotificationRecord {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: BucketRef,
    object: ObjectRef,
}

#[derive(Debug, Deserialize)]
struct BucketRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ObjectRef {
    key: String,
}

/// The parts of a trigger event the pipeline run needs.
#[derive(Debug)]
pub struct Trigger {
    pub bucket: String,
    pub key: String,
    /// Raw notification body, forwarded as-is to the notify queue.
    pub body: String,
}

pub fn parse_trigger(raw: &str) -> Result<Trigger> {
    let envelope: Envelope =
        serde_json::from_str(raw).context("malformed trigger envelope")?;
    let record = envelope
        .records
        .into_iter()
        .next()
        .context("trigger envelope has no records")?;

    let notification: Notification = serde_json::from_str(&record.body)
        .context("malformed storage notification in trigger body")?;
    let inner = notification
        .records
        .into_iter()
        .next()
        .context("storage notification has no records")?;

    Ok(Trigger {
        bucket: inner.s3.bucket.name,
        key: inner.s3.object.key,
        body: record.body,
    })
}
