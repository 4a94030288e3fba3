//! `watchline ingest` - process one uploaded export end to end

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use watchline_core::{RunMetadata, RunSummary, file_id_from_key, pipeline};
use watchline_store::{FifoNotify, FileStatus, JsonlQueue, SnapshotStore, StatusStore};

use crate::config::Config;
use crate::event;

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Trigger event file (queue envelope JSON naming the upload)
    #[arg(long)]
    pub event: PathBuf,
}

pub fn run(args: IngestArgs, config: &Config) -> Result<()> {
    let raw_event = std::fs::read_to_string(&args.event)
        .with_context(|| format!("failed to read event file {}", args.event.display()))?;
    let trigger = event::parse_trigger(&raw_event)?;

    let origin = config
        .origin_for_bucket(&trigger.bucket)
        .with_context(|| format!("unknown bucket: {}", trigger.bucket))?;
    log::info!(
        "ingesting {}/{} as {origin} export",
        trigger.bucket,
        trigger.key
    );

    let raw = config.object_store().fetch(&trigger.bucket, &trigger.key)?;

    let meta = RunMetadata {
        file_id: file_id_from_key(&trigger.key),
        origin_bucket: trigger.bucket.clone(),
        ingested_at: chrono::Utc::now(),
    };

    let snapshot = SnapshotStore::new(&config.snapshot_path(), config.missing_snapshot_policy());
    let mut seen = snapshot.load()?;

    let mut sink = JsonlQueue::new(&config.work_queue_path());
    let summary = pipeline::run(&raw, origin, &meta, &mut seen, &mut sink)?;

    StatusStore::new(&config.status_dir())?.upsert(&FileStatus::from_summary(&summary))?;

    // Persist the grown id set; an unchanged set needs no write.
    if summary.new_videos_added > 0 {
        snapshot.save(&seen)?;
    }

    // Best-effort: a notify failure never fails the run.
    let notify = FifoNotify::new(&config.notify_queue_path());
    let token = format!("{}_{}", meta.file_id, meta.ingested_at.timestamp());
    if let Err(e) = notify.forward(&meta.file_id, &token, &trigger.body) {
        log::error!("failed to forward trigger to notify queue: {e}");
    }

    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Field").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec!["File id".to_string(), summary.file_id.clone()]);
    table.add_row(vec!["Origin bucket".to_string(), summary.origin_bucket.clone()]);
    table.add_row(vec![
        "Ingested at".to_string(),
        summary.ingested_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    table.add_row(vec![
        "Unique in file".to_string(),
        summary.unique_in_file.to_string(),
    ]);
    table.add_row(vec![
        "New videos added".to_string(),
        summary.new_videos_added.to_string(),
    ]);
    table.add_row(vec![
        "Duplicates not added".to_string(),
        summary.duplicates_not_added.to_string(),
    ]);
    table.add_row(vec![
        "Messages sent".to_string(),
        summary.messages_sent.to_string(),
    ]);
    table.add_row(vec![
        "Id set size".to_string(),
        format!(
            "{} -> {}",
            summary.num_videos_before, summary.num_videos_after
        ),
    ]);

    println!("{table}");
}
