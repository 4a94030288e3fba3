//! `watchline status` - inspect per-file status records

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use watchline_store::{FileStatus, StatusStore};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show a single file id (default: list all)
    pub file_id: Option<String>,
}

pub fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let store = StatusStore::new(&config.status_dir())?;

    let records = match args.file_id {
        Some(id) => vec![store.get(&id)?],
        None => store.list()?,
    };

    if records.is_empty() {
        eprintln!("No status records.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("File").fg(Color::Cyan),
            Cell::new("Origin").fg(Color::Cyan),
            Cell::new("First run").fg(Color::Cyan),
            Cell::new("Unique").fg(Color::Cyan),
            Cell::new("Added").fg(Color::Cyan),
            Cell::new("Dup").fg(Color::Cyan),
            Cell::new("Sent").fg(Color::Cyan),
            Cell::new("Done").fg(Color::Cyan),
        ]);

    for record in &records {
        table.add_row(status_row(record));
    }
    println!("{table}");
    Ok(())
}

fn status_row(record: &FileStatus) -> Vec<Cell> {
    let done = match &record.last_processed_at {
        Some(at) => Cell::new(at).fg(Color::Green),
        None => Cell::new("-").fg(Color::DarkGrey),
    };
    vec![
        Cell::new(&record.file_id),
        Cell::new(&record.file_origin),
        Cell::new(&record.first_processed_at),
        Cell::new(&record.num_videos_file_unique),
        Cell::new(&record.num_videos_total_added),
        Cell::new(&record.num_videos_total_duplicate),
        Cell::new(&record.messages_sent),
        done,
    ]
}
