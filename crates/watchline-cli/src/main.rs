//! watchline - Watch-history export ingest pipeline
//!
//! Normalizes uploaded watch/interaction history exports, filters out
//! videos seen in any prior run, and queues the remainder as work
//! units for downstream processing.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;
mod event;

use config::Config;

#[derive(Parser)]
#[command(name = "watchline")]
#[command(about = "Watch-history export ingest pipeline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file path (default: ./watchline.toml or ~/.config/watchline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Process one uploaded export from a trigger event
    Ingest(cmd::ingest::IngestArgs),
    /// Show status records for processed files
    Status(cmd::status::StatusArgs),
    /// Manage the global video-id snapshot
    Snapshot(cmd::snapshot::SnapshotArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    watchline_core::init_logging(cli.quiet, cli.debug);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Ingest(args) => cmd::ingest::run(args, &config),
        Command::Status(args) => cmd::status::run(args, &config),
        Command::Snapshot(args) => cmd::snapshot::run(args, &config),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec![
                "Data directory".to_string(),
                config.data.dir.display().to_string(),
            ]);
            table.add_row(vec![
                "Full-export bucket".to_string(),
                format!(
                    "{} ({})",
                    config.buckets.full.name,
                    config.buckets.full.dir.display()
                ),
            ]);
            table.add_row(vec![
                "Light-export bucket".to_string(),
                format!(
                    "{} ({})",
                    config.buckets.light.name,
                    config.buckets.light.dir.display()
                ),
            ]);
            table.add_row(vec![
                "Id snapshot".to_string(),
                config.snapshot_path().display().to_string(),
            ]);
            table.add_row(vec![
                "Bootstrap empty snapshot".to_string(),
                config.snapshot.bootstrap_empty.to_string(),
            ]);
            table.add_row(vec![
                "Work queue".to_string(),
                config.work_queue_path().display().to_string(),
            ]);
            table.add_row(vec![
                "Notify queue".to_string(),
                config.notify_queue_path().display().to_string(),
            ]);

            println!("{table}");
            Ok(())
        }
    }
}
