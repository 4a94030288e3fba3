//! `watchline snapshot` - manage the global video-id snapshot

use anyhow::Result;
use clap::{Args, Subcommand};

use watchline_core::SeenIds;
use watchline_store::SnapshotStore;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub action: SnapshotAction,
}

#[derive(Subcommand, Debug)]
pub enum SnapshotAction {
    /// Create an empty id snapshot (manual bootstrap for first use)
    Init {
        /// Overwrite an existing snapshot
        #[arg(long)]
        force: bool,
    },
    /// Show id count and snapshot location
    Stats,
}

pub fn run(args: SnapshotArgs, config: &Config) -> Result<()> {
    let store = SnapshotStore::new(&config.snapshot_path(), config.missing_snapshot_policy());

    match args.action {
        SnapshotAction::Init { force } => {
            if store.exists() && !force {
                anyhow::bail!(
                    "snapshot already exists at {} (use --force to overwrite)",
                    store.path().display()
                );
            }
            store.save(&SeenIds::new())?;
            eprintln!("Initialized empty snapshot at {}", store.path().display());
            Ok(())
        }
        SnapshotAction::Stats => {
            if !store.exists() {
                eprintln!("No snapshot at {}", store.path().display());
                return Ok(());
            }
            let seen = store.load()?;
            eprintln!(
                "{} ids in snapshot at {}",
                seen.len(),
                store.path().display()
            );
            Ok(())
        }
    }
}
