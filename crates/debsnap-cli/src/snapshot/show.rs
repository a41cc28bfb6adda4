//! Show command - display snapshot details.

use anyhow::{Context, Result};
use clap::Args;
use debsnap_core::SnapshotRegistry;

use crate::App;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Snapshot to show
    pub name: String,

    /// List the packages of the snapshot
    #[arg(long)]
    pub with_packages: bool,

    /// Print the snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ShowArgs, app: &mut App) -> Result<i32> {
    let store = app.open_store()?;
    let snapshot = store.by_name(&args.name).context("unable to show")?;

    if args.json {
        app.output.set_json_mode(true);
        app.output.json(&snapshot)?;
        return Ok(0);
    }

    let output = &app.output;
    output.field("Name", &snapshot.name);
    output.field("UUID", &snapshot.uuid);
    output.field("Created At", &snapshot.created_at.format("%Y-%m-%d %H:%M:%S %Z").to_string());
    output.field("Description", &snapshot.description);
    output.field("Source Kind", &snapshot.source_kind.to_string());
    output.field("Number of packages", &snapshot.len().to_string());

    if !snapshot.source_ids.is_empty() {
        output.field("Sources", "");
        for uuid in &snapshot.source_ids {
            output.list_item("-", uuid);
        }
    }

    if args.with_packages {
        output.field("Packages", "");
        for key in &snapshot.refs {
            output.list_item("-", key.as_str());
        }
    }

    Ok(0)
}
