//! Snapshot subcommands.

mod import;
mod pull;
mod show;

use anyhow::Result;
use clap::Subcommand;

pub use import::ImportArgs;
pub use pull::PullArgs;
pub use show::ShowArgs;

use crate::App;

/// Snapshot subcommands
#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// Pull packages and their dependencies from one snapshot into a copy of another
    Pull(PullArgs),

    /// Create a snapshot from a Debian Packages index file
    Import(ImportArgs),

    /// Show snapshot details
    Show(ShowArgs),
}

/// Execute a snapshot command
pub fn execute(command: SnapshotCommands, app: &mut App) -> Result<i32> {
    match command {
        SnapshotCommands::Pull(args) => pull::execute(args, app),
        SnapshotCommands::Import(args) => import::execute(args, app),
        SnapshotCommands::Show(args) => show::execute(args, app),
    }
}
