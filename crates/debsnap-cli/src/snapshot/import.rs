//! Import command - create a snapshot from a Packages index.

use anyhow::{Context, Result};
use clap::Args;
use debsnap_core::{parse_control_file, PackageRepository, PackageSet, SnapshotAssembler};
use std::path::PathBuf;
use std::sync::Arc;

use crate::App;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Name of the snapshot to create
    pub name: String,

    /// Debian `Packages` file to read
    pub file: PathBuf,
}

pub fn execute(args: ImportArgs, app: &mut App) -> Result<i32> {
    let mut store = app.open_store()?;

    let spinner = app.progress.create_spinner(&format!("Reading {}", args.file.display()));
    let packages = parse_control_file(&args.file)
        .with_context(|| format!("unable to read packages from {}", args.file.display()))?;
    spinner.finish_and_clear();

    app.output.writeln(&format!("Importing {} packages...", packages.len()));
    store.store(&packages).context("unable to store packages")?;

    let set = PackageSet::from_packages(packages.into_iter().map(Arc::new));
    let description = format!("Imported from {}", args.file.display());
    let snapshot = SnapshotAssembler::new(&mut store)
        .import(&args.name, &set, &description)
        .context("unable to create snapshot")?;

    app.output.success(&format!("Snapshot {} successfully created.", snapshot.name));
    Ok(0)
}
