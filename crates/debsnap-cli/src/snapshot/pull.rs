//! Pull command - pull packages and their dependencies into a new snapshot.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use debsnap_core::{
    load_package_set, pull_description, resolve_architectures, Dependency, DiagnosticSink, LogSink, PullEvent,
    PullOptions, Puller, SnapshotAssembler, SnapshotRegistry,
};

use crate::App;

#[derive(Args, Debug)]
pub struct PullArgs {
    /// Snapshot to pull into
    pub name: String,

    /// Snapshot to take packages from
    pub source: String,

    /// Name of the snapshot to create
    pub destination: String,

    /// Packages to pull, e.g. `nginx` or `nginx (>= 1.26)`
    #[arg(required = true, value_name = "PACKAGE-QUERY")]
    pub queries: Vec<String>,

    /// Show what would be pulled without creating the snapshot
    #[arg(long)]
    pub dry_run: bool,

    /// Don't pull dependencies of the requested packages
    #[arg(long)]
    pub no_deps: bool,

    /// Keep older versions of pulled packages
    #[arg(long)]
    pub no_remove: bool,

    /// Pull every matching version, not only the latest
    #[arg(long)]
    pub all_matches: bool,

    /// Fail instead of creating a partial snapshot when a dependency can't be satisfied
    #[arg(long)]
    pub strict: bool,

    /// Stop resolving an architecture after this many dependencies
    #[arg(long, value_name = "N")]
    pub max_iterations: Option<usize>,
}

pub fn execute(args: PullArgs, app: &mut App) -> Result<i32> {
    let initial = args
        .queries
        .iter()
        .map(|query| Dependency::parse(query))
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("unable to parse argument")?;

    let mut store = app.open_store()?;

    let snapshot = store.by_name(&args.name).context("unable to pull")?;
    let source = store.by_name(&args.source).context("unable to pull")?;

    let output = &app.output;
    output.writeln(&format!(
        "Dependencies would be pulled into snapshot:\n    {}\nfrom snapshot:\n    {}\nand result would be saved as new snapshot {}.",
        snapshot, source, args.destination
    ));

    output.writeln(&format!("Loading packages ({})...", snapshot.len() + source.len()));
    let spinner = app.progress.create_spinner("Loading packages");
    let mut package_set = load_package_set(&store, &snapshot).context("unable to load packages")?;
    let source_set = load_package_set(&store, &source).context("unable to load packages")?;
    spinner.finish_and_clear();

    output.writeln("Building indexes...");
    package_set.prepare_index();
    source_set.prepare_index();

    let architectures = resolve_architectures(&app.config.architectures, &package_set).context("unable to pull")?;
    output.verbose(&format!("Architectures: {}", architectures.join(", ")));

    let mut options = PullOptions::new()
        .no_deps(args.no_deps)
        .no_remove(args.no_remove)
        .all_matches(args.all_matches)
        .dependency_options(app.config.dependency_options());
    if let Some(limit) = args.max_iterations {
        options = options.max_iterations(limit);
    }

    let mut log_sink = LogSink;
    let mut sink = |event: &PullEvent| {
        log_sink.emit(event);
        output.event(event);
    };
    let report = Puller::new(options)
        .with_source_name(&source.name)
        .pull(&mut package_set, &source_set, &initial, &architectures, &mut sink)
        .context("unable to pull")?;

    output.verbose(&format!(
        "{} added, {} removed, {} unsatisfied, {} verification errors",
        report.added.len(),
        report.removed.len(),
        report.unsatisfied.len(),
        report.errors.len()
    ));
    if args.strict {
        report.ensure_complete().context("unable to pull")?;
    } else if !report.is_complete() {
        output.warning("Some dependencies could not be satisfied, the result is a partial pull.");
    }

    if args.dry_run {
        output.writeln(&format!("\n{}", style("Not creating snapshot, as dry run was requested.").yellow()));
        return Ok(0);
    }

    let description = pull_description(&snapshot.name, &source.name, &args.queries);
    let created = SnapshotAssembler::new(&mut store)
        .assemble(&args.destination, &[&snapshot, &source], &package_set, &description)
        .context("unable to create snapshot")?;

    output.success(&format!("\nSnapshot {} successfully created.", created.name));
    Ok(0)
}
