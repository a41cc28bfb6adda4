mod output;
mod progress;
mod snapshot;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use debsnap_core::config::Config;
use debsnap_core::FileStore;
use env_logger::Env;
use std::path::PathBuf;
use std::process::ExitCode;

use output::{Output, Verbosity};
use progress::ProgressManager;

#[derive(Parser, Debug)]
#[command(name = "debsnap")]
#[command(about = "Manage snapshots of Debian package repositories")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Root directory of the snapshot store
    #[arg(long, global = true, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Config file to use instead of the default one
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Architectures to process (comma-separated)
    #[arg(long, global = true, value_delimiter = ',', value_name = "ARCHS")]
    architectures: Vec<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Snapshot commands (pull, import, show)
    Snapshot {
        #[command(subcommand)]
        command: snapshot::SnapshotCommands,
    },
}

/// Everything a command needs besides its own arguments
pub struct App {
    pub config: Config,
    pub output: Output,
    pub progress: ProgressManager,
}

impl App {
    /// Open the snapshot store under the configured root
    pub fn open_store(&self) -> Result<FileStore> {
        let root = self.config.get_root_dir();
        FileStore::open(&root).with_context(|| format!("unable to open store at {}", root.display()))
    }
}

fn log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(log_level(cli.quiet, cli.verbose)))
        .format_timestamp(None)
        .init();

    let mut config = Config::build(cli.config.as_deref(), true).context("unable to load configuration")?;
    config.apply_command_line(cli.root.clone(), &cli.architectures);

    let output = Output::new(Verbosity::from_flags(cli.quiet, cli.verbose));
    let progress = ProgressManager::new(output.is_interactive());
    let mut app = App {
        config,
        output,
        progress,
    };

    match cli.command {
        Commands::Snapshot { command } => snapshot::execute(command, &mut app),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("{} {}", console::style("Error:").red().bold(), e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pull() {
        let cli = Cli::try_parse_from([
            "debsnap",
            "--architectures",
            "amd64,i386",
            "snapshot",
            "pull",
            "stable",
            "backports",
            "stable-nginx",
            "nginx (>= 1.26)",
            "libssl3",
            "--no-remove",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.architectures, vec!["amd64", "i386"]);
        match cli.command {
            Commands::Snapshot {
                command: snapshot::SnapshotCommands::Pull(args),
            } => {
                assert_eq!(args.name, "stable");
                assert_eq!(args.source, "backports");
                assert_eq!(args.destination, "stable-nginx");
                assert_eq!(args.queries, vec!["nginx (>= 1.26)", "libssl3"]);
                assert!(args.no_remove);
                assert!(args.dry_run);
                assert!(!args.no_deps);
                assert!(!args.all_matches);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_pull_requires_query() {
        let result = Cli::try_parse_from(["debsnap", "snapshot", "pull", "a", "b", "c"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["debsnap", "snapshot", "show", "stable", "--root", "/srv/store", "-vv"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/srv/store")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["debsnap", "-q", "-v", "snapshot", "show", "stable"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(false, 0), "warn");
        assert_eq!(log_level(false, 1), "info");
        assert_eq!(log_level(false, 5), "trace");
        assert_eq!(log_level(true, 0), "error");
    }
}
