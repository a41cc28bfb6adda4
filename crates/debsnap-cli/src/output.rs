//! Console output for the CLI.

use console::{style, Term};
use debsnap_core::PullEvent;
use std::io::Write;

/// Verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Debug,
}

impl Verbosity {
    /// Map `-q` and the number of `-v` flags to a level
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Verbosity::Quiet;
        }
        match verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            2 => Verbosity::VeryVerbose,
            _ => Verbosity::Debug,
        }
    }
}

/// Output handler for CLI
pub struct Output {
    term: Term,
    verbosity: Verbosity,
    json_mode: bool,
}

impl Output {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            term: Term::stdout(),
            verbosity,
            json_mode: false,
        }
    }

    /// Enable JSON output mode
    pub fn set_json_mode(&mut self, json: bool) {
        self.json_mode = json;
    }

    fn should_output(&self, min_verbosity: Verbosity) -> bool {
        !self.json_mode && self.verbosity >= min_verbosity
    }

    /// Write a line
    pub fn writeln(&self, message: &str) {
        if self.should_output(Verbosity::Normal) {
            let _ = writeln!(&self.term, "{}", message);
        }
    }

    /// Write a success message
    pub fn success(&self, message: &str) {
        if self.should_output(Verbosity::Normal) {
            let _ = writeln!(&self.term, "{}", style(message).green());
        }
    }

    /// Write a warning message
    pub fn warning(&self, message: &str) {
        if self.should_output(Verbosity::Quiet) {
            let _ = writeln!(&self.term, "{} {}", style("Warning:").yellow().bold(), message);
        }
    }

    /// Write a verbose message
    pub fn verbose(&self, message: &str) {
        if self.should_output(Verbosity::Verbose) {
            let _ = writeln!(&self.term, "{}", style(message).dim());
        }
    }

    /// Write a labelled field (`Name: value`)
    pub fn field(&self, label: &str, value: &str) {
        if self.should_output(Verbosity::Normal) {
            let _ = writeln!(&self.term, "{} {}", style(format!("{}:", label)).bold(), value);
        }
    }

    /// Write a list item
    pub fn list_item(&self, prefix: &str, message: &str) {
        if self.should_output(Verbosity::Normal) {
            let _ = writeln!(&self.term, "  {} {}", style(prefix).green(), message);
        }
    }

    /// Write one pull diagnostic.
    ///
    /// Warnings stay visible in quiet mode; additions and removals do not.
    pub fn event(&self, event: &PullEvent) {
        let line = event.to_string();
        match event {
            PullEvent::Added { .. } => {
                if self.should_output(Verbosity::Normal) {
                    let rest = line.trim_start_matches("[+]");
                    let _ = writeln!(&self.term, "{}{}", style("[+]").green(), rest);
                }
            }
            PullEvent::Removed { .. } => {
                if self.should_output(Verbosity::Normal) {
                    let rest = line.trim_start_matches("[-]");
                    let _ = writeln!(&self.term, "{}{}", style("[-]").red(), rest);
                }
            }
            _ => {
                if self.should_output(Verbosity::Quiet) {
                    let rest = line.trim_start_matches("[!]");
                    let _ = writeln!(&self.term, "{}{}", style("[!]").yellow(), style(rest).bold());
                }
            }
        }
    }

    /// Write JSON output
    pub fn json<T: serde::Serialize>(&self, data: &T) -> anyhow::Result<()> {
        if self.json_mode {
            let json = serde_json::to_string_pretty(data)?;
            println!("{}", json);
        }
        Ok(())
    }

    /// Check if in quiet mode
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Check if in JSON mode
    pub fn is_json(&self) -> bool {
        self.json_mode
    }

    /// Whether progress bars may be drawn
    pub fn is_interactive(&self) -> bool {
        !self.is_quiet() && !self.json_mode && self.term.is_term()
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new(Verbosity::Normal)
    }
}
