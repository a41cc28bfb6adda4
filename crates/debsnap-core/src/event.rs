//! Diagnostic events emitted while pulling.
//!
//! The pull engine never fails on these; it reports them to a
//! [`DiagnosticSink`] and carries on.

use std::fmt;
use std::sync::Arc;

use crate::package::{Dependency, Package};

/// Kinds of pull diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Added,
    Removed,
    Unsatisfiable,
    VerificationFailed,
    IterationLimit,
}

/// A single diagnostic produced by the pull engine
#[derive(Debug, Clone, PartialEq)]
pub enum PullEvent {
    /// Package added to the destination
    Added { package: Arc<Package>, architecture: String },

    /// Package removed from the destination to make room for another version
    Removed { package: Arc<Package>, architecture: String },

    /// Nothing in the source satisfies the expression
    Unsatisfiable { dependency: Dependency, source: String },

    /// Relations of a package could not be verified
    VerificationFailed { package: String, message: String },

    /// The work list of an architecture hit the configured bound
    IterationLimit { architecture: String, limit: usize },
}

impl PullEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            PullEvent::Added { .. } => EventType::Added,
            PullEvent::Removed { .. } => EventType::Removed,
            PullEvent::Unsatisfiable { .. } => EventType::Unsatisfiable,
            PullEvent::VerificationFailed { .. } => EventType::VerificationFailed,
            PullEvent::IterationLimit { .. } => EventType::IterationLimit,
        }
    }

    /// Whether the event means part of the request was not honoured
    pub fn is_warning(&self) -> bool {
        !matches!(self, PullEvent::Added { .. } | PullEvent::Removed { .. })
    }
}

impl fmt::Display for PullEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PullEvent::Added { package, .. } => write!(f, "[+] {} added", package),
            PullEvent::Removed { package, .. } => write!(f, "[-] {} removed", package),
            PullEvent::Unsatisfiable { dependency, source } => {
                write!(f, "[!] Dependency {} can't be satisfied with source {}", dependency, source)
            }
            PullEvent::VerificationFailed { package, message } => {
                write!(f, "[!] Error while verifying dependencies for pkg {}: {}", package, message)
            }
            PullEvent::IterationLimit { architecture, limit } => {
                write!(f, "[!] Stopped resolving {} after {} dependencies", architecture, limit)
            }
        }
    }
}

/// Receiver of pull diagnostics
pub trait DiagnosticSink {
    fn emit(&mut self, event: &PullEvent);
}

impl<F> DiagnosticSink for F
where
    F: FnMut(&PullEvent),
{
    fn emit(&mut self, event: &PullEvent) {
        self(event)
    }
}

/// Sink that keeps every event in order
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Vec<PullEvent>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[PullEvent] {
        &self.events
    }

    pub fn count(&self, event_type: EventType) -> usize {
        self.events.iter().filter(|e| e.event_type() == event_type).count()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&mut self, event: &PullEvent) {
        self.events.push(event.clone());
    }
}

/// Sink forwarding events to the `log` facade: additions and removals at
/// debug, everything else at info
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    pub fn level(event: &PullEvent) -> log::Level {
        if event.is_warning() {
            log::Level::Info
        } else {
            log::Level::Debug
        }
    }
}

impl DiagnosticSink for LogSink {
    fn emit(&mut self, event: &PullEvent) {
        log::log!(Self::level(event), "{}", event);
    }
}
