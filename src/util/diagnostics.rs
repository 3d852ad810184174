// External crates
use log::Level;
use std::fmt;

/// Severity of a recorded diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    fn log_level(self) -> Level {
        match self {
            Severity::Info => Level::Info,
            Severity::Warning => Level::Warn,
            Severity::Error => Level::Error,
        }
    }
}

/// A single message emitted by a preparation stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: &'static str,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}: {}", self.severity, self.stage, self.message)
    }
}

/// Diagnostics collected over one preparation run
///
/// Passed explicitly into each stage instead of relying on a process-wide
/// logger. Every record is also forwarded to the `log` facade, using the
/// stage as target, so a host binary that installs a logger sees the same
/// messages.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    events: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, stage: &'static str, message: impl Into<String>) {
        self.record(Severity::Info, stage, message.into());
    }

    pub fn warn(&mut self, stage: &'static str, message: impl Into<String>) {
        self.record(Severity::Warning, stage, message.into());
    }

    pub fn error(&mut self, stage: &'static str, message: impl Into<String>) {
        self.record(Severity::Error, stage, message.into());
    }

    fn record(&mut self, severity: Severity, stage: &'static str, message: String) {
        log::log!(target: stage, severity.log_level(), "{}", message);
        self.events.push(Diagnostic {
            severity,
            stage,
            message,
        });
    }

    pub fn events(&self) -> &[Diagnostic] {
        &self.events
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.events.iter().filter(move |d| d.severity == severity)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
