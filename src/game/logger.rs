//! Decision diagnostics logger
//!
//! Failures never abort a decision cycle, so the trail of what degraded
//! and why has to live somewhere. Entries carry a category tag and can be
//! captured in memory for inspection instead of printed.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};

/// How much to log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum VerbosityLevel {
    Silent,
    #[default]
    Normal,
    Verbose,
    Debug,
}

/// A log entry with owned strings
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub category: &'static str,
    pub message: String,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Print to stdout (default)
    #[default]
    Stdout,
    /// Capture only to the in-memory buffer
    Memory,
}

/// Logger used by the decision engine and searches.
///
/// Interior mutability lets search code log through a shared reference
/// while it borrows the rest of the engine immutably.
#[derive(Debug, Default)]
pub struct DecisionLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    buffer: RefCell<Vec<LogEntry>>,
}

impl DecisionLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        DecisionLogger {
            verbosity,
            ..Self::default()
        }
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Capture entries in memory instead of printing
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    /// Read access to captured entries
    pub fn entries(&self) -> Ref<'_, Vec<LogEntry>> {
        self.buffer.borrow()
    }

    pub fn clear(&self) {
        self.buffer.borrow_mut().clear();
    }

    fn emit(&self, level: VerbosityLevel, category: &'static str, message: &str) {
        if level > self.verbosity {
            return;
        }
        match self.output_mode {
            OutputMode::Stdout => println!("[{}] {}", category, message),
            OutputMode::Memory => self.buffer.borrow_mut().push(LogEntry {
                level,
                category,
                message: message.to_string(),
            }),
        }
    }

    /// The action chosen for a decision cycle
    pub fn decision(&self, message: &str) {
        self.emit(VerbosityLevel::Normal, "decision", message);
    }

    /// A degraded path was taken (search failed, ranking empty, ...)
    pub fn fallback(&self, message: &str) {
        self.emit(VerbosityLevel::Normal, "fallback", message);
    }

    /// Search internals (budgets, visit counts, pruning)
    pub fn search(&self, message: &str) {
        self.emit(VerbosityLevel::Verbose, "search", message);
    }

    /// Strategy reclassification and adaptation
    pub fn strategy(&self, message: &str) {
        self.emit(VerbosityLevel::Verbose, "strategy", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture() {
        let mut logger = DecisionLogger::new();
        logger.enable_capture();

        logger.decision("picked play of card 3");
        logger.fallback("mcts failed: empty search");

        let entries = logger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, "decision");
        assert_eq!(entries[1].category, "fallback");
    }

    #[test]
    fn test_verbosity_gate() {
        let mut logger = DecisionLogger::with_verbosity(VerbosityLevel::Normal);
        logger.enable_capture();

        logger.search("this is verbose-only");
        assert!(logger.entries().is_empty());

        let mut logger = DecisionLogger::with_verbosity(VerbosityLevel::Verbose);
        logger.enable_capture();
        logger.search("now visible");
        assert_eq!(logger.entries().len(), 1);
    }

    #[test]
    fn test_silent() {
        let mut logger = DecisionLogger::with_verbosity(VerbosityLevel::Silent);
        logger.enable_capture();
        logger.decision("nothing should land");
        assert!(logger.entries().is_empty());
    }
}
