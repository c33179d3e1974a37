//! Diagnostic collaborator.
//!
//! Receives every mode change plus warnings and errors raised while
//! navigating. Diagnostics never influence control flow.

use crate::mode::Mode;
use std::cell::RefCell;
use std::rc::Rc;

/// Sink for navigation diagnostics.
pub trait NavDiagnostics {
    /// A node changed mode.
    fn mode_changed(&mut self, path: &str, mode: Mode);

    /// Recoverable misuse (e.g. polling readiness in the wrong mode).
    fn warning(&mut self, message: &str);

    /// Failed navigation or configuration problem.
    fn error(&mut self, message: &str);
}

/// Default sink: forwards to `tracing`.
///
/// Mode changes are only logged when `debug_logging` is set, since
/// they fire on every node of every navigation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics {
    pub debug_logging: bool,
}

impl TracingDiagnostics {
    pub fn new(debug_logging: bool) -> Self {
        Self { debug_logging }
    }
}

impl NavDiagnostics for TracingDiagnostics {
    fn mode_changed(&mut self, path: &str, mode: Mode) {
        if self.debug_logging {
            tracing::info!("{path} -> {mode}");
        }
    }

    fn warning(&mut self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&mut self, message: &str) {
        tracing::error!("{message}");
    }
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticRecord {
    ModeChanged { path: String, mode: Mode },
    Warning(String),
    Error(String),
}

/// Sink that keeps every record in a shared log.
///
/// Clones share the same log, so a host can hand one clone to the
/// manager and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    log: Rc<RefCell<Vec<DiagnosticRecord>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.log.borrow().clone()
    }

    /// Mode changes recorded for `path`, in order.
    pub fn modes_of(&self, path: &str) -> Vec<Mode> {
        self.log
            .borrow()
            .iter()
            .filter_map(|r| match r {
                DiagnosticRecord::ModeChanged { path: p, mode } if p == path => Some(*mode),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|r| match r {
                DiagnosticRecord::Warning(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|r| match r {
                DiagnosticRecord::Error(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl NavDiagnostics for RecordingDiagnostics {
    fn mode_changed(&mut self, path: &str, mode: Mode) {
        self.log.borrow_mut().push(DiagnosticRecord::ModeChanged {
            path: path.to_string(),
            mode,
        });
    }

    fn warning(&mut self, message: &str) {
        tracing::warn!("{message}");
        self.log
            .borrow_mut()
            .push(DiagnosticRecord::Warning(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        tracing::error!("{message}");
        self.log
            .borrow_mut()
            .push(DiagnosticRecord::Error(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_clones_share_log() {
        let recorder = RecordingDiagnostics::new();
        let mut sink = recorder.clone();

        sink.mode_changed("root", Mode::Loading);
        sink.mode_changed("root/a", Mode::Loading);
        sink.mode_changed("root", Mode::Active);
        sink.warning("careful");
        sink.error("broken");

        assert_eq!(recorder.modes_of("root"), vec![Mode::Loading, Mode::Active]);
        assert_eq!(recorder.modes_of("root/a"), vec![Mode::Loading]);
        assert_eq!(recorder.warnings(), vec!["careful".to_string()]);
        assert_eq!(recorder.errors(), vec!["broken".to_string()]);
        assert_eq!(recorder.records().len(), 5);

        recorder.clear();
        assert!(recorder.records().is_empty());
    }

    #[test]
    fn tracing_sink_accepts_everything() {
        let mut sink = TracingDiagnostics::new(true);
        sink.mode_changed("root", Mode::Active);
        sink.warning("w");
        sink.error("e");
    }
}
