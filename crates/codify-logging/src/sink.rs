//! Diagnostic sinks

use codify_core::diagnostic::{Diagnostic, DiagnosticSink, Severity};
use parking_lot::Mutex;

/// Forwards each diagnostic as a `tracing` event.
///
/// Errors are logged at `ERROR`, warnings at `WARN`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, type_name: &str, diagnostic: &Diagnostic) {
        let message = diagnostic.message();
        match diagnostic.severity {
            Severity::Error => tracing::error!(
                type_name,
                code = diagnostic.code(),
                node = %diagnostic.target,
                "{message}"
            ),
            Severity::Warning => tracing::warn!(
                type_name,
                code = diagnostic.code(),
                node = %diagnostic.target,
                "{message}"
            ),
        }
    }
}

/// Buffers diagnostics in report order
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<(String, Diagnostic)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything collected so far
    pub fn drain(&self) -> Vec<(String, Diagnostic)> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.lock().iter().any(|(_, d)| d.is_error())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, type_name: &str, diagnostic: &Diagnostic) {
        self.entries
            .lock()
            .push((type_name.to_string(), diagnostic.clone()));
    }
}
