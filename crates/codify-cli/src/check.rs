//! `codify check`

use crate::source::{self, SourceFile};
use anyhow::Result;
use codify_core::config::GeneratorConfig;
use codify_core::diagnostic::{Diagnostic, DiagnosticSink, Severity};
use codify_core::orchestrator;
use codify_logging::CollectingSink;
use std::fmt;
use std::path::Path;

/// A diagnostic located in a source file
#[derive(Debug, Clone)]
pub struct Finding {
    pub file: String,
    /// Type or item the diagnostic belongs to
    pub item: String,
    pub diagnostic: Diagnostic,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {} ({}): {}",
            self.file,
            self.item,
            self.diagnostic.severity,
            self.diagnostic.target,
            self.diagnostic
        )
    }
}

/// Check every codify type in `input` and print findings.
///
/// Returns `false` when any finding is an error.
pub fn run(input: &str, config: &GeneratorConfig) -> Result<bool> {
    let source = source::parse_source_file(Path::new(input))?;
    let findings = check_source(&source, config);

    for finding in &findings {
        println!("{finding}");
    }

    let errors = count(&findings, Severity::Error);
    let warnings = count(&findings, Severity::Warning);
    println!(
        "\nChecked {} type(s): {} error(s), {} warning(s)",
        source.types.len(),
        errors,
        warnings
    );

    Ok(errors == 0)
}

/// Run the generator over each type in `source` and collect diagnostics in report order
pub fn check_source(source: &SourceFile, config: &GeneratorConfig) -> Vec<Finding> {
    let sink = CollectingSink::new();

    for ty in &source.types {
        let lowered = source.lower(ty, config);
        let name = lowered.parsed.decl.name.clone();

        for spanned in &lowered.parsed.diagnostics {
            sink.report(&name, &spanned.diagnostic);
        }
        if let Some(conflict) = &lowered.conflict {
            sink.report(&name, conflict);
        }
        if lowered.blocks_generation() {
            tracing::debug!(type_name = %name, "front-end errors, generator not run");
            continue;
        }

        let outcome = orchestrator::generate_with_sink(&lowered.parsed.decl, config, &sink);
        tracing::info!(type_name = %name, state = %outcome.state, "checked");
    }

    for misplaced in &source.misplaced {
        sink.report(&misplaced.item, &misplaced.diagnostic);
    }

    let file = source.path.display().to_string();
    sink.drain()
        .into_iter()
        .map(|(item, diagnostic)| Finding {
            file: file.clone(),
            item,
            diagnostic,
        })
        .collect()
}

/// Count findings of one severity
pub fn count(findings: &[Finding], severity: Severity) -> usize {
    findings
        .iter()
        .filter(|f| f.diagnostic.severity == severity)
        .count()
}
