//! Key table generation.

use crate::config::GeneratorConfig;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticTarget, Severity};
use crate::error::KeyTableError;
use crate::keys::resolve_key;
use crate::model::{Annotation, TypeDecl};

/// One case of the key table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTableEntry {
    pub field_name: String,
    pub wire_key: String,
}

/// Ordered field-to-wire-key mapping for a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTable {
    pub name: String,
    pub entries: Vec<KeyTableEntry>,
}

impl KeyTable {
    /// Stand-in for a table the host type declares by hand.
    ///
    /// Wire keys of a hand-written table are unknown to the engine, so each
    /// entry carries the case name in both positions.
    pub fn existing(decl: &TypeDecl, config: &GeneratorConfig) -> Self {
        Self {
            name: config.key_table_name(&decl.name),
            entries: decl
                .stored_fields()
                .map(|field| KeyTableEntry {
                    field_name: field.name.clone(),
                    wire_key: field.name.clone(),
                })
                .collect(),
        }
    }

    pub fn wire_key(&self, field_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.field_name == field_name)
            .map(|entry| entry.wire_key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A generated table plus the non-fatal diagnostics raised for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTableReport {
    pub table: KeyTable,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the key table for `decl`.
///
/// Fails with [`KeyTableError::AlreadyExists`] when the type declares its own
/// table and with [`KeyTableError::Conflict`] when any field's key cannot be
/// resolved. Computed fields carrying key annotations are reported and left
/// out without aborting.
pub fn generate(decl: &TypeDecl, config: &GeneratorConfig) -> Result<KeyTableReport, KeyTableError> {
    let name = config.key_table_name(&decl.name);
    if decl.existing.key_table {
        return Err(KeyTableError::AlreadyExists { name });
    }

    let type_cases = decl
        .annotations
        .iter()
        .filter(|a| matches!(a, Annotation::CaseStyle(_)))
        .count();
    if type_cases > 1 {
        return Err(KeyTableError::Conflict(vec![Diagnostic::new(
            DiagnosticKind::MultipleKeyAttributes {
                attribute: "case".to_string(),
            },
            DiagnosticTarget::type_annotation("case"),
        )]));
    }

    let defaults = decl.defaults();
    let mut entries = Vec::new();
    let mut diagnostics = Vec::new();
    let mut fatal = false;

    for field in &decl.fields {
        if field.is_computed {
            if field.has_key_annotations() {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::KeyOnComputedField,
                    DiagnosticTarget::field(&field.name),
                ));
            }
            continue;
        }

        match resolve_key(field, &defaults) {
            Ok(resolved) => {
                for warning in resolved.warnings {
                    let warning = warning.with_severity(config.advisory_severity);
                    fatal |= warning.severity == Severity::Error;
                    diagnostics.push(warning);
                }
                tracing::trace!(field = %field.name, key = %resolved.key, "resolved wire key");
                entries.push(KeyTableEntry {
                    field_name: field.name.clone(),
                    wire_key: resolved.key,
                });
            }
            Err(diagnostic) => {
                fatal = true;
                diagnostics.push(diagnostic);
            }
        }
    }

    if fatal {
        return Err(KeyTableError::Conflict(diagnostics));
    }

    Ok(KeyTableReport {
        table: KeyTable { name, entries },
        diagnostics,
    })
}
