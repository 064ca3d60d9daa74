//! Decode/encode routine assembly.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::key_table::KeyTable;
use crate::model::TypeDecl;
use crate::plan::{EncodeStrategy, FieldPlan, build_plan};

/// Binds one field through one key-table case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeStatement {
    pub field_name: String,
    pub plan: FieldPlan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeStatement {
    pub field_name: String,
    pub strategy: EncodeStrategy,
}

/// The body of a generated decode routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeRoutine {
    /// Key table the container is scoped by
    pub key_table: String,
    pub statements: Vec<DecodeStatement>,
}

impl DecodeRoutine {
    pub fn statement(&self, field_name: &str) -> Option<&DecodeStatement> {
        self.statements.iter().find(|s| s.field_name == field_name)
    }
}

/// The body of a generated encode routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRoutine {
    pub key_table: String,
    pub statements: Vec<EncodeStatement>,
}

/// Routines produced for a type; `None` where the host wrote its own
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub decode: Option<DecodeRoutine>,
    pub encode: Option<EncodeRoutine>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Walk the key table and build one decode and one encode statement per entry.
///
/// A field whose plan cannot be built keeps its encode statement but gets no
/// decode statement; its siblings are unaffected.
pub fn assemble(decl: &TypeDecl, table: &KeyTable) -> Assembly {
    let mut decode = Vec::new();
    let mut encode = Vec::new();
    let mut diagnostics = Vec::new();

    for entry in &table.entries {
        let Some(field) = decl.fields.iter().find(|f| f.name == entry.field_name) else {
            diagnostics.push(Diagnostic::on_type(DiagnosticKind::Internal {
                detail: format!(
                    "key table `{}` names unknown field `{}`",
                    table.name, entry.field_name
                ),
            }));
            continue;
        };

        if !decl.existing.decode {
            match build_plan(field) {
                Ok(plan) => {
                    tracing::trace!(field = %field.name, plan = plan.label(), "decode plan");
                    decode.push(DecodeStatement {
                        field_name: field.name.clone(),
                        plan,
                    });
                }
                Err(diagnostic) => diagnostics.push(diagnostic),
            }
        }

        encode.push(EncodeStatement {
            field_name: field.name.clone(),
            strategy: if field.is_optional() {
                EncodeStrategy::IfPresent
            } else {
                EncodeStrategy::Always
            },
        });
    }

    Assembly {
        decode: (!decl.existing.decode).then(|| DecodeRoutine {
            key_table: table.name.clone(),
            statements: decode,
        }),
        encode: (!decl.existing.encode).then(|| EncodeRoutine {
            key_table: table.name.clone(),
            statements: encode,
        }),
        diagnostics,
    }
}
