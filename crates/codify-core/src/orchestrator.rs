//! Generation state machine.
//!
//! Drives target validation, key table generation and routine assembly for a
//! single type, collecting diagnostics along the way.

use crate::assemble::{DecodeRoutine, EncodeRoutine, assemble};
use crate::config::GeneratorConfig;
use crate::diagnostic::{
    Diagnostic, DiagnosticKind, DiagnosticSink, DiagnosticTarget, NullSink, Severity,
};
use crate::key_table::{self, KeyTable};
use crate::model::{RecordKind, TypeDecl};
use serde::{Deserialize, Serialize};

/// Generation states
///
/// State transitions:
/// ```text
/// Start → ValidatedTarget → KeyTableBuilt → PlansAssembled → Done
///   Any non-terminal state → Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    #[default]
    Start,
    /// The target is a struct eligible for generation
    ValidatedTarget,
    /// The key table was generated or an existing one was adopted
    KeyTableBuilt,
    PlansAssembled,
    Done,
    Failed,
}

impl GenerationState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: GenerationState) -> bool {
        use GenerationState::*;
        matches!(
            (self, target),
            (Start, ValidatedTarget)
                | (ValidatedTarget, KeyTableBuilt)
                | (KeyTableBuilt, PlansAssembled)
                | (PlansAssembled, Done)
                | (Start, Failed)
                | (ValidatedTarget, Failed)
                | (KeyTableBuilt, Failed)
                | (PlansAssembled, Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Done | GenerationState::Failed)
    }
}

impl std::fmt::Display for GenerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationState::Start => write!(f, "Start"),
            GenerationState::ValidatedTarget => write!(f, "ValidatedTarget"),
            GenerationState::KeyTableBuilt => write!(f, "KeyTableBuilt"),
            GenerationState::PlansAssembled => write!(f, "PlansAssembled"),
            GenerationState::Done => write!(f, "Done"),
            GenerationState::Failed => write!(f, "Failed"),
        }
    }
}

/// Generated pieces; each is `None` when not produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub key_table: Option<KeyTable>,
    pub decode: Option<DecodeRoutine>,
    pub encode: Option<EncodeRoutine>,
}

impl Artifacts {
    pub fn is_empty(&self) -> bool {
        self.key_table.is_none() && self.decode.is_none() && self.encode.is_none()
    }
}

/// Result of one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub type_name: String,
    pub state: GenerationState,
    pub artifacts: Artifacts,
    /// Name of the key table the routines are bound to, generated or not
    pub key_table_name: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutcome {
    pub fn is_failed(&self) -> bool {
        self.state == GenerationState::Failed
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// Run generation for `decl`.
pub fn generate(decl: &TypeDecl, config: &GeneratorConfig) -> GenerationOutcome {
    generate_with_sink(decl, config, &NullSink)
}

/// Run generation for `decl`, reporting each diagnostic to `sink` as it is raised
pub fn generate_with_sink(
    decl: &TypeDecl,
    config: &GeneratorConfig,
    sink: &dyn DiagnosticSink,
) -> GenerationOutcome {
    let mut run = Generation::new(decl, config, sink);
    if run.execute().is_none() {
        tracing::debug!(type_name = %decl.name, diagnostics = run.diagnostics.len(), "generation aborted");
    }
    run.finish()
}

struct Generation<'a> {
    decl: &'a TypeDecl,
    config: &'a GeneratorConfig,
    sink: &'a dyn DiagnosticSink,
    state: GenerationState,
    artifacts: Artifacts,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Generation<'a> {
    fn new(decl: &'a TypeDecl, config: &'a GeneratorConfig, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            decl,
            config,
            sink,
            state: GenerationState::Start,
            artifacts: Artifacts::default(),
            diagnostics: Vec::new(),
        }
    }

    fn execute(&mut self) -> Option<()> {
        if !self.validate_target() {
            self.fail();
            return None;
        }
        self.advance(GenerationState::ValidatedTarget)?;

        let Some(table) = self.build_key_table() else {
            self.fail();
            return None;
        };
        self.advance(GenerationState::KeyTableBuilt)?;

        let assembly = assemble(self.decl, &table);
        self.report_all(assembly.diagnostics);
        self.artifacts.decode = assembly.decode;
        self.artifacts.encode = assembly.encode;
        self.advance(GenerationState::PlansAssembled)?;

        self.advance(GenerationState::Done)
    }

    fn validate_target(&mut self) -> bool {
        let decl = self.decl;

        if !decl.has_generation_annotation {
            let mut found = false;
            for annotation in decl.annotations.iter().filter(|a| a.is_type_level()) {
                found = true;
                self.report(Diagnostic::new(
                    DiagnosticKind::RequiresDerive {
                        attribute: annotation.attribute_name().to_string(),
                    },
                    DiagnosticTarget::type_annotation(annotation.attribute_name()),
                ));
            }
            for field in &decl.fields {
                for annotation in field.annotations.iter().filter(|a| a.is_key_related()) {
                    found = true;
                    self.report(Diagnostic::new(
                        DiagnosticKind::RequiresDerive {
                            attribute: annotation.attribute_name().to_string(),
                        },
                        DiagnosticTarget::field_annotation(&field.name, annotation.attribute_name()),
                    ));
                }
            }
            if !found {
                self.report(Diagnostic::on_type(DiagnosticKind::Internal {
                    detail: format!("`{}` does not request generation", decl.name),
                }));
            }
            return false;
        }

        match decl.kind {
            RecordKind::Struct | RecordKind::UnitStruct => {}
            RecordKind::TupleStruct => {
                self.report(Diagnostic::on_type(DiagnosticKind::NotAFlatRecord));
                return false;
            }
            RecordKind::Enum | RecordKind::Union => {
                self.report(Diagnostic::on_type(DiagnosticKind::NotAStruct));
                return false;
            }
        }

        let mut valid = true;
        for annotation in decl.annotations.iter().filter(|a| !a.is_type_level()) {
            valid = false;
            self.report(Diagnostic::new(
                DiagnosticKind::FieldOnly {
                    attribute: annotation.attribute_name().to_string(),
                },
                DiagnosticTarget::type_annotation(annotation.attribute_name()),
            ));
        }
        valid
    }

    fn build_key_table(&mut self) -> Option<KeyTable> {
        if self.decl.existing.key_table {
            tracing::debug!(
                type_name = %self.decl.name,
                "key table declared by hand, binding routines to it"
            );
            return Some(KeyTable::existing(self.decl, self.config));
        }

        match key_table::generate(self.decl, self.config) {
            Ok(report) => {
                self.report_all(report.diagnostics);
                self.artifacts.key_table = Some(report.table.clone());
                Some(report.table)
            }
            Err(err) => {
                tracing::debug!(type_name = %self.decl.name, error = %err, "key table generation failed");
                self.report_all(err.into_diagnostics());
                None
            }
        }
    }

    fn advance(&mut self, next: GenerationState) -> Option<()> {
        if !self.state.can_transition_to(next) {
            self.report(Diagnostic::on_type(DiagnosticKind::Internal {
                detail: format!("invalid generation transition {} -> {next}", self.state),
            }));
            self.fail();
            return None;
        }
        tracing::debug!(type_name = %self.decl.name, from = %self.state, to = %next, "generation state");
        self.state = next;
        Some(())
    }

    fn fail(&mut self) {
        tracing::debug!(type_name = %self.decl.name, from = %self.state, "generation failed");
        self.state = GenerationState::Failed;
        self.artifacts = Artifacts::default();
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.sink.report(&self.decl.name, &diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn report_all(&mut self, diagnostics: Vec<Diagnostic>) {
        for diagnostic in diagnostics {
            self.report(diagnostic);
        }
    }

    fn finish(self) -> GenerationOutcome {
        GenerationOutcome {
            type_name: self.decl.name.clone(),
            state: self.state,
            artifacts: self.artifacts,
            key_table_name: self.config.key_table_name(&self.decl.name),
            diagnostics: self.diagnostics,
        }
    }
}
