//! codify-core - Generation engine behind `#[derive(Codify)]`
//!
//! This crate turns a declaration model into:
//! - a key table mapping each stored field to its wire key ([`key_table`])
//! - per-field decode plans and encode strategies ([`plan`], [`assemble`])
//! - bilingual diagnostics for every misuse ([`diagnostic`])
//!
//! [`orchestrator`] sequences those stages for one type; [`syntax`] and
//! [`emit`] connect the engine to Rust source.

pub mod assemble;
pub mod case;
pub mod config;
pub mod diagnostic;
pub mod emit;
pub mod error;
pub mod key_table;
pub mod keys;
pub mod model;
pub mod orchestrator;
pub mod plan;
pub mod syntax;

pub use case::{CaseStyle, transform};
pub use config::GeneratorConfig;
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticSink, DiagnosticTarget, Severity};
pub use emit::{expand_derive, expand_derive_with_sink};
pub use error::{ConfigError, EmitError, KeyTableError};
pub use model::{Annotation, FieldDecl, RecordKind, TypeDecl, TypeDescriptor};
pub use orchestrator::{GenerationOutcome, GenerationState, generate, generate_with_sink};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::case::CaseStyle;
    pub use crate::config::GeneratorConfig;
    pub use crate::diagnostic::{Diagnostic, DiagnosticSink, Severity};
    pub use crate::model::{Annotation, FieldDecl, TypeDecl, TypeDescriptor};
    pub use crate::orchestrator::{GenerationOutcome, GenerationState, generate};
}
