//! Per-field decode/encode strategy selection.

use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticTarget};
use crate::model::{Annotation, FieldDecl, TypeDescriptor};

/// How a field is read from its keyed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPlan {
    /// `decode`, fails when the key is absent
    Direct,
    /// `decode_if_present`, absent stays `None`
    OptionalDirect,
    /// `decode_if_present`, falling back to `expr`
    Defaulted { expr: String, optional: bool },
    /// Elements decoded as optional, nulls dropped
    NullFilteredArray { element: TypeDescriptor, optional: bool },
    /// Like the array form; duplicates collapse
    NullFilteredSet { element: TypeDescriptor, optional: bool },
    /// Entries whose value is null are dropped
    NullFilteredMap {
        key: TypeDescriptor,
        value: TypeDescriptor,
        optional: bool,
    },
    /// Scalars coerced to their string form
    LosslessScalar { optional: bool },
}

/// How a field is written to its keyed container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStrategy {
    /// `encode`
    Always,
    /// `encode_if_present`, key omitted when the value is absent
    IfPresent,
}

impl FieldPlan {
    pub fn is_optional(&self) -> bool {
        match self {
            FieldPlan::Direct => false,
            FieldPlan::OptionalDirect => true,
            FieldPlan::Defaulted { optional, .. }
            | FieldPlan::NullFilteredArray { optional, .. }
            | FieldPlan::NullFilteredSet { optional, .. }
            | FieldPlan::NullFilteredMap { optional, .. }
            | FieldPlan::LosslessScalar { optional } => *optional,
        }
    }

    pub fn encode_strategy(&self) -> EncodeStrategy {
        if self.is_optional() {
            EncodeStrategy::IfPresent
        } else {
            EncodeStrategy::Always
        }
    }

    /// Short name for logs and CLI output
    pub fn label(&self) -> &'static str {
        match self {
            FieldPlan::Direct => "direct",
            FieldPlan::OptionalDirect => "optional",
            FieldPlan::Defaulted { .. } => "defaulted",
            FieldPlan::NullFilteredArray { .. } => "null-filtered-array",
            FieldPlan::NullFilteredSet { .. } => "null-filtered-set",
            FieldPlan::NullFilteredMap { .. } => "null-filtered-map",
            FieldPlan::LosslessScalar { .. } => "lossless",
        }
    }
}

/// Select the plan for `field`. First match wins:
///
/// 1. `Lossless`
/// 2. `SkipNull` on an array, set or map
/// 3. an initializer or `DefaultValue(expr)`
/// 4. an optional type
/// 5. direct
///
/// A `DefaultValue` without an expression is an error for this field only.
pub fn build_plan(field: &FieldDecl) -> Result<FieldPlan, Diagnostic> {
    if field.has(|a| matches!(a, Annotation::DefaultValue(None))) {
        return Err(Diagnostic::new(
            DiagnosticKind::MissingDefaultValue {
                field: field.name.clone(),
            },
            DiagnosticTarget::field_annotation(&field.name, "default"),
        ));
    }

    let optional = field.is_optional();

    if field.has(|a| matches!(a, Annotation::Lossless)) {
        return Ok(FieldPlan::LosslessScalar { optional });
    }

    if field.has(|a| matches!(a, Annotation::SkipNull)) {
        match field.declared_type.unwrap_optional() {
            TypeDescriptor::ArrayOf(element) => {
                return Ok(FieldPlan::NullFilteredArray {
                    element: (**element).clone(),
                    optional,
                });
            }
            TypeDescriptor::SetOf { element, .. } => {
                return Ok(FieldPlan::NullFilteredSet {
                    element: (**element).clone(),
                    optional,
                });
            }
            TypeDescriptor::MapOf { key, value, .. } => {
                return Ok(FieldPlan::NullFilteredMap {
                    key: (**key).clone(),
                    value: (**value).clone(),
                    optional,
                });
            }
            _ => {}
        }
    }

    let explicit_default = field.annotations.iter().find_map(|a| match a {
        Annotation::DefaultValue(Some(expr)) => Some(expr),
        _ => None,
    });
    if let Some(expr) = field.initializer.as_ref().or(explicit_default) {
        return Ok(FieldPlan::Defaulted {
            expr: expr.clone(),
            optional,
        });
    }

    if optional {
        Ok(FieldPlan::OptionalDirect)
    } else {
        Ok(FieldPlan::Direct)
    }
}
