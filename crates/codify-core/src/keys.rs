//! Wire-key resolution for a single field.

use crate::case::{self, CaseStyle};
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticTarget};
use crate::model::{Annotation, FieldDecl, TypeDefaults, first_literal};

/// A resolved key plus any advisories raised along the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub key: String,
    pub warnings: Vec<Diagnostic>,
}

/// Resolve the wire key of `field`.
///
/// Precedence:
/// 1. field `CustomKey`, used verbatim
/// 2. field `CaseStyle`
/// 3. type `CaseStyle`
/// 4. the field name
///
/// Prefix and suffix (field first, then type) wrap the result of 2-4 only.
pub fn resolve_key(field: &FieldDecl, defaults: &TypeDefaults) -> Result<ResolvedKey, Diagnostic> {
    let custom_keys: Vec<&String> = field
        .annotations
        .iter()
        .filter_map(|a| match a {
            Annotation::CustomKey(key) => Some(key),
            _ => None,
        })
        .collect();
    let case_styles: Vec<CaseStyle> = field
        .annotations
        .iter()
        .filter_map(|a| match a {
            Annotation::CaseStyle(style) => Some(*style),
            _ => None,
        })
        .collect();

    if custom_keys.len() > 1 {
        return Err(multiple(field, "rename"));
    }

    if let Some(key) = custom_keys.first() {
        if key.is_empty() {
            return Err(Diagnostic::new(
                DiagnosticKind::EmptyCustomKey,
                DiagnosticTarget::field_annotation(&field.name, "rename"),
            ));
        }
        let mut warnings = Vec::new();
        if !case_styles.is_empty() {
            warnings.push(Diagnostic::new(
                DiagnosticKind::CustomKeyShadowsCase,
                DiagnosticTarget::field_annotation(&field.name, "case"),
            ));
        }
        return Ok(ResolvedKey {
            key: (*key).clone(),
            warnings,
        });
    }

    if case_styles.len() > 1 {
        return Err(multiple(field, "case"));
    }

    let style = case_styles.first().copied().or(defaults.case_style);
    let base = match style {
        Some(style) => case::transform(&field.name, style),
        None => field.name.clone(),
    };

    let prefix = first_literal(&field.annotations, |a| match a {
        Annotation::KeyPrefix(p) => Some(p),
        _ => None,
    })
    .or_else(|| defaults.prefix.clone())
    .unwrap_or_default();
    let suffix = first_literal(&field.annotations, |a| match a {
        Annotation::KeySuffix(s) => Some(s),
        _ => None,
    })
    .or_else(|| defaults.suffix.clone())
    .unwrap_or_default();

    Ok(ResolvedKey {
        key: format!("{prefix}{base}{suffix}"),
        warnings: Vec::new(),
    })
}

fn multiple(field: &FieldDecl, attribute: &str) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::MultipleKeyAttributes {
            attribute: attribute.to_string(),
        },
        DiagnosticTarget::field_annotation(&field.name, attribute),
    )
}
