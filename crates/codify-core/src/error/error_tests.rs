#![allow(non_snake_case)]

use super::*;
use crate::diagnostic::DiagnosticTarget;

#[test]
fn KeyTableError___already_exists___displays_name() {
    let err = KeyTableError::AlreadyExists {
        name: "UserCodingKeys".into(),
    };

    assert_eq!(err.to_string(), "key table `UserCodingKeys` already exists");
}

#[test]
fn KeyTableError___already_exists___converts_to_e004() {
    let err = KeyTableError::AlreadyExists {
        name: "UserCodingKeys".into(),
    };

    let diagnostics = err.into_diagnostics();

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), "E004");
    assert_eq!(diagnostics[0].target, DiagnosticTarget::Type);
}

#[test]
fn KeyTableError___conflict___passes_diagnostics_through() {
    let diagnostic = Diagnostic::new(DiagnosticKind::EmptyCustomKey, DiagnosticTarget::field("a"));
    let err = KeyTableError::Conflict(vec![diagnostic.clone()]);

    assert_eq!(err.to_string(), "conflicting key annotations (1 diagnostics)");
    assert_eq!(err.into_diagnostics(), vec![diagnostic]);
}

#[test]
fn EmitError___into_diagnostic___is_internal_e099() {
    let source = syn::parse_str::<syn::Expr>("1 +").unwrap_err();
    let err = EmitError::InvalidExpression {
        field: "count".into(),
        source,
    };

    let diagnostic: Diagnostic = err.into();

    assert_eq!(diagnostic.code(), "E099");
    assert!(diagnostic.message().contains("default value for `count`"));
}

#[test]
fn ConfigError___from_toml_error___converts_to_parse() {
    let toml_err = toml::from_str::<toml::Table>("=").unwrap_err();

    let err: ConfigError = toml_err.into();

    assert!(matches!(err, ConfigError::Parse(_)));
}
