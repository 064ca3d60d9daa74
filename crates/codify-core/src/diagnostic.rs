//! Bilingual diagnostics.
//!
//! Every diagnostic renders to a single line:
//!
//! ```text
//! [<CODE>] EN: <english> | ZH: <chinese>[ | HINT: <hint>]
//! ```
//!
//! Codes are stable and never renumbered.

use crate::case::CaseStyle;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a diagnostic affects generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The node a diagnostic is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticTarget {
    Type,
    Field(String),
    /// An annotation on a field, or on the type when `field` is `None`
    Annotation {
        field: Option<String>,
        attribute: String,
    },
}

impl DiagnosticTarget {
    pub fn field(name: impl Into<String>) -> Self {
        DiagnosticTarget::Field(name.into())
    }

    pub fn field_annotation(field: impl Into<String>, attribute: impl Into<String>) -> Self {
        DiagnosticTarget::Annotation {
            field: Some(field.into()),
            attribute: attribute.into(),
        }
    }

    pub fn type_annotation(attribute: impl Into<String>) -> Self {
        DiagnosticTarget::Annotation {
            field: None,
            attribute: attribute.into(),
        }
    }

    /// The field this target lives on, if any
    pub fn field_name(&self) -> Option<&str> {
        match self {
            DiagnosticTarget::Type => None,
            DiagnosticTarget::Field(name) => Some(name),
            DiagnosticTarget::Annotation { field, .. } => field.as_deref(),
        }
    }
}

impl fmt::Display for DiagnosticTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticTarget::Type => write!(f, "type"),
            DiagnosticTarget::Field(name) => write!(f, "field `{name}`"),
            DiagnosticTarget::Annotation {
                field: Some(field),
                attribute,
            } => write!(f, "`{attribute}` on field `{field}`"),
            DiagnosticTarget::Annotation {
                field: None,
                attribute,
            } => write!(f, "`{attribute}` on type"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// E001
    MustBeStringLiteral { attribute: String },
    /// E001, for a `case` tag that names no known style
    UnknownCaseStyle { tag: String },
    /// E002
    ValueRequired { attribute: String },
    /// E003
    EmptyCustomKey,
    /// E004
    KeyTableExists { name: String },
    /// E005
    FieldOnly { attribute: String },
    /// E006
    StructOnly { attribute: String },
    /// E007
    FieldOrStructOnly { attribute: String },
    /// E008
    NotAFlatRecord,
    /// E009
    MissingDefaultValue { field: String },
    /// E010
    RequiresDerive { attribute: String },
    /// D001
    NotAStruct,
    /// K001
    MultipleKeyAttributes { attribute: String },
    /// K002
    CustomKeyShadowsCase,
    /// K003
    KeyOnComputedField,
    /// E099
    Internal { detail: String },
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::MustBeStringLiteral { .. } | DiagnosticKind::UnknownCaseStyle { .. } => {
                "E001"
            }
            DiagnosticKind::ValueRequired { .. } => "E002",
            DiagnosticKind::EmptyCustomKey => "E003",
            DiagnosticKind::KeyTableExists { .. } => "E004",
            DiagnosticKind::FieldOnly { .. } => "E005",
            DiagnosticKind::StructOnly { .. } => "E006",
            DiagnosticKind::FieldOrStructOnly { .. } => "E007",
            DiagnosticKind::NotAFlatRecord => "E008",
            DiagnosticKind::MissingDefaultValue { .. } => "E009",
            DiagnosticKind::RequiresDerive { .. } => "E010",
            DiagnosticKind::NotAStruct => "D001",
            DiagnosticKind::MultipleKeyAttributes { .. } => "K001",
            DiagnosticKind::CustomKeyShadowsCase => "K002",
            DiagnosticKind::KeyOnComputedField => "K003",
            DiagnosticKind::Internal { .. } => "E099",
        }
    }

    /// Severity before any configuration is applied
    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticKind::CustomKeyShadowsCase => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn english(&self) -> String {
        match self {
            DiagnosticKind::MustBeStringLiteral { attribute } => {
                format!("`{attribute}` must be a string literal")
            }
            DiagnosticKind::UnknownCaseStyle { tag } => {
                format!("`{tag}` is not a known case style")
            }
            DiagnosticKind::ValueRequired { attribute } => {
                format!("`{attribute}` requires a non-empty value")
            }
            DiagnosticKind::EmptyCustomKey => "custom key value cannot be empty".to_string(),
            DiagnosticKind::KeyTableExists { name } => {
                format!("remove `{name}` to use #[derive(Codify)]")
            }
            DiagnosticKind::FieldOnly { attribute } => {
                format!("`{attribute}` can only be attached to fields")
            }
            DiagnosticKind::StructOnly { attribute } => {
                format!("`{attribute}` can only be attached to structs")
            }
            DiagnosticKind::FieldOrStructOnly { attribute } => {
                format!("`{attribute}` can only be attached to fields and structs")
            }
            DiagnosticKind::NotAFlatRecord => {
                "Codify can only be derived for structs with named fields".to_string()
            }
            DiagnosticKind::MissingDefaultValue { field } => format!(
                "field '{field}' annotated with `default` requires a default value argument, e.g., #[codify(default = \"\")]"
            ),
            DiagnosticKind::RequiresDerive { attribute } => {
                format!("#[derive(Codify)] is required to use `{attribute}`")
            }
            DiagnosticKind::NotAStruct => "Codify can only be applied to a struct".to_string(),
            DiagnosticKind::MultipleKeyAttributes { attribute } => {
                format!("multiple `{attribute}` attributes found")
            }
            DiagnosticKind::CustomKeyShadowsCase => {
                "multiple key attributes found, defaulting to `rename`".to_string()
            }
            DiagnosticKind::KeyOnComputedField => {
                "key attributes cannot be attached to skipped fields".to_string()
            }
            DiagnosticKind::Internal { detail } => detail.clone(),
        }
    }

    pub fn chinese(&self) -> String {
        match self {
            DiagnosticKind::MustBeStringLiteral { attribute } => {
                format!("`{attribute}` 必须是字符串字面量")
            }
            DiagnosticKind::UnknownCaseStyle { tag } => format!("`{tag}` 不是有效的大小写风格"),
            DiagnosticKind::ValueRequired { .. } => "必须提供非空字符串".to_string(),
            DiagnosticKind::EmptyCustomKey => "自定义键值不能为空".to_string(),
            DiagnosticKind::KeyTableExists { name } => {
                format!("使用 #[derive(Codify)] 前需移除已有 {name}")
            }
            DiagnosticKind::FieldOnly { attribute } => format!("`{attribute}` 只能应用在字段上"),
            DiagnosticKind::StructOnly { attribute } => {
                format!("`{attribute}` 只能应用在结构体上")
            }
            DiagnosticKind::FieldOrStructOnly { attribute } => {
                format!("`{attribute}` 只能应用在字段或结构体上")
            }
            DiagnosticKind::NotAFlatRecord => "只能应用在具名字段的结构体上".to_string(),
            DiagnosticKind::MissingDefaultValue { field } => format!(
                "字段 '{field}' 使用 default 时必须提供默认值，例如 #[codify(default = \"\")]"
            ),
            DiagnosticKind::RequiresDerive { attribute } => {
                format!("使用 `{attribute}` 需要先添加 #[derive(Codify)]")
            }
            DiagnosticKind::NotAStruct => "Codify 只能应用在结构体上".to_string(),
            DiagnosticKind::MultipleKeyAttributes { attribute } => {
                format!("发现多个 `{attribute}` 属性")
            }
            DiagnosticKind::CustomKeyShadowsCase => "发现多个键属性，使用 rename 的值".to_string(),
            DiagnosticKind::KeyOnComputedField => "键属性不能应用在被跳过的字段上".to_string(),
            DiagnosticKind::Internal { detail } => detail.clone(),
        }
    }

    pub fn hint(&self) -> Option<String> {
        match self {
            DiagnosticKind::MustBeStringLiteral { .. } => Some("使用 \"value\"".to_string()),
            DiagnosticKind::UnknownCaseStyle { .. } => {
                Some(format!("可选值: {}", CaseStyle::all_tags()))
            }
            DiagnosticKind::ValueRequired { .. } => Some("传入非空字符串".to_string()),
            DiagnosticKind::EmptyCustomKey => Some("传入有效字符串".to_string()),
            DiagnosticKind::MultipleKeyAttributes { attribute } => {
                Some(format!("只保留一个 `{attribute}`"))
            }
            _ => None,
        }
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub target: DiagnosticTarget,
}

impl Diagnostic {
    /// Create a diagnostic with the kind's default severity
    pub fn new(kind: DiagnosticKind, target: DiagnosticTarget) -> Self {
        Self {
            severity: kind.default_severity(),
            kind,
            target,
        }
    }

    pub fn on_type(kind: DiagnosticKind) -> Self {
        Self::new(kind, DiagnosticTarget::Type)
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The wire-format message without target information
    pub fn message(&self) -> String {
        format_message(
            self.code(),
            &self.kind.english(),
            &self.kind.chinese(),
            self.kind.hint().as_deref(),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Render the bilingual wire format. Empty hints are dropped.
pub fn format_message(code: &str, english: &str, chinese: &str, hint: Option<&str>) -> String {
    let mut message = format!("[{code}] EN: {english} | ZH: {chinese}");
    if let Some(hint) = hint.filter(|h| !h.is_empty()) {
        message.push_str(" | HINT: ");
        message.push_str(hint);
    }
    message
}

/// Receiver for diagnostics as they are produced.
///
/// Implementations must preserve the order of `report` calls.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, type_name: &str, diagnostic: &Diagnostic);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _type_name: &str, _diagnostic: &Diagnostic) {}
}
