//! Declaration model consumed by the generation engine.
//!
//! Front-ends (the derive macro, the CLI source scanner) lower Rust syntax
//! into these types; the engine never looks at syntax trees directly.

use crate::case::CaseStyle;
use std::fmt;

/// Shape of the declaration a derive was attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `struct T { a: A }`
    Struct,
    /// `struct T(A);`
    TupleStruct,
    /// `struct T;`
    UnitStruct,
    Enum,
    Union,
}

impl RecordKind {
    pub fn is_struct(self) -> bool {
        matches!(
            self,
            RecordKind::Struct | RecordKind::TupleStruct | RecordKind::UnitStruct
        )
    }
}

/// Structural view of a field's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Any type the engine does not look into; holds the normalized type text
    Scalar(String),
    OptionalOf(Box<TypeDescriptor>),
    /// `Vec<T>`
    ArrayOf(Box<TypeDescriptor>),
    /// `HashSet<T>`, `BTreeSet<T>`, ...
    SetOf {
        collection: String,
        element: Box<TypeDescriptor>,
    },
    /// `HashMap<K, V>`, `BTreeMap<K, V>`, ...
    MapOf {
        collection: String,
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    /// A known generic wrapper such as `LosslessValue<T>`
    WrapperOf {
        name: String,
        inner: Box<TypeDescriptor>,
    },
}

impl TypeDescriptor {
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeDescriptor::Scalar(name.into())
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::OptionalOf(Box::new(inner))
    }

    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::ArrayOf(Box::new(element))
    }

    pub fn set(collection: impl Into<String>, element: TypeDescriptor) -> Self {
        TypeDescriptor::SetOf {
            collection: collection.into(),
            element: Box::new(element),
        }
    }

    pub fn map(collection: impl Into<String>, key: TypeDescriptor, value: TypeDescriptor) -> Self {
        TypeDescriptor::MapOf {
            collection: collection.into(),
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn wrapper(name: impl Into<String>, inner: TypeDescriptor) -> Self {
        TypeDescriptor::WrapperOf {
            name: name.into(),
            inner: Box::new(inner),
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeDescriptor::OptionalOf(_))
    }

    /// Strip every `Option` layer.
    pub fn unwrap_optional(&self) -> &TypeDescriptor {
        match self {
            TypeDescriptor::OptionalOf(inner) => inner.unwrap_optional(),
            other => other,
        }
    }

    /// True for arrays, sets and maps (after optional unwrapping)
    pub fn is_collection(&self) -> bool {
        matches!(
            self.unwrap_optional(),
            TypeDescriptor::ArrayOf(_) | TypeDescriptor::SetOf { .. } | TypeDescriptor::MapOf { .. }
        )
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Scalar(name) => f.write_str(name),
            TypeDescriptor::OptionalOf(inner) => write!(f, "Option<{inner}>"),
            TypeDescriptor::ArrayOf(element) => write!(f, "Vec<{element}>"),
            TypeDescriptor::SetOf {
                collection,
                element,
            } => write!(f, "{collection}<{element}>"),
            TypeDescriptor::MapOf {
                collection,
                key,
                value,
            } => write!(f, "{collection}<{key}, {value}>"),
            TypeDescriptor::WrapperOf { name, inner } => write!(f, "{name}<{inner}>"),
        }
    }
}

/// A declarative annotation on a field or on the type itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Literal wire key, bypasses case styling and prefix/suffix
    CustomKey(String),
    KeyPrefix(String),
    KeySuffix(String),
    CaseStyle(CaseStyle),
    /// Fallback expression (source text); `None` when written without a value
    DefaultValue(Option<String>),
    SkipNull,
    Lossless,
}

impl Annotation {
    /// Attribute spelling used in diagnostics
    pub fn attribute_name(&self) -> &'static str {
        match self {
            Annotation::CustomKey(_) => "rename",
            Annotation::KeyPrefix(_) => "prefix",
            Annotation::KeySuffix(_) => "suffix",
            Annotation::CaseStyle(_) => "case",
            Annotation::DefaultValue(_) => "default",
            Annotation::SkipNull => "skip_null",
            Annotation::Lossless => "lossless",
        }
    }

    /// Annotations that influence the resolved wire key
    pub fn is_key_related(&self) -> bool {
        matches!(
            self,
            Annotation::CustomKey(_)
                | Annotation::KeyPrefix(_)
                | Annotation::KeySuffix(_)
                | Annotation::CaseStyle(_)
        )
    }

    /// Annotations that are legal on a type declaration
    pub fn is_type_level(&self) -> bool {
        matches!(
            self,
            Annotation::KeyPrefix(_) | Annotation::KeySuffix(_) | Annotation::CaseStyle(_)
        )
    }
}

/// A single stored field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub declared_type: TypeDescriptor,
    /// Initializer expression (source text), used as a decode fallback
    pub initializer: Option<String>,
    /// Computed fields are never part of the wire schema
    pub is_computed: bool,
    pub annotations: Vec<Annotation>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, declared_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            declared_type,
            initializer: None,
            is_computed: false,
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_initializer(mut self, expr: impl Into<String>) -> Self {
        self.initializer = Some(expr.into());
        self
    }

    pub fn computed(mut self) -> Self {
        self.is_computed = true;
        self
    }

    pub fn is_optional(&self) -> bool {
        self.declared_type.is_optional()
    }

    pub fn has(&self, predicate: impl Fn(&Annotation) -> bool) -> bool {
        self.annotations.iter().any(predicate)
    }

    pub fn has_key_annotations(&self) -> bool {
        self.has(Annotation::is_key_related)
    }
}

/// Members the host type already provides by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExistingMembers {
    pub key_table: bool,
    pub decode: bool,
    pub encode: bool,
}

/// The declaration being expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    pub kind: RecordKind,
    /// Whether the type carries the generation derive
    pub has_generation_annotation: bool,
    pub annotations: Vec<Annotation>,
    pub fields: Vec<FieldDecl>,
    pub existing: ExistingMembers,
}

impl TypeDecl {
    /// A named-field struct carrying the generation derive
    pub fn record(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RecordKind::Struct,
            has_generation_annotation: true,
            annotations: Vec::new(),
            fields: Vec::new(),
            existing: ExistingMembers::default(),
        }
    }

    pub fn with_kind(mut self, kind: RecordKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_existing(mut self, existing: ExistingMembers) -> Self {
        self.existing = existing;
        self
    }

    pub fn without_generation_annotation(mut self) -> Self {
        self.has_generation_annotation = false;
        self
    }

    /// Fields that take part in the wire schema, in declaration order
    pub fn stored_fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields.iter().filter(|field| !field.is_computed)
    }

    /// Type-level prefix, suffix and case style
    pub fn defaults(&self) -> TypeDefaults {
        TypeDefaults {
            prefix: first_literal(&self.annotations, |a| match a {
                Annotation::KeyPrefix(p) => Some(p),
                _ => None,
            }),
            suffix: first_literal(&self.annotations, |a| match a {
                Annotation::KeySuffix(s) => Some(s),
                _ => None,
            }),
            case_style: self.annotations.iter().find_map(|a| match a {
                Annotation::CaseStyle(style) => Some(*style),
                _ => None,
            }),
        }
    }
}

/// Key-naming defaults inherited by every field of a type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDefaults {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub case_style: Option<CaseStyle>,
}

pub(crate) fn first_literal<'a>(
    annotations: &'a [Annotation],
    pick: impl Fn(&'a Annotation) -> Option<&'a String>,
) -> Option<String> {
    annotations.iter().find_map(pick).cloned()
}
