//! Rust front-end: lowers `syn` declarations into the engine model.
//!
//! `#[codify(...)]` attributes are forwarded by `darling` and parsed with
//! `parse_nested_meta` so that malformed arguments become coded diagnostics
//! instead of hard parse errors.

use crate::case::CaseStyle;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticTarget};
use crate::model::{Annotation, ExistingMembers, FieldDecl, RecordKind, TypeDecl, TypeDescriptor};
use darling::{FromDeriveInput, FromField};
use proc_macro2::Span;
use quote::ToTokens;
use std::collections::HashMap;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, Expr, ExprLit, GenericArgument, Lit, PathArguments, Type};

/// Name of the helper attribute
pub const ATTRIBUTE: &str = "codify";

/// Name of the derive
pub const DERIVE: &str = "Codify";

#[derive(Debug, FromDeriveInput)]
#[darling(forward_attrs(codify))]
struct CodifyInput {
    data: darling::ast::Data<darling::util::Ignored, CodifyField>,
    attrs: Vec<Attribute>,
}

#[derive(Debug, FromField)]
#[darling(forward_attrs(codify))]
struct CodifyField {
    ident: Option<syn::Ident>,
    ty: Type,
    attrs: Vec<Attribute>,
}

/// Type-level switches that are not engine annotations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeOptions {
    /// Skip the serde bridge impls
    pub no_serde: bool,
}

/// A diagnostic paired with the source location it points at
#[derive(Debug, Clone)]
pub struct SpannedDiagnostic {
    pub diagnostic: Diagnostic,
    pub span: Span,
}

/// Source locations for diagnostic targets.
#[derive(Debug, Clone)]
pub struct SpanIndex {
    type_span: Span,
    fields: HashMap<String, Span>,
    annotations: HashMap<(Option<String>, String), Span>,
}

impl SpanIndex {
    fn new(type_span: Span) -> Self {
        Self {
            type_span,
            fields: HashMap::new(),
            annotations: HashMap::new(),
        }
    }

    /// Narrowest known span for `target`, widening to field then type
    pub fn span_for(&self, target: &DiagnosticTarget) -> Span {
        match target {
            DiagnosticTarget::Type => self.type_span,
            DiagnosticTarget::Field(name) => self.field_span(name),
            DiagnosticTarget::Annotation { field, attribute } => self
                .annotations
                .get(&(field.clone(), attribute.clone()))
                .copied()
                .unwrap_or_else(|| match field {
                    Some(name) => self.field_span(name),
                    None => self.type_span,
                }),
        }
    }

    fn field_span(&self, name: &str) -> Span {
        self.fields.get(name).copied().unwrap_or(self.type_span)
    }
}

/// Everything the front-end learned about one declaration.
#[derive(Debug, Clone)]
pub struct ParsedType {
    pub decl: TypeDecl,
    pub options: TypeOptions,
    /// Diagnostics raised while reading attributes
    pub diagnostics: Vec<SpannedDiagnostic>,
    pub spans: SpanIndex,
}

impl ParsedType {
    /// Attribute errors that prevent generation
    pub fn has_fatal_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| {
            d.diagnostic.is_error() && !matches!(d.diagnostic.kind, DiagnosticKind::StructOnly { .. })
        })
    }

    pub fn spanned(&self, diagnostic: &Diagnostic) -> SpannedDiagnostic {
        SpannedDiagnostic {
            diagnostic: diagnostic.clone(),
            span: self.spans.span_for(&diagnostic.target),
        }
    }
}

/// Lower a derive input carrying `#[derive(Codify)]`
pub fn parse_derive_input(input: &DeriveInput) -> ParsedType {
    let name = input.ident.unraw().to_string();
    let mut parser = AttributeParser::new(input.ident.span());

    let kind = match &input.data {
        Data::Enum(_) => RecordKind::Enum,
        Data::Union(_) => RecordKind::Union,
        Data::Struct(data) => match &data.fields {
            syn::Fields::Named(_) => RecordKind::Struct,
            syn::Fields::Unnamed(_) => RecordKind::TupleStruct,
            syn::Fields::Unit => RecordKind::UnitStruct,
        },
    };

    let mut decl = TypeDecl::record(name).with_kind(kind);
    let mut options = TypeOptions::default();

    if !kind.is_struct() {
        // Attributes on enums and unions are irrelevant once the target is rejected
        return parser.finish(decl, options);
    }

    let parsed = match CodifyInput::from_derive_input(input) {
        Ok(parsed) => parsed,
        Err(err) => {
            parser.push(
                Diagnostic::on_type(DiagnosticKind::Internal {
                    detail: err.to_string(),
                }),
                input.ident.span(),
            );
            return parser.finish(decl, options);
        }
    };

    parser.type_attributes(&parsed.attrs, &mut decl, &mut options);

    if let darling::ast::Data::Struct(fields) = parsed.data {
        for (index, field) in fields.fields.into_iter().enumerate() {
            let field_name = field
                .ident
                .as_ref()
                .map(|ident| ident.unraw().to_string())
                .unwrap_or_else(|| index.to_string());
            let span = field
                .ident
                .as_ref()
                .map(|ident| ident.span())
                .unwrap_or_else(|| field.ty.span());
            parser.spans.fields.insert(field_name.clone(), span);

            let mut field_decl = FieldDecl::new(field_name, describe_type(&field.ty));
            parser.field_attributes(&field.attrs, &mut field_decl);
            decl.fields.push(field_decl);
        }
    }

    parser.finish(decl, options)
}

/// True when `attrs` contain a `derive` listing `Codify`
pub fn has_codify_derive(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .any(|attr| {
            let mut found = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta
                    .path
                    .segments
                    .last()
                    .is_some_and(|segment| segment.ident == DERIVE)
                {
                    found = true;
                }
                Ok(())
            });
            found
        })
}

/// True when any attribute is `#[codify(...)]`
pub fn has_codify_attributes(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(ATTRIBUTE))
}

/// Names of the keys used inside `#[codify(...)]` attributes, without validation
pub fn attribute_keys(attrs: &[Attribute]) -> Vec<(String, Span)> {
    let mut keys = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
        let _ = attr.parse_nested_meta(|meta| {
            keys.push((path_name(&meta), meta.path.span()));
            skip_value(&meta)
        });
    }
    keys
}

struct AttributeParser {
    spans: SpanIndex,
    diagnostics: Vec<SpannedDiagnostic>,
}

impl AttributeParser {
    fn new(type_span: Span) -> Self {
        Self {
            spans: SpanIndex::new(type_span),
            diagnostics: Vec::new(),
        }
    }

    fn push(&mut self, diagnostic: Diagnostic, span: Span) {
        self.diagnostics.push(SpannedDiagnostic { diagnostic, span });
    }

    fn finish(self, decl: TypeDecl, options: TypeOptions) -> ParsedType {
        ParsedType {
            decl,
            options,
            diagnostics: self.diagnostics,
            spans: self.spans,
        }
    }

    fn type_attributes(&mut self, attrs: &[Attribute], decl: &mut TypeDecl, options: &mut TypeOptions) {
        for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
            let mut annotations = Vec::new();
            let result = attr.parse_nested_meta(|meta| {
                let key = path_name(&meta);
                let span = meta.path.span();
                let target = DiagnosticTarget::type_annotation(&key);
                self.spans.annotations.insert((None, key.clone()), span);

                match key.as_str() {
                    "manual_keys" => decl.existing.key_table = true,
                    "manual_decode" => decl.existing.decode = true,
                    "manual_encode" => decl.existing.encode = true,
                    "no_serde" => options.no_serde = true,
                    "skip" => {
                        self.push(
                            Diagnostic::new(DiagnosticKind::FieldOnly { attribute: key.clone() }, target),
                            span,
                        );
                    }
                    _ => {
                        if let Some(annotation) = self.annotation(&meta, &key, target)? {
                            annotations.push(annotation);
                        }
                        return Ok(());
                    }
                }
                skip_value(&meta)
            });
            if let Err(err) = result {
                self.push(
                    Diagnostic::on_type(DiagnosticKind::Internal {
                        detail: err.to_string(),
                    }),
                    err.span(),
                );
            }
            decl.annotations.extend(annotations);
        }
    }

    fn field_attributes(&mut self, attrs: &[Attribute], field: &mut FieldDecl) {
        for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTRIBUTE)) {
            let mut annotations = Vec::new();
            let result = attr.parse_nested_meta(|meta| {
                let key = path_name(&meta);
                let span = meta.path.span();
                let target = DiagnosticTarget::field_annotation(&field.name, &key);
                self.spans
                    .annotations
                    .insert((Some(field.name.clone()), key.clone()), span);

                match key.as_str() {
                    "skip" => field.is_computed = true,
                    "manual_keys" | "manual_decode" | "manual_encode" | "no_serde" => {
                        self.push(
                            Diagnostic::new(DiagnosticKind::StructOnly { attribute: key.clone() }, target),
                            span,
                        );
                    }
                    _ => {
                        if let Some(annotation) = self.annotation(&meta, &key, target)? {
                            annotations.push(annotation);
                        }
                        return Ok(());
                    }
                }
                skip_value(&meta)
            });
            if let Err(err) = result {
                self.push(
                    Diagnostic::new(
                        DiagnosticKind::Internal {
                            detail: err.to_string(),
                        },
                        DiagnosticTarget::field(&field.name),
                    ),
                    err.span(),
                );
            }
            field.annotations.extend(annotations);
        }
    }

    /// Parse one engine annotation. Unknown keys are reported and skipped.
    fn annotation(
        &mut self,
        meta: &ParseNestedMeta<'_>,
        key: &str,
        target: DiagnosticTarget,
    ) -> syn::Result<Option<Annotation>> {
        let span = meta.path.span();
        let annotation = match key {
            "rename" => self.literal(meta, key, target)?.map(Annotation::CustomKey),
            "prefix" => self.literal(meta, key, target)?.map(Annotation::KeyPrefix),
            "suffix" => self.literal(meta, key, target)?.map(Annotation::KeySuffix),
            "case" => match self.literal(meta, key, target.clone())? {
                Some(tag) => match tag.parse::<CaseStyle>() {
                    Ok(style) => Some(Annotation::CaseStyle(style)),
                    Err(_) => {
                        self.push(
                            Diagnostic::new(DiagnosticKind::UnknownCaseStyle { tag }, target),
                            span,
                        );
                        None
                    }
                },
                None => None,
            },
            "default" => {
                if meta.input.peek(syn::Token![=]) {
                    let expr: Expr = meta.value()?.parse()?;
                    Some(Annotation::DefaultValue(Some(expr.to_token_stream().to_string())))
                } else {
                    Some(Annotation::DefaultValue(None))
                }
            }
            "skip_null" => {
                skip_value(meta)?;
                Some(Annotation::SkipNull)
            }
            "lossless" => {
                skip_value(meta)?;
                Some(Annotation::Lossless)
            }
            _ => {
                skip_value(meta)?;
                self.push(
                    Diagnostic::new(
                        DiagnosticKind::Internal {
                            detail: format!("unknown codify attribute `{key}`"),
                        },
                        target,
                    ),
                    span,
                );
                None
            }
        };
        Ok(annotation)
    }

    /// Read `key = "literal"`, reporting E002 when the value is missing and
    /// E001 when it is not a string literal.
    fn literal(
        &mut self,
        meta: &ParseNestedMeta<'_>,
        key: &str,
        target: DiagnosticTarget,
    ) -> syn::Result<Option<String>> {
        let span = meta.path.span();
        if !meta.input.peek(syn::Token![=]) {
            self.push(
                Diagnostic::new(
                    DiagnosticKind::ValueRequired {
                        attribute: key.to_string(),
                    },
                    target,
                ),
                span,
            );
            return Ok(None);
        }

        let expr: Expr = meta.value()?.parse()?;
        match expr {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => Ok(Some(lit.value())),
            other => {
                self.push(
                    Diagnostic::new(
                        DiagnosticKind::MustBeStringLiteral {
                            attribute: key.to_string(),
                        },
                        target,
                    ),
                    other.span(),
                );
                Ok(None)
            }
        }
    }
}

fn path_name(meta: &ParseNestedMeta<'_>) -> String {
    meta.path
        .get_ident()
        .map(|ident| ident.unraw().to_string())
        .unwrap_or_else(|| meta.path.to_token_stream().to_string().replace(' ', ""))
}

/// Consume `= value` or `(...)` following a flag so parsing can continue.
fn skip_value(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let _ = meta.parse_nested_meta(|_| Ok(()));
    }
    Ok(())
}

/// Map a Rust type onto the engine's [`TypeDescriptor`].
pub fn describe_type(ty: &Type) -> TypeDescriptor {
    match ty {
        Type::Group(group) => describe_type(&group.elem),
        Type::Paren(paren) => describe_type(&paren.elem),
        Type::Path(path) if path.qself.is_none() => {
            let Some(last) = path.path.segments.last() else {
                return TypeDescriptor::Scalar(type_text(ty));
            };
            let args = type_arguments(&last.arguments);
            let collection = path_text(&path.path);

            match (last.ident.to_string().as_str(), args.as_slice()) {
                ("Option", [inner]) => TypeDescriptor::optional(describe_type(inner)),
                ("Vec", [element]) => TypeDescriptor::array(describe_type(element)),
                ("HashSet" | "BTreeSet" | "IndexSet", [element, ..]) => {
                    TypeDescriptor::set(collection, describe_type(element))
                }
                ("HashMap" | "BTreeMap" | "IndexMap", [key, value, ..]) => {
                    TypeDescriptor::map(collection, describe_type(key), describe_type(value))
                }
                ("LosslessValue", [inner]) => TypeDescriptor::wrapper(collection, describe_type(inner)),
                _ => TypeDescriptor::Scalar(type_text(ty)),
            }
        }
        _ => TypeDescriptor::Scalar(type_text(ty)),
    }
}

fn type_arguments(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// `a::b::Name` without generic arguments
fn path_text(path: &syn::Path) -> String {
    let segments = path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");
    if path.leading_colon.is_some() {
        format!("::{segments}")
    } else {
        segments
    }
}

/// Token text with the spacing `quote` inserts removed.
pub fn type_text(ty: &Type) -> String {
    normalize_tokens(&ty.to_token_stream().to_string())
}

fn normalize_tokens(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    for (index, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let previous = out.chars().last();
            let next = chars.get(index + 1).copied();
            if previous.is_some_and(|p| "<:(&[".contains(p))
                || next.is_some_and(|n| "<>:,;)]".contains(n))
            {
                continue;
            }
        }
        out.push(c);
    }
    out
}
