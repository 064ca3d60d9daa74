//! Source file scanning
//!
//! Collects the declarations of a Rust file that codify has an opinion about:
//! types deriving `Codify` or carrying `#[codify(...)]`, hand-written key
//! tables, and `#[codify(...)]` attributes on items that cannot take them.

use anyhow::{Context, Result};
use codify_core::config::GeneratorConfig;
use codify_core::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticTarget};
use codify_core::syntax::{self, ParsedType};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use syn::{DeriveInput, ImplItem, Item};

/// A parsed source file
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Types in declaration order, nested modules included
    pub types: Vec<SourceType>,
    /// `#[codify(...)]` attributes attached to items that cannot carry them
    pub misplaced: Vec<MisplacedAttribute>,
    /// Names of every enum declared in the file
    enums: HashSet<String>,
}

/// A type that derives `Codify` or carries `#[codify(...)]`
#[derive(Debug)]
pub struct SourceType {
    pub input: DeriveInput,
    pub derives: bool,
}

impl SourceType {
    pub fn name(&self) -> String {
        self.input.ident.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct MisplacedAttribute {
    /// Path of the offending item, e.g. `Status::Active` or `build`
    pub item: String,
    pub diagnostic: Diagnostic,
}

/// A lowered type ready for the generator
#[derive(Debug)]
pub struct LoweredType {
    pub parsed: ParsedType,
    /// A key table with the reserved name is declared without `manual_keys`
    pub conflict: Option<Diagnostic>,
}

impl LoweredType {
    /// Diagnostics that stop generation before the orchestrator runs
    pub fn blocks_generation(&self) -> bool {
        self.conflict.is_some() || self.parsed.has_fatal_errors()
    }
}

impl SourceFile {
    /// Lower `ty` and apply what the rest of the file says about it
    pub fn lower(&self, ty: &SourceType, config: &GeneratorConfig) -> LoweredType {
        let mut parsed = syntax::parse_derive_input(&ty.input);
        parsed.decl.has_generation_annotation = ty.derives;

        let name = config.key_table_name(&parsed.decl.name);
        let conflict = (ty.derives && !parsed.decl.existing.key_table && self.enums.contains(&name))
            .then(|| Diagnostic::on_type(DiagnosticKind::KeyTableExists { name }));

        LoweredType { parsed, conflict }
    }

    /// Types that derive `Codify`
    pub fn derived(&self) -> impl Iterator<Item = &SourceType> {
        self.types.iter().filter(|ty| ty.derives)
    }
}

/// Read and scan a Rust source file
pub fn parse_source_file(path: &Path) -> Result<SourceFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
    parse_source(path, &content)
}

/// Scan Rust source text
pub fn parse_source(path: &Path, content: &str) -> Result<SourceFile> {
    let ast = syn::parse_file(content)
        .with_context(|| format!("Failed to parse Rust source: {}", path.display()))?;

    let mut file = SourceFile {
        path: path.to_path_buf(),
        types: Vec::new(),
        misplaced: Vec::new(),
        enums: HashSet::new(),
    };
    scan_items(&ast.items, &mut file);

    tracing::debug!(
        path = %path.display(),
        types = file.types.len(),
        misplaced = file.misplaced.len(),
        "scanned source"
    );
    Ok(file)
}

fn scan_items(items: &[Item], file: &mut SourceFile) {
    for item in items {
        match item {
            Item::Struct(item) => {
                collect_type(DeriveInput::from(item.clone()), file);
            }
            Item::Union(item) => {
                collect_type(DeriveInput::from(item.clone()), file);
            }
            Item::Enum(item) => {
                let name = item.ident.to_string();
                file.enums.insert(name.clone());

                let derives = syntax::has_codify_derive(&item.attrs);
                if derives {
                    // Rejected by the generator as a whole
                    collect_type(DeriveInput::from(item.clone()), file);
                } else {
                    misplaced(&name, &item.attrs, file);
                }
                for variant in &item.variants {
                    misplaced(&format!("{name}::{}", variant.ident), &variant.attrs, file);
                }
            }
            Item::Fn(item) => misplaced(&item.sig.ident.to_string(), &item.attrs, file),
            Item::Impl(item) => {
                for impl_item in &item.items {
                    if let ImplItem::Fn(method) = impl_item {
                        misplaced(&method.sig.ident.to_string(), &method.attrs, file);
                    }
                }
            }
            Item::Mod(item) => {
                if let Some((_, items)) = &item.content {
                    scan_items(items, file);
                }
            }
            _ => {}
        }
    }
}

fn collect_type(input: DeriveInput, file: &mut SourceFile) {
    let derives = syntax::has_codify_derive(&input.attrs);
    let annotated = syntax::has_codify_attributes(&input.attrs)
        || match &input.data {
            syn::Data::Struct(data) => data
                .fields
                .iter()
                .any(|field| syntax::has_codify_attributes(&field.attrs)),
            _ => false,
        };

    if derives || annotated {
        file.types.push(SourceType { input, derives });
    }
}

fn misplaced(item: &str, attrs: &[syn::Attribute], file: &mut SourceFile) {
    for (attribute, _) in syntax::attribute_keys(attrs) {
        file.misplaced.push(MisplacedAttribute {
            item: item.to_string(),
            diagnostic: Diagnostic::new(
                DiagnosticKind::FieldOrStructOnly {
                    attribute: attribute.clone(),
                },
                DiagnosticTarget::type_annotation(attribute),
            ),
        });
    }
}
