//! Token rendering for generated artifacts.
//!
//! Generated code refers to the runtime through absolute `::codify` paths so
//! that it expands the same way in any module of the host crate.

use crate::assemble::{DecodeRoutine, EncodeRoutine};
use crate::config::GeneratorConfig;
use crate::diagnostic::{DiagnosticSink, NullSink, Severity};
use crate::error::EmitError;
use crate::key_table::KeyTable;
use crate::model::{FieldDecl, TypeDecl, TypeDescriptor};
use crate::orchestrator::{self, GenerationOutcome};
use crate::plan::{EncodeStrategy, FieldPlan};
use crate::syntax::{self, ParsedType, SpannedDiagnostic};
use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::{DeriveInput, Expr, ExprLit, Generics, Ident, Lit, Type, parse_quote};

/// Expand `#[derive(Codify)]` on `input`.
pub fn expand_derive(input: &DeriveInput, config: &GeneratorConfig) -> TokenStream {
    expand_derive_with_sink(input, config, &NullSink)
}

/// Expand `#[derive(Codify)]`, reporting every diagnostic to `sink`
pub fn expand_derive_with_sink(
    input: &DeriveInput,
    config: &GeneratorConfig,
    sink: &dyn DiagnosticSink,
) -> TokenStream {
    let parsed = syntax::parse_derive_input(input);
    for spanned in &parsed.diagnostics {
        sink.report(&parsed.decl.name, &spanned.diagnostic);
    }

    if parsed.has_fatal_errors() {
        tracing::debug!(type_name = %parsed.decl.name, "attribute errors, skipping generation");
        return render_diagnostics(&parsed.diagnostics);
    }

    let outcome = orchestrator::generate_with_sink(&parsed.decl, config, sink);
    render(input, &parsed, &outcome, config)
}

/// Render diagnostics followed by whatever artifacts the outcome carries.
pub fn render(
    input: &DeriveInput,
    parsed: &ParsedType,
    outcome: &GenerationOutcome,
    config: &GeneratorConfig,
) -> TokenStream {
    let mut diagnostics = parsed.diagnostics.clone();
    diagnostics.extend(outcome.diagnostics.iter().map(|d| parsed.spanned(d)));
    let mut tokens = render_diagnostics(&diagnostics);

    if outcome.is_failed() {
        return tokens;
    }

    match render_artifacts(input, parsed, outcome, config) {
        Ok(artifacts) => tokens.extend(artifacts),
        Err(err) => {
            tracing::debug!(type_name = %outcome.type_name, error = %err, "rendering failed");
            tokens.extend(render_diagnostic(&parsed.spanned(&err.into())));
        }
    }
    tokens
}

/// Errors become `compile_error!`, warnings a use of a deprecated item.
pub fn render_diagnostics(diagnostics: &[SpannedDiagnostic]) -> TokenStream {
    diagnostics.iter().map(render_diagnostic).collect()
}

fn render_diagnostic(spanned: &SpannedDiagnostic) -> TokenStream {
    let message = spanned.diagnostic.message();
    match spanned.diagnostic.severity {
        Severity::Error => syn::Error::new(spanned.span, message).to_compile_error(),
        Severity::Warning => {
            let warning = Ident::new("codify_warning", spanned.span);
            quote_spanned! {spanned.span=>
                const _: () = {
                    #[deprecated(note = #message)]
                    #[allow(non_upper_case_globals)]
                    const #warning: () = ();
                    let _ = #warning;
                };
            }
        }
    }
}

fn render_artifacts(
    input: &DeriveInput,
    parsed: &ParsedType,
    outcome: &GenerationOutcome,
    config: &GeneratorConfig,
) -> Result<TokenStream, EmitError> {
    let keys = syn::parse_str::<Ident>(&outcome.key_table_name)
        .map_err(|_| EmitError::InvalidKeyTableName(outcome.key_table_name.clone()))?;

    let mut tokens = TokenStream::new();
    if let Some(table) = &outcome.artifacts.key_table {
        tokens.extend(render_key_table(input, &keys, table));
    }
    if let Some(routine) = &outcome.artifacts.decode {
        tokens.extend(render_decode(input, &parsed.decl, &keys, routine)?);
    }
    if let Some(routine) = &outcome.artifacts.encode {
        tokens.extend(render_encode(input, &keys, routine));
    }
    if config.serde_bridge && !parsed.options.no_serde {
        tokens.extend(render_serde_bridge(input));
    }
    Ok(tokens)
}

/// Field and key-variant identifier; keywords come back raw
fn field_ident(name: &str) -> Ident {
    syn::parse_str::<Ident>(name).unwrap_or_else(|_| Ident::new_raw(name, Span::call_site()))
}

fn render_key_table(input: &DeriveInput, keys: &Ident, table: &KeyTable) -> TokenStream {
    let vis = &input.vis;
    let doc = format!(" Wire keys of [`{}`].", input.ident);
    let variants: Vec<Ident> = table
        .entries
        .iter()
        .map(|entry| field_ident(&entry.field_name))
        .collect();
    let wire_keys = table.entries.iter().map(|entry| entry.wire_key.as_str());

    quote! {
        #[doc = #doc]
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #vis enum #keys {
            #(#variants,)*
        }

        #[automatically_derived]
        impl ::codify::CodingKey for #keys {
            fn string_value(&self) -> &'static str {
                match *self {
                    #(Self::#variants => #wire_keys,)*
                }
            }

            fn all_keys() -> &'static [Self] {
                &[#(Self::#variants,)*]
            }
        }
    }
}

fn render_decode(
    input: &DeriveInput,
    decl: &TypeDecl,
    keys: &Ident,
    routine: &DecodeRoutine,
) -> Result<TokenStream, EmitError> {
    let name = &input.ident;
    let generics = with_bound(
        &input.generics,
        quote!(::codify::__private::serde::de::DeserializeOwned),
    );
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut inits = Vec::with_capacity(decl.fields.len());
    for field in &decl.fields {
        let ident = field_ident(&field.name);
        let value = match routine.statement(&field.name) {
            Some(statement) if !field.is_computed => decode_expr(keys, field, &statement.plan)?,
            _ => quote!(::core::default::Default::default()),
        };
        inits.push(quote!(#ident: #value));
    }

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::codify::Decodable for #name #ty_generics #where_clause {
            fn from_decoder(
                decoder: &::codify::Decoder,
            ) -> ::core::result::Result<Self, ::codify::CodingError> {
                let __container = decoder.container::<#keys>()?;
                ::core::result::Result::Ok(Self {
                    #(#inits,)*
                })
            }
        }
    })
}

fn decode_expr(keys: &Ident, field: &FieldDecl, plan: &FieldPlan) -> Result<TokenStream, EmitError> {
    let variant = field_ident(&field.name);
    let key = quote!(#keys::#variant);

    let tokens = match plan {
        FieldPlan::Direct => quote!(__container.decode(#key)?),
        FieldPlan::OptionalDirect => quote!(__container.decode_if_present(#key)?),
        FieldPlan::Defaulted { expr, optional } => {
            let fallback = default_expr(&field.name, expr)?;
            if *optional {
                quote! {
                    __container
                        .decode_if_present(#key)?
                        .or_else(|| ::core::option::Option::Some(#fallback))
                }
            } else {
                quote!(__container.decode_if_present(#key)?.unwrap_or_else(|| #fallback))
            }
        }
        FieldPlan::NullFilteredArray { element, optional }
        | FieldPlan::NullFilteredSet { element, optional } => {
            let element = render_type(element)?;
            if *optional {
                quote!(__container.decode_compacted_if_present::<#element, _>(#key)?)
            } else {
                quote!(__container.decode_compacted::<#element, _>(#key)?)
            }
        }
        FieldPlan::NullFilteredMap {
            key: map_key,
            value,
            optional,
        } => {
            let map_key = render_type(map_key)?;
            let value = render_type(value)?;
            if *optional {
                quote!(__container.decode_compacted_map_if_present::<#map_key, #value, _>(#key)?)
            } else {
                quote!(__container.decode_compacted_map::<#map_key, #value, _>(#key)?)
            }
        }
        FieldPlan::LosslessScalar { optional } => {
            if *optional {
                quote!(__container.decode_lossless_if_present(#key)?)
            } else {
                quote!(__container.decode_lossless(#key)?)
            }
        }
    };
    Ok(tokens)
}

/// String literals convert into the field type so `default = "x"` works for `String`.
fn default_expr(field: &str, text: &str) -> Result<TokenStream, EmitError> {
    let expr = syn::parse_str::<Expr>(text).map_err(|source| EmitError::InvalidExpression {
        field: field.to_string(),
        source,
    })?;
    Ok(match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(lit), ..
        }) => quote!(::core::convert::Into::into(#lit)),
        other => quote!(#other),
    })
}

fn render_type(descriptor: &TypeDescriptor) -> Result<Type, EmitError> {
    let text = descriptor.to_string();
    syn::parse_str::<Type>(&text).map_err(|source| EmitError::InvalidType { text, source })
}

fn render_encode(input: &DeriveInput, keys: &Ident, routine: &EncodeRoutine) -> TokenStream {
    let name = &input.ident;
    let generics = with_bound(&input.generics, quote!(::codify::__private::serde::Serialize));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let statements = routine.statements.iter().map(|statement| {
        let ident = field_ident(&statement.field_name);
        match statement.strategy {
            EncodeStrategy::Always => quote! {
                __container.encode(&self.#ident, #keys::#ident)?;
            },
            EncodeStrategy::IfPresent => quote! {
                __container.encode_if_present(self.#ident.as_ref(), #keys::#ident)?;
            },
        }
    });

    quote! {
        #[automatically_derived]
        impl #impl_generics ::codify::Encodable for #name #ty_generics #where_clause {
            fn encode(
                &self,
                encoder: &mut ::codify::Encoder,
            ) -> ::core::result::Result<(), ::codify::CodingError> {
                #[allow(unused_mut)]
                let mut __container = encoder.container::<#keys>();
                #(#statements)*
                ::core::result::Result::Ok(())
            }
        }
    }
}

/// `serde` impls routed through the generated (or hand-written) routines
fn render_serde_bridge(input: &DeriveInput) -> TokenStream {
    let name = &input.ident;
    let (_, ty_generics, _) = input.generics.split_for_impl();

    let mut ser_generics = input.generics.clone();
    ser_generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(#name #ty_generics: ::codify::Encodable));
    let (ser_impl, _, ser_where) = ser_generics.split_for_impl();

    let mut de_generics = input.generics.clone();
    de_generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(#name #ty_generics: ::codify::Decodable));
    de_generics.params.insert(0, parse_quote!('__de));
    let (de_impl, _, de_where) = de_generics.split_for_impl();

    quote! {
        #[automatically_derived]
        impl #ser_impl ::codify::__private::serde::Serialize for #name #ty_generics #ser_where {
            fn serialize<__S>(
                &self,
                serializer: __S,
            ) -> ::core::result::Result<__S::Ok, __S::Error>
            where
                __S: ::codify::__private::serde::Serializer,
            {
                ::codify::__private::serialize(self, serializer)
            }
        }

        #[automatically_derived]
        impl #de_impl ::codify::__private::serde::Deserialize<'__de> for #name #ty_generics #de_where {
            fn deserialize<__D>(deserializer: __D) -> ::core::result::Result<Self, __D::Error>
            where
                __D: ::codify::__private::serde::Deserializer<'__de>,
            {
                ::codify::__private::deserialize(deserializer)
            }
        }
    }
}

fn with_bound(generics: &Generics, bound: TokenStream) -> Generics {
    let mut generics = generics.clone();
    let params: Vec<Ident> = generics.type_params().map(|param| param.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote!(#param: #bound));
    }
    generics
}

#[cfg(test)]
#[path = "emit/emit_tests.rs"]
mod emit_tests;
