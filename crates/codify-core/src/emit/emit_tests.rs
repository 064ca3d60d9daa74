#![allow(non_snake_case)]

use super::*;
use crate::diagnostic::Diagnostic;
use std::sync::Mutex;

/// Token text without whitespace, for substring checks
fn compact(tokens: &TokenStream) -> String {
    tokens.to_string().chars().filter(|c| !c.is_whitespace()).collect()
}

fn expand(input: DeriveInput) -> String {
    compact(&expand_derive(&input, &GeneratorConfig::default()))
}

#[test]
fn expand_derive___record___emits_key_table_routines_and_bridge() {
    let output = expand(parse_quote! {
        #[derive(Codify)]
        #[codify(case = "snake_case")]
        pub struct User {
            user_name: String,
            nick_name: Option<String>,
        }
    });

    assert!(output.contains("pubenumUserCodingKeys{user_name,nick_name,}"));
    assert!(output.contains("Self::user_name=>\"user_name\""));
    assert!(output.contains("impl::codify::DecodableforUser"));
    assert!(output.contains("user_name:__container.decode(UserCodingKeys::user_name)?"));
    assert!(output.contains("nick_name:__container.decode_if_present(UserCodingKeys::nick_name)?"));
    assert!(output.contains("impl::codify::EncodableforUser"));
    assert!(output.contains("__container.encode_if_present(self.nick_name.as_ref(),UserCodingKeys::nick_name)?;"));
    assert!(output.contains("::codify::__private::serde::SerializeforUser"));
    assert!(output.contains("Deserialize<'__de>forUser"));
    assert!(!output.contains("compile_error"));
}

#[test]
fn expand_derive___camel_case_field___wire_key_restyled() {
    let output = expand(parse_quote! {
        #[codify(case = "kebab-case", prefix = "x-")]
        struct Header { contentType: String }
    });

    assert!(output.contains("Self::contentType=>\"x-content-type\""));
}

#[test]
fn expand_derive___keyword_field___uses_raw_identifier() {
    let output = expand(parse_quote! {
        struct Token { r#type: String }
    });

    assert!(output.contains("r#type"));
    assert!(output.contains("=>\"type\""));
}

#[test]
fn expand_derive___defaults___fall_back_when_absent() {
    let output = expand(parse_quote! {
        struct Post {
            #[codify(default = "untitled")]
            title: String,
            #[codify(default = 10)]
            limit: Option<u32>,
        }
    });

    assert!(output.contains(
        "title:__container.decode_if_present(PostCodingKeys::title)?.unwrap_or_else(||::core::convert::Into::into(\"untitled\"))"
    ));
    assert!(output.contains(".or_else(||::core::option::Option::Some(10))"));
}

#[test]
fn expand_derive___skip_null_collections___decode_compacted_with_element_type() {
    let output = expand(parse_quote! {
        struct Feed {
            #[codify(skip_null)]
            ids: Vec<u64>,
            #[codify(skip_null)]
            tags: Option<std::collections::BTreeSet<String>>,
            #[codify(skip_null)]
            scores: HashMap<String, f64>,
        }
    });

    assert!(output.contains("__container.decode_compacted::<u64,_>(FeedCodingKeys::ids)?"));
    assert!(output.contains("__container.decode_compacted_if_present::<String,_>(FeedCodingKeys::tags)?"));
    assert!(output.contains("__container.decode_compacted_map::<String,f64,_>(FeedCodingKeys::scores)?"));
}

#[test]
fn expand_derive___lossless_field___decode_lossless() {
    let output = expand(parse_quote! {
        struct Account {
            #[codify(lossless)]
            id: String,
            #[codify(lossless)]
            code: Option<String>,
        }
    });

    assert!(output.contains("__container.decode_lossless(AccountCodingKeys::id)?"));
    assert!(output.contains("__container.decode_lossless_if_present(AccountCodingKeys::code)?"));
}

#[test]
fn expand_derive___skipped_field___defaulted_and_not_keyed() {
    let output = expand(parse_quote! {
        struct Session {
            token: String,
            #[codify(skip)]
            cache: Vec<u8>,
        }
    });

    assert!(output.contains("enumSessionCodingKeys{token,}"));
    assert!(output.contains("cache:::core::default::Default::default()"));
    assert!(!output.contains("self.cache"));
}

#[test]
fn expand_derive___unit_struct___empty_key_table() {
    let output = expand(parse_quote! {
        struct Marker;
    });

    assert!(output.contains("enumMarkerCodingKeys{}"));
    assert!(output.contains("match*self{}"));
    assert!(output.contains("Ok(Self{})"));
}

#[test]
fn expand_derive___generic_struct___bounds_type_params() {
    let output = expand(parse_quote! {
        struct Page<T> { items: Vec<T> }
    });

    assert!(output.contains("impl<T>::codify::DecodableforPage<T>whereT:::codify::__private::serde::de::DeserializeOwned"));
    assert!(output.contains("impl<T>::codify::EncodableforPage<T>whereT:::codify::__private::serde::Serialize"));
    assert!(output.contains("impl<'__de,T>::codify::__private::serde::Deserialize<'__de>forPage<T>wherePage<T>:::codify::Decodable"));
}

#[test]
fn expand_derive___manual_members___only_missing_pieces_emitted() {
    let output = expand(parse_quote! {
        #[codify(manual_keys, manual_decode, no_serde)]
        struct User { id: u64 }
    });

    assert!(!output.contains("enumUserCodingKeys"));
    assert!(!output.contains("Decodable"));
    assert!(output.contains("impl::codify::EncodableforUser"));
    assert!(output.contains("UserCodingKeys::id"));
    assert!(!output.contains("Serialize"));
}

#[test]
fn expand_derive___config_disables_bridge___no_serde_impls() {
    let config = GeneratorConfig {
        serde_bridge: false,
        ..GeneratorConfig::default()
    };
    let input: DeriveInput = parse_quote! {
        struct User { id: u64 }
    };

    let output = compact(&expand_derive(&input, &config));

    assert!(!output.contains("serde::Serialize"));
    assert!(output.contains("Decodable"));
}

#[test]
fn expand_derive___custom_suffix___renames_key_table() {
    let config = GeneratorConfig {
        key_table_suffix: "Keys".into(),
        ..GeneratorConfig::default()
    };
    let input: DeriveInput = parse_quote! {
        struct User { id: u64 }
    };

    let output = compact(&expand_derive(&input, &config));

    assert!(output.contains("enumUserKeys{id,}"));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn expand_derive___enum_target___only_compile_error() {
    let output = expand(parse_quote! {
        enum Shape { Circle, Square }
    });

    assert!(output.contains("compile_error!"));
    assert!(output.contains("[D001]"));
    assert!(!output.contains("CodingKeys"));
}

#[test]
fn expand_derive___attribute_error___skips_generation() {
    let output = expand(parse_quote! {
        struct User {
            #[codify(rename)]
            id: u64,
        }
    });

    assert!(output.contains("[E002]"));
    assert!(!output.contains("Decodable"));
}

#[test]
fn expand_derive___missing_default___error_but_artifacts_still_emitted() {
    let output = expand(parse_quote! {
        struct Post {
            #[codify(default)]
            title: String,
            body: String,
        }
    });

    assert!(output.contains("[E009]"));
    assert!(output.contains("title:::core::default::Default::default()"));
    assert!(output.contains("body:__container.decode(PostCodingKeys::body)?"));
}

#[test]
fn expand_derive___custom_key_with_case___deprecated_warning() {
    let output = expand(parse_quote! {
        struct User {
            #[codify(rename = "ID", case = "UPPERCASE")]
            id: u64,
        }
    });

    assert!(output.contains("#[deprecated(note="));
    assert!(output.contains("[K002]"));
    assert!(output.contains("Self::id=>\"ID\""));
    assert!(!output.contains("compile_error"));
}

#[test]
fn expand_derive___invalid_default_expression___internal_error() {
    let input: DeriveInput = parse_quote! {
        struct Post { title: String }
    };
    let mut parsed = syntax::parse_derive_input(&input);
    parsed.decl.fields[0].initializer = Some("let".into());
    let config = GeneratorConfig::default();
    let outcome = orchestrator::generate(&parsed.decl, &config);

    let output = compact(&render(&input, &parsed, &outcome, &config));

    assert!(output.contains("[E099]"));
    assert!(!output.contains("Decodable"));
}

#[derive(Default)]
struct RecordingSink {
    codes: Mutex<Vec<String>>,
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, _type_name: &str, diagnostic: &Diagnostic) {
        self.codes.lock().unwrap().push(diagnostic.code().to_string());
    }
}

#[test]
fn expand_derive_with_sink___reports_front_end_then_engine_diagnostics() {
    let input: DeriveInput = parse_quote! {
        struct User {
            #[codify(no_serde)]
            id: u64,
            #[codify(default)]
            name: String,
        }
    };
    let sink = RecordingSink::default();

    let _ = expand_derive_with_sink(&input, &GeneratorConfig::default(), &sink);

    assert_eq!(*sink.codes.lock().unwrap(), vec!["E006", "E009"]);
}
