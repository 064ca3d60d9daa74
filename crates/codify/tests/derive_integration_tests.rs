//! Derive Integration Tests
//!
//! These tests run `#[derive(Codify)]` end to end:
//! - Wire key resolution (rename, case styles, prefix/suffix)
//! - Defaults, null filtering and lossless coercion while decoding
//! - Encoding of optional, skipped and nested fields
//! - Hand-written members and the serde bridge

#![allow(non_snake_case)]

use codify::{Codify, CodingError, CodingKey, Decodable, Decoder, Encodable, JsonCodec, LosslessValue};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use test_case::test_case;

#[derive(Debug, PartialEq, Codify)]
#[codify(case = "camelCase")]
struct Profile {
    user_name: String,
    #[codify(rename = "avatar")]
    avatar_url: Option<String>,
    #[codify(default = 18)]
    age: u32,
    #[codify(default = "en")]
    locale: String,
}

#[derive(Debug, PartialEq, Codify)]
struct Readings {
    #[codify(skip_null)]
    values: Vec<i32>,
    #[codify(skip_null)]
    tags: BTreeSet<String>,
    #[codify(skip_null)]
    limits: BTreeMap<String, i32>,
    #[codify(skip_null)]
    extra: Option<Vec<i32>>,
}

#[derive(Debug, PartialEq, Codify)]
struct Account {
    #[codify(lossless)]
    id: String,
    #[codify(lossless)]
    external_id: Option<String>,
    code: LosslessValue<String>,
}

#[derive(Debug, PartialEq, Codify)]
#[codify(case = "kebab-case", prefix = "x-")]
struct Headers {
    request_id: String,
    #[codify(prefix = "h-")]
    content_type: String,
    #[codify(suffix = "-ms")]
    timeout: u64,
}

#[derive(Debug, PartialEq, Codify)]
struct Session {
    token: String,
    #[codify(skip)]
    cache: Vec<u8>,
    r#type: String,
}

#[derive(Debug, PartialEq, Codify)]
struct Member {
    name: String,
}

#[derive(Debug, PartialEq, Codify)]
#[codify(case = "PascalCase")]
struct Team {
    lead: Member,
    members: Vec<Member>,
    backup: Option<Member>,
}

#[derive(Debug, PartialEq, Codify)]
struct Page<T> {
    items: Vec<T>,
    total: u32,
}

#[derive(Debug, PartialEq, Codify)]
#[codify(manual_keys)]
struct Point {
    x: i32,
    y: i32,
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointCodingKeys {
    x,
    y,
}

impl CodingKey for PointCodingKeys {
    fn string_value(&self) -> &'static str {
        match self {
            PointCodingKeys::x => "X",
            PointCodingKeys::y => "Y",
        }
    }

    fn all_keys() -> &'static [Self] {
        &[PointCodingKeys::x, PointCodingKeys::y]
    }
}

#[derive(Debug, PartialEq, Codify)]
#[codify(manual_decode)]
struct Celsius {
    degrees: f64,
}

impl Decodable for Celsius {
    fn from_decoder(decoder: &Decoder) -> Result<Self, CodingError> {
        let container = decoder.container::<CelsiusCodingKeys>()?;
        let fahrenheit: f64 = container.decode(CelsiusCodingKeys::degrees)?;
        Ok(Self {
            degrees: (fahrenheit - 32.0) * 5.0 / 9.0,
        })
    }
}

#[derive(Debug, PartialEq, Codify)]
#[codify(no_serde)]
struct Plain {
    value: u8,
}

impl serde::Serialize for Plain {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("plain")
    }
}

// ============================================================================
// Key table tests
// ============================================================================

#[test]
fn ProfileCodingKeys___string_values___resolved_keys() {
    let keys: Vec<&str> = ProfileCodingKeys::all_keys()
        .iter()
        .map(CodingKey::string_value)
        .collect();

    assert_eq!(keys, vec!["userName", "avatar", "age", "locale"]);
}

#[test]
fn ProfileCodingKeys___from_string_value___reverse_lookup() {
    assert_eq!(
        ProfileCodingKeys::from_string_value("avatar"),
        Some(ProfileCodingKeys::avatar_url)
    );
    assert_eq!(ProfileCodingKeys::from_string_value("avatar_url"), None);
}

#[test]
fn HeadersCodingKeys___prefix_and_suffix___field_overrides_type() {
    let keys: Vec<&str> = HeadersCodingKeys::all_keys()
        .iter()
        .map(CodingKey::string_value)
        .collect();

    assert_eq!(keys, vec!["x-request-id", "h-content-type", "x-timeout-ms"]);
}

#[test]
fn SessionCodingKeys___skipped_and_raw_fields___skip_omitted_raw_plain() {
    let keys: Vec<&str> = SessionCodingKeys::all_keys()
        .iter()
        .map(CodingKey::string_value)
        .collect();

    assert_eq!(keys, vec!["token", "type"]);
}

// ============================================================================
// Decode tests
// ============================================================================

#[test]
fn Profile___all_keys_present___decoded() {
    let profile: Profile = codify::from_json_value(json!({
        "userName": "ann",
        "avatar": "a.png",
        "age": 30,
        "locale": "fr"
    }))
    .unwrap();

    assert_eq!(
        profile,
        Profile {
            user_name: "ann".to_string(),
            avatar_url: Some("a.png".to_string()),
            age: 30,
            locale: "fr".to_string(),
        }
    );
}

#[test_case(json!({"userName": "ann"}) ; "absent")]
#[test_case(json!({"userName": "ann", "avatar": null, "age": null, "locale": null}) ; "null")]
fn Profile___optional_and_defaulted_keys___fallbacks(input: serde_json::Value) {
    let profile: Profile = codify::from_json_value(input).unwrap();

    assert_eq!(profile.avatar_url, None);
    assert_eq!(profile.age, 18);
    assert_eq!(profile.locale, "en");
}

#[test]
fn Profile___missing_required_key___key_not_found() {
    let err = codify::from_json_str::<Profile>(r#"{"age": 3}"#).unwrap_err();

    assert_eq!(
        err,
        CodingError::KeyNotFound {
            key: "userName".to_string()
        }
    );
}

#[test]
fn Profile___null_required_key___value_not_found() {
    let err = codify::from_json_str::<Profile>(r#"{"userName": null}"#).unwrap_err();

    assert_eq!(
        err,
        CodingError::ValueNotFound {
            key: "userName".to_string()
        }
    );
}

#[test]
fn Profile___wrong_type___mismatch_names_key() {
    let err = codify::from_json_str::<Profile>(r#"{"userName": "ann", "age": "old"}"#).unwrap_err();

    assert!(matches!(err, CodingError::TypeMismatch { .. }));
    assert_eq!(err.key(), Some("age"));
}

#[test]
fn Profile___not_an_object___not_an_object() {
    let err = codify::from_json_str::<Profile>("[1, 2]").unwrap_err();

    assert!(matches!(err, CodingError::NotAnObject { .. }));
}

#[test]
fn Readings___nulls_in_collections___dropped() {
    let readings: Readings = codify::from_json_value(json!({
        "values": [1, 2, null, 4, null],
        "tags": ["a", null, "b", "a"],
        "limits": {"low": 1, "high": null},
        "extra": [null, 7]
    }))
    .unwrap();

    assert_eq!(readings.values, vec![1, 2, 4]);
    assert_eq!(
        readings.tags,
        BTreeSet::from(["a".to_string(), "b".to_string()])
    );
    assert_eq!(readings.limits, BTreeMap::from([("low".to_string(), 1)]));
    assert_eq!(readings.extra, Some(vec![7]));
}

#[test]
fn Readings___optional_collection_absent___none() {
    let readings: Readings = codify::from_json_value(json!({
        "values": [],
        "tags": [],
        "limits": {}
    }))
    .unwrap();

    assert_eq!(readings.extra, None);
}

#[test_case(json!("abc"), "abc" ; "string")]
#[test_case(json!(42), "42" ; "integer")]
#[test_case(json!(-7), "-7" ; "negative")]
#[test_case(json!(true), "true" ; "boolean")]
fn Account___lossless_field___coerced_to_text(wire: serde_json::Value, expected: &str) {
    let account: Account = codify::from_json_value(json!({
        "id": wire.clone(),
        "code": wire
    }))
    .unwrap();

    assert_eq!(account.id, expected);
    assert_eq!(account.external_id, None);
    assert_eq!(*account.code, expected);
}

#[test]
fn Account___lossless_float___mismatch() {
    let err = codify::from_json_str::<Account>(r#"{"id": 1.5, "code": "x"}"#).unwrap_err();

    assert_eq!(err.key(), Some("id"));
}

#[test]
fn Session___skipped_field___defaulted_and_ignored_on_wire() {
    let session: Session = codify::from_json_value(json!({
        "token": "t",
        "cache": [1, 2, 3],
        "type": "bearer"
    }))
    .unwrap();

    assert!(session.cache.is_empty());
    assert_eq!(session.r#type, "bearer");
}

#[test]
fn Team___nested_codify_types___decoded_through_bridge() {
    let team: Team = codify::from_json_value(json!({
        "Lead": {"name": "ann"},
        "Members": [{"name": "bo"}, {"name": "cy"}]
    }))
    .unwrap();

    assert_eq!(team.lead.name, "ann");
    assert_eq!(team.members.len(), 2);
    assert_eq!(team.backup, None);
}

#[test]
fn Page___generic_type___decoded() {
    let page: Page<Member> =
        codify::from_json_str(r#"{"items": [{"name": "ann"}], "total": 1}"#).unwrap();

    assert_eq!(page.items[0].name, "ann");
    assert_eq!(page.total, 1);
}

// ============================================================================
// Encode tests
// ============================================================================

#[test]
fn Profile___encode___resolved_keys_and_absent_optionals_omitted() {
    let profile = Profile {
        user_name: "ann".to_string(),
        avatar_url: None,
        age: 30,
        locale: "en".to_string(),
    };

    let value = codify::to_json_value(&profile).unwrap();

    assert_eq!(value, json!({"userName": "ann", "age": 30, "locale": "en"}));
}

#[test]
fn Session___encode___skipped_field_not_written() {
    let session = Session {
        token: "t".to_string(),
        cache: vec![1],
        r#type: "bearer".to_string(),
    };

    let value = codify::to_json_value(&session).unwrap();

    assert_eq!(value, json!({"token": "t", "type": "bearer"}));
}

#[test]
fn Team___encode_then_decode___same_value() {
    let team = Team {
        lead: Member {
            name: "ann".to_string(),
        },
        members: vec![Member {
            name: "bo".to_string(),
        }],
        backup: Some(Member {
            name: "cy".to_string(),
        }),
    };

    let text = codify::to_json_string(&team).unwrap();
    let decoded: Team = codify::from_json_str(&text).unwrap();

    assert_eq!(decoded, team);
}

#[test]
fn JsonCodec___pretty___multiline_output() {
    let member = Member {
        name: "ann".to_string(),
    };

    let text = JsonCodec::pretty().encode_string(&member).unwrap();

    assert_eq!(text, "{\n  \"name\": \"ann\"\n}");
}

// ============================================================================
// Hand-written member tests
// ============================================================================

#[test]
fn Point___manual_keys___routines_use_hand_written_table() {
    let point: Point = codify::from_json_str(r#"{"X": 1, "Y": 2}"#).unwrap();

    assert_eq!(point, Point { x: 1, y: 2 });
    assert_eq!(codify::to_json_value(&point).unwrap(), json!({"X": 1, "Y": 2}));
}

#[test]
fn Celsius___manual_decode___hand_written_routine_used() {
    let celsius: Celsius = codify::from_json_str(r#"{"degrees": 212.0}"#).unwrap();

    assert_eq!(celsius.degrees, 100.0);
    // Encode is still generated
    assert_eq!(
        codify::to_json_value(&celsius).unwrap(),
        json!({"degrees": 100.0})
    );
}

// ============================================================================
// Serde bridge tests
// ============================================================================

#[test]
fn Profile___serde_json___routed_through_generated_routines() {
    let profile: Profile = serde_json::from_str(r#"{"userName": "ann"}"#).unwrap();

    assert_eq!(profile.age, 18);
    assert_eq!(
        serde_json::to_value(&profile).unwrap(),
        json!({"userName": "ann", "age": 18, "locale": "en"})
    );
}

#[test]
fn Profile___serde_json_error___carries_coding_error_text() {
    let err = serde_json::from_str::<Profile>(r#"{"age": 1}"#).unwrap_err();

    assert!(err.to_string().contains("userName"));
}

#[test]
fn Plain___no_serde___hand_written_serialize_kept() {
    let plain = Plain { value: 3 };

    assert_eq!(serde_json::to_value(&plain).unwrap(), json!("plain"));
    assert_eq!(codify::to_json_value(&plain).unwrap(), json!({"value": 3}));
}

#[test]
fn Encodable___used_directly___writes_into_encoder() {
    let member = Member {
        name: "ann".to_string(),
    };
    let mut encoder = codify::Encoder::new();

    member.encode(&mut encoder).unwrap();

    assert_eq!(encoder.into_value(), json!({"name": "ann"}));
}
