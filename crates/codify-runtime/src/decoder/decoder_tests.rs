#![allow(non_snake_case)]

use super::*;
use crate::lossless::LosslessValue;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use test_case::test_case;

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedKeys {
    id,
    title,
    tags,
    scores,
}

impl CodingKey for FeedKeys {
    fn string_value(&self) -> &'static str {
        match self {
            FeedKeys::id => "id",
            FeedKeys::title => "feed_title",
            FeedKeys::tags => "tags",
            FeedKeys::scores => "scores",
        }
    }

    fn all_keys() -> &'static [Self] {
        &[FeedKeys::id, FeedKeys::title, FeedKeys::tags, FeedKeys::scores]
    }
}

fn decoder(value: Value) -> Decoder {
    Decoder::new(value)
}

// ============================================================================
// Containers
// ============================================================================

#[test_case(json!([1, 2]), "an array")]
#[test_case(json!("text"), "a string")]
#[test_case(json!(null), "null")]
fn Decoder___container_on_non_object___not_an_object(value: Value, found: &'static str) {
    let decoder = decoder(value);

    let err = decoder.container::<FeedKeys>().unwrap_err();

    assert_eq!(err, CodingError::NotAnObject { found });
}

#[test]
fn Decoder___from_json_str___invalid_json_returns_error() {
    assert!(Decoder::from_json_str("{not json").is_err());
}

#[test]
fn KeyedDecodingContainer___all_keys___only_present_keys_in_key_order() {
    let decoder = decoder(json!({"tags": null, "id": 1, "unrelated": 2}));
    let container = decoder.container::<FeedKeys>().unwrap();

    assert_eq!(container.all_keys(), vec![FeedKeys::id, FeedKeys::tags]);
    assert!(container.contains(FeedKeys::tags));
    assert!(!container.contains(FeedKeys::title));
}

// ============================================================================
// Required and optional values
// ============================================================================

#[test]
fn KeyedDecodingContainer___decode___reads_wire_key() {
    let decoder = decoder(json!({"id": 7, "feed_title": "news"}));
    let container = decoder.container::<FeedKeys>().unwrap();

    let id: u64 = container.decode(FeedKeys::id).unwrap();
    let title: String = container.decode(FeedKeys::title).unwrap();

    assert_eq!(id, 7);
    assert_eq!(title, "news");
}

#[test]
fn KeyedDecodingContainer___decode_missing___key_not_found() {
    let decoder = decoder(json!({}));
    let container = decoder.container::<FeedKeys>().unwrap();

    let err = container.decode::<String>(FeedKeys::title).unwrap_err();

    assert_eq!(
        err,
        CodingError::KeyNotFound {
            key: "feed_title".into()
        }
    );
}

#[test]
fn KeyedDecodingContainer___decode_null___value_not_found() {
    let decoder = decoder(json!({"feed_title": null}));
    let container = decoder.container::<FeedKeys>().unwrap();

    let err = container.decode::<String>(FeedKeys::title).unwrap_err();

    assert_eq!(
        err,
        CodingError::ValueNotFound {
            key: "feed_title".into()
        }
    );
}

#[test]
fn KeyedDecodingContainer___decode_wrong_type___type_mismatch() {
    let decoder = decoder(json!({"id": "seven"}));
    let container = decoder.container::<FeedKeys>().unwrap();

    let err = container.decode::<u64>(FeedKeys::id).unwrap_err();

    assert!(matches!(err, CodingError::TypeMismatch { ref key, .. } if key == "id"));
}

#[test_case(json!({}) ; "absent")]
#[test_case(json!({"feed_title": null}) ; "null")]
fn KeyedDecodingContainer___decode_if_present___absent_or_null_is_none(value: Value) {
    let decoder = decoder(value);
    let container = decoder.container::<FeedKeys>().unwrap();

    let title: Option<String> = container.decode_if_present(FeedKeys::title).unwrap();

    assert_eq!(title, None);
}

#[test]
fn KeyedDecodingContainer___decode_if_present_wrong_type___still_an_error() {
    let decoder = decoder(json!({"feed_title": 12}));
    let container = decoder.container::<FeedKeys>().unwrap();

    assert!(container.decode_if_present::<String>(FeedKeys::title).is_err());
}

// ============================================================================
// Null-filtered collections
// ============================================================================

#[test]
fn KeyedDecodingContainer___decode_compacted___drops_null_elements() {
    let decoder = decoder(json!({"id": [1, 2, null, 4, null]}));
    let container = decoder.container::<FeedKeys>().unwrap();

    let ids: Vec<i32> = container.decode_compacted::<i32, _>(FeedKeys::id).unwrap();

    assert_eq!(ids, vec![1, 2, 4]);
}

#[test]
fn KeyedDecodingContainer___decode_compacted_into_set___collapses_duplicates() {
    let decoder = decoder(json!({"tags": ["b", null, "a", "b"]}));
    let container = decoder.container::<FeedKeys>().unwrap();

    let tags: BTreeSet<String> = container
        .decode_compacted::<String, _>(FeedKeys::tags)
        .unwrap();

    assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn KeyedDecodingContainer___decode_compacted_bad_element___type_mismatch() {
    let decoder = decoder(json!({"id": [1, "two"]}));
    let container = decoder.container::<FeedKeys>().unwrap();

    let result = container.decode_compacted::<i32, Vec<i32>>(FeedKeys::id);

    assert!(matches!(result, Err(CodingError::TypeMismatch { .. })));
}

#[test_case(json!({}), None ; "absent")]
#[test_case(json!({"tags": null}), None ; "null")]
#[test_case(json!({"tags": [null, "x"]}), Some(vec!["x".to_string()]) ; "present")]
fn KeyedDecodingContainer___decode_compacted_if_present(value: Value, expected: Option<Vec<String>>) {
    let decoder = decoder(value);
    let container = decoder.container::<FeedKeys>().unwrap();

    let tags: Option<Vec<String>> = container
        .decode_compacted_if_present::<String, _>(FeedKeys::tags)
        .unwrap();

    assert_eq!(tags, expected);
}

#[test]
fn KeyedDecodingContainer___decode_compacted_map___drops_null_values() {
    let decoder = decoder(json!({"scores": {"a": 1.5, "b": null, "c": 3.0}}));
    let container = decoder.container::<FeedKeys>().unwrap();

    let scores: BTreeMap<String, f64> = container
        .decode_compacted_map::<String, f64, _>(FeedKeys::scores)
        .unwrap();

    assert_eq!(scores.len(), 2);
    assert_eq!(scores.get("a"), Some(&1.5));
    assert!(!scores.contains_key("b"));
}

#[test]
fn KeyedDecodingContainer___decode_compacted_map___integer_keys_parse() {
    let decoder = decoder(json!({"scores": {"1": "one", "2": null}}));
    let container = decoder.container::<FeedKeys>().unwrap();

    let scores: HashMap<u32, String> = container
        .decode_compacted_map::<u32, String, _>(FeedKeys::scores)
        .unwrap();

    assert_eq!(scores, HashMap::from([(1, "one".to_string())]));
}

#[test]
fn KeyedDecodingContainer___decode_compacted_map_if_present___absent_is_none() {
    let decoder = decoder(json!({}));
    let container = decoder.container::<FeedKeys>().unwrap();

    let scores: Option<BTreeMap<String, i64>> = container
        .decode_compacted_map_if_present::<String, i64, _>(FeedKeys::scores)
        .unwrap();

    assert!(scores.is_none());
}

// ============================================================================
// Lossless
// ============================================================================

#[test_case(json!("abc"), "abc")]
#[test_case(json!(true), "true")]
#[test_case(json!(42), "42")]
#[test_case(json!(-7), "-7")]
#[test_case(json!(u64::MAX), "18446744073709551615")]
fn KeyedDecodingContainer___decode_lossless___normalizes_to_string(value: Value, expected: &str) {
    let decoder = decoder(json!({ "id": value }));
    let container = decoder.container::<FeedKeys>().unwrap();

    let id: String = container.decode_lossless(FeedKeys::id).unwrap();

    assert_eq!(id, expected);
}

#[test_case(json!(1.5) ; "float")]
#[test_case(json!([1]) ; "array")]
fn KeyedDecodingContainer___decode_lossless_unsupported___type_mismatch(value: Value) {
    let decoder = decoder(json!({ "id": value }));
    let container = decoder.container::<FeedKeys>().unwrap();

    let result = container.decode_lossless::<String>(FeedKeys::id);

    assert!(matches!(result, Err(CodingError::TypeMismatch { .. })));
}

#[test]
fn KeyedDecodingContainer___decode_lossless_null___value_not_found() {
    let decoder = decoder(json!({ "id": null }));
    let container = decoder.container::<FeedKeys>().unwrap();

    let result = container.decode_lossless::<String>(FeedKeys::id);

    assert!(matches!(result, Err(CodingError::ValueNotFound { .. })));
}

#[test]
fn KeyedDecodingContainer___decode_lossless_if_present___wrapper_target() {
    let decoder = decoder(json!({ "id": 5 }));
    let container = decoder.container::<FeedKeys>().unwrap();

    let id: Option<LosslessValue<String>> = container.decode_lossless_if_present(FeedKeys::id).unwrap();
    let title: Option<String> = container.decode_lossless_if_present(FeedKeys::title).unwrap();

    assert_eq!(id.as_deref().map(String::as_str), Some("5"));
    assert!(title.is_none());
}
