//! # codify
//!
//! Declarative wire keys, defaults and lenient decoding for Rust structs.
//!
//! `#[derive(Codify)]` generates, for a struct with named fields:
//! - a `<Type>CodingKeys` enum holding each stored field's wire key
//! - [`Decodable`] and [`Encodable`] impls built on keyed containers
//! - `serde::Serialize` / `serde::Deserialize` impls routed through them
//!
//! ## Quick Start
//!
//! ```ignore
//! use codify::Codify;
//!
//! #[derive(Debug, Codify)]
//! #[codify(case = "camelCase")]
//! pub struct Profile {
//!     pub user_name: String,
//!     #[codify(rename = "avatar")]
//!     pub avatar_url: Option<String>,
//!     #[codify(default = 18)]
//!     pub age: u32,
//!     #[codify(skip_null)]
//!     pub scores: Vec<i32>,
//!     #[codify(lossless)]
//!     pub id: String,
//! }
//!
//! let profile: Profile = codify::from_json_str(
//!     r#"{"userName": "ann", "scores": [1, null, 3], "id": 42}"#,
//! )?;
//! assert_eq!(profile.age, 18);
//! assert_eq!(profile.scores, vec![1, 3]);
//! assert_eq!(profile.id, "42");
//! ```
//!
//! ## Attributes
//!
//! | Attribute | On | Effect |
//! |-----------|----|--------|
//! | `rename = "key"` | field | Use `key` verbatim |
//! | `case = "..."` | struct, field | Derive the key with a case style |
//! | `prefix = "..."` / `suffix = "..."` | struct, field | Wrap the derived key |
//! | `default = expr` | field | Fallback when the key is absent or `null` |
//! | `skip_null` | field | Drop `null` elements of arrays, sets and maps |
//! | `lossless` | field | Accept strings, booleans and integers for a `String` |
//! | `skip` | field | Not part of the wire format; filled with `Default` |
//! | `manual_keys` / `manual_decode` / `manual_encode` | struct | Keep a hand-written member |
//! | `no_serde` | struct | Do not emit the serde bridge |
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`codify_runtime`] - Coding traits, keyed containers and JSON entry points
//! - [`codify_macros`] - The `Codify` derive

// Re-export the derive
pub use codify_macros::Codify;

// Re-export runtime types
pub use codify_runtime::{
    CodingError, CodingKey, Decodable, Decoder, Encodable, Encoder, JsonCodec,
    KeyedDecodingContainer, KeyedEncodingContainer, LosslessDecoding, LosslessStringContainer,
    LosslessValue, from_json_str, from_json_value, to_json_string, to_json_string_pretty,
    to_json_value,
};

// Re-export common dependencies
pub use serde;
pub use serde_json;

#[doc(hidden)]
pub use codify_runtime::__private;

/// Prelude module for convenient imports.
///
/// Use `use codify::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        Codify, CodingError, CodingKey, Decodable, Decoder, Encodable, Encoder, JsonCodec,
        LosslessValue,
    };
}
