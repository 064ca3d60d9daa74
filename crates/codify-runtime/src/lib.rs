//! codify-runtime - Keyed containers for generated coding routines
//!
//! This crate provides:
//! - [`CodingKey`] for closed sets of wire keys
//! - [`Decoder`] / [`KeyedDecodingContainer`] and [`Encoder`] / [`KeyedEncodingContainer`]
//! - [`Decodable`] / [`Encodable`] traits and JSON entry points
//! - [`LosslessValue`] and the [`LosslessDecoding`] coercion

mod codec;
mod decoder;
mod encoder;
mod error;
mod key;
mod lossless;

pub use codec::{
    Decodable, Encodable, JsonCodec, from_json_str, from_json_value, to_json_string,
    to_json_string_pretty, to_json_value,
};
pub use decoder::{Decoder, KeyedDecodingContainer};
pub use encoder::{Encoder, KeyedEncodingContainer};
pub use error::CodingError;
pub use key::CodingKey;
pub use lossless::{LosslessDecoding, LosslessStringContainer, LosslessValue};

/// Support for generated code. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;

    use crate::{Decodable, Decoder, Encodable};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// `Serialize::serialize` body for types with an encode routine
    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Encodable + ?Sized,
        S: Serializer,
    {
        crate::to_json_value(value)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }

    /// `Deserialize::deserialize` body for types with a decode routine
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: Decodable,
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        T::from_decoder(&Decoder::new(value)).map_err(serde::de::Error::custom)
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CodingError, CodingKey, Decodable, Decoder, Encodable, Encoder, JsonCodec, LosslessValue,
    };
}
