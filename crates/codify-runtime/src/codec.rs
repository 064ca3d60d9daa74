//! Coding traits and JSON entry points

use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::CodingError;
use serde_json::Value;

/// A type with a decode routine, generated or hand-written
pub trait Decodable: Sized {
    fn from_decoder(decoder: &Decoder) -> Result<Self, CodingError>;
}

/// A type with an encode routine, generated or hand-written
pub trait Encodable {
    fn encode(&self, encoder: &mut Encoder) -> Result<(), CodingError>;
}

/// JSON codec for [`Decodable`] / [`Encodable`] types
#[derive(Debug, Clone, Default)]
pub struct JsonCodec {
    /// Whether to pretty-print output (default: false for efficiency)
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Create a JSON codec that pretty-prints output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn encode_string<T: Encodable + ?Sized>(&self, value: &T) -> Result<String, CodingError> {
        let value = to_json_value(value)?;
        if self.pretty {
            serde_json::to_string_pretty(&value).map_err(Into::into)
        } else {
            serde_json::to_string(&value).map_err(Into::into)
        }
    }

    pub fn encode<T: Encodable + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodingError> {
        let value = to_json_value(value)?;
        if self.pretty {
            serde_json::to_vec_pretty(&value).map_err(Into::into)
        } else {
            serde_json::to_vec(&value).map_err(Into::into)
        }
    }

    pub fn decode_str<T: Decodable>(&self, data: &str) -> Result<T, CodingError> {
        T::from_decoder(&Decoder::from_json_str(data)?)
    }

    pub fn decode<T: Decodable>(&self, data: &[u8]) -> Result<T, CodingError> {
        from_json_value(serde_json::from_slice(data)?)
    }
}

pub fn from_json_value<T: Decodable>(value: Value) -> Result<T, CodingError> {
    T::from_decoder(&Decoder::new(value))
}

pub fn from_json_str<T: Decodable>(text: &str) -> Result<T, CodingError> {
    JsonCodec::new().decode_str(text)
}

pub fn to_json_value<T: Encodable + ?Sized>(value: &T) -> Result<Value, CodingError> {
    let mut encoder = Encoder::new();
    value.encode(&mut encoder)?;
    Ok(encoder.into_value())
}

pub fn to_json_string<T: Encodable + ?Sized>(value: &T) -> Result<String, CodingError> {
    JsonCodec::new().encode_string(value)
}

pub fn to_json_string_pretty<T: Encodable + ?Sized>(value: &T) -> Result<String, CodingError> {
    JsonCodec::pretty().encode_string(value)
}
