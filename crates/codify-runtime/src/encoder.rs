//! Encoding side of the keyed containers

use crate::error::CodingError;
use crate::key::CodingKey;
use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Collects the object produced by an encode routine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoder {
    object: Map<String, Value>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write access keyed by `K`
    pub fn container<K: CodingKey>(&mut self) -> KeyedEncodingContainer<'_, K> {
        KeyedEncodingContainer {
            object: &mut self.object,
            _keys: PhantomData,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.object)
    }
}

/// Write access to the encoder's object through a closed key set
#[derive(Debug)]
pub struct KeyedEncodingContainer<'a, K> {
    object: &'a mut Map<String, Value>,
    _keys: PhantomData<fn() -> K>,
}

impl<K: CodingKey> KeyedEncodingContainer<'_, K> {
    /// Write `value` under `key`, replacing any earlier value
    pub fn encode<T: Serialize + ?Sized>(&mut self, value: &T, key: K) -> Result<(), CodingError> {
        let name = key.string_value();
        let value = serde_json::to_value(value)
            .map_err(|err| CodingError::Serialization(format!("`{name}`: {err}")))?;
        self.object.insert(name.to_string(), value);
        Ok(())
    }

    /// Write `value` when present; the key is omitted otherwise
    pub fn encode_if_present<T: Serialize + ?Sized>(
        &mut self,
        value: Option<&T>,
        key: K,
    ) -> Result<(), CodingError> {
        match value {
            Some(value) => self.encode(value, key),
            None => Ok(()),
        }
    }
}
