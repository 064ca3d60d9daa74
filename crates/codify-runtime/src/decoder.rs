//! Decoding side of the keyed containers.

use crate::error::{CodingError, kind_name};
use crate::key::CodingKey;
use crate::lossless::LosslessDecoding;
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;

/// Holds a parsed JSON document for a decode routine
#[derive(Debug, Clone, PartialEq)]
pub struct Decoder {
    value: Value,
}

impl Decoder {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Parse `text` as JSON
    pub fn from_json_str(text: &str) -> Result<Self, CodingError> {
        Ok(Self::new(serde_json::from_str(text)?))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// View the document as an object keyed by `K`
    pub fn container<K: CodingKey>(&self) -> Result<KeyedDecodingContainer<'_, K>, CodingError> {
        match &self.value {
            Value::Object(object) => Ok(KeyedDecodingContainer {
                object,
                _keys: PhantomData,
            }),
            other => Err(CodingError::NotAnObject {
                found: kind_name(other),
            }),
        }
    }
}

/// Read access to a JSON object through a closed key set.
///
/// Every read deserializes straight from the borrowed value without cloning.
#[derive(Debug)]
pub struct KeyedDecodingContainer<'a, K> {
    object: &'a Map<String, Value>,
    _keys: PhantomData<fn() -> K>,
}

impl<'a, K: CodingKey> KeyedDecodingContainer<'a, K> {
    /// True when the key is present, even if its value is `null`
    pub fn contains(&self, key: K) -> bool {
        self.object.contains_key(key.string_value())
    }

    /// Keys of `K` present in the object
    pub fn all_keys(&self) -> Vec<K> {
        K::all_keys()
            .iter()
            .copied()
            .filter(|key| self.contains(*key))
            .collect()
    }

    /// Decode a required value.
    pub fn decode<T: DeserializeOwned>(&self, key: K) -> Result<T, CodingError> {
        let name = key.string_value();
        let value = self.object.get(name).ok_or_else(|| CodingError::KeyNotFound {
            key: name.to_string(),
        })?;
        T::deserialize(value).map_err(|err| {
            if value.is_null() {
                CodingError::ValueNotFound {
                    key: name.to_string(),
                }
            } else {
                mismatch(name, &err)
            }
        })
    }

    /// Decode a value that may be absent; `null` counts as absent.
    pub fn decode_if_present<T: DeserializeOwned>(&self, key: K) -> Result<Option<T>, CodingError> {
        let name = key.string_value();
        match self.object.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => T::deserialize(value)
                .map(Some)
                .map_err(|err| mismatch(name, &err)),
        }
    }

    /// Decode an array of `X` into `C`, dropping `null` elements
    pub fn decode_compacted<X, C>(&self, key: K) -> Result<C, CodingError>
    where
        X: DeserializeOwned,
        C: FromIterator<X>,
    {
        let elements: Vec<Option<X>> = self.decode(key)?;
        Ok(elements.into_iter().flatten().collect())
    }

    pub fn decode_compacted_if_present<X, C>(&self, key: K) -> Result<Option<C>, CodingError>
    where
        X: DeserializeOwned,
        C: FromIterator<X>,
    {
        Ok(self
            .decode_if_present::<Vec<Option<X>>>(key)?
            .map(|elements| elements.into_iter().flatten().collect()))
    }

    /// Decode an object into `C`, dropping entries whose value is `null`
    pub fn decode_compacted_map<MK, V, C>(&self, key: K) -> Result<C, CodingError>
    where
        MK: DeserializeOwned,
        V: DeserializeOwned,
        C: FromIterator<(MK, V)>,
    {
        let entries: NullFilteredEntries<MK, V> = self.decode(key)?;
        Ok(entries.0.into_iter().collect())
    }

    pub fn decode_compacted_map_if_present<MK, V, C>(&self, key: K) -> Result<Option<C>, CodingError>
    where
        MK: DeserializeOwned,
        V: DeserializeOwned,
        C: FromIterator<(MK, V)>,
    {
        Ok(self
            .decode_if_present::<NullFilteredEntries<MK, V>>(key)?
            .map(|entries| entries.0.into_iter().collect()))
    }

    /// Decode through `T`'s lossless container
    pub fn decode_lossless<T: LosslessDecoding>(&self, key: K) -> Result<T, CodingError> {
        self.decode::<T::Container>(key).map(T::from_container)
    }

    pub fn decode_lossless_if_present<T: LosslessDecoding>(
        &self,
        key: K,
    ) -> Result<Option<T>, CodingError> {
        Ok(self
            .decode_if_present::<T::Container>(key)?
            .map(T::from_container))
    }
}

fn mismatch(key: &str, err: &serde_json::Error) -> CodingError {
    CodingError::TypeMismatch {
        key: key.to_string(),
        message: err.to_string(),
    }
}

/// Map entries with `null` values removed
struct NullFilteredEntries<K, V>(Vec<(K, V)>);

impl<'de, K, V> Deserialize<'de> for NullFilteredEntries<K, V>
where
    K: Deserialize<'de>,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<K, V>(PhantomData<(K, V)>);

        impl<'de, K, V> Visitor<'de> for EntriesVisitor<K, V>
        where
            K: Deserialize<'de>,
            V: Deserialize<'de>,
        {
            type Value = NullFilteredEntries<K, V>;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<K, Option<V>>()? {
                    if let Some(value) = value {
                        entries.push((key, value));
                    }
                }
                Ok(NullFilteredEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[cfg(test)]
#[path = "decoder/decoder_tests.rs"]
mod decoder_tests;
