//! Lossless scalar coercion.
//!
//! A lossless field accepts several wire representations of a scalar and
//! normalizes them to one in-memory form. For strings that means:
//!
//! | Wire value | Decoded |
//! |------------|---------|
//! | `"abc"` | `"abc"` |
//! | `true` | `"true"` |
//! | `42`, `-7` | `"42"`, `"-7"` |
//!
//! Floats and `null` are rejected; their textual form is not stable across
//! producers.

use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Types that can be decoded through a coercing container
pub trait LosslessDecoding: Sized {
    /// Wire-side representation that performs the coercion
    type Container: DeserializeOwned;

    fn from_container(container: Self::Container) -> Self;
}

/// Accepts a string, boolean or integer and keeps its text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LosslessStringContainer(String);

impl LosslessStringContainer {
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for LosslessStringContainer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LosslessVisitor;

        impl Visitor<'_> for LosslessVisitor {
            type Value = LosslessStringContainer;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a string, boolean or integer")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(LosslessStringContainer(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(LosslessStringContainer(value))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
                Ok(LosslessStringContainer(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(LosslessStringContainer(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(LosslessStringContainer(value.to_string()))
            }

            fn visit_i128<E: de::Error>(self, value: i128) -> Result<Self::Value, E> {
                Ok(LosslessStringContainer(value.to_string()))
            }

            fn visit_u128<E: de::Error>(self, value: u128) -> Result<Self::Value, E> {
                Ok(LosslessStringContainer(value.to_string()))
            }
        }

        deserializer.deserialize_any(LosslessVisitor)
    }
}

impl LosslessDecoding for String {
    type Container = LosslessStringContainer;

    fn from_container(container: Self::Container) -> Self {
        container.into_inner()
    }
}

/// A value that decodes losslessly even without the field attribute.
///
/// Serializes as the inner value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LosslessValue<T>(pub T);

impl<T> LosslessValue<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for LosslessValue<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for LosslessValue<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> From<T> for LosslessValue<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T: fmt::Display> fmt::Display for LosslessValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: LosslessDecoding> LosslessDecoding for LosslessValue<T> {
    type Container = T::Container;

    fn from_container(container: Self::Container) -> Self {
        Self(T::from_container(container))
    }
}

impl<T: Serialize> Serialize for LosslessValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T: LosslessDecoding> Deserialize<'de> for LosslessValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::Container::deserialize(deserializer).map(|container| Self(T::from_container(container)))
    }
}
