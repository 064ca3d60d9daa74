//! Coding keys

/// A closed set of wire keys, usually a generated `<Type>CodingKeys` enum.
pub trait CodingKey: Copy + Send + Sync + 'static {
    /// The wire key
    fn string_value(&self) -> &'static str;

    /// Every key, in declaration order
    fn all_keys() -> &'static [Self];

    /// Reverse lookup by wire key
    fn from_string_value(value: &str) -> Option<Self> {
        Self::all_keys()
            .iter()
            .copied()
            .find(|key| key.string_value() == value)
    }
}
