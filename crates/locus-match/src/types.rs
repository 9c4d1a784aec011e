//! Value types shared by the trie, dictionary and matcher.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a feature category, such as "amenity-cafe".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dictionary locale, stored as a lowercased language code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Creates a locale, lowercasing the code.
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_lowercase())
    }

    /// The locale code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self::new(&code)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_is_case_insensitive() {
        assert_eq!(Locale::new(" EN "), Locale::from("en"));
        assert_eq!(Locale::new("pt-BR").as_str(), "pt-br");
    }

    #[test]
    fn type_id_displays_raw_value() {
        assert_eq!(TypeId(42).to_string(), "42");
    }
}
