//! Category dictionary loading.
//!
//! A dictionary is a TOML resource listing categories and their localized names:
//!
//! ```toml
//! [[category]]
//! id = 42
//! name = "amenity-cafe"
//!
//! [category.names]
//! en = ["cafe", "coffee shop"]
//! de = "Café"
//! ```
//!
//! Every name is sliced with the locale's delimiters and each resulting token is inserted into
//! that locale's trie, so multi-word names match word by word.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs,
    path::Path,
};

use locus_config::TokenizerSettings;
use locus_query::{Delimiters, slice};
use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
use tracing::debug;

use crate::{CategoryTrie, DictionaryError, Locale, TypeId};

/// A category and its names per locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Type id reported for matches.
    pub id: TypeId,
    /// Stable symbolic name, e.g. `amenity-cafe`.
    pub name: String,
    /// Synonyms per locale.
    pub names: BTreeMap<Locale, Vec<String>>,
}

impl Category {
    /// Creates a category with no names.
    pub fn new(id: TypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            names: BTreeMap::new(),
        }
    }

    /// Adds synonyms for `locale`.
    pub fn with_names<I, S>(mut self, locale: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names
            .entry(Locale::new(locale))
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }
}

/// Dictionary file layout.
#[derive(Debug, Deserialize)]
struct RawDictionary {
    /// `[[category]]` entries.
    #[serde(default)]
    category: Vec<RawCategory>,
}

/// One `[[category]]` entry.
#[serde_as]
#[derive(Debug, Deserialize)]
struct RawCategory {
    /// Type id.
    id: TypeId,
    /// Symbolic name.
    name: String,
    /// Synonyms per locale; each locale takes a single string or a list.
    #[serde_as(as = "BTreeMap<_, OneOrMany<_>>")]
    #[serde(default)]
    names: BTreeMap<String, Vec<String>>,
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        raw.names
            .into_iter()
            .fold(Self::new(raw.id, raw.name), |category, (locale, names)| {
                category.with_names(&locale, names)
            })
    }
}

/// Categories with one trie per locale. Read-only once built.
#[derive(Debug, Default)]
pub struct CategoryDictionary {
    /// Categories in file order.
    categories: Vec<Category>,
    /// Name tokens per locale.
    tries: HashMap<Locale, CategoryTrie>,
}

impl CategoryDictionary {
    /// Loads a dictionary from a TOML file.
    pub fn load(path: &Path, tokenizer: &TokenizerSettings) -> Result<Self, DictionaryError> {
        let contents = fs::read_to_string(path).map_err(|source| DictionaryError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary = Self::from_toml_str(&contents, path, tokenizer)?;
        debug!(
            path = %path.display(),
            categories = dictionary.categories.len(),
            locales = dictionary.tries.len(),
            "loaded category dictionary"
        );
        Ok(dictionary)
    }

    /// Parses a dictionary from TOML. `path` is used for error reporting.
    pub fn from_toml_str(
        contents: &str,
        path: &Path,
        tokenizer: &TokenizerSettings,
    ) -> Result<Self, DictionaryError> {
        let raw: RawDictionary =
            toml::from_str(contents).map_err(|source| DictionaryError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_categories(raw.category.into_iter().map(Category::from).collect(), tokenizer)
    }

    /// Builds the per-locale tries for `categories`.
    pub fn from_categories(
        categories: Vec<Category>,
        tokenizer: &TokenizerSettings,
    ) -> Result<Self, DictionaryError> {
        let mut seen = HashSet::new();
        let mut tries: HashMap<Locale, CategoryTrie> = HashMap::new();
        let mut delimiters: HashMap<Locale, Delimiters> = HashMap::new();

        for category in &categories {
            if !seen.insert(category.id) {
                return Err(DictionaryError::DuplicateTypeId { id: category.id });
            }

            let mut inserted = 0;
            for (locale, names) in &category.names {
                let delims = delimiters.entry(locale.clone()).or_insert_with(|| {
                    Delimiters::default().with_extra(&tokenizer.extra_delimiters_for(locale.as_str()))
                });
                let trie = tries.entry(locale.clone()).or_default();
                for name in names {
                    for token in &slice(name, delims) {
                        trie.insert(token.text(), category.id);
                        inserted += 1;
                    }
                }
            }

            if inserted == 0 {
                return Err(DictionaryError::EmptyNames {
                    name: category.name.clone(),
                });
            }
        }

        Ok(Self { categories, tries })
    }

    /// The trie for `locale`, if the dictionary has names in that locale.
    pub fn trie(&self, locale: &Locale) -> Option<&CategoryTrie> {
        self.tries.get(locale)
    }

    /// All categories in definition order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a category by type id.
    pub fn category(&self, id: TypeId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Locales with at least one name, sorted.
    pub fn locales(&self) -> Vec<&Locale> {
        let mut locales: Vec<&Locale> = self.tries.keys().collect();
        locales.sort();
        locales
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[category]]
id = 1
name = "amenity-cafe"

[category.names]
en = ["Cafe", "coffee shop"]
de = "Café"

[[category]]
id = 2
name = "amenity-atm"

[category.names]
en = ["atm", "🏧"]
"#;

    fn load(contents: &str) -> Result<CategoryDictionary, DictionaryError> {
        CategoryDictionary::from_toml_str(
            contents,
            Path::new("categories.toml"),
            &TokenizerSettings::default(),
        )
    }

    #[test]
    fn names_are_normalized_and_tokenized() {
        let dict = load(SAMPLE).unwrap();
        let en = dict.trie(&Locale::new("en")).unwrap();
        assert_eq!(en.get("cafe"), &[TypeId(1)]);
        assert_eq!(en.get("coffee"), &[TypeId(1)]);
        assert_eq!(en.get("shop"), &[TypeId(1)]);
        assert_eq!(en.get("🏧"), &[TypeId(2)]);

        let de = dict.trie(&Locale::new("de")).unwrap();
        assert_eq!(de.get("cafe"), &[TypeId(1)]);
    }

    #[test]
    fn single_string_or_list() {
        let dict = load(SAMPLE).unwrap();
        let cafe = dict.category(TypeId(1)).unwrap();
        assert_eq!(cafe.names[&Locale::new("de")], vec!["Café".to_string()]);
        assert_eq!(cafe.names[&Locale::new("en")].len(), 2);
    }

    #[test]
    fn unknown_locale_has_no_trie() {
        let dict = load(SAMPLE).unwrap();
        assert!(dict.trie(&Locale::new("fr")).is_none());
        assert_eq!(
            dict.locales(),
            vec![&Locale::new("de"), &Locale::new("en")]
        );
    }

    #[test]
    fn duplicate_type_id_is_rejected() {
        let err = load(
            r#"
[[category]]
id = 1
name = "a"
names = { en = "a" }

[[category]]
id = 1
name = "b"
names = { en = "b" }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, DictionaryError::DuplicateTypeId { id: TypeId(1) }));
    }

    #[test]
    fn category_without_names_is_rejected() {
        let err = load("[[category]]\nid = 3\nname = \"empty\"\nnames = { en = \" , \" }\n")
            .unwrap_err();
        assert!(matches!(err, DictionaryError::EmptyNames { .. }));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = load("[[category]]\nid = \"x\"\n").unwrap_err();
        assert!(err.to_string().contains("categories.toml"));
    }

    #[test]
    fn locale_delimiters_split_names() {
        let tokenizer = TokenizerSettings {
            extra_delimiters: String::new(),
            locales: HashMap::from([("ja".to_string(), "・".to_string())]),
        };
        let dict = CategoryDictionary::from_categories(
            vec![Category::new(TypeId(9), "shop-bakery").with_names("ja", ["ケーキ・クッキー"])],
            &tokenizer,
        )
        .unwrap();
        let ja = dict.trie(&Locale::new("ja")).unwrap();
        assert_eq!(ja.get("ケーキ"), &[TypeId(9)]);
        assert_eq!(ja.get("クッキー"), &[TypeId(9)]);
    }

    #[test]
    fn empty_dictionary_is_valid() {
        let dict = load("").unwrap();
        assert!(dict.categories().is_empty());
        assert!(dict.locales().is_empty());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.toml");
        fs::write(&path, SAMPLE).unwrap();

        let dict = CategoryDictionary::load(&path, &TokenizerSettings::default()).unwrap();
        assert_eq!(dict.category(TypeId(1)).unwrap().name, "amenity-cafe");
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let err = CategoryDictionary::load(&path, &TokenizerSettings::default()).unwrap_err();
        assert!(matches!(err, DictionaryError::ReadFile { .. }));
    }
}
