//! Category matching for locus.
//!
//! Resolves query tokens to category type ids against a per-locale dictionary:
//!
//! - **Exact**: direct trie descent
//! - **First character**: a multi-character token's first character looked up in the default
//!   locale, which recovers single-symbol synonyms such as emoji
//! - **Fuzzy**: a breadth-first walk of the trie in lock step with a Levenshtein automaton that
//!   keeps the token's leading characters exact and allows a length-dependent number of edits
//!
//! Missing locales and empty tokens produce no matches rather than errors.
//!
//! # Example
//!
//! ```
//! use locus_config::{MatchingSettings, TokenizerSettings};
//! use locus_match::{Category, CategoryDictionary, CategoryMatcher, Locale, TypeId};
//!
//! let dictionary = CategoryDictionary::from_categories(
//!     vec![Category::new(TypeId(1), "amenity-cafe").with_names("en", ["cafe"])],
//!     &TokenizerSettings::default(),
//! )
//! .unwrap();
//! let matcher = CategoryMatcher::new(dictionary, &MatchingSettings::default());
//!
//! let en = [Locale::new("en")];
//! assert!(matcher.resolve_category_token("cafee", &en).contains(&TypeId(1)));
//! assert!(matcher.resolve_category_token("hotel", &en).is_empty());
//! ```

#![warn(missing_docs)]

mod automaton;
mod dictionary;
mod error;
mod matcher;
mod trie;
mod types;

pub use automaton::{Automaton, AutomatonBuilder, Cursor};
pub use dictionary::{Category, CategoryDictionary};
pub use error::DictionaryError;
pub use matcher::{CategoryMatch, CategoryMatcher, MatchKind, match_in_trie};
pub use trie::{CategoryTrie, TrieIter};
pub use types::{Locale, TypeId};
