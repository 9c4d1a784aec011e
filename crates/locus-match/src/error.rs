//! Error types for the locus-match crate.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::de;

use crate::TypeId;

/// Errors that can occur while loading a category dictionary.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Failed to read the dictionary file.
    #[error("failed to read dictionary {path}: {source}")]
    ReadFile {
        /// Path to the dictionary.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The dictionary is not valid TOML or does not match the schema.
    #[error("failed to parse dictionary {path}: {source}")]
    ParseToml {
        /// Path to the dictionary.
        path: PathBuf,
        /// Underlying TOML error.
        source: de::Error,
    },

    /// Two categories share a type id.
    #[error("type id {id} is defined more than once")]
    DuplicateTypeId {
        /// The repeated id.
        id: TypeId,
    },

    /// A category has no names, or only names that normalize to nothing.
    #[error("category '{name}' has no usable names")]
    EmptyNames {
        /// Category name.
        name: String,
    },
}
