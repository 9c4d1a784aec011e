//! Configuration file parsing.
//!
//! Parses individual `.locus.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::{ConfigError, ErrorStep};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Category matching section.
    pub matching: Option<RawMatchingSettings>,
    /// Tokenizer section.
    pub tokenizer: Option<RawTokenizerSettings>,
    /// Dictionary section.
    pub dictionary: Option<RawDictionarySettings>,
    /// Session section.
    pub session: Option<RawSessionSettings>,
}

/// Raw category matching settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawMatchingSettings {
    /// Locale used for the single-character synonym rule.
    pub default_locale: Option<String>,
    /// Leading characters that fuzzy matching must reproduce exactly.
    pub prefix_chars_to_keep: Option<usize>,
    /// Disable fuzzy matching.
    pub exact_only: Option<bool>,
    /// Count adjacent transpositions as a single edit.
    pub transpositions: Option<bool>,
    /// Edit budget for tokens longer than every step.
    pub max_errors: Option<u8>,
    /// Token-length to edit-distance steps, `[[matching.error_budget]]`.
    pub error_budget: Option<Vec<ErrorStep>>,
}

/// Raw tokenizer settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTokenizerSettings {
    /// Delimiters added for every locale.
    pub extra_delimiters: Option<String>,
    /// Additional delimiters keyed by locale code.
    pub locales: Option<HashMap<String, String>>,
}

/// Raw dictionary settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDictionarySettings {
    /// Path to the category dictionary, relative to the defining config file.
    pub path: Option<String>,
}

/// Raw session settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSessionSettings {
    /// Capacity of the retrieval callback channel (0 = unbounded).
    pub channel_capacity: Option<usize>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
///
/// Useful for validating template content (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
