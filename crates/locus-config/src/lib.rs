//! Configuration system for locus.
//!
//! locus uses TOML configuration files named `.locus.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.locus.toml` files found, then loading `~/.locus.toml` as the global config with lowest
//! precedence.

#![warn(missing_docs)]

mod budget;
mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

pub use budget::{ErrorBudget, ErrorStep, MAX_SUPPORTED_ERRORS};
pub use discovery::{
    CONFIG_FILENAME, ConfigLayer, ConfigScope, discover_config_files, discover_layers,
    global_config_path, is_global_config,
};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawDictionarySettings, RawMatchingSettings, RawSessionSettings,
    RawTokenizerSettings, parse_config_file, parse_config_str,
};
pub use resolve::{format_path_for_display, resolve_resource_path};
use serde::Serialize;
use toml::ser;
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for locus.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.locus.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Category matching settings.
    pub matching: MatchingSettings,
    /// Query tokenizer settings.
    pub tokenizer: TokenizerSettings,
    /// Category dictionary location.
    pub dictionary: DictionarySettings,
    /// Search session settings.
    pub session: SessionSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.locus.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - A missing `[dictionary]` path
    /// - A dictionary path that doesn't exist or isn't a regular file
    /// - An empty default locale
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output uses the same layout as a `.locus.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ser::Error> {
        let serializable = SerializableSettings {
            matching: SerializableMatchingSettings::from(&self.matching),
            tokenizer: SerializableTokenizerSettings::from(&self.tokenizer),
            session: self.session.clone(),
        };
        toml::to_string_pretty(&serializable)
    }
}

/// Settings for category matching.
#[derive(Debug, Clone)]
pub struct MatchingSettings {
    /// Locale whose dictionary serves the single-character synonym rule.
    pub default_locale: String,
    /// Leading characters of a token that fuzzy matching must reproduce exactly.
    pub prefix_chars_to_keep: usize,
    /// Skip fuzzy matching entirely.
    pub exact_only: bool,
    /// Count a transposition of adjacent characters as one edit instead of two.
    pub transpositions: bool,
    /// Token-length to edit-distance policy.
    pub error_budget: ErrorBudget,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_locale: String::from("en"),
            prefix_chars_to_keep: 1,
            exact_only: false,
            transpositions: false,
            error_budget: ErrorBudget::default(),
        }
    }
}

/// Settings for the query tokenizer.
#[derive(Debug, Clone, Default)]
pub struct TokenizerSettings {
    /// Delimiters added for every locale.
    pub extra_delimiters: String,
    /// Additional delimiters per locale code.
    pub locales: HashMap<String, String>,
}

impl TokenizerSettings {
    /// Extra delimiters in effect for `locale`: the global extras followed by the locale's own.
    pub fn extra_delimiters_for(&self, locale: &str) -> String {
        let mut extra = self.extra_delimiters.clone();
        if let Some(local) = self.locales.get(locale) {
            extra.push_str(local);
        }
        extra
    }
}

/// Location of the category dictionary.
#[derive(Debug, Clone, Default)]
pub struct DictionarySettings {
    /// Absolute path to the dictionary, if one is configured.
    pub path: Option<PathBuf>,
}

/// Settings for search sessions.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSettings {
    /// Capacity of the retrieval-to-dispatcher channel; 0 means unbounded.
    pub channel_capacity: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            channel_capacity: 0,
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// Category matching settings.
    matching: SerializableMatchingSettings,
    /// Tokenizer settings.
    tokenizer: SerializableTokenizerSettings,
    /// Session settings.
    session: SessionSettings,
}

/// Matching settings laid out as they appear in `.locus.toml`.
#[derive(Serialize)]
struct SerializableMatchingSettings {
    /// Locale used for the single-character synonym rule.
    default_locale: String,
    /// Exact prefix length for fuzzy matching.
    prefix_chars_to_keep: usize,
    /// Whether fuzzy matching is disabled.
    exact_only: bool,
    /// Whether transpositions cost one edit.
    transpositions: bool,
    /// Budget for tokens longer than every step.
    max_errors: u8,
    /// Budget steps; serialized last so they render as an array of tables.
    error_budget: Vec<ErrorStep>,
}

impl From<&MatchingSettings> for SerializableMatchingSettings {
    fn from(matching: &MatchingSettings) -> Self {
        Self {
            default_locale: matching.default_locale.clone(),
            prefix_chars_to_keep: matching.prefix_chars_to_keep,
            exact_only: matching.exact_only,
            transpositions: matching.transpositions,
            max_errors: matching.error_budget.max_errors(),
            error_budget: matching.error_budget.steps().to_vec(),
        }
    }
}

/// Tokenizer settings with sorted locales for deterministic TOML output.
#[derive(Serialize)]
struct SerializableTokenizerSettings {
    /// Delimiters added for every locale.
    extra_delimiters: String,
    /// Additional delimiters per locale (sorted for deterministic output).
    locales: BTreeMap<String, String>,
}

impl From<&TokenizerSettings> for SerializableTokenizerSettings {
    fn from(tokenizer: &TokenizerSettings) -> Self {
        Self {
            extra_delimiters: tokenizer.extra_delimiters.clone(),
            locales: tokenizer
                .locales
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_defaults() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.default_locale, "en");
        assert_eq!(matching.prefix_chars_to_keep, 1);
        assert!(!matching.exact_only);
        assert!(!matching.transpositions);
        assert_eq!(matching.error_budget, ErrorBudget::default());
    }

    #[test]
    fn test_session_defaults() {
        assert_eq!(SessionSettings::default().channel_capacity, 0);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.dictionary.path.is_none());
        assert!(config.config_root.is_none());
    }

    #[test]
    fn test_extra_delimiters_for_locale() {
        let tokenizer = TokenizerSettings {
            extra_delimiters: "·".into(),
            locales: HashMap::from([("ja".to_string(), "、".to_string())]),
        };
        assert_eq!(tokenizer.extra_delimiters_for("ja"), "·、");
        assert_eq!(tokenizer.extra_delimiters_for("en"), "·");
    }

    #[test]
    fn test_settings_to_toml() {
        let config = Config::default();
        let toml = config.settings_to_toml().unwrap();

        assert!(toml.contains("[matching]"));
        assert!(toml.contains("[[matching.error_budget]]"));
        assert!(toml.contains("[tokenizer]"));
        assert!(toml.contains("[session]"));
        assert!(toml.contains("default_locale = \"en\""));
        assert!(toml.contains("max_errors = 2"));

        let parsed: toml::Value =
            toml::from_str(&toml).expect("settings_to_toml should produce valid TOML");
        let steps = parsed["matching"]["error_budget"].as_array().unwrap();
        assert_eq!(steps.len(), 2);
    }

    #[test]
    fn test_settings_round_trip_through_parser() {
        let config = Config::default();
        let toml = config.settings_to_toml().unwrap();
        let raw = parse_config_str(&toml, Path::new("effective.toml")).unwrap();
        let matching = raw.matching.unwrap();
        assert_eq!(matching.max_errors, Some(2));
        assert_eq!(matching.error_budget.unwrap().len(), 2);
    }
}
