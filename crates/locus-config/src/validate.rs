//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No `[dictionary]` path is configured, so category matching has nothing to match against.
    NoDictionaryConfigured,
    /// The dictionary path does not exist.
    DictionaryPathMissing {
        /// Path that doesn't exist.
        path: String,
    },
    /// The dictionary path exists but is not a regular file.
    DictionaryPathNotFile {
        /// Path that is not a file.
        path: String,
    },
    /// `default_locale` is the empty string.
    EmptyDefaultLocale,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDictionaryConfigured => {
                write!(f, "no category dictionary is configured")
            }
            Self::DictionaryPathMissing { path } => {
                write!(f, "dictionary path does not exist: {path}")
            }
            Self::DictionaryPathNotFile { path } => {
                write!(f, "dictionary path is not a file: {path}")
            }
            Self::EmptyDefaultLocale => {
                write!(f, "matching.default_locale is empty")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.matching.default_locale.is_empty() {
        warnings.push(ConfigWarning::EmptyDefaultLocale);
    }

    match &config.dictionary.path {
        None => warnings.push(ConfigWarning::NoDictionaryConfigured),
        Some(path) if !path.exists() => {
            warnings.push(ConfigWarning::DictionaryPathMissing {
                path: path.display().to_string(),
            });
        }
        Some(path) if !path.is_file() => {
            warnings.push(ConfigWarning::DictionaryPathNotFile {
                path: path.display().to_string(),
            });
        }
        Some(_) => {}
    }

    warnings
}
