//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and resolving paths.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, DictionarySettings, ErrorBudget, MatchingSettings, SessionSettings,
    TokenizerSettings,
    parse::{RawConfig, RawMatchingSettings, RawTokenizerSettings},
    resolve::resolve_resource_path,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing this config file.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Error budget steps: the highest-precedence list replaces lower ones wholesale
/// - Per-locale delimiters: merged by locale, first definition wins
/// - Dictionary path: first definition wins, resolved against its own config file's directory
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let matching = merge_matching_settings(configs)?;
    let tokenizer = merge_tokenizer_settings(configs);
    let dictionary = merge_dictionary_settings(configs)?;
    let session = merge_session_settings(configs);
    let config_root = configs.first().map(|c| c.dir().to_path_buf());

    Ok(Config {
        matching,
        tokenizer,
        dictionary,
        session,
        config_root,
    })
}

/// Merges matching settings and validates the resulting error budget.
fn merge_matching_settings(configs: &[ParsedConfig]) -> Result<MatchingSettings, ConfigError> {
    let mut result = MatchingSettings::default();
    let mut steps = result.error_budget.steps().to_vec();
    let mut max_errors = result.error_budget.max_errors();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref matching) = parsed.config.matching {
            apply_raw_matching(&mut result, matching);
            if let Some(v) = matching.max_errors {
                max_errors = v;
            }
            if let Some(ref v) = matching.error_budget {
                steps = v.clone();
            }
        }
    }

    result.error_budget = ErrorBudget::new(steps, max_errors)?;
    Ok(result)
}

/// Applies raw matching scalars to result, overwriting any present values.
fn apply_raw_matching(result: &mut MatchingSettings, raw: &RawMatchingSettings) {
    if let Some(ref v) = raw.default_locale {
        result.default_locale = v.clone();
    }
    if let Some(v) = raw.prefix_chars_to_keep {
        result.prefix_chars_to_keep = v;
    }
    if let Some(v) = raw.exact_only {
        result.exact_only = v;
    }
    if let Some(v) = raw.transpositions {
        result.transpositions = v;
    }
}

/// Merges tokenizer settings.
fn merge_tokenizer_settings(configs: &[ParsedConfig]) -> TokenizerSettings {
    let mut result = TokenizerSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref tokenizer) = parsed.config.tokenizer {
            apply_raw_tokenizer(&mut result, tokenizer);
        }
    }

    result
}

/// Applies raw tokenizer settings to result.
fn apply_raw_tokenizer(result: &mut TokenizerSettings, raw: &RawTokenizerSettings) {
    if let Some(ref v) = raw.extra_delimiters {
        result.extra_delimiters = v.clone();
    }
    if let Some(ref locales) = raw.locales {
        for (locale, delimiters) in locales {
            result.locales.insert(locale.clone(), delimiters.clone());
        }
    }
}

/// Picks the highest-precedence dictionary path and resolves it.
fn merge_dictionary_settings(configs: &[ParsedConfig]) -> Result<DictionarySettings, ConfigError> {
    let defining = configs.iter().find_map(|parsed| {
        parsed
            .config
            .dictionary
            .as_ref()
            .and_then(|d| d.path.as_deref())
            .map(|path| (path, parsed.dir()))
    });

    let path = match defining {
        Some((path, dir)) => Some(resolve_resource_path(path, dir)?),
        None => None,
    };

    Ok(DictionarySettings { path })
}

/// Merges session settings.
fn merge_session_settings(configs: &[ParsedConfig]) -> SessionSettings {
    let mut result = SessionSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(v) = parsed
            .config
            .session
            .as_ref()
            .and_then(|s| s.channel_capacity)
        {
            result.channel_capacity = v;
        }
    }

    result
}
