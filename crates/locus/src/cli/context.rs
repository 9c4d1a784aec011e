//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use locus_config::Config;
use locus_match::{CategoryDictionary, CategoryMatcher, Locale};
use locus_query::Delimiters;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// The requested locale, or the configured default.
    pub fn locale(&self, requested: Option<&str>) -> Locale {
        Locale::new(requested.unwrap_or(&self.config.matching.default_locale))
    }

    /// Default delimiters plus the configured extras for `locale`.
    pub fn delimiters(&self, locale: &Locale) -> Delimiters {
        let extra = self.config.tokenizer.extra_delimiters_for(locale.as_str());
        Delimiters::default().with_extra(&extra)
    }

    /// Loads the configured category dictionary.
    pub fn dictionary(&self) -> Result<CategoryDictionary, ExitCode> {
        let Some(path) = &self.config.dictionary.path else {
            eprintln!("error: no category dictionary configured");
            eprintln!(
                "Run 'locus init' to create a configuration file, then set [dictionary] path."
            );
            return Err(ExitCode::FAILURE);
        };

        CategoryDictionary::load(path, &self.config.tokenizer).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }

    /// Builds a category matcher over the configured dictionary.
    pub fn matcher(&self) -> Result<CategoryMatcher, ExitCode> {
        let dictionary = self.dictionary()?;
        Ok(CategoryMatcher::new(dictionary, &self.config.matching))
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
