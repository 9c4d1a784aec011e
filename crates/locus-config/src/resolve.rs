//! Path resolution for configured resources.
//!
//! Resolves relative and tilde-prefixed paths to absolute paths, and shortens paths for display.

use std::path::{Component, Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a configured resource path to an absolute path.
///
/// Handles three cases:
/// - Tilde paths (`~/data`) - expanded to home directory
/// - Relative paths (`./data`, `../shared`) - resolved relative to `config_dir`
/// - Absolute paths - returned as-is
///
/// The path is not required to exist; `Config::validate` reports missing resources.
pub fn resolve_resource_path(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(config_dir.join(expanded))
    }
}

/// Formats a path for human display.
///
/// Paths under `base` are shown relative to it, paths under the home directory are shown with a
/// leading `~`, and anything else is shown in full.
pub fn format_path_for_display(path: &Path, base: Option<&Path>) -> String {
    if let Some(base) = base
        && let Some(relative) = pathdiff::diff_paths(path, base)
        && !relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
    {
        if relative.as_os_str().is_empty() {
            return String::from(".");
        }
        return relative.display().to_string();
    }

    if let Some(dirs) = BaseDirs::new()
        && let Ok(rest) = path.strip_prefix(dirs.home_dir())
    {
        return Path::new("~").join(rest).display().to_string();
    }

    path.display().to_string()
}

/// Expands a tilde prefix to the home directory.
///
/// - `~` alone becomes the home directory
/// - `~/foo` becomes home directory joined with `foo`
/// - Paths not starting with `~` are returned unchanged
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }

    if let Some(rest) = path.strip_prefix("~/") {
        let home = home_dir()?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(path))
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}
