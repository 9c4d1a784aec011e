//! Locating the `.locus.toml` layers that apply to a directory.
//!
//! Every ancestor of the working directory may hold a project layer. The walk ends early at a
//! layer that declares `root = true`; otherwise the home directory's file closes the stack as the
//! global layer.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".locus.toml";

/// Where a configuration layer was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// In the working directory or one of its ancestors.
    Project,
    /// In the home directory, below every project layer.
    Global,
}

/// One discovered configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    /// Path of the file.
    pub path: PathBuf,
    /// Where it was found.
    pub scope: ConfigScope,
    /// Whether the file stopped the walk with `root = true`.
    pub is_root: bool,
}

impl fmt::Display for ConfigScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Project => "project",
            Self::Global => "global",
        })
    }
}

/// Collects the configuration layers for `cwd`, highest precedence first.
///
/// The home directory's file counts as global even when it is also an ancestor of `cwd`, and is
/// listed once.
pub fn discover_layers(cwd: &Path) -> Vec<ConfigLayer> {
    let global = global_config_path();

    let mut layers: Vec<ConfigLayer> = Vec::new();
    for path in cwd
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .filter(|path| path.is_file())
    {
        let is_root = is_root_config(&path);
        let scope = if global.as_ref() == Some(&path) {
            ConfigScope::Global
        } else {
            ConfigScope::Project
        };
        layers.push(ConfigLayer {
            path,
            scope,
            is_root,
        });
        if is_root {
            return layers;
        }
    }

    if let Some(path) = global
        && path.is_file()
        && !layers.iter().any(|layer| layer.path == path)
    {
        layers.push(ConfigLayer {
            is_root: is_root_config(&path),
            path,
            scope: ConfigScope::Global,
        });
    }
    layers
}

/// Paths of the configuration layers for `cwd`, highest precedence first.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    discover_layers(cwd)
        .into_iter()
        .map(|layer| layer.path)
        .collect()
}

/// Path of the global configuration file, or `None` without a home directory.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Whether `path` is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    /// Layers found below the temp root, ignoring whatever the real home directory holds.
    fn project_layers(cwd: &Path) -> Vec<ConfigLayer> {
        discover_layers(cwd)
            .into_iter()
            .filter(|layer| layer.scope == ConfigScope::Project)
            .collect()
    }

    #[test]
    fn empty_tree_has_no_project_layers() {
        let test_dir = TestDir::new();
        let subdir = test_dir.create_dir("a/b/c");
        assert!(project_layers(&subdir).is_empty());
        assert!(discover_config_files(&subdir).iter().all(|p| is_global_config(p)));
    }

    #[test]
    fn layer_in_cwd_comes_first() {
        let test_dir = TestDir::new();
        let config = test_dir.create_config("project");
        let layers = discover_layers(&test_dir.path().join("project"));
        assert_eq!(layers.first().map(|l| &l.path), Some(&config));
        assert_eq!(layers[0].scope, ConfigScope::Project);
    }

    #[test]
    fn closer_layers_take_precedence() {
        let test_dir = TestDir::new();
        let outer = test_dir.create_config_at_root();
        let inner = test_dir.create_config("project");
        let subdir = test_dir.create_dir("project/src");

        let files = discover_config_files(&subdir);
        assert_eq!(files[..2], [inner, outer]);
    }

    #[test]
    fn root_layer_ends_the_stack() {
        let test_dir = TestDir::new();
        test_dir.create_config_at_root();
        let root = test_dir.create_config_with_content("project", "root = true\n");
        let subdir = test_dir.create_dir("project/src");

        let layers = discover_layers(&subdir);
        assert_eq!(
            layers,
            vec![ConfigLayer {
                path: root,
                scope: ConfigScope::Project,
                is_root: true,
            }]
        );
    }

    #[test]
    fn unparseable_layer_does_not_stop_the_walk() {
        let test_dir = TestDir::new();
        let outer = test_dir.create_config_at_root();
        let broken = test_dir.create_config_with_content("project", "root = [not toml");

        let layers = project_layers(&test_dir.path().join("project"));
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].path, broken);
        assert!(!layers[0].is_root);
        assert_eq!(layers[1].path, outer);
    }

    #[test]
    fn scope_names() {
        assert_eq!(ConfigScope::Project.to_string(), "project");
        assert_eq!(ConfigScope::Global.to_string(), "global");
    }
}
