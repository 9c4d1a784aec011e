//! Starter files written by `locus init`.
//!
//! Both templates are kept as valid TOML so tests can parse them; callers receive them with
//! every setting commented out, leaving the built-in defaults in effect until a user opts in.

/// Project-level starter (`./.locus.toml`).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Home-directory starter (`~/.locus.toml`).
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// The project starter, commented out.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// The global starter, commented out.
pub fn global_template() -> String {
    comment_template(GLOBAL_TEMPLATE)
}

/// Prefixes every setting and table header with `# `.
///
/// Blank lines and existing comments pass through untouched.
fn comment_template(template: &str) -> String {
    template
        .lines()
        .map(|line| {
            if line.is_empty() || line.starts_with('#') {
                format!("{line}\n")
            } else {
                format!("# {line}\n")
            }
        })
        .collect()
}
