//! Clap argument definitions for the `locus` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use locus_session::SearchMode;

/// Parses a search mode name.
fn parse_mode(s: &str) -> Result<SearchMode, String> {
    s.parse().map_err(|e| format!("{e}"))
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "locus")]
#[command(about = "Query slicing, fuzzy category matching and search sessions")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output mode flags.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `locus init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.locus.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `locus slice`.
#[derive(Args, Debug, Clone)]
pub struct SliceCommand {
    /// Query to slice
    pub query: String,

    /// Input locale, selecting its extra delimiters [default: matching.default_locale]
    #[arg(short = 'l', long)]
    pub locale: Option<String>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `locus match`.
#[derive(Args, Debug, Clone)]
pub struct MatchCommand {
    /// Query to resolve
    pub query: String,

    /// Locales to match in, in order (repeatable) [default: matching.default_locale]
    #[arg(short = 'l', long = "locale")]
    pub locales: Vec<String>,

    /// Disable typo tolerance
    #[arg(long)]
    pub exact_only: bool,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Arguments for `locus search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Query to search for
    pub query: String,

    /// TOML file of features, regions and bookmarks to search
    #[arg(short = 'p', long)]
    pub places: PathBuf,

    /// Search mode: everywhere, viewport, downloader, bookmarks, combined [default: everywhere]
    #[arg(short = 'm', long, value_parser = parse_mode)]
    pub mode: Option<SearchMode>,

    /// Input locale of the query [default: matching.default_locale]
    #[arg(short = 'l', long)]
    pub locale: Option<String>,

    /// Treat the query as a category picked from a list
    #[arg(long)]
    pub category: bool,

    /// Bookmark group to search in (bookmarks mode)
    #[arg(short = 'g', long)]
    pub group: Option<u64>,

    /// Results per streamed batch [default: 16]
    #[arg(short = 'b', long)]
    pub batch_size: Option<usize>,

    #[command(flatten)]
    /// Output formatting flags.
    pub output: OutputArgs,
}

/// Supported `locus` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize locus configuration in current directory
    Init(InitCommand),

    /// Validate configuration and the category dictionary
    Check,

    /// Show effective configuration settings
    Config,

    /// Split a query into tokens
    Slice(SliceCommand),

    /// Show the dictionary categories a query resolves to
    #[command(after_help = "\
MATCH RULES (per token, per locale):
  exact        The whole token is a category name
  first_char   The token's first character is a name in the default locale
  fuzzy        The token is within the error budget of a name

EXAMPLES:
  locus match cafee
  locus match 'кафе' -l ru -l en
  locus match hotel --exact-only --json")]
    Match(MatchCommand),

    /// Run a search session and print every update it delivers
    Search(SearchCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_mode_parses_case_insensitively() {
        let cli = Cli::try_parse_from([
            "locus",
            "search",
            "cafe",
            "-p",
            "places.toml",
            "-m",
            "Viewport",
        ])
        .unwrap();
        let Commands::Search(cmd) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(cmd.mode, Some(SearchMode::Viewport));
        assert_eq!(cmd.places, PathBuf::from("places.toml"));
    }

    #[test]
    fn unknown_search_mode_is_rejected() {
        let result =
            Cli::try_parse_from(["locus", "search", "cafe", "-p", "p.toml", "-m", "nearby"]);
        assert!(result.is_err());
    }

    #[test]
    fn match_accepts_repeated_locales() {
        let cli =
            Cli::try_parse_from(["locus", "match", "cafe", "-l", "de", "--locale", "en"]).unwrap();
        let Commands::Match(cmd) = cli.command else {
            panic!("expected match command");
        };
        assert_eq!(cmd.locales, vec!["de", "en"]);
        assert!(!cmd.exact_only);
    }
}
