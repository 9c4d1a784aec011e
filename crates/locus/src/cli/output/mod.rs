//! Terminal styling, tables and JSON serialization for CLI output.

use std::process::ExitCode;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use locus_match::{CategoryMatch, CategoryMatcher, MatchKind, TypeId};
use locus_query::TokenSlice;
use locus_session::{EndStatus, SearchMode, SearchResult};
use serde::Serialize;

/// ANSI escape codes used by the styling helpers.
mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan foreground.
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow foreground.
    pub const YELLOW: &str = "\x1b[33m";
    /// Dimmed text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all attributes.
    pub const RESET: &str = "\x1b[0m";
}

/// Formats text as a section header (bold cyan).
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Indents every line of `content` by three spaces.
pub fn indent_content(content: &str) -> String {
    content
        .lines()
        .map(|line| format!("   {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints `value` as a single line of JSON, for streamed output.
pub fn print_json_line<T: Serialize>(value: &T) -> Result<(), ExitCode> {
    let json = serde_json::to_string(value).map_err(|e| {
        eprintln!("error: failed to serialize JSON: {e}");
        ExitCode::FAILURE
    })?;
    println!("{json}");
    Ok(())
}

/// JSON form of one token.
#[derive(Serialize)]
pub struct JsonToken<'a> {
    /// Token text after normalization.
    pub text: &'a str,
    /// Byte offset of the token in the query.
    pub start: usize,
    /// Byte offset one past the token's end.
    pub end: usize,
}

/// JSON output for `locus slice`.
#[derive(Serialize)]
pub struct JsonSliceOutput<'a> {
    /// The query as given.
    pub query: &'a str,
    /// Tokens in query order.
    pub tokens: Vec<JsonToken<'a>>,
    /// Whether the last token may still be growing.
    pub last_is_prefix: bool,
}

impl<'a> JsonSliceOutput<'a> {
    /// Builds the output for `tokens` sliced from `query`.
    pub fn new(query: &'a str, tokens: &'a TokenSlice) -> Self {
        Self {
            query,
            tokens: tokens
                .iter()
                .map(|t| JsonToken {
                    text: t.text(),
                    start: t.range().start,
                    end: t.range().end,
                })
                .collect(),
            last_is_prefix: tokens.last_is_prefix(),
        }
    }
}

/// Renders tokens as a table.
pub fn slice_table(tokens: &TokenSlice) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "Token", "Bytes", "Chars"]);
    for (index, token) in tokens.iter().enumerate() {
        let range = token.range();
        table.add_row(vec![
            Cell::new(index),
            Cell::new(token.text()),
            Cell::new(format!("{}..{}", range.start, range.end)),
            Cell::new(token.len()),
        ]);
    }
    table
}

/// JSON form of one category match.
#[derive(Serialize)]
pub struct JsonMatch<'a> {
    /// Index of the token in the query.
    pub token_index: usize,
    /// Token text.
    pub token: &'a str,
    /// Matched type id.
    pub type_id: TypeId,
    /// Symbolic category name, if the dictionary knows the id.
    pub category: Option<&'a str>,
    /// Rule that produced the match.
    pub kind: MatchKind,
}

/// JSON output for `locus match`.
#[derive(Serialize)]
pub struct JsonMatchOutput<'a> {
    /// The query as given.
    pub query: &'a str,
    /// Locales searched, in order.
    pub locales: Vec<&'a str>,
    /// Matches in token order.
    pub matches: Vec<JsonMatch<'a>>,
}

/// Attaches token text and category names to `matches`.
pub fn describe_matches<'a>(
    matches: &[CategoryMatch],
    tokens: &'a TokenSlice,
    matcher: &'a CategoryMatcher,
) -> Vec<JsonMatch<'a>> {
    matches
        .iter()
        .map(|m| JsonMatch {
            token_index: m.token_index,
            token: tokens.get(m.token_index).map_or("", |t| t.text()),
            type_id: m.type_id,
            category: matcher
                .dictionary()
                .category(m.type_id)
                .map(|c| c.name.as_str()),
            kind: m.kind,
        })
        .collect()
}

/// Renders described matches as a table.
pub fn match_table(matches: &[JsonMatch<'_>]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Token", "Category", "Type", "Rule"]);
    for m in matches {
        table.add_row(vec![
            Cell::new(m.token),
            Cell::new(m.category.unwrap_or("?")),
            Cell::new(m.type_id),
            Cell::new(match_kind_label(m.kind)),
        ]);
    }
    table
}

/// Short label for a match rule.
fn match_kind_label(kind: MatchKind) -> &'static str {
    match kind {
        MatchKind::Exact => "exact",
        MatchKind::FirstChar => "first char",
        MatchKind::Fuzzy => "fuzzy",
    }
}

/// One line of `locus search --json` output.
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JsonSearchEvent<'a> {
    /// A batch of results.
    Update {
        /// Mode of the session.
        mode: SearchMode,
        /// Version of the session.
        version: u64,
        /// Results in delivery order.
        results: &'a [SearchResult],
    },
    /// The session finished.
    End {
        /// Mode of the session.
        mode: SearchMode,
        /// Version of the session.
        version: u64,
        /// How the session finished.
        status: EndStatus,
    },
}

/// Formats a result for text output.
pub fn format_result(result: &SearchResult) -> String {
    match result {
        SearchResult::Feature { type_id, .. } => {
            let category = type_id.map_or_else(String::new, |id| format!(" [{id}]"));
            format!("{}{}", result.title(), dim(&category))
        }
        SearchResult::Suggestion { completion, .. } => {
            format!("{} {}", result.title(), dim(&format!("-> {completion}")))
        }
        SearchResult::Region { country_id, .. } => {
            format!("{} {}", result.title(), dim(&format!("({country_id})")))
        }
        SearchResult::Bookmark { .. } => format!("{} {}", result.title(), dim("(bookmark)")),
    }
}

/// Formats the end-of-session marker for text output.
pub fn format_end(status: EndStatus, delivered: usize) -> String {
    let status = match status {
        EndStatus::Normal => "complete",
        EndStatus::Interrupted => "interrupted",
    };
    dim(&format!("─── {status}, {delivered} results ───"))
}

#[cfg(test)]
mod tests {
    use locus_query::{Delimiters, slice};

    use super::*;

    #[test]
    fn indent_content_prefixes_every_line() {
        assert_eq!(indent_content("a\nb"), "   a\n   b");
    }

    #[test]
    fn slice_output_carries_byte_ranges() {
        let tokens = slice("Blue bottle ", &Delimiters::default());
        let output = JsonSliceOutput::new("Blue bottle ", &tokens);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["tokens"][0]["text"], "blue");
        assert_eq!(json["tokens"][1]["start"], 5);
        assert_eq!(json["tokens"][1]["end"], 11);
        assert_eq!(json["last_is_prefix"], false);
    }

    #[test]
    fn search_events_are_tagged() {
        let event = JsonSearchEvent::End {
            mode: SearchMode::Everywhere,
            version: 3,
            status: EndStatus::Interrupted,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "end");
        assert_eq!(json["mode"], "everywhere");
        assert_eq!(json["status"], "interrupted");
    }

    #[test]
    fn end_marker_counts_results() {
        assert!(format_end(EndStatus::Normal, 4).contains("complete, 4 results"));
    }
}
