//! Implementation of `locus match`.

use std::process::ExitCode;

use locus_match::Locale;
use locus_query::slice;
use tracing::debug;

use crate::cli::{
    args::MatchCommand,
    context::CommandContext,
    output::{JsonMatchOutput, describe_matches, dim, match_table, print_json},
};

/// Resolves a query against the category dictionary.
///
/// The query is sliced with the first locale's delimiters.
pub fn run(ctx: &CommandContext, cmd: &MatchCommand) -> ExitCode {
    let matcher = match ctx.matcher() {
        Ok(matcher) => matcher,
        Err(code) => return code,
    };

    let locales: Vec<Locale> = if cmd.locales.is_empty() {
        vec![matcher.default_locale().clone()]
    } else {
        cmd.locales.iter().map(|l| Locale::new(l)).collect()
    };

    let tokens = slice(&cmd.query, &ctx.delimiters(&locales[0]));
    let exact_only = cmd.exact_only || ctx.config.matching.exact_only;
    let matches = matcher.category_matches(&tokens, &locales, exact_only);
    debug!(
        tokens = tokens.len(),
        matches = matches.len(),
        exact_only,
        "resolved query"
    );

    let described = describe_matches(&matches, &tokens, &matcher);

    if cmd.output.json {
        return print_json(&JsonMatchOutput {
            query: &cmd.query,
            locales: locales.iter().map(Locale::as_str).collect(),
            matches: described,
        });
    }

    if described.is_empty() {
        println!("{}", dim("No categories matched."));
        return ExitCode::SUCCESS;
    }

    println!("{}", match_table(&described));
    ExitCode::SUCCESS
}
