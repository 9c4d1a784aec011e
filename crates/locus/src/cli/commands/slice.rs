//! Implementation of `locus slice`.

use std::process::ExitCode;

use locus_query::slice;

use crate::cli::{
    args::SliceCommand,
    context::CommandContext,
    output::{JsonSliceOutput, dim, print_json, slice_table},
};

/// Prints the tokens a query slices into.
pub fn run(ctx: &CommandContext, cmd: &SliceCommand) -> ExitCode {
    let locale = ctx.locale(cmd.locale.as_deref());
    let tokens = slice(&cmd.query, &ctx.delimiters(&locale));

    if cmd.output.json {
        return print_json(&JsonSliceOutput::new(&cmd.query, &tokens));
    }

    if tokens.is_empty() {
        println!("{}", dim("No tokens."));
        return ExitCode::SUCCESS;
    }

    println!("{}", slice_table(&tokens));
    let prefix = if tokens.last_is_prefix() { "yes" } else { "no" };
    println!("{}", dim(&format!("last token is a prefix: {prefix}")));
    ExitCode::SUCCESS
}
