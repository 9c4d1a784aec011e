//! Implementation of `locus check`.

use std::process::ExitCode;

use locus_config::{
    ConfigLayer, ConfigScope, ConfigWarning, discover_layers, format_path_for_display,
};

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Shows configuration files and the dictionary, then reports validation warnings.
///
/// Exits with failure when the dictionary fails to load or any warning is raised.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let cwd = &ctx.cwd;

    let layers = discover_layers(cwd);
    if layers.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!(
            "Run {} to create a configuration file.",
            subheader("locus init")
        );
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader("Config files:"));
    for layer in &layers {
        println!(
            "   {} {}",
            format_path_for_display(&layer.path, Some(cwd)),
            dim(&layer_label(layer))
        );
    }
    println!();

    let config = &ctx.config;

    println!("{}", subheader("Dictionary:"));
    let mut failed = false;
    match &config.dictionary.path {
        None => println!("   {}", dim("(none configured)")),
        Some(path) => {
            let display_path = format_path_for_display(path, config.config_root.as_deref());
            if path.is_file() {
                match ctx.dictionary() {
                    Ok(dictionary) => {
                        let locales: Vec<_> = dictionary
                            .locales()
                            .into_iter()
                            .map(|l| l.as_str().to_owned())
                            .collect();
                        println!(
                            "   {display_path} {}",
                            dim(&format!(
                                "({} categories; locales: {})",
                                dictionary.categories().len(),
                                locales.join(", ")
                            ))
                        );
                    }
                    Err(_) => failed = true,
                }
            } else {
                println!("   {display_path} {}", warning("[missing]"));
            }
        }
    }
    println!();

    println!("{}", subheader("Matching:"));
    let budget = config
        .matching
        .error_budget
        .steps()
        .iter()
        .map(|step| format!("<= {} chars: {}", step.max_len, step.errors))
        .chain([format!("longer: {}", config.matching.error_budget.max_errors())])
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "   default locale {}, prefix {} chars, {}",
        config.matching.default_locale,
        config.matching.prefix_chars_to_keep,
        if config.matching.exact_only {
            String::from("exact only")
        } else {
            format!("errors {budget}")
        }
    );
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        if failed {
            return ExitCode::FAILURE;
        }
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Scope of a layer, marking one that stopped the walk.
fn layer_label(layer: &ConfigLayer) -> String {
    match (layer.scope, layer.is_root) {
        (ConfigScope::Project, true) => String::from("(project, root)"),
        (scope, _) => format!("({scope})"),
    }
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    for w in warnings {
        match w {
            ConfigWarning::NoDictionaryConfigured => {
                println!("{}", dim("Hint: add a [dictionary] path to .locus.toml"));
            }
            ConfigWarning::DictionaryPathMissing { .. } => {
                println!(
                    "{}",
                    dim("Hint: dictionary paths are relative to the file that sets them")
                );
            }
            _ => {}
        }
    }
}
