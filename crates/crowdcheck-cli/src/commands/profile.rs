//! Profile command - summarize columns and suggest expectations.

use std::path::{Path, PathBuf};

use colored::Colorize;
use crowdcheck::expectation::round2;
use crowdcheck::ValueKind;

use super::{build, CommandResult};

pub fn run(file: PathBuf, json_output: bool, rules: Option<&Path>) -> CommandResult {
    let crowdcheck = build(rules)?;
    let (dataset, source) = crowdcheck.load(&file)?;
    let (profile, suggested) = crowdcheck.profile(&dataset);

    if json_output {
        let output = serde_json::json!({
            "file": source.file,
            "profile": profile,
            "suggested_expectations": suggested,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(true);
    }

    println!(
        "{} {} ({} rows)",
        "Profile of".cyan().bold(),
        source.file.white(),
        profile.row_count
    );
    println!();

    for column in &profile.columns {
        let kind = match column.kind {
            ValueKind::Empty => "empty".dimmed(),
            ValueKind::Numeric => "numeric".blue(),
            ValueKind::DateTime => "datetime".magenta(),
            ValueKind::Text => "text".white(),
            ValueKind::Mixed => "mixed".yellow(),
        };
        println!("  {} [{}]", column.name.bold(), kind);
        println!(
            "    nulls: {} ({}%), distinct: {}",
            column.null_count,
            round2(column.null_percent()),
            column.distinct_count
        );
        if !column.sample_values.is_empty() {
            println!("    sample: {}", column.sample_values.join(", ").dimmed());
        }
    }
    println!();

    println!("{}", "Suggested expectations:".yellow().bold());
    for expectation in &suggested {
        println!("  {}", expectation);
    }

    Ok(true)
}
