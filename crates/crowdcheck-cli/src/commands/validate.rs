//! Validate command - run the raw-data suite against a snapshot.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::{build, report, CommandResult};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    json_output: bool,
    rules: Option<&Path>,
    verbose: bool,
) -> CommandResult {
    let crowdcheck = build(rules)?;

    if !json_output {
        println!("{} {}", "Loading".cyan().bold(), file.display());
    }
    let (dataset, source) = crowdcheck.load(&file)?;

    if verbose && !json_output {
        println!(
            "  {} rows, {} columns ({})",
            source.row_count, source.column_count, source.format
        );
        println!("  SHA-256: {}", source.hash.dimmed());
    }

    let suite = crowdcheck.validate_raw(&dataset, Some(source.file.as_str()))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&suite)?);
    } else {
        println!();
        report::print_suite(&suite, verbose);
    }

    if let Some(path) = output {
        suite.save(&path)?;
        if !json_output {
            println!("Suite written to {}", path.display().to_string().cyan());
        }
    }

    Ok(suite.success())
}
