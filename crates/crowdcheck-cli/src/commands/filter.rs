//! Filter command - keep in-scope campaigns, one row per id, and validate them.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::{build, report, CommandResult};

pub fn run(
    file: PathBuf,
    output: PathBuf,
    report_path: Option<PathBuf>,
    rules: Option<&Path>,
    verbose: bool,
) -> CommandResult {
    let crowdcheck = build(rules)?;

    println!("{} {}", "Loading".cyan().bold(), file.display());
    let (dataset, source) = crowdcheck.load(&file)?;

    let filtered = crowdcheck.filter(&dataset)?;
    println!(
        "Kept {} of {} rows for assessment years {}",
        filtered.row_count().to_string().white().bold(),
        dataset.row_count(),
        crowdcheck.rules().assessment_years.join(", ")
    );

    filtered.save_csv(&output)?;
    println!("Filtered table written to {}", output.display().to_string().cyan());
    println!();

    let suite = crowdcheck.validate_filtered(&filtered, Some(source.file.as_str()))?;
    report::print_suite(&suite, verbose);

    if let Some(path) = report_path {
        suite.save(&path)?;
        println!("Suite written to {}", path.display().to_string().cyan());
    }

    Ok(suite.success())
}
