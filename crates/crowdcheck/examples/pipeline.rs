//! Example: Validate and filter a campaign snapshot with Crowdcheck.
//!
//! Usage:
//!   cargo run --example pipeline -- <file_path>
//!
//! Example:
//!   cargo run --example pipeline -- data/ks-projects.csv

use std::env;
use std::path::Path;

use crowdcheck::expectation::round2;
use crowdcheck::{Crowdcheck, ValidationSuite};

fn main() -> crowdcheck::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example pipeline -- <file_path>");
        std::process::exit(1);
    }

    let file_path = &args[1];
    let path = Path::new(file_path);

    if !path.exists() {
        eprintln!("Error: File not found: {}", file_path);
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Crowdcheck: {}", file_path);
    println!("{}", separator);
    println!();

    let result = Crowdcheck::new().run(path)?;

    println!("## Source Metadata");
    println!("  File: {}", result.source.file);
    println!("  Format: {}", result.source.format);
    println!("  Rows: {}", result.source.row_count);
    println!("  Columns: {}", result.source.column_count);
    println!();

    print_suite(&result.raw);
    println!("Filtered rows: {}", result.filtered_rows);
    println!();
    print_suite(&result.filtered);

    println!("{}", separator);
    println!(
        "Overall: {}",
        if result.success() { "PASSED" } else { "FAILED" }
    );

    Ok(())
}

fn print_suite(suite: &ValidationSuite) {
    let stats = suite.statistics();
    println!(
        "## Suite {} ({}/{} passed, {}%)",
        suite.name(),
        stats.successful_expectations,
        stats.evaluated_expectations,
        round2(stats.success_percent)
    );
    for result in suite.results() {
        println!("  {:6} {}", result.status_label(), result.summary());
    }
    println!();
}
