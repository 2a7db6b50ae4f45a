//! Terminal rendering of validation suites.

use colored::Colorize;
use crowdcheck::expectation::round2;
use crowdcheck::ValidationSuite;

/// Print one line per expectation and a suite footer.
pub fn print_suite(suite: &ValidationSuite, verbose: bool) {
    println!(
        "{} {}",
        "Validation suite".cyan().bold(),
        suite.name().white().bold()
    );
    println!();

    for result in suite.results() {
        let label = if result.success {
            result.status_label().green()
        } else {
            result.status_label().red().bold()
        };
        println!("  [{}] {}", label, result.summary());

        if verbose && !result.success {
            if let Some(metrics) = &result.metrics {
                let sample: Vec<String> = metrics
                    .unexpected_sample
                    .iter()
                    .map(|v| format!("{:?}", v.to_string()))
                    .collect();
                if !sample.is_empty() {
                    println!("         sample: {}", sample.join(", ").dimmed());
                }
            }
        }
    }
    println!();

    let stats = suite.statistics();
    let percent = round2(stats.success_percent);
    let percent = if suite.success() {
        format!("{}%", percent).green()
    } else {
        format!("{}%", percent).yellow()
    };
    println!(
        "{}/{} expectations passed ({})",
        stats.successful_expectations.to_string().white().bold(),
        stats.evaluated_expectations,
        percent
    );

    if suite.success() {
        println!("{}", "Suite passed".green().bold());
    } else {
        println!(
            "{} ({} failed)",
            "Suite failed".red().bold(),
            stats.unsuccessful_expectations
        );
    }
}
