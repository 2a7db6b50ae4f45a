//! Crowdcheck CLI - validate and filter crowdfunding campaign tables.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Exit code when the data violated at least one expectation.
const EXIT_VALIDATION_FAILED: i32 = 2;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rules = cli.rules.as_deref();
    let result = match cli.command {
        Commands::Validate { file, output, json } => {
            commands::validate::run(file, output, json, rules, cli.verbose)
        }

        Commands::Filter {
            file,
            output,
            report,
        } => commands::filter::run(file, output, report, rules, cli.verbose),

        Commands::Profile { file, json } => commands::profile::run(file, json, rules),

        Commands::Rules => commands::rules::run(rules),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_VALIDATION_FAILED),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
