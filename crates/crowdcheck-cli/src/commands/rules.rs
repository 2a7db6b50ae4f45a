//! Rules command - print the effective business rules.

use std::path::Path;

use super::{load_rules, CommandResult};

pub fn run(rules: Option<&Path>) -> CommandResult {
    let rules = load_rules(rules)?;
    println!("{}", serde_json::to_string_pretty(&rules)?);
    Ok(true)
}
