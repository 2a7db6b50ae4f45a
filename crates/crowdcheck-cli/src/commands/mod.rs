//! CLI command implementations.
//!
//! Each command returns `Ok(true)` when every suite it ran passed.

pub mod filter;
pub mod profile;
pub mod rules;
pub mod validate;

mod report;

use std::path::Path;

use crowdcheck::{CampaignRules, Crowdcheck, CrowdcheckConfig};
use tracing::debug;

pub type CommandResult = Result<bool, Box<dyn std::error::Error>>;

/// Rules from `--rules`, or the defaults.
pub(crate) fn load_rules(path: Option<&Path>) -> Result<CampaignRules, crowdcheck::CrowdcheckError> {
    match path {
        Some(path) => CampaignRules::load(path),
        None => Ok(CampaignRules::default()),
    }
}

pub(crate) fn build(rules: Option<&Path>) -> Result<Crowdcheck, crowdcheck::CrowdcheckError> {
    debug!(rules = ?rules, "loading business rules");
    Crowdcheck::with_config(CrowdcheckConfig {
        rules: load_rules(rules)?,
        ..CrowdcheckConfig::default()
    })
}
