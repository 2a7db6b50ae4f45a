//! Business rules for campaign tables.
//!
//! [`CampaignRules`] is an immutable value handed to the engine, the standard
//! suites and the period filter. It is validated once, up front, by
//! [`CampaignRules::validate`].

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CrowdcheckError, Result};
use crate::expectation::compile_strftime;

/// Column names the campaign pipeline relies on.
pub mod columns {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const CURRENCY: &str = "currency";
    pub const MAIN_CATEGORY: &str = "main_category";
    pub const LAUNCHED_AT: &str = "launched_at";
    pub const DEADLINE: &str = "deadline";
    pub const GOAL_USD: &str = "goal_usd";
    pub const COUNTRY: &str = "country";
    pub const USD_PLEDGED: &str = "usd_pledged";
    pub const STATUS: &str = "status";
    pub const ASSESSMENT_YEAR: &str = "assessment_year";
}

/// A named fiscal period with inclusive date bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentPeriod {
    /// Period label, e.g. "2017".
    pub label: String,
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period.
    pub end: NaiveDate,
}

impl AssessmentPeriod {
    /// Create a period.
    pub fn new(label: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            label: label.into(),
            start,
            end,
        }
    }

    /// The July-to-June fiscal year ending in `year`.
    pub fn fiscal_year(year: i32) -> Option<Self> {
        Some(Self::new(
            year.to_string(),
            NaiveDate::from_ymd_opt(year - 1, 7, 1)?,
            NaiveDate::from_ymd_opt(year, 6, 30)?,
        ))
    }
}

/// Static configuration for validating and filtering campaign tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignRules {
    /// Columns every raw snapshot must carry, non-null.
    pub mandatory_columns: Vec<String>,
    /// Main categories in scope.
    pub main_categories: Vec<String>,
    /// Assessment years kept by the filter.
    pub assessment_years: Vec<String>,
    /// Target country code.
    pub country: String,
    /// Target currency code.
    pub currency: String,
    /// Campaign status kept by the filter.
    pub status: String,
    /// strftime format of `launched_at` and `deadline`.
    pub datetime_format: String,
    /// Reference table of assessment periods.
    pub periods: Vec<AssessmentPeriod>,
    /// Columns projected into the filtered table, before `assessment_year`.
    pub output_columns: Vec<String>,
}

impl Default for CampaignRules {
    fn default() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            mandatory_columns: strings(&[
                columns::ID,
                columns::CURRENCY,
                columns::MAIN_CATEGORY,
                columns::LAUNCHED_AT,
                columns::DEADLINE,
                columns::COUNTRY,
                columns::STATUS,
                columns::USD_PLEDGED,
            ]),
            main_categories: strings(&[
                "art",
                "publishing",
                "film & video",
                "technology",
                "journalism",
                "food",
                "dance",
                "photography",
                "games",
                "crafts",
                "music",
                "comics",
                "theater",
                "design",
            ]),
            assessment_years: strings(&["2017", "2018"]),
            country: "US".to_string(),
            currency: "USD".to_string(),
            status: "successful".to_string(),
            datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
            periods: [2017, 2018]
                .into_iter()
                .filter_map(AssessmentPeriod::fiscal_year)
                .collect(),
            output_columns: strings(&[
                columns::ID,
                columns::NAME,
                columns::CURRENCY,
                columns::MAIN_CATEGORY,
                columns::LAUNCHED_AT,
                columns::DEADLINE,
                columns::GOAL_USD,
                columns::COUNTRY,
                columns::USD_PLEDGED,
                columns::STATUS,
            ]),
        }
    }
}

impl CampaignRules {
    /// Check that every list is non-empty and duplicate-free, and that the
    /// period table covers every assessment year.
    pub fn validate(&self) -> Result<()> {
        require_distinct("mandatory_columns", &self.mandatory_columns)?;
        require_distinct("main_categories", &self.main_categories)?;
        require_distinct("assessment_years", &self.assessment_years)?;
        require_distinct("output_columns", &self.output_columns)?;

        for (field, value) in [
            ("country", &self.country),
            ("currency", &self.currency),
            ("status", &self.status),
        ] {
            if value.trim().is_empty() {
                return Err(CrowdcheckError::Config(format!("{} must not be empty", field)));
            }
        }

        compile_strftime(&self.datetime_format)?;

        let labels: Vec<String> = self.periods.iter().map(|p| p.label.clone()).collect();
        require_distinct("periods", &labels)?;

        for period in &self.periods {
            if period.start > period.end {
                return Err(CrowdcheckError::Config(format!(
                    "period '{}' starts after it ends ({} > {})",
                    period.label, period.start, period.end
                )));
            }
        }

        if let Some(missing) = self
            .assessment_years
            .iter()
            .find(|year| !labels.contains(*year))
        {
            return Err(CrowdcheckError::Config(format!(
                "assessment year '{}' has no reference period",
                missing
            )));
        }

        Ok(())
    }

    /// Periods whose label is one of the configured assessment years.
    pub fn active_periods(&self) -> Vec<AssessmentPeriod> {
        self.periods
            .iter()
            .filter(|p| self.assessment_years.contains(&p.label))
            .cloned()
            .collect()
    }

    /// Load and validate rules from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| CrowdcheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let rules: CampaignRules = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            CrowdcheckError::Persistence(format!(
                "Failed to parse rules '{}': {}",
                path.display(),
                e
            ))
        })?;

        rules.validate()?;
        Ok(rules)
    }

    /// Save the rules as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let file = File::create(path).map_err(|e| CrowdcheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

/// Reject empty lists and duplicate entries.
pub(crate) fn require_distinct<S: AsRef<str>>(field: &str, values: &[S]) -> Result<()> {
    if values.is_empty() {
        return Err(CrowdcheckError::Config(format!("{} must not be empty", field)));
    }

    let mut seen = HashSet::new();
    for value in values {
        let value = value.as_ref();
        if !seen.insert(value) {
            return Err(CrowdcheckError::Config(format!(
                "{} contains duplicate entry '{}'",
                field, value
            )));
        }
    }

    Ok(())
}
