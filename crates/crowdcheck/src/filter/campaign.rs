//! Business-rule view over a raw campaign table.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use super::window::{deduplicate_by_period, TimedRecord};
use crate::error::{CrowdcheckError, Result};
use crate::expectation::compile_strftime;
use crate::input::{Dataset, Value};
use crate::rules::{columns, CampaignRules};

const CONTEXT: &str = "campaign filter";

/// Selects in-scope campaigns and assigns each one an assessment year.
///
/// A row is kept when its country, status and currency equal the configured
/// values and its main category is in scope. Kept rows are joined against
/// the active assessment periods and deduplicated per `id`.
pub struct CampaignFilter<'r> {
    rules: &'r CampaignRules,
}

impl<'r> CampaignFilter<'r> {
    pub fn new(rules: &'r CampaignRules) -> Self {
        Self { rules }
    }

    /// Produce the filtered table: the configured output columns plus
    /// `assessment_year`, one row per campaign id.
    #[instrument(skip_all, fields(rows = dataset.row_count()))]
    pub fn apply(&self, dataset: &Dataset) -> Result<Dataset> {
        let rules = self.rules;
        let format = compile_strftime(&rules.datetime_format)?;

        let ids = require(dataset, columns::ID)?;
        let launched = require(dataset, columns::LAUNCHED_AT)?;
        let deadlines = require(dataset, columns::DEADLINE)?;
        let country = require(dataset, columns::COUNTRY)?;
        let status = require(dataset, columns::STATUS)?;
        let category = require(dataset, columns::MAIN_CATEGORY)?;
        let currency = require(dataset, columns::CURRENCY)?;

        let projected = rules
            .output_columns
            .iter()
            .map(|name| require(dataset, name).map(|values| (name.as_str(), values)))
            .collect::<Result<Vec<_>>>()?;

        let categories: HashSet<&str> = rules.main_categories.iter().map(|c| c.as_str()).collect();
        let is = |value: &Value, expected: &str| value.as_text() == Some(expected);

        let mut records = Vec::new();
        let mut unparseable = 0usize;

        for row in 0..dataset.row_count() {
            let in_scope = is(&country[row], rules.country.as_str())
                && is(&status[row], rules.status.as_str())
                && is(&currency[row], rules.currency.as_str())
                && category[row]
                    .as_text()
                    .is_some_and(|c| categories.contains(c));
            if !in_scope {
                continue;
            }

            match (
                format.value_datetime(&launched[row]),
                format.value_datetime(&deadlines[row]),
            ) {
                (Some(start), Some(end)) => records.push(TimedRecord {
                    key: ids[row].key(),
                    row,
                    start,
                    end,
                }),
                _ => unparseable += 1,
            }
        }

        if unparseable > 0 {
            warn!(
                count = unparseable,
                format = %rules.datetime_format,
                "in-scope rows with unparseable timestamps were dropped"
            );
        }

        let periods = rules.active_periods();
        let matches = deduplicate_by_period(&records, &periods);

        debug!(
            in_scope = records.len() + unparseable,
            kept = matches.len(),
            "campaign filter applied"
        );

        let mut output: Vec<(String, Vec<Value>)> = projected
            .iter()
            .map(|(name, values)| {
                let kept = matches.iter().map(|m| values[m.row].clone()).collect();
                (name.to_string(), kept)
            })
            .collect();
        output.push((
            columns::ASSESSMENT_YEAR.to_string(),
            matches
                .iter()
                .map(|m| Value::text(periods[m.period].label.clone()))
                .collect(),
        ));

        Dataset::from_columns(output)
    }
}

fn require<'d>(dataset: &'d Dataset, name: &str) -> Result<&'d [Value]> {
    dataset
        .column(name)
        .ok_or_else(|| CrowdcheckError::UnknownColumn {
            column: name.to_string(),
            context: CONTEXT.to_string(),
        })
}
