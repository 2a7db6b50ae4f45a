//! Standard expectation suites for campaign tables.

use crate::expectation::Expectation;
use crate::rules::{columns, CampaignRules};

/// Suite name used for raw snapshots.
pub const RAW_SUITE: &str = "raw_data";
/// Suite name used for filtered tables.
pub const FILTERED_SUITE: &str = "filtered_data";

/// Checks for a raw campaign snapshot.
///
/// Every mandatory column exists and is complete, both timestamps follow the
/// configured format, and `id` is unique.
pub fn raw_expectations(rules: &CampaignRules) -> Vec<Expectation> {
    let mut expectations: Vec<Expectation> = rules
        .mandatory_columns
        .iter()
        .map(Expectation::column_exists)
        .collect();

    expectations.extend(
        rules
            .mandatory_columns
            .iter()
            .map(Expectation::values_not_null),
    );
    expectations.extend(timestamp_formats(rules));
    expectations.push(Expectation::values_unique(columns::ID));
    expectations
}

/// Checks for the table produced by the campaign filter.
///
/// Scope columns hold only in-scope values, mandatory columns are complete,
/// each id appears once per assessment year, and timestamps keep their format.
pub fn filtered_expectations(rules: &CampaignRules) -> Vec<Expectation> {
    let mut expectations = vec![
        Expectation::values_in_set(columns::MAIN_CATEGORY, &rules.main_categories),
        Expectation::values_in_set(columns::COUNTRY, [&rules.country]),
        Expectation::values_in_set(columns::STATUS, [&rules.status]),
        Expectation::values_in_set(columns::CURRENCY, [&rules.currency]),
    ];

    expectations.extend(
        rules
            .mandatory_columns
            .iter()
            .map(Expectation::values_not_null),
    );
    expectations.push(Expectation::compound_values_unique([
        columns::ID,
        columns::ASSESSMENT_YEAR,
    ]));
    expectations.extend(timestamp_formats(rules));
    expectations
}

fn timestamp_formats(rules: &CampaignRules) -> impl Iterator<Item = Expectation> + '_ {
    [columns::LAUNCHED_AT, columns::DEADLINE]
        .into_iter()
        .map(|column| Expectation::values_match_strftime_format(column, &rules.datetime_format))
}
