//! Evaluates expectations against a borrowed dataset.

use std::collections::HashSet;

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, info, instrument, warn};

use super::format::compile_strftime;
use super::kind::Expectation;
use super::result::{ExpectationResult, UnexpectedMetrics};
use crate::error::{CrowdcheckError, Result};
use crate::input::{Dataset, Value, ValueKey};
use crate::report::ValidationSuite;
use crate::rules::require_distinct;

/// Engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum offending values kept per result.
    pub sample_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { sample_limit: 20 }
    }
}

/// Evaluates expectations against one immutable dataset.
///
/// Every operation returns `Err` only for a misconfigured rule. Data that
/// violates a rule yields `Ok` with `success == false`.
pub struct ExpectationEngine<'a> {
    dataset: &'a Dataset,
    config: EngineConfig,
    data_source: Option<String>,
}

impl<'a> ExpectationEngine<'a> {
    /// Bind an engine to a dataset with default settings.
    pub fn new(dataset: &'a Dataset) -> Self {
        Self::with_config(dataset, EngineConfig::default())
    }

    /// Bind an engine to a dataset with custom settings.
    pub fn with_config(dataset: &'a Dataset, config: EngineConfig) -> Self {
        Self {
            dataset,
            config,
            data_source: None,
        }
    }

    /// Record where the dataset came from in suites built by [`Self::validate`].
    pub fn with_data_source(mut self, source: impl Into<String>) -> Self {
        self.data_source = Some(source.into());
        self
    }

    /// The dataset under evaluation.
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn column_exists(&self, column: &str) -> Result<ExpectationResult> {
        self.evaluate(&Expectation::column_exists(column))
    }

    pub fn values_not_null(&self, column: &str) -> Result<ExpectationResult> {
        self.evaluate(&Expectation::values_not_null(column))
    }

    pub fn values_match_strftime_format(
        &self,
        column: &str,
        format: &str,
    ) -> Result<ExpectationResult> {
        self.evaluate(&Expectation::values_match_strftime_format(column, format))
    }

    pub fn values_match_regex(&self, column: &str, pattern: &str) -> Result<ExpectationResult> {
        self.evaluate(&Expectation::values_match_regex(column, pattern))
    }

    pub fn values_unique(&self, column: &str) -> Result<ExpectationResult> {
        self.evaluate(&Expectation::values_unique(column))
    }

    pub fn compound_values_unique<S: AsRef<str>>(
        &self,
        columns: &[S],
    ) -> Result<ExpectationResult> {
        self.evaluate(&Expectation::compound_values_unique(
            columns.iter().map(|c| c.as_ref()),
        ))
    }

    pub fn values_in_set<S: AsRef<str>>(
        &self,
        column: &str,
        value_set: &[S],
    ) -> Result<ExpectationResult> {
        self.evaluate(&Expectation::values_in_set(
            column,
            value_set.iter().map(|v| v.as_ref()),
        ))
    }

    /// Evaluate a single expectation.
    #[instrument(skip(self), fields(rule = %expectation))]
    pub fn evaluate(&self, expectation: &Expectation) -> Result<ExpectationResult> {
        let result = match expectation {
            Expectation::ColumnExists { column } => {
                require_name(column)?;
                ExpectationResult::column_level(
                    expectation.clone(),
                    self.dataset.has_column(column),
                )
            }
            Expectation::ValuesNotNull { column } => {
                let values = self.column(expectation, column)?;
                self.not_null(expectation, values)
            }
            Expectation::ValuesMatchStrftimeFormat { column, format } => {
                let compiled = compile_strftime(format)?;
                let values = self.column(expectation, column)?;
                self.scan(expectation, values, |value| compiled.accepts(value))
            }
            Expectation::ValuesMatchRegex { column, pattern } => {
                let regex = Regex::new(pattern)?;
                let values = self.column(expectation, column)?;
                self.scan(expectation, values, |value| regex.is_match(&value.to_string()))
            }
            Expectation::ValuesUnique { column } => {
                let values = self.column(expectation, column)?;
                self.unique(expectation, &[values])
            }
            Expectation::CompoundValuesUnique { columns } => {
                require_distinct("columns", columns)?;
                let values = columns
                    .iter()
                    .map(|column| self.column(expectation, column))
                    .collect::<Result<Vec<_>>>()?;
                self.unique(expectation, &values)
            }
            Expectation::ValuesInSet { column, value_set } => {
                require_distinct("value_set", value_set)?;
                let allowed: HashSet<&str> = value_set.iter().map(|v| v.as_str()).collect();
                let values = self.column(expectation, column)?;
                self.scan(expectation, values, |value| match value {
                    Value::Text(text) => allowed.contains(text.as_str()),
                    other => allowed.contains(other.to_string().as_str()),
                })
            }
        };

        debug!(
            success = result.success,
            unexpected = result.unexpected_count().unwrap_or(0),
            "evaluated expectation"
        );
        Ok(result)
    }

    /// Evaluate every expectation and aggregate them into a suite.
    ///
    /// Failing rules do not stop evaluation. If any rule is misconfigured,
    /// all configuration errors are returned together instead of a suite.
    #[instrument(skip(self, expectations), fields(count = expectations.len()))]
    pub fn validate(
        &self,
        suite_name: &str,
        expectations: &[Expectation],
    ) -> Result<ValidationSuite> {
        let mut results = Vec::with_capacity(expectations.len());
        let mut errors = Vec::new();

        for expectation in expectations {
            match self.evaluate(expectation) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(rule = %expectation, error = %e, "misconfigured expectation");
                    errors.push(e);
                }
            }
        }

        if !errors.is_empty() {
            return Err(CrowdcheckError::Rules(errors));
        }

        let suite =
            ValidationSuite::aggregate_with_source(suite_name, self.data_source.clone(), results)?;
        info!(
            suite = suite_name,
            success = suite.success(),
            passed = suite.statistics().successful_expectations,
            failed = suite.statistics().unsuccessful_expectations,
            "validation complete"
        );
        Ok(suite)
    }

    fn column(&self, expectation: &Expectation, name: &str) -> Result<&'a [Value]> {
        require_name(name)?;
        self.dataset
            .column(name)
            .ok_or_else(|| CrowdcheckError::UnknownColumn {
                column: name.to_string(),
                context: expectation.to_string(),
            })
    }

    fn not_null(&self, expectation: &Expectation, values: &[Value]) -> ExpectationResult {
        let mut sampler = Sampler::new(self.config.sample_limit);
        for (row, value) in values.iter().enumerate() {
            if value.is_null() {
                sampler.push(row, value.clone());
            }
        }
        ExpectationResult::from_metrics(expectation.clone(), sampler.finish(values.len(), 0))
    }

    /// Check each non-null value with `accept`; nulls are skipped as missing.
    fn scan<F>(&self, expectation: &Expectation, values: &[Value], accept: F) -> ExpectationResult
    where
        F: Fn(&Value) -> bool,
    {
        let mut sampler = Sampler::new(self.config.sample_limit);
        let mut missing = 0;

        for (row, value) in values.iter().enumerate() {
            if value.is_null() {
                missing += 1;
            } else if !accept(value) {
                sampler.push(row, value.clone());
            }
        }

        ExpectationResult::from_metrics(expectation.clone(), sampler.finish(values.len(), missing))
    }

    /// Every row belonging to a repeated key is unexpected. Rows whose key
    /// columns are all null are skipped as missing.
    fn unique(&self, expectation: &Expectation, columns: &[&[Value]]) -> ExpectationResult {
        let row_count = self.dataset.row_count();
        let mut groups: IndexMap<Vec<Option<ValueKey<'_>>>, Vec<usize>> = IndexMap::new();
        let mut missing = 0;

        for row in 0..row_count {
            let key: Vec<Option<ValueKey<'_>>> = columns.iter().map(|c| c[row].key()).collect();
            if key.iter().all(Option::is_none) {
                missing += 1;
                continue;
            }
            groups.entry(key).or_default().push(row);
        }

        let mut duplicate_rows: Vec<usize> = groups
            .values()
            .filter(|rows| rows.len() > 1)
            .flatten()
            .copied()
            .collect();
        duplicate_rows.sort_unstable();

        let mut sampler = Sampler::new(self.config.sample_limit);
        for row in duplicate_rows {
            sampler.push(row, key_value(columns, row));
        }

        ExpectationResult::from_metrics(expectation.clone(), sampler.finish(row_count, missing))
    }
}

fn require_name(column: &str) -> Result<()> {
    if column.trim().is_empty() {
        return Err(CrowdcheckError::Config("column name must not be empty".to_string()));
    }
    Ok(())
}

/// Display value of a (possibly compound) key.
fn key_value(columns: &[&[Value]], row: usize) -> Value {
    if let [single] = columns {
        return single[row].clone();
    }

    let parts: Vec<String> = columns
        .iter()
        .map(|c| match &c[row] {
            Value::Null => "null".to_string(),
            other => other.to_string(),
        })
        .collect();
    Value::Text(format!("({})", parts.join(", ")))
}

/// Counts unexpected rows and keeps a bounded sample of them.
struct Sampler {
    limit: usize,
    count: usize,
    values: Vec<Value>,
    rows: Vec<usize>,
}

impl Sampler {
    fn new(limit: usize) -> Self {
        Self {
            limit,
            count: 0,
            values: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, row: usize, value: Value) {
        self.count += 1;
        if self.values.len() < self.limit {
            self.values.push(value);
            self.rows.push(row);
        }
    }

    fn finish(self, element_count: usize, missing_count: usize) -> UnexpectedMetrics {
        UnexpectedMetrics::new(element_count, missing_count, self.count, self.values, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_column(values: &[Option<&str>]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    fn dataset(columns: Vec<(&str, Vec<Value>)>) -> Dataset {
        Dataset::from_columns(columns).unwrap()
    }

    #[test]
    fn test_column_exists() {
        let data = dataset(vec![("id", text_column(&[Some("1")]))]);
        let engine = ExpectationEngine::new(&data);

        let present = engine.column_exists("id").unwrap();
        assert!(present.success);
        assert!(present.metrics.is_none());

        let absent = engine.column_exists("usd_pledged").unwrap();
        assert!(!absent.success);
    }

    #[test]
    fn test_not_null_without_nulls() {
        let data = dataset(vec![("country", text_column(&[Some("US"), Some("CA")]))]);
        let result = ExpectationEngine::new(&data).values_not_null("country").unwrap();

        assert!(result.success);
        assert_eq!(result.unexpected_count(), Some(0));
    }

    #[test]
    fn test_not_null_all_null() {
        let data = dataset(vec![("country", text_column(&[None, None, None]))]);
        let result = ExpectationEngine::new(&data).values_not_null("country").unwrap();
        let metrics = result.metrics.unwrap();

        assert!(!result.success);
        assert_eq!(metrics.unexpected_count, metrics.element_count);
        assert_eq!(metrics.unexpected_percent, 100.0);
        assert_eq!(metrics.missing_count, 0);
        assert_eq!(metrics.unexpected_rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_unknown_column_is_configuration_error() {
        let data = dataset(vec![("id", text_column(&[Some("1")]))]);
        let err = ExpectationEngine::new(&data)
            .values_not_null("usd_pledged")
            .unwrap_err();

        assert!(err.is_configuration());
        assert!(matches!(err, CrowdcheckError::UnknownColumn { ref column, .. } if column == "usd_pledged"));
    }

    #[test]
    fn test_strftime_nulls_are_missing_not_unexpected() {
        let data = dataset(vec![(
            "launched_at",
            text_column(&[
                Some("2017-03-01 10:00:00"),
                None,
                Some("03/01/2017"),
                Some("2017-04-01 00:00:00"),
            ]),
        )]);
        let result = ExpectationEngine::new(&data)
            .values_match_strftime_format("launched_at", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let metrics = result.metrics.unwrap();

        assert!(!result.success);
        assert_eq!(metrics.element_count, 4);
        assert_eq!(metrics.missing_count, 1);
        assert_eq!(metrics.unexpected_count, 1);
        assert_eq!(metrics.unexpected_percent, 25.0);
        assert!((metrics.unexpected_percent_nonmissing - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.unexpected_sample, vec![Value::text("03/01/2017")]);
    }

    #[test]
    fn test_strftime_rejects_what_the_filter_cannot_parse() {
        let data = dataset(vec![(
            "launched_at",
            text_column(&[
                Some("2017-02-30 10:00:00"),
                Some("2017-03-0110:00:00"),
                Some("2017-03-01 10:00:00"),
            ]),
        )]);
        let result = ExpectationEngine::new(&data)
            .values_match_strftime_format("launched_at", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let metrics = result.metrics.unwrap();

        assert!(!result.success);
        assert_eq!(metrics.unexpected_count, 2);
        assert_eq!(metrics.unexpected_rows, vec![0, 1]);
    }

    #[test]
    fn test_strftime_checks_datetime_cells_against_format() {
        let dt = chrono::NaiveDate::from_ymd_opt(2017, 3, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        let data = dataset(vec![("launched_at", vec![Value::DateTime(dt)])]);
        let engine = ExpectationEngine::new(&data);

        let wrong = engine.values_match_strftime_format("launched_at", "%d/%m").unwrap();
        assert!(!wrong.success);
        assert_eq!(wrong.unexpected_count(), Some(1));

        let right = engine
            .values_match_strftime_format("launched_at", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert!(right.success);
    }

    #[test]
    fn test_invalid_strftime_is_configuration_error() {
        let data = dataset(vec![("deadline", text_column(&[Some("2017-01-01")]))]);
        let err = ExpectationEngine::new(&data)
            .values_match_strftime_format("deadline", "%Y-%Q")
            .unwrap_err();
        assert!(matches!(err, CrowdcheckError::InvalidFormat { .. }));
    }

    #[test]
    fn test_regex() {
        let data = dataset(vec![("currency", text_column(&[Some("USD"), Some("usd"), None]))]);
        let engine = ExpectationEngine::new(&data);

        let result = engine.values_match_regex("currency", "^[A-Z]{3}$").unwrap();
        assert_eq!(result.unexpected_count(), Some(1));

        assert!(engine.values_match_regex("currency", "([A-Z]").is_err());
    }

    #[test]
    fn test_unique_all_distinct() {
        let data = dataset(vec![("id", text_column(&[Some("1"), Some("2"), Some("3")]))]);
        let result = ExpectationEngine::new(&data).values_unique("id").unwrap();
        assert!(result.success);
    }

    #[test]
    fn test_unique_counts_every_row_in_duplicate_group() {
        let data = dataset(vec![(
            "id",
            text_column(&[Some("1"), Some("2"), Some("1"), Some("3"), None, None]),
        )]);
        let result = ExpectationEngine::new(&data).values_unique("id").unwrap();
        let metrics = result.metrics.unwrap();

        assert!(!result.success);
        assert_eq!(metrics.unexpected_count, 2);
        assert_eq!(metrics.unexpected_rows, vec![0, 2]);
        assert_eq!(metrics.missing_count, 2);
    }

    #[test]
    fn test_compound_unique() {
        let data = dataset(vec![
            ("id", text_column(&[Some("1"), Some("1"), Some("2"), Some("1")])),
            (
                "assessment_year",
                text_column(&[Some("2017"), Some("2018"), Some("2017"), Some("2017")]),
            ),
        ]);
        let engine = ExpectationEngine::new(&data);

        let result = engine.compound_values_unique(&["id", "assessment_year"]).unwrap();
        let metrics = result.metrics.unwrap();
        assert!(!result.success);
        assert_eq!(metrics.unexpected_count, 2);
        assert_eq!(metrics.unexpected_sample[0], Value::text("(1, 2017)"));

        assert!(engine.compound_values_unique::<&str>(&[]).is_err());
        assert!(engine.compound_values_unique(&["id", "id"]).is_err());
    }

    #[test]
    fn test_in_set() {
        let all_us = dataset(vec![("country", text_column(&[Some("US"), Some("US")]))]);
        assert!(ExpectationEngine::new(&all_us).values_in_set("country", &["US"]).unwrap().success);

        let one_ca = dataset(vec![(
            "country",
            text_column(&[Some("US"), Some("CA"), Some("US"), None]),
        )]);
        let result = ExpectationEngine::new(&one_ca).values_in_set("country", &["US"]).unwrap();
        assert!(!result.success);
        assert_eq!(result.unexpected_count(), Some(1));
        assert_eq!(result.metrics.unwrap().missing_count, 1);
    }

    #[test]
    fn test_in_set_rejects_bad_sets() {
        let data = dataset(vec![("country", text_column(&[Some("US")]))]);
        let engine = ExpectationEngine::new(&data);
        assert!(engine.values_in_set::<&str>("country", &[]).is_err());
        assert!(engine.values_in_set("country", &["US", "US"]).is_err());
    }

    #[test]
    fn test_numbers_compare_by_display() {
        let data = dataset(vec![("year", vec![Value::Number(2017.0), Value::Number(2019.0)])]);
        let result = ExpectationEngine::new(&data)
            .values_in_set("year", &["2017", "2018"])
            .unwrap();
        assert_eq!(result.unexpected_count(), Some(1));
    }

    #[test]
    fn test_sample_is_bounded() {
        let values = (0..50).map(|_| Value::Null).collect();
        let data = dataset(vec![("country", values)]);
        let engine = ExpectationEngine::with_config(&data, EngineConfig { sample_limit: 3 });
        let metrics = engine.values_not_null("country").unwrap().metrics.unwrap();

        assert_eq!(metrics.unexpected_count, 50);
        assert_eq!(metrics.unexpected_sample.len(), 3);
        assert_eq!(metrics.unexpected_rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_validate_collects_all_configuration_errors() {
        let data = dataset(vec![("id", text_column(&[Some("1")]))]);
        let err = ExpectationEngine::new(&data)
            .validate(
                "raw_data",
                &[
                    Expectation::values_not_null("id"),
                    Expectation::values_not_null("country"),
                    Expectation::values_unique("status"),
                ],
            )
            .unwrap_err();

        match err {
            CrowdcheckError::Rules(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected Rules, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_continues_past_failures() {
        let data = dataset(vec![
            ("id", text_column(&[Some("1"), Some("1")])),
            ("country", text_column(&[Some("US"), Some("US")])),
        ]);
        let suite = ExpectationEngine::new(&data)
            .validate(
                "raw_data",
                &[
                    Expectation::values_unique("id"),
                    Expectation::values_in_set("country", ["US"]),
                ],
            )
            .unwrap();

        assert!(!suite.success());
        assert_eq!(suite.results().len(), 2);
        assert!(suite.results()[1].success);
        assert!(suite.meta().data_source.is_none());
    }

    #[test]
    fn test_validate_records_data_source() {
        let data = dataset(vec![("id", text_column(&[Some("1")]))]);
        let suite = ExpectationEngine::new(&data)
            .with_data_source("ks-projects.csv")
            .validate("raw_data", &[Expectation::values_unique("id")])
            .unwrap();

        assert_eq!(suite.meta().data_source.as_deref(), Some("ks-projects.csv"));
    }
}
