//! Basic dataset profiling and expectation suggestion.
//!
//! The profiler summarizes each column (nulls, distinct values, the kind of
//! values it holds) and proposes a starting set of expectations that the
//! profiled snapshot satisfies.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::expectation::{compile_strftime, percent, Expectation};
use crate::input::{Dataset, Value};

/// Kind of values observed in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Every value is null.
    Empty,
    /// Every non-null value is numeric.
    Numeric,
    /// Every non-null value is a timestamp.
    DateTime,
    /// Every non-null value is free text.
    Text,
    /// Non-null values of more than one kind.
    Mixed,
}

/// Profile of a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub element_count: usize,
    pub null_count: usize,
    /// Number of distinct non-null values.
    pub distinct_count: usize,
    pub kind: ValueKind,
    /// The datetime format every non-null value matched, for `DateTime` columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime_format: Option<String>,
    /// First few distinct values.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sample_values: Vec<String>,
    /// Value frequencies, for low-cardinality columns only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_counts: Option<IndexMap<String, usize>>,
}

impl ColumnProfile {
    /// Percentage of null values.
    pub fn null_percent(&self) -> f64 {
        percent(self.null_count, self.element_count)
    }

    /// Whether every non-null value is distinct.
    pub fn is_distinct(&self) -> bool {
        self.distinct_count == self.element_count - self.null_count
    }
}

/// Profile of a whole dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub columns: Vec<ColumnProfile>,
}

/// Profiler settings.
#[derive(Debug, Clone)]
pub struct ProfilerConfig {
    /// Columns with at most this many distinct values get value counts and
    /// an in-set suggestion.
    pub max_categories: usize,
    /// Number of sample values kept per column.
    pub sample_size: usize,
    /// Datetime formats tried, in order, when classifying text.
    pub datetime_formats: Vec<String>,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            max_categories: 20,
            sample_size: 5,
            datetime_formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%d".to_string(),
            ],
        }
    }
}

/// Builds [`DatasetProfile`]s and suggested expectations.
pub struct DatasetProfiler {
    config: ProfilerConfig,
}

impl DatasetProfiler {
    pub fn new() -> Self {
        Self::with_config(ProfilerConfig::default())
    }

    pub fn with_config(config: ProfilerConfig) -> Self {
        Self { config }
    }

    /// Profile every column.
    pub fn profile(&self, dataset: &Dataset) -> DatasetProfile {
        let columns = dataset
            .column_names()
            .filter_map(|name| {
                dataset
                    .column(name)
                    .map(|values| self.profile_column(name, values))
            })
            .collect();

        DatasetProfile {
            row_count: dataset.row_count(),
            columns,
        }
    }

    /// Expectations the profiled snapshot satisfies.
    ///
    /// Every column must exist; complete columns must stay non-null; fully
    /// distinct columns must stay unique; repeated low-cardinality text must
    /// stay within its observed set; timestamp columns must keep their format.
    pub fn suggest(&self, profile: &DatasetProfile) -> Vec<Expectation> {
        let mut expectations = Vec::new();

        for column in &profile.columns {
            expectations.push(Expectation::column_exists(&column.name));

            if column.element_count == 0 || column.kind == ValueKind::Empty {
                continue;
            }

            if column.null_count == 0 {
                expectations.push(Expectation::values_not_null(&column.name));
            }

            if column.is_distinct() && column.element_count > 1 {
                expectations.push(Expectation::values_unique(&column.name));
            }

            if let Some(format) = &column.datetime_format {
                expectations.push(Expectation::values_match_strftime_format(
                    &column.name,
                    format,
                ));
            }

            if column.kind == ValueKind::Text && !column.is_distinct() {
                if let Some(counts) = &column.value_counts {
                    expectations.push(Expectation::values_in_set(&column.name, counts.keys()));
                }
            }
        }

        debug!(count = expectations.len(), "suggested expectations");
        expectations
    }

    fn profile_column(&self, name: &str, values: &[Value]) -> ColumnProfile {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        let mut kinds: HashSet<ValueKind> = HashSet::new();
        let mut null_count = 0;

        for value in values {
            if value.is_null() {
                null_count += 1;
                continue;
            }
            kinds.insert(classify(value));
            *counts.entry(value.to_string()).or_insert(0) += 1;
        }

        let kind = match kinds.len() {
            0 => ValueKind::Empty,
            1 => kinds.into_iter().next().unwrap_or(ValueKind::Mixed),
            _ => ValueKind::Mixed,
        };

        // Text that uniformly parses under one format is a timestamp column
        let datetime_format = match kind {
            ValueKind::Text | ValueKind::DateTime => self.detect_format(values),
            _ => None,
        };
        let kind = if datetime_format.is_some() {
            ValueKind::DateTime
        } else {
            kind
        };

        let sample_values = counts
            .keys()
            .take(self.config.sample_size)
            .cloned()
            .collect();
        let distinct_count = counts.len();
        let value_counts = (distinct_count > 0 && distinct_count <= self.config.max_categories)
            .then_some(counts);

        ColumnProfile {
            name: name.to_string(),
            element_count: values.len(),
            null_count,
            distinct_count,
            kind,
            datetime_format,
            sample_values,
            value_counts,
        }
    }

    fn detect_format(&self, values: &[Value]) -> Option<String> {
        self.config.datetime_formats.iter().find_map(|format| {
            let compiled = compile_strftime(format).ok()?;
            let all_match = values
                .iter()
                .filter(|v| !v.is_null())
                .all(|v| compiled.accepts(v));
            all_match.then(|| format.clone())
        })
    }
}

impl Default for DatasetProfiler {
    fn default() -> Self {
        Self::new()
    }
}

fn classify(value: &Value) -> ValueKind {
    match value {
        Value::Null => ValueKind::Empty,
        Value::Number(_) => ValueKind::Numeric,
        Value::DateTime(_) => ValueKind::DateTime,
        Value::Text(text) if text.trim().parse::<f64>().is_ok() => ValueKind::Numeric,
        Value::Text(_) => ValueKind::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Parser;

    fn sample() -> Dataset {
        Parser::new()
            .parse_str(
                "id,country,launched_at,usd_pledged,note\n\
                 1,US,2017-03-01 10:00:00,100.5,\n\
                 2,US,2017-04-01 10:00:00,20,\n\
                 3,CA,2017-05-01 10:00:00,,\n",
            )
            .unwrap()
    }

    #[test]
    fn test_profile_columns() {
        let profile = DatasetProfiler::new().profile(&sample());
        assert_eq!(profile.row_count, 3);

        let id = &profile.columns[0];
        assert_eq!(id.kind, ValueKind::Numeric);
        assert!(id.is_distinct());

        let country = &profile.columns[1];
        assert_eq!(country.kind, ValueKind::Text);
        assert_eq!(country.distinct_count, 2);
        assert_eq!(country.value_counts.as_ref().unwrap()["US"], 2);

        let launched = &profile.columns[2];
        assert_eq!(launched.kind, ValueKind::DateTime);
        assert_eq!(launched.datetime_format.as_deref(), Some("%Y-%m-%d %H:%M:%S"));

        let pledged = &profile.columns[3];
        assert_eq!(pledged.null_count, 1);
        assert!((pledged.null_percent() - 100.0 / 3.0).abs() < 1e-9);

        assert_eq!(profile.columns[4].kind, ValueKind::Empty);
    }

    #[test]
    fn test_datetime_cells_only_match_their_display_format() {
        let dt = chrono::NaiveDate::from_ymd_opt(2017, 3, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        let data = Dataset::from_columns(vec![("launched_at", vec![Value::DateTime(dt)])]).unwrap();

        let default = DatasetProfiler::new().profile(&data);
        assert_eq!(
            default.columns[0].datetime_format.as_deref(),
            Some("%Y-%m-%d %H:%M:%S")
        );

        let day_month = DatasetProfiler::with_config(ProfilerConfig {
            datetime_formats: vec!["%d/%m".to_string()],
            ..ProfilerConfig::default()
        })
        .profile(&data);
        assert_eq!(day_month.columns[0].datetime_format, None);
        assert_eq!(day_month.columns[0].kind, ValueKind::DateTime);
    }

    #[test]
    fn test_suggestions() {
        let profiler = DatasetProfiler::new();
        let suggested = profiler.suggest(&profiler.profile(&sample()));

        assert!(suggested.contains(&Expectation::column_exists("note")));
        assert!(suggested.contains(&Expectation::values_unique("id")));
        assert!(suggested.contains(&Expectation::values_not_null("country")));
        assert!(suggested.contains(&Expectation::values_in_set("country", ["US", "CA"])));
        assert!(suggested.contains(&Expectation::values_match_strftime_format(
            "launched_at",
            "%Y-%m-%d %H:%M:%S"
        )));
        assert!(!suggested.contains(&Expectation::values_not_null("usd_pledged")));
        assert!(!suggested.contains(&Expectation::values_not_null("note")));
    }

    #[test]
    fn test_suggestions_hold_on_profiled_data() {
        let data = sample();
        let profiler = DatasetProfiler::new();
        let suggested = profiler.suggest(&profiler.profile(&data));

        let suite = crate::ExpectationEngine::new(&data)
            .validate("profiled", &suggested)
            .unwrap();
        assert!(suite.success());
    }
}
