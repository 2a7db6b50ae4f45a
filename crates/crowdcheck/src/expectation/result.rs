//! Outcome of evaluating one expectation.

use serde::{Deserialize, Serialize};

use super::kind::Expectation;
use crate::input::Value;

/// Element-level counts for a value check.
///
/// `missing_count` counts the nulls the rule skipped. `not_null` skips nothing,
/// so its missing count is always zero and its nulls are the unexpected values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnexpectedMetrics {
    /// Rows examined.
    pub element_count: usize,
    /// Null rows skipped by the rule.
    pub missing_count: usize,
    /// `missing_count / element_count * 100`.
    pub missing_percent: f64,
    /// Rows violating the rule.
    pub unexpected_count: usize,
    /// `unexpected_count / element_count * 100`, unrounded.
    pub unexpected_percent: f64,
    /// `unexpected_count / (element_count - missing_count) * 100`, unrounded.
    pub unexpected_percent_nonmissing: f64,
    /// Leading offending values, bounded by the engine's sample limit.
    pub unexpected_sample: Vec<Value>,
    /// Row indices of `unexpected_sample`.
    pub unexpected_rows: Vec<usize>,
}

impl UnexpectedMetrics {
    /// Compute percentages from raw counts and an already-bounded sample.
    pub fn new(
        element_count: usize,
        missing_count: usize,
        unexpected_count: usize,
        unexpected_sample: Vec<Value>,
        unexpected_rows: Vec<usize>,
    ) -> Self {
        Self {
            element_count,
            missing_count,
            missing_percent: percent(missing_count, element_count),
            unexpected_count,
            unexpected_percent: percent(unexpected_count, element_count),
            unexpected_percent_nonmissing: percent(
                unexpected_count,
                element_count.saturating_sub(missing_count),
            ),
            unexpected_sample,
            unexpected_rows,
        }
    }
}

/// The outcome of one expectation against one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationResult {
    /// The rule that was evaluated.
    pub expectation: Expectation,
    /// Whether the data satisfied the rule.
    pub success: bool,
    /// Element counts; absent for column-level rules.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub metrics: Option<UnexpectedMetrics>,
}

impl ExpectationResult {
    /// Result of a column-level rule.
    pub fn column_level(expectation: Expectation, success: bool) -> Self {
        Self {
            expectation,
            success,
            metrics: None,
        }
    }

    /// Result of a value-level rule; succeeds iff nothing was unexpected.
    pub fn from_metrics(expectation: Expectation, metrics: UnexpectedMetrics) -> Self {
        Self {
            expectation,
            success: metrics.unexpected_count == 0,
            metrics: Some(metrics),
        }
    }

    pub fn unexpected_count(&self) -> Option<usize> {
        self.metrics.as_ref().map(|m| m.unexpected_count)
    }

    pub fn unexpected_percent(&self) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.unexpected_percent)
    }

    /// "PASSED" or "FAILED".
    pub fn status_label(&self) -> &'static str {
        if self.success { "PASSED" } else { "FAILED" }
    }

    /// One-line human-readable summary. Percentages are rounded to two places.
    pub fn summary(&self) -> String {
        let Some(m) = &self.metrics else {
            return match &self.expectation {
                Expectation::ColumnExists { column } if self.success => {
                    format!("Column {} exists", column)
                }
                Expectation::ColumnExists { column } => {
                    format!("Mandatory column {} does not exist", column)
                }
                other => other.description(),
            };
        };

        if self.success {
            return format!("All {} items pass: {}", m.element_count, self.expectation.description());
        }

        match &self.expectation {
            Expectation::ValuesNotNull { column } => format!(
                "{} of {} items in {} are null",
                m.unexpected_count, m.element_count, column
            ),
            Expectation::ValuesMatchStrftimeFormat { column, format } => format!(
                "{:.2}% of {} values are not valid {} datetimes",
                round2(m.unexpected_percent),
                column,
                format
            ),
            Expectation::ValuesUnique { .. } | Expectation::CompoundValuesUnique { .. } => format!(
                "{} of {} items or {:.2}% are not unique: {}",
                m.unexpected_count,
                m.element_count,
                round2(m.unexpected_percent),
                self.expectation.description()
            ),
            _ => format!(
                "{} of {} items ({:.2}%) are unexpected: {}",
                m.unexpected_count,
                m.element_count,
                round2(m.unexpected_percent),
                self.expectation.description()
            ),
        }
    }
}

/// `part / whole * 100`; zero for an empty whole.
pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Round to two decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
