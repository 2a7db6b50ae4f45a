//! The closed set of expectation kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A declarative data-quality rule bound to its column(s) and parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// The column is part of the schema.
    ColumnExists { column: String },
    /// No value in the column is null.
    ValuesNotNull { column: String },
    /// Every non-null value parses under a strftime format.
    ValuesMatchStrftimeFormat { column: String, format: String },
    /// Every non-null value contains a match for a regular expression.
    ValuesMatchRegex { column: String, pattern: String },
    /// No non-null value repeats.
    ValuesUnique { column: String },
    /// No tuple of values across the listed columns repeats.
    CompoundValuesUnique { columns: Vec<String> },
    /// Every non-null value belongs to the allowed set.
    ValuesInSet { column: String, value_set: Vec<String> },
}

impl Expectation {
    pub fn column_exists(column: impl Into<String>) -> Self {
        Expectation::ColumnExists {
            column: column.into(),
        }
    }

    pub fn values_not_null(column: impl Into<String>) -> Self {
        Expectation::ValuesNotNull {
            column: column.into(),
        }
    }

    pub fn values_match_strftime_format(
        column: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Expectation::ValuesMatchStrftimeFormat {
            column: column.into(),
            format: format.into(),
        }
    }

    pub fn values_match_regex(column: impl Into<String>, pattern: impl Into<String>) -> Self {
        Expectation::ValuesMatchRegex {
            column: column.into(),
            pattern: pattern.into(),
        }
    }

    pub fn values_unique(column: impl Into<String>) -> Self {
        Expectation::ValuesUnique {
            column: column.into(),
        }
    }

    pub fn compound_values_unique<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expectation::CompoundValuesUnique {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn values_in_set<I, S>(column: impl Into<String>, value_set: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expectation::ValuesInSet {
            column: column.into(),
            value_set: value_set.into_iter().map(Into::into).collect(),
        }
    }

    /// Stable snake_case name of the kind, used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Expectation::ColumnExists { .. } => "column_exists",
            Expectation::ValuesNotNull { .. } => "values_not_null",
            Expectation::ValuesMatchStrftimeFormat { .. } => "values_match_strftime_format",
            Expectation::ValuesMatchRegex { .. } => "values_match_regex",
            Expectation::ValuesUnique { .. } => "values_unique",
            Expectation::CompoundValuesUnique { .. } => "compound_values_unique",
            Expectation::ValuesInSet { .. } => "values_in_set",
        }
    }

    /// The columns this rule reads.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Expectation::ColumnExists { column }
            | Expectation::ValuesNotNull { column }
            | Expectation::ValuesMatchStrftimeFormat { column, .. }
            | Expectation::ValuesMatchRegex { column, .. }
            | Expectation::ValuesUnique { column }
            | Expectation::ValuesInSet { column, .. } => vec![column.as_str()],
            Expectation::CompoundValuesUnique { columns } => {
                columns.iter().map(|c| c.as_str()).collect()
            }
        }
    }

    /// Whether the result carries element counts.
    pub fn is_column_level(&self) -> bool {
        matches!(self, Expectation::ColumnExists { .. })
    }

    /// Human-readable statement of what the rule expects.
    pub fn description(&self) -> String {
        match self {
            Expectation::ColumnExists { column } => format!("column {} exists", column),
            Expectation::ValuesNotNull { column } => {
                format!("values in {} are not null", column)
            }
            Expectation::ValuesMatchStrftimeFormat { column, format } => {
                format!("values in {} match the datetime format {}", column, format)
            }
            Expectation::ValuesMatchRegex { column, pattern } => {
                format!("values in {} match /{}/", column, pattern)
            }
            Expectation::ValuesUnique { column } => format!("values in {} are unique", column),
            Expectation::CompoundValuesUnique { columns } => {
                format!("({}) is unique per row", columns.join(", "))
            }
            Expectation::ValuesInSet { column, value_set } => {
                let shown: Vec<&str> = value_set.iter().take(5).map(|v| v.as_str()).collect();
                let more = if value_set.len() > shown.len() { ", ..." } else { "" };
                format!("values in {} are in {{{}{}}}", column, shown.join(", "), more)
            }
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.columns().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_tagging() {
        let expectation = Expectation::values_in_set("country", ["US"]);
        let json = serde_json::to_value(&expectation).unwrap();

        assert_eq!(json["type"], "values_in_set");
        assert_eq!(json["column"], "country");
        assert_eq!(json["value_set"][0], "US");

        let back: Expectation = serde_json::from_value(json).unwrap();
        assert_eq!(back, expectation);
    }

    #[test]
    fn test_display() {
        let expectation = Expectation::compound_values_unique(["id", "assessment_year"]);
        assert_eq!(expectation.to_string(), "compound_values_unique(id, assessment_year)");
    }

    #[test]
    fn test_description_truncates_long_sets() {
        let expectation =
            Expectation::values_in_set("main_category", ["art", "food", "dance", "games", "music", "comics"]);
        assert_eq!(
            expectation.description(),
            "values in main_category are in {art, food, dance, games, music, ...}"
        );
    }
}
