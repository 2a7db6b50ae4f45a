//! Persistence for validation suites - save/load JSON files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{CrowdcheckError, Result};

use super::suite::ValidationSuite;

impl ValidationSuite {
    /// Save the suite to a JSON file, creating parent directories.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use crowdcheck::ValidationSuite;
    /// # fn example(suite: &ValidationSuite) -> crowdcheck::Result<()> {
    /// suite.save("reports/raw_data.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    CrowdcheckError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            CrowdcheckError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            CrowdcheckError::Persistence(format!("Failed to serialize suite: {}", e))
        })?;

        Ok(())
    }

    /// Load a suite from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            CrowdcheckError::Persistence(format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            CrowdcheckError::Persistence(format!(
                "Failed to parse suite '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::expectation::{Expectation, ExpectationResult, UnexpectedMetrics};
    use crate::input::Value;
    use crate::report::ValidationSuite;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("raw_data.json");

        let suite = ValidationSuite::aggregate(
            "raw_data",
            vec![
                ExpectationResult::column_level(Expectation::column_exists("id"), true),
                ExpectationResult::from_metrics(
                    Expectation::values_in_set("country", ["US"]),
                    UnexpectedMetrics::new(2, 0, 1, vec![Value::text("CA")], vec![1]),
                ),
            ],
        )
        .unwrap();

        suite.save(&path).unwrap();
        let loaded = ValidationSuite::load(&path).unwrap();

        assert_eq!(loaded, suite);
    }

    #[test]
    fn test_datetime_samples_survive_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered_data.json");
        let launched = chrono::NaiveDate::from_ymd_opt(2017, 3, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();

        let suite = ValidationSuite::aggregate(
            "filtered_data",
            vec![ExpectationResult::from_metrics(
                Expectation::values_match_strftime_format("launched_at", "%d/%m"),
                UnexpectedMetrics::new(
                    2,
                    0,
                    2,
                    vec![Value::DateTime(launched), Value::text("2017-03-01 10:00:00")],
                    vec![0, 1],
                ),
            )],
        )
        .unwrap();

        suite.save(&path).unwrap();
        let loaded = ValidationSuite::load(&path).unwrap();

        let sample = &loaded.results()[0].metrics.as_ref().unwrap().unexpected_sample;
        assert_eq!(sample[0], Value::DateTime(launched));
        assert_eq!(sample[1], Value::text("2017-03-01 10:00:00"));
        assert_eq!(loaded, suite);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ValidationSuite::load("/nonexistent/suite.json").unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }
}
