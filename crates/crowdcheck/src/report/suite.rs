//! Suite-level aggregation of expectation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CrowdcheckError, Result};
use crate::expectation::{percent, ExpectationResult};

/// Metadata describing one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteMeta {
    /// Name of the suite, e.g. "raw_data".
    pub suite_name: String,
    /// When the suite was assembled.
    pub run_time: DateTime<Utc>,
    /// Version of the library that produced the report.
    pub crowdcheck_version: String,
    /// Description of the validated data, e.g. its file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

/// Pass/fail counts across a suite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuiteStatistics {
    pub evaluated_expectations: usize,
    pub successful_expectations: usize,
    pub unsuccessful_expectations: usize,
    /// Share of successful expectations, 0-100.
    pub success_percent: f64,
}

/// The immutable outcome of all expectations run against one dataset.
///
/// Only the suite name can change after aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationSuite {
    meta: SuiteMeta,
    success: bool,
    statistics: SuiteStatistics,
    results: Vec<ExpectationResult>,
}

impl ValidationSuite {
    /// Combine per-rule results into a suite.
    ///
    /// Overall success is the AND of every result. At least one result is
    /// required.
    pub fn aggregate(
        suite_name: impl Into<String>,
        results: Vec<ExpectationResult>,
    ) -> Result<Self> {
        Self::aggregate_with_source(suite_name, None, results)
    }

    /// Like [`ValidationSuite::aggregate`], recording where the data came from.
    pub fn aggregate_with_source(
        suite_name: impl Into<String>,
        data_source: Option<String>,
        results: Vec<ExpectationResult>,
    ) -> Result<Self> {
        if results.is_empty() {
            return Err(CrowdcheckError::Config(
                "a validation suite needs at least one expectation".to_string(),
            ));
        }

        let successful = results.iter().filter(|r| r.success).count();
        let statistics = SuiteStatistics {
            evaluated_expectations: results.len(),
            successful_expectations: successful,
            unsuccessful_expectations: results.len() - successful,
            success_percent: percent(successful, results.len()),
        };

        Ok(Self {
            meta: SuiteMeta {
                suite_name: suite_name.into(),
                run_time: Utc::now(),
                crowdcheck_version: env!("CARGO_PKG_VERSION").to_string(),
                data_source,
            },
            success: successful == results.len(),
            statistics,
            results,
        })
    }

    /// Rename the suite.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.meta.suite_name = name.into();
    }

    pub fn name(&self) -> &str {
        &self.meta.suite_name
    }

    pub fn meta(&self) -> &SuiteMeta {
        &self.meta
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn statistics(&self) -> &SuiteStatistics {
        &self.statistics
    }

    pub fn results(&self) -> &[ExpectationResult] {
        &self.results
    }

    /// Results whose rule the data violated.
    pub fn failures(&self) -> impl Iterator<Item = &ExpectationResult> {
        self.results.iter().filter(|r| !r.success)
    }

    /// The suite as a JSON object, nested per expectation.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
