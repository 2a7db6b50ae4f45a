//! Main Crowdcheck struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::expectation::{EngineConfig, Expectation, ExpectationEngine};
use crate::filter::CampaignFilter;
use crate::input::{Dataset, Parser, ParserConfig, SourceMetadata};
use crate::profile::{DatasetProfile, DatasetProfiler, ProfilerConfig};
use crate::report::ValidationSuite;
use crate::rules::CampaignRules;
use crate::suites::{self, FILTERED_SUITE, RAW_SUITE};

/// Configuration for a Crowdcheck pipeline.
#[derive(Debug, Clone, Default)]
pub struct CrowdcheckConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Business rules shared by the suites and the filter.
    pub rules: CampaignRules,
    /// Engine configuration.
    pub engine: EngineConfig,
    /// Profiler configuration.
    pub profiler: ProfilerConfig,
}

/// Outcome of running the full pipeline on one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// Raw-data suite.
    pub raw: ValidationSuite,
    /// Number of rows that survived the campaign filter.
    pub filtered_rows: usize,
    /// Filtered-data suite.
    pub filtered: ValidationSuite,
}

impl PipelineResult {
    /// Whether both suites passed.
    pub fn success(&self) -> bool {
        self.raw.success() && self.filtered.success()
    }
}

/// Loads campaign snapshots, validates them, and derives filtered tables.
pub struct Crowdcheck {
    config: CrowdcheckConfig,
    parser: Parser,
    profiler: DatasetProfiler,
}

impl Crowdcheck {
    /// Create a new instance with the default rules.
    pub fn new() -> Self {
        Self::build(CrowdcheckConfig::default())
    }

    /// Create an instance with custom configuration. The rules are validated
    /// before anything runs.
    pub fn with_config(config: CrowdcheckConfig) -> Result<Self> {
        config.rules.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CrowdcheckConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let profiler = DatasetProfiler::with_config(config.profiler.clone());
        Self {
            config,
            parser,
            profiler,
        }
    }

    pub fn rules(&self) -> &CampaignRules {
        &self.config.rules
    }

    /// Parse a delimited file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Run an arbitrary expectation list against a dataset.
    pub fn validate(
        &self,
        dataset: &Dataset,
        suite_name: &str,
        expectations: &[Expectation],
    ) -> Result<ValidationSuite> {
        self.validate_from(dataset, None, suite_name, expectations)
    }

    fn validate_from(
        &self,
        dataset: &Dataset,
        data_source: Option<&str>,
        suite_name: &str,
        expectations: &[Expectation],
    ) -> Result<ValidationSuite> {
        let engine = ExpectationEngine::with_config(dataset, self.config.engine.clone());
        match data_source {
            Some(source) => engine.with_data_source(source),
            None => engine,
        }
        .validate(suite_name, expectations)
    }

    /// Run the raw-data suite. `data_source` is recorded in the suite
    /// metadata.
    ///
    /// Value checks on a mandatory column that is absent are skipped; the
    /// column's existence check already fails the suite.
    pub fn validate_raw(
        &self,
        dataset: &Dataset,
        data_source: Option<&str>,
    ) -> Result<ValidationSuite> {
        let mut expectations = suites::raw_expectations(self.rules());
        let before = expectations.len();
        expectations.retain(|e| {
            e.is_column_level() || e.columns().iter().all(|c| dataset.has_column(c))
        });
        if expectations.len() < before {
            debug!(
                skipped = before - expectations.len(),
                "value checks skipped for absent mandatory columns"
            );
        }

        self.validate_from(dataset, data_source, RAW_SUITE, &expectations)
    }

    /// Apply the campaign filter.
    pub fn filter(&self, dataset: &Dataset) -> Result<Dataset> {
        CampaignFilter::new(self.rules()).apply(dataset)
    }

    /// Run the filtered-data suite against the output of [`Crowdcheck::filter`].
    pub fn validate_filtered(
        &self,
        filtered: &Dataset,
        data_source: Option<&str>,
    ) -> Result<ValidationSuite> {
        self.validate_from(
            filtered,
            data_source,
            FILTERED_SUITE,
            &suites::filtered_expectations(self.rules()),
        )
    }

    /// Profile a dataset and suggest expectations it satisfies.
    pub fn profile(&self, dataset: &Dataset) -> (DatasetProfile, Vec<Expectation>) {
        let profile = self.profiler.profile(dataset);
        let suggested = self.profiler.suggest(&profile);
        (profile, suggested)
    }

    /// Load a file, validate it raw, filter it and validate the result.
    ///
    /// The filter runs even when the raw suite fails; a missing column it
    /// needs is still a configuration error.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<PipelineResult> {
        let (dataset, source) = self.load(path)?;
        let raw = self.validate_raw(&dataset, Some(source.file.as_str()))?;
        let filtered_table = self.filter(&dataset)?;
        let filtered = self.validate_filtered(&filtered_table, Some(source.file.as_str()))?;

        info!(
            file = %source.file,
            raw = raw.success(),
            filtered = filtered.success(),
            filtered_rows = filtered_table.row_count(),
            "pipeline complete"
        );

        Ok(PipelineResult {
            source,
            raw,
            filtered_rows: filtered_table.row_count(),
            filtered,
        })
    }
}

impl Default for Crowdcheck {
    fn default() -> Self {
        Self::new()
    }
}
