//! Crowdcheck: data-quality expectations for crowdfunding campaign tables.
//!
//! Crowdcheck evaluates declarative expectations (column exists, not null,
//! datetime format, uniqueness, allowed set) against an in-memory table and
//! aggregates the outcomes into a serializable validation suite. A campaign
//! filter selects in-scope rows and assigns each campaign exactly one
//! assessment year.
//!
//! # Core Principles
//!
//! - **Failures are data**: a violated rule is `success = false`, never an error
//! - **Misconfiguration is loud**: unknown columns and bad parameters are errors
//! - **Immutable inputs**: datasets and rules are read-only once built
//!
//! # Example
//!
//! ```no_run
//! use crowdcheck::Crowdcheck;
//!
//! let crowdcheck = Crowdcheck::new();
//! let result = crowdcheck.run("campaigns.csv").unwrap();
//!
//! println!("Raw suite passed: {}", result.raw.success());
//! println!("Filtered rows: {}", result.filtered_rows);
//! ```

pub mod error;
pub mod expectation;
pub mod filter;
pub mod input;
pub mod profile;
pub mod report;
pub mod rules;
pub mod suites;

mod crowdcheck;

pub use crate::crowdcheck::{Crowdcheck, CrowdcheckConfig, PipelineResult};
pub use error::{CrowdcheckError, Result};
pub use expectation::{EngineConfig, Expectation, ExpectationEngine, ExpectationResult, UnexpectedMetrics};
pub use filter::CampaignFilter;
pub use input::{Dataset, Parser, ParserConfig, SourceMetadata, Value};
pub use profile::{ColumnProfile, DatasetProfile, DatasetProfiler, ProfilerConfig, ValueKind};
pub use report::{SuiteMeta, SuiteStatistics, ValidationSuite};
pub use rules::{AssessmentPeriod, CampaignRules};
