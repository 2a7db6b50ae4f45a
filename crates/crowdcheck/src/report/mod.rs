//! Validation suites: aggregated, serializable outcomes of a rule run.

mod persistence;
mod suite;

pub use suite::{SuiteMeta, SuiteStatistics, ValidationSuite};
