//! Declarative column and row expectations and the engine that evaluates them.

mod engine;
mod format;
mod kind;
mod result;

pub use engine::{EngineConfig, ExpectationEngine};
pub use format::{compile_strftime, CompiledFormat};
pub use kind::Expectation;
pub use result::{round2, ExpectationResult, UnexpectedMetrics};
pub(crate) use result::percent;
