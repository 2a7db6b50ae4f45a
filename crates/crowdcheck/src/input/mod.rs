//! Loading delimited files into typed, column-oriented datasets.

mod parser;
mod source;
mod value;

pub use parser::{Parser, ParserConfig};
pub use source::{Dataset, SourceMetadata};
pub use value::Value;
pub(crate) use value::ValueKey;
