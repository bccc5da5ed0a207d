//! Unit extraction
//!
//! Parsers split a file into an ordered list of named, delimited analysis
//! units. The scan driver only depends on the `UnitParser` trait, so the
//! built-in parsers here can be swapped for smarter frontends (or test
//! stubs) without touching the cache or reconciliation logic.

mod function;
mod line;

pub use function::FunctionParser;
pub use line::LineParser;

use crate::core::AnalysisUnit;
use crate::error::Result;
use std::path::Path;

/// Splits a file into ordered analysis units
pub trait UnitParser: Send + Sync {
    /// Extract units from the file at `path`, in stable file order.
    /// An empty list means the file has nothing to analyze.
    fn parse(&self, path: &Path) -> Result<Vec<AnalysisUnit>>;
}
