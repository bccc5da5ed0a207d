//! Unit classification
//!
//! The scan driver hands a batch of unit contents to a `Classifier` and
//! gets one label back per input, in order. The built-in classifiers are
//! pattern-based stand-ins for model-backed ones; anything honoring the
//! batch contract can be plugged in, which is also how the tests count
//! classifier invocations.

mod credential;
mod vulnerability;

pub use credential::CredentialClassifier;
pub use vulnerability::VulnerabilityClassifier;

use crate::core::Label;
use crate::error::Result;

/// Classifies a batch of unit contents.
///
/// The output must have the same length and order as the input; the
/// driver rejects anything else rather than mis-attributing labels.
pub trait Classifier: Send + Sync {
    fn classify(&self, batch: &[String]) -> Result<Vec<Label>>;
}
