//! Pattern-based vulnerability classifier for function units

use crate::classify::Classifier;
use crate::core::Label;
use crate::error::Result;
use regex::Regex;

/// Flags functions that call known-unsafe C APIs. A binary signal:
/// Vulnerable or NotVulnerable.
pub struct VulnerabilityClassifier {
    unsafe_call: Regex,
}

impl VulnerabilityClassifier {
    pub fn new() -> Self {
        // Classic unbounded-copy / shell / format-string offenders
        let unsafe_call = Regex::new(
            r"\b(gets|strcpy|strcat|sprintf|vsprintf|scanf|system|popen|alloca|strtok)\s*\(",
        )
        .expect("unsafe call pattern is valid");
        Self { unsafe_call }
    }
}

impl Default for VulnerabilityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for VulnerabilityClassifier {
    fn classify(&self, batch: &[String]) -> Result<Vec<Label>> {
        Ok(batch
            .iter()
            .map(|body| {
                if self.unsafe_call.is_match(body) {
                    Label::Vulnerable
                } else {
                    Label::NotVulnerable
                }
            })
            .collect())
    }
}
