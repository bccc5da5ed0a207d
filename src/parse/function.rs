//! Function-granularity parser for C/C++ vulnerability scanning
//!
//! Extracts top-level function definitions by matching a signature line
//! and tracking brace depth to the closing brace. This is a lightweight
//! stand-in for a full compiler frontend; it handles the common shape of
//! C code and bails out (empty result) on anything it cannot delimit.

use crate::core::{AnalysisUnit, UnitId};
use crate::error::{Result, SiftError};
use crate::parse::UnitParser;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Extracts named C/C++ function definitions as units
pub struct FunctionParser {
    signature: Regex,
}

impl FunctionParser {
    pub fn new() -> Self {
        // Return type, name, parameter list, then an opening brace on
        // the same or a following line. Control-flow keywords are
        // filtered after the match.
        let signature =
            Regex::new(r"^[A-Za-z_][A-Za-z0-9_\s\*&:<>,]*?\b([A-Za-z_][A-Za-z0-9_]*)\s*\([^;{]*\)\s*\{?\s*$")
                .expect("function signature pattern is valid");
        Self { signature }
    }

    /// Name captured from a signature line, unless it is a control-flow
    /// keyword masquerading as a call
    fn signature_name(&self, line: &str) -> Option<String> {
        let trimmed = line.trim();
        if trimmed.starts_with('#') || trimmed.starts_with("//") {
            return None;
        }
        let caps = self.signature.captures(trimmed)?;
        let name = caps.get(1)?.as_str();
        const KEYWORDS: [&str; 6] = ["if", "for", "while", "switch", "return", "sizeof"];
        if KEYWORDS.contains(&name) {
            return None;
        }
        Some(name.to_string())
    }
}

impl Default for FunctionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitParser for FunctionParser {
    fn parse(&self, path: &Path) -> Result<Vec<AnalysisUnit>> {
        let bytes = fs::read(path).map_err(|e| SiftError::FileUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let content = String::from_utf8_lossy(&bytes);
        let lines: Vec<&str> = content.lines().collect();

        let mut functions = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let name = match self.signature_name(lines[i]) {
                Some(n) => n,
                None => {
                    i += 1;
                    continue;
                }
            };

            // Find the opening brace (same line or shortly after, to
            // allow K&R-adjacent formatting), then scan to its close.
            let mut depth = 0i32;
            let mut started = false;
            let mut end = None;
            for (offset, line) in lines[i..].iter().enumerate() {
                for ch in line.chars() {
                    match ch {
                        '{' => {
                            depth += 1;
                            started = true;
                        }
                        '}' => depth -= 1,
                        _ => {}
                    }
                }
                if !started && offset > 1 {
                    // No body followed the signature; not a definition
                    break;
                }
                if started && depth == 0 {
                    end = Some(i + offset);
                    break;
                }
                if depth < 0 {
                    break;
                }
            }

            match end {
                Some(end_idx) => {
                    let body = lines[i..=end_idx].join("\n");
                    functions.push(AnalysisUnit::new(UnitId::Func(name), body));
                    i = end_idx + 1;
                }
                None => i += 1,
            }
        }

        Ok(functions)
    }
}
