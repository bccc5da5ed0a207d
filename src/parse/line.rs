//! Line-granularity parser for credential scanning

use crate::core::{AnalysisUnit, UnitId};
use crate::error::{Result, SiftError};
use crate::parse::UnitParser;
use std::fs;
use std::path::Path;

/// Splits a file into one unit per line, identified by zero-based index.
/// Blank lines are units too; the fingerprinter suppresses them from
/// hashing and classification.
pub struct LineParser;

impl UnitParser for LineParser {
    fn parse(&self, path: &Path) -> Result<Vec<AnalysisUnit>> {
        let bytes = fs::read(path).map_err(|e| SiftError::FileUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        // Invalid UTF-8 is replaced rather than rejected; the scanner
        // should still see the readable parts of a mostly-text file.
        let content = String::from_utf8_lossy(&bytes);

        Ok(content
            .lines()
            .enumerate()
            .map(|(idx, line)| AnalysisUnit::new(UnitId::Line(idx), line.to_string()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_parse_lines_in_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.py");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "username = 'admin'").unwrap();
        writeln!(f).unwrap();
        writeln!(f, "password = 'secret123'").unwrap();

        let units = LineParser.parse(&path).unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].id, UnitId::Line(0));
        assert_eq!(units[0].content, "username = 'admin'");
        assert_eq!(units[1].content, "");
        assert_eq!(units[2].id, UnitId::Line(2));
    }

    #[test]
    fn test_parse_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.txt");
        fs::File::create(&path).unwrap();

        let units = LineParser.parse(&path).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_parse_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let result = LineParser.parse(&temp.path().join("nope.txt"));
        assert!(matches!(result, Err(SiftError::FileUnreadable { .. })));
    }

    #[test]
    fn test_parse_tolerates_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("mixed.txt");
        fs::write(&path, b"token = 'abc'\n\xff\xfe\nx = 1\n").unwrap();

        let units = LineParser.parse(&path).unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[0].content, "token = 'abc'");
    }
}
