//! Analysis unit representation
//!
//! A unit is the smallest piece of a file that can be independently
//! re-classified: a line (credential scanning) or a function body
//! (vulnerability scanning).

use std::cmp::Ordering;
use std::fmt;

/// Identifier of an analysis unit within a file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnitId {
    /// Zero-based line index
    Line(usize),
    /// Function or method name (uniqueness within a file is assumed
    /// by the surrounding parser)
    Func(String),
}

impl UnitId {
    /// Persisted map key for this unit ("17" or "parse_header")
    pub fn key(&self) -> String {
        match self {
            UnitId::Line(idx) => idx.to_string(),
            UnitId::Func(name) => name.clone(),
        }
    }

    /// Parse a persisted line-granularity key back into a unit id
    pub fn from_line_key(key: &str) -> Option<UnitId> {
        key.parse::<usize>().ok().map(UnitId::Line)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Line numbers are displayed 1-indexed
            UnitId::Line(idx) => write!(f, "Line {}", idx + 1),
            UnitId::Func(name) => write!(f, "{}", name),
        }
    }
}

impl Ord for UnitId {
    /// Ascending index for lines, lexical for function names. Lines sort
    /// before functions, though the two never mix within one scan.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (UnitId::Line(a), UnitId::Line(b)) => a.cmp(b),
            (UnitId::Func(a), UnitId::Func(b)) => a.cmp(b),
            (UnitId::Line(_), UnitId::Func(_)) => Ordering::Less,
            (UnitId::Func(_), UnitId::Line(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for UnitId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A named, delimited piece of a file as produced by a parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisUnit {
    /// Identifier within the file
    pub id: UnitId,
    /// Raw content (lines keep their text as read; functions hold the
    /// full extracted definition)
    pub content: String,
}

impl AnalysisUnit {
    pub fn new(id: UnitId, content: String) -> Self {
        Self { id, content }
    }

    /// Content with surrounding whitespace trimmed; this is what gets
    /// hashed and classified
    pub fn normalized(&self) -> &str {
        self.content.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_key() {
        assert_eq!(UnitId::Line(0).key(), "0");
        assert_eq!(UnitId::Line(42).key(), "42");
        assert_eq!(UnitId::Func("main".to_string()).key(), "main");
    }

    #[test]
    fn test_unit_id_display_one_indexed() {
        assert_eq!(UnitId::Line(0).to_string(), "Line 1");
        assert_eq!(UnitId::Line(9).to_string(), "Line 10");
        assert_eq!(UnitId::Func("copy_buf".to_string()).to_string(), "copy_buf");
    }

    #[test]
    fn test_unit_id_from_line_key() {
        assert_eq!(UnitId::from_line_key("3"), Some(UnitId::Line(3)));
        assert_eq!(UnitId::from_line_key("not a number"), None);
    }

    #[test]
    fn test_unit_id_ordering() {
        let mut ids = vec![
            UnitId::Line(10),
            UnitId::Line(2),
            UnitId::Line(0),
        ];
        ids.sort();
        assert_eq!(ids, vec![UnitId::Line(0), UnitId::Line(2), UnitId::Line(10)]);

        let mut names = vec![
            UnitId::Func("zeta".to_string()),
            UnitId::Func("alpha".to_string()),
        ];
        names.sort();
        assert_eq!(names[0], UnitId::Func("alpha".to_string()));
    }

    #[test]
    fn test_normalized_trims() {
        let unit = AnalysisUnit::new(UnitId::Line(0), "  password = 'x'  \n".to_string());
        assert_eq!(unit.normalized(), "password = 'x'");
    }
}
