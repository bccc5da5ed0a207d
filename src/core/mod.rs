//! Core data structures and algorithms for incremental scanning

pub mod finding;
pub mod fingerprint;
pub mod reconcile;
pub mod scanner;
pub mod unit;

pub use finding::{Finding, Label};
pub use fingerprint::{fingerprint, Fingerprint};
pub use reconcile::{reconcile, Action};
pub use scanner::{scan_files, FileReport, ScanReport};
pub use unit::{AnalysisUnit, UnitId};
