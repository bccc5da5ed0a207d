//! Incremental analysis cache
//!
//! A persistent, content-addressed record of what was previously analyzed
//! and what it found, keyed by absolute file path. Loaded once per run,
//! mutated in memory, flushed back atomically at the end. One document is
//! kept per granularity so line-keyed and function-keyed entries for the
//! same path never mix.

mod store;

pub use store::CacheStore;

use crate::core::{Finding, Fingerprint, UnitId};
use std::collections::BTreeMap;

/// Last-known state of one file: its fingerprint plus the non-benign
/// findings recorded for it. Benign units are implicitly absent, which
/// keeps entries compact and is what lets the reconciler treat "no
/// finding" and "benign" identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub findings: BTreeMap<UnitId, Finding>,
}

impl CacheEntry {
    /// Entry with no recorded findings
    pub fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            findings: BTreeMap::new(),
        }
    }
}

/// Process-wide cache state: absolute file path -> last-known entry.
///
/// Entries for files that no longer exist are never evicted; the cache
/// grows with every file ever scanned (a known limitation, inherited
/// deliberately).
pub type ScanCache = BTreeMap<String, CacheEntry>;
