//! Content fingerprinting for change detection
//!
//! A fingerprint is a whole-file hash plus a per-unit hash map. Equal
//! hashes for the same unit mean unchanged content; this is the trust
//! assumption the incremental cache rests on, so the digests are
//! cryptographic (SHA-256), not the cheap rolling hashes a duplicate
//! detector would use.

use crate::core::unit::{AnalysisUnit, UnitId};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Whole-file and per-unit content hashes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// SHA-256 (hex) of the concatenated normalized unit contents in
    /// unit order
    pub file_hash: String,
    /// SHA-256 (hex) of each unit's normalized content alone. Units
    /// whose normalized content is empty are not present.
    pub unit_hashes: BTreeMap<UnitId, String>,
}

/// SHA-256 of a string, rendered as lowercase hex
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fingerprint an ordered list of units.
///
/// Normalization (trim) happens here, so whitespace-only edits such as
/// trailing-newline or indentation changes do not produce a different
/// fingerprint. Blank units are folded into the whole-file hash (they
/// contribute nothing) and excluded from the per-unit map; they are
/// never classified.
pub fn fingerprint(units: &[AnalysisUnit]) -> Fingerprint {
    let mut whole = Sha256::new();
    let mut unit_hashes = BTreeMap::new();

    for unit in units {
        let normalized = unit.normalized();
        whole.update(normalized.as_bytes());
        if !normalized.is_empty() {
            unit_hashes.insert(unit.id.clone(), content_hash(normalized));
        }
    }

    Fingerprint {
        file_hash: hex::encode(whole.finalize()),
        unit_hashes,
    }
}
