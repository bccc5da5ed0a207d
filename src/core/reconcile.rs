//! Staleness reconciliation
//!
//! Compares a file's current fingerprint against its cached entry and
//! decides what, if anything, must be reclassified. This is the part of
//! the scanner that turns "the classifier is expensive" into "the
//! classifier is rarely called".

use crate::cache::CacheEntry;
use crate::core::fingerprint::Fingerprint;
use crate::core::unit::UnitId;

/// What the driver must do for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// First time seeing this file: classify every unit
    FullRescan,
    /// Nothing changed (or nothing material changed, under the
    /// conservative policy): reuse cached findings, no classifier call
    NoChange,
    /// Classify exactly these units; carry over findings for the rest
    PartialRescan(Vec<UnitId>),
}

/// Decide the minimal work needed for a file.
///
/// * No cached entry: `FullRescan`.
/// * Whole-file hashes match: `NoChange` — the file is unchanged at the
///   granularity of normalized unit content and order, so no per-unit
///   comparison is needed.
/// * Otherwise: `PartialRescan` over exactly the units whose hash differs
///   or which the cached fingerprint has never seen. Units present only
///   in the cached fingerprint were deleted; the driver drops their
///   findings rather than reclassifying them.
///
/// When `conservative` is set, a non-empty changed set where every
/// recorded finding sits on an untouched unit also short-circuits to
/// `NoChange`. That trusts nothing material was edited, trading a small
/// miss risk (a benign unit that became sensitive) for skipping the
/// classifier in the common touch-unrelated-lines case. The trade-off is
/// deliberate, so it is a named flag rather than baked-in behavior.
pub fn reconcile(current: &Fingerprint, cached: Option<&CacheEntry>, conservative: bool) -> Action {
    let cached = match cached {
        Some(entry) => entry,
        None => return Action::FullRescan,
    };

    if current.file_hash == cached.fingerprint.file_hash {
        return Action::NoChange;
    }

    // BTreeMap iteration keeps unit ids in ascending order, which fixes
    // the processing (and therefore output) order.
    let changed: Vec<UnitId> = current
        .unit_hashes
        .iter()
        .filter(|(id, hash)| cached.fingerprint.unit_hashes.get(id) != Some(hash))
        .map(|(id, _)| id.clone())
        .collect();

    if conservative && !changed.is_empty() {
        let findings_untouched = cached.findings.keys().all(|id| !changed.contains(id));
        if findings_untouched {
            return Action::NoChange;
        }
    }

    Action::PartialRescan(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::finding::{Finding, Label};
    use crate::core::fingerprint::fingerprint;
    use crate::core::unit::AnalysisUnit;
    use pretty_assertions::assert_eq;

    fn units(contents: &[&str]) -> Vec<AnalysisUnit> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| AnalysisUnit::new(UnitId::Line(i), c.to_string()))
            .collect()
    }

    fn entry_for(contents: &[&str]) -> CacheEntry {
        CacheEntry::new(fingerprint(&units(contents)))
    }

    #[test]
    fn test_missing_entry_is_full_rescan() {
        let current = fingerprint(&units(&["a", "b"]));
        assert_eq!(reconcile(&current, None, false), Action::FullRescan);
    }

    #[test]
    fn test_identical_file_is_no_change() {
        let current = fingerprint(&units(&["a", "b"]));
        let cached = entry_for(&["a", "b"]);
        assert_eq!(reconcile(&current, Some(&cached), false), Action::NoChange);
    }

    #[test]
    fn test_whitespace_only_edit_is_no_change() {
        let current = fingerprint(&units(&["  a  ", "b"]));
        let cached = entry_for(&["a", "b"]);
        assert_eq!(reconcile(&current, Some(&cached), false), Action::NoChange);
    }

    #[test]
    fn test_single_changed_unit() {
        let current = fingerprint(&units(&["a", "B", "c"]));
        let cached = entry_for(&["a", "b", "c"]);
        assert_eq!(
            reconcile(&current, Some(&cached), false),
            Action::PartialRescan(vec![UnitId::Line(1)])
        );
    }

    #[test]
    fn test_new_unit_counts_as_changed() {
        let current = fingerprint(&units(&["a", "b", "c"]));
        let cached = entry_for(&["a", "b"]);
        assert_eq!(
            reconcile(&current, Some(&cached), false),
            Action::PartialRescan(vec![UnitId::Line(2)])
        );
    }

    #[test]
    fn test_deleted_unit_not_reclassified() {
        // Unit 1 disappeared; only the survivors are compared, and none
        // changed, so the rescan list is empty (findings cleanup is the
        // driver's job).
        let current = fingerprint(&units(&["a"]));
        let cached = entry_for(&["a", "b"]);
        assert_eq!(
            reconcile(&current, Some(&cached), false),
            Action::PartialRescan(vec![])
        );
    }

    #[test]
    fn test_changed_units_sorted_ascending() {
        let current = fingerprint(&units(&["A", "b", "C", "d", "E"]));
        let cached = entry_for(&["a", "b", "c", "d", "e"]);
        assert_eq!(
            reconcile(&current, Some(&cached), false),
            Action::PartialRescan(vec![UnitId::Line(0), UnitId::Line(2), UnitId::Line(4)])
        );
    }

    #[test]
    fn test_conservative_skips_when_findings_untouched() {
        let current = fingerprint(&units(&["password = 'x'", "y = 2"]));
        let mut cached = entry_for(&["password = 'x'", "y = 1"]);
        cached.findings.insert(
            UnitId::Line(0),
            Finding::new(Label::Password, "password = 'x'".to_string()),
        );

        // Only the benign line changed: conservative mode trusts the
        // cached result, strict mode rescans the changed line.
        assert_eq!(reconcile(&current, Some(&cached), true), Action::NoChange);
        assert_eq!(
            reconcile(&current, Some(&cached), false),
            Action::PartialRescan(vec![UnitId::Line(1)])
        );
    }

    #[test]
    fn test_conservative_rescans_touched_finding() {
        let current = fingerprint(&units(&["password = 'changed'", "y = 1"]));
        let mut cached = entry_for(&["password = 'x'", "y = 1"]);
        cached.findings.insert(
            UnitId::Line(0),
            Finding::new(Label::Password, "password = 'x'".to_string()),
        );

        assert_eq!(
            reconcile(&current, Some(&cached), true),
            Action::PartialRescan(vec![UnitId::Line(0)])
        );
    }

    #[test]
    fn test_conservative_with_no_findings_skips_everything() {
        // With zero recorded findings the "every finding untouched"
        // condition holds vacuously, so conservative mode skips the
        // classifier entirely. This is the risky half of the policy and
        // the reason it defaults off.
        let current = fingerprint(&units(&["api_key = 'abc'"]));
        let cached = entry_for(&["x = 1"]);
        assert_eq!(reconcile(&current, Some(&cached), true), Action::NoChange);
        assert_eq!(
            reconcile(&current, Some(&cached), false),
            Action::PartialRescan(vec![UnitId::Line(0)])
        );
    }
}
