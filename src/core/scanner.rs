//! Incremental scan driver
//!
//! Orchestrates, per file: parse -> fingerprint -> reconcile -> classify
//! only what reconciliation demands -> merge fresh results with
//! carried-over findings -> update the in-memory cache entry. The cache
//! is an explicit value threaded through; persisting it afterwards is
//! the caller's single `save`.
//!
//! Parsing, fingerprinting, and reconciliation are pure per file, so
//! they run across files on a rayon pool. Classification and cache
//! mutation happen serially afterwards: one writer, one consistent
//! snapshot.

use crate::cache::{CacheEntry, ScanCache};
use crate::classify::Classifier;
use crate::config::Config;
use crate::core::fingerprint::{fingerprint, Fingerprint};
use crate::core::reconcile::{reconcile, Action};
use crate::core::unit::{AnalysisUnit, UnitId};
use crate::core::Finding;
use crate::error::{Result, SiftError};
use crate::parse::UnitParser;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Findings for one scanned file
#[derive(Debug)]
pub struct FileReport {
    /// Absolute path of the file
    pub path: String,
    /// Non-benign findings, keyed by unit
    pub findings: BTreeMap<UnitId, Finding>,
    /// True when the findings were served without any classifier call
    pub from_cache: bool,
}

/// Aggregate result of a scan run
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Per-file results, in input order (skipped files omitted)
    pub files: Vec<FileReport>,
    /// Files processed to completion
    pub files_scanned: usize,
    /// Files skipped (unreadable, unparsable, or classifier failure)
    pub files_skipped: usize,
    /// Units sent to the classifier across all files
    pub units_classified: usize,
    /// Files answered entirely from the cache
    pub cache_hits: usize,
}

impl ScanReport {
    /// The run's exit signal: did any file yield at least one finding
    pub fn has_findings(&self) -> bool {
        self.files.iter().any(|f| !f.findings.is_empty())
    }

    /// Total findings across all files
    pub fn total_findings(&self) -> usize {
        self.files.iter().map(|f| f.findings.len()).sum()
    }
}

/// Per-file outcome of the parallel phase
enum PlanOutcome {
    Plan(FilePlan),
    Skipped(String),
}

/// Everything decided about a file before any classifier call
struct FilePlan {
    path: String,
    units: Vec<AnalysisUnit>,
    current: Fingerprint,
    action: Action,
}

/// Scan a resolved file list against the given cache.
///
/// The cache is read during planning and mutated only in the serial
/// merge phase; the caller persists it once after this returns. With
/// `config.no_cache` every file is fully classified and the cache is
/// neither consulted nor updated.
pub fn scan_files(
    files: &[String],
    config: &Config,
    parser: &dyn UnitParser,
    classifier: &dyn Classifier,
    cache: &mut ScanCache,
    progress: impl Fn(&str) + Send + Sync,
) -> Result<ScanReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.num_threads)
        .build()
        .map_err(|e| SiftError::Other(format!("Failed to create thread pool: {}", e)))?;

    // Phase 1: parse + fingerprint + reconcile, in parallel. The cache
    // is only read here.
    let planning_cache: &ScanCache = cache;
    let outcomes: Vec<PlanOutcome> = pool.install(|| {
        files
            .par_iter()
            .map(|path| plan_file(path, config, parser, planning_cache))
            .collect()
    });

    // Phase 2: classify + merge + cache update, serially.
    let mut report = ScanReport::default();
    for outcome in outcomes {
        let plan = match outcome {
            PlanOutcome::Plan(plan) => plan,
            PlanOutcome::Skipped(msg) => {
                progress(&msg);
                report.files_skipped += 1;
                continue;
            }
        };

        match execute_plan(plan, config, classifier, cache, &mut report) {
            Ok(()) => report.files_scanned += 1,
            Err((path, e)) => {
                // A single bad file never aborts the batch. The cache
                // entry stays untouched so a failed classification is
                // never recorded as "no findings".
                progress(&format!("Error scanning file {}: {}", path, e));
                report.files_skipped += 1;
            }
        }
    }

    Ok(report)
}

/// Parallel-phase work: everything except classification
fn plan_file(
    path: &str,
    config: &Config,
    parser: &dyn UnitParser,
    cache: &ScanCache,
) -> PlanOutcome {
    let units = match parser.parse(Path::new(path)) {
        Ok(units) => units,
        Err(e) => return PlanOutcome::Skipped(format!("Skipping {}: {}", path, e)),
    };
    if units.is_empty() {
        let e = SiftError::NoUnits {
            path: path.to_string(),
        };
        return PlanOutcome::Skipped(format!("Skipping: {}", e));
    }

    let current = fingerprint(&units);
    let action = if config.no_cache {
        Action::FullRescan
    } else {
        reconcile(&current, cache.get(path), config.conservative_rescan)
    };

    PlanOutcome::Plan(FilePlan {
        path: path.to_string(),
        units,
        current,
        action,
    })
}

/// Serial-phase work: classify stale units, merge, update the cache
fn execute_plan(
    plan: FilePlan,
    config: &Config,
    classifier: &dyn Classifier,
    cache: &mut ScanCache,
    report: &mut ScanReport,
) -> std::result::Result<(), (String, SiftError)> {
    let FilePlan {
        path,
        units,
        current,
        action,
    } = plan;

    let stale_ids: Vec<UnitId> = match action {
        Action::NoChange => {
            // Reused verbatim, minus findings for units no longer in the
            // file (relevant under the conservative short-circuit, where
            // the cached fingerprint may lag the file).
            let findings = cache
                .get(&path)
                .map(|entry| {
                    entry
                        .findings
                        .iter()
                        .filter(|(id, _)| current.unit_hashes.contains_key(id))
                        .map(|(id, f)| (id.clone(), f.clone()))
                        .collect()
                })
                .unwrap_or_default();

            report.cache_hits += 1;
            report.files.push(FileReport {
                path,
                findings,
                from_cache: true,
            });
            return Ok(());
        }
        // Every unit the fingerprinter kept, in stable order
        Action::FullRescan => current.unit_hashes.keys().cloned().collect(),
        Action::PartialRescan(ids) => ids,
    };

    // One batch per file to amortize classifier setup cost. Zero stale
    // units is not an error: everything material was carried over.
    let stale_units: Vec<(UnitId, String)> = stale_ids
        .iter()
        .filter_map(|id| {
            units
                .iter()
                .find(|u| &u.id == id)
                .map(|u| (id.clone(), u.normalized().to_string()))
        })
        .collect();
    let batch: Vec<String> = stale_units.iter().map(|(_, c)| c.clone()).collect();

    let labels = if batch.is_empty() {
        Vec::new()
    } else {
        match classifier.classify(&batch) {
            Ok(labels) if labels.len() == batch.len() => labels,
            Ok(labels) => {
                return Err((
                    path,
                    SiftError::ClassifierMismatch {
                        expected: batch.len(),
                        got: labels.len(),
                    },
                ))
            }
            Err(e) => return Err((path, e)),
        }
    };
    report.units_classified += batch.len();

    // Merge: old findings restricted to unchanged, still-existing units,
    // plus fresh non-benign results. Benign outcomes stay absent, and
    // findings for deleted units drop out here.
    let mut merged: BTreeMap<UnitId, Finding> = if config.no_cache {
        BTreeMap::new()
    } else {
        cache
            .get(&path)
            .map(|entry| {
                entry
                    .findings
                    .iter()
                    .filter(|(id, _)| {
                        current.unit_hashes.contains_key(id) && !stale_ids.contains(id)
                    })
                    .map(|(id, f)| (id.clone(), f.clone()))
                    .collect()
            })
            .unwrap_or_default()
    };

    for ((unit_id, content), label) in stale_units.into_iter().zip(labels) {
        if !label.is_benign() {
            merged.insert(unit_id, Finding::new(label, content));
        }
    }

    if !config.no_cache {
        cache.insert(
            path.clone(),
            CacheEntry {
                fingerprint: current,
                findings: merged.clone(),
            },
        );
    }

    report.files.push(FileReport {
        path,
        findings: merged,
        from_cache: false,
    });
    Ok(())
}
