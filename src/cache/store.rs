//! Cache persistence
//!
//! The persisted layout is one JSON document per granularity:
//!
//! ```json
//! {
//!   "/abs/path/file.py": {
//!     "file_hash": "<hex>",
//!     "line_hashes": { "0": "<hex>", ... },
//!     "vulnerable_lines": {
//!       "2": { "credential_type": "Password", "line_content": "..." }
//!     }
//!   }
//! }
//! ```
//!
//! Function-granularity documents use `func_hashes` / `vulnerable_funcs`
//! with `prediction` / `body` per finding. Wire structs below convert
//! to and from the internal model; a document that fails to deserialize
//! degrades to an empty cache rather than aborting the run.

use crate::cache::{CacheEntry, ScanCache};
use crate::config::{Config, ScanMode};
use crate::core::{Finding, Fingerprint, Label, UnitId};
use crate::error::{Result, SiftError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Persisted finding for a line unit
#[derive(Debug, Serialize, Deserialize)]
struct LineFindingWire {
    credential_type: String,
    line_content: String,
}

/// Persisted finding for a function unit
#[derive(Debug, Serialize, Deserialize)]
struct FuncFindingWire {
    prediction: String,
    body: String,
}

/// Persisted entry for a file at line granularity
#[derive(Debug, Serialize, Deserialize)]
struct LineEntryWire {
    file_hash: String,
    #[serde(default)]
    line_hashes: BTreeMap<String, String>,
    #[serde(default)]
    vulnerable_lines: BTreeMap<String, LineFindingWire>,
}

/// Persisted entry for a file at function granularity
#[derive(Debug, Serialize, Deserialize)]
struct FuncEntryWire {
    file_hash: String,
    #[serde(default)]
    func_hashes: BTreeMap<String, String>,
    #[serde(default)]
    vulnerable_funcs: BTreeMap<String, FuncFindingWire>,
}

/// Disk-backed cache store for one granularity
pub struct CacheStore {
    path: PathBuf,
    mode: ScanMode,
}

impl CacheStore {
    /// Create a store bound to the configured cache document
    pub fn new(config: &Config) -> Self {
        Self {
            path: config.cache_file(),
            mode: config.mode,
        }
    }

    /// Read persisted state. A missing, unreadable, or corrupt document
    /// yields an empty cache: everything is treated as unseen, never a
    /// crash.
    pub fn load(&self) -> ScanCache {
        let data = match fs::read_to_string(&self.path) {
            Ok(d) => d,
            Err(_) => return ScanCache::new(),
        };

        match self.mode {
            ScanMode::Credentials => serde_json::from_str::<BTreeMap<String, LineEntryWire>>(&data)
                .map(|doc| {
                    doc.into_iter()
                        .map(|(path, wire)| (path, line_entry_from_wire(wire)))
                        .collect()
                })
                .unwrap_or_default(),
            ScanMode::Functions => serde_json::from_str::<BTreeMap<String, FuncEntryWire>>(&data)
                .map(|doc| {
                    doc.into_iter()
                        .map(|(path, wire)| (path, func_entry_from_wire(wire)))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Fresh empty cache; the next `save` fully replaces persisted state
    pub fn reset(&self) -> ScanCache {
        ScanCache::new()
    }

    /// Persist the full cache. Creates the containing directory as
    /// needed and writes via a temporary file plus rename, so a crash
    /// leaves either the previous snapshot or the new one, never a torn
    /// write.
    pub fn save(&self, cache: &ScanCache) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    SiftError::CacheError(format!(
                        "Failed to create cache directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let serialized = match self.mode {
            ScanMode::Credentials => {
                let doc: BTreeMap<&String, LineEntryWire> = cache
                    .iter()
                    .map(|(path, entry)| (path, line_entry_to_wire(entry)))
                    .collect();
                serde_json::to_string_pretty(&doc)
            }
            ScanMode::Functions => {
                let doc: BTreeMap<&String, FuncEntryWire> = cache
                    .iter()
                    .map(|(path, entry)| (path, func_entry_to_wire(entry)))
                    .collect();
                serde_json::to_string_pretty(&doc)
            }
        }
        .map_err(|e| SiftError::CacheError(format!("Failed to serialize cache: {}", e)))?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, serialized).map_err(|e| {
            SiftError::CacheError(format!(
                "Failed to write cache file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            SiftError::CacheError(format!(
                "Failed to replace cache file '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

fn line_entry_from_wire(wire: LineEntryWire) -> CacheEntry {
    let unit_hashes: BTreeMap<UnitId, String> = wire
        .line_hashes
        .into_iter()
        .filter_map(|(key, hash)| UnitId::from_line_key(&key).map(|id| (id, hash)))
        .collect();

    let findings = wire
        .vulnerable_lines
        .into_iter()
        .filter_map(|(key, f)| {
            let id = UnitId::from_line_key(&key)?;
            // Drop findings with no matching unit hash or an unknown
            // label instead of trusting a malformed document.
            if !unit_hashes.contains_key(&id) {
                return None;
            }
            let label: Label = f.credential_type.parse().ok()?;
            Some((id, Finding::new(label, f.line_content)))
        })
        .collect();

    CacheEntry {
        fingerprint: Fingerprint {
            file_hash: wire.file_hash,
            unit_hashes,
        },
        findings,
    }
}

fn func_entry_from_wire(wire: FuncEntryWire) -> CacheEntry {
    let unit_hashes: BTreeMap<UnitId, String> = wire
        .func_hashes
        .into_iter()
        .map(|(name, hash)| (UnitId::Func(name), hash))
        .collect();

    let findings = wire
        .vulnerable_funcs
        .into_iter()
        .filter_map(|(name, f)| {
            let id = UnitId::Func(name);
            if !unit_hashes.contains_key(&id) {
                return None;
            }
            let label: Label = f.prediction.parse().ok()?;
            Some((id, Finding::new(label, f.body)))
        })
        .collect();

    CacheEntry {
        fingerprint: Fingerprint {
            file_hash: wire.file_hash,
            unit_hashes,
        },
        findings,
    }
}

fn line_entry_to_wire(entry: &CacheEntry) -> LineEntryWire {
    LineEntryWire {
        file_hash: entry.fingerprint.file_hash.clone(),
        line_hashes: entry
            .fingerprint
            .unit_hashes
            .iter()
            .map(|(id, hash)| (id.key(), hash.clone()))
            .collect(),
        vulnerable_lines: entry
            .findings
            .iter()
            .map(|(id, f)| {
                (
                    id.key(),
                    LineFindingWire {
                        credential_type: f.label.to_string(),
                        line_content: f.content.clone(),
                    },
                )
            })
            .collect(),
    }
}

fn func_entry_to_wire(entry: &CacheEntry) -> FuncEntryWire {
    FuncEntryWire {
        file_hash: entry.fingerprint.file_hash.clone(),
        func_hashes: entry
            .fingerprint
            .unit_hashes
            .iter()
            .map(|(id, hash)| (id.key(), hash.clone()))
            .collect(),
        vulnerable_funcs: entry
            .findings
            .iter()
            .map(|(id, f)| {
                (
                    id.key(),
                    FuncFindingWire {
                        prediction: f.label.to_string(),
                        body: f.content.clone(),
                    },
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fingerprint::fingerprint;
    use crate::core::unit::AnalysisUnit;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_config(dir: &std::path::Path, mode: ScanMode) -> Config {
        let mut config = Config::default();
        config.cache_dir = dir.to_path_buf();
        config.mode = mode;
        config
    }

    fn sample_entry() -> CacheEntry {
        let units = vec![
            AnalysisUnit::new(UnitId::Line(0), "username = 'admin'".to_string()),
            AnalysisUnit::new(UnitId::Line(1), "password = 'secret123'".to_string()),
        ];
        let mut entry = CacheEntry::new(fingerprint(&units));
        entry.findings.insert(
            UnitId::Line(1),
            Finding::new(Label::Password, "password = 'secret123'".to_string()),
        );
        entry
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(&test_config(temp.path(), ScanMode::Credentials));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let config = test_config(temp.path(), ScanMode::Credentials);
        fs::write(config.cache_file(), "{ not valid json").unwrap();

        let store = CacheStore::new(&config);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let config = test_config(temp.path(), ScanMode::Credentials);
        let store = CacheStore::new(&config);

        let mut cache = ScanCache::new();
        cache.insert("/project/settings.py".to_string(), sample_entry());
        store.save(&cache).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, cache);
    }

    #[test]
    fn test_save_creates_cache_directory() {
        let temp = TempDir::new().unwrap();
        let config = test_config(&temp.path().join("nested").join("dir"), ScanMode::Credentials);
        let store = CacheStore::new(&config);

        store.save(&ScanCache::new()).unwrap();
        assert!(config.cache_file().exists());
    }

    #[test]
    fn test_save_replaces_after_reset() {
        let temp = TempDir::new().unwrap();
        let config = test_config(temp.path(), ScanMode::Credentials);
        let store = CacheStore::new(&config);

        let mut cache = ScanCache::new();
        cache.insert("/project/settings.py".to_string(), sample_entry());
        store.save(&cache).unwrap();

        let fresh = store.reset();
        store.save(&fresh).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_wire_field_names_line_granularity() {
        let temp = TempDir::new().unwrap();
        let config = test_config(temp.path(), ScanMode::Credentials);
        let store = CacheStore::new(&config);

        let mut cache = ScanCache::new();
        cache.insert("/project/settings.py".to_string(), sample_entry());
        store.save(&cache).unwrap();

        let raw = fs::read_to_string(config.cache_file()).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &doc["/project/settings.py"];
        assert!(entry["file_hash"].is_string());
        assert!(entry["line_hashes"]["1"].is_string());
        assert_eq!(entry["vulnerable_lines"]["1"]["credential_type"], "Password");
        assert_eq!(
            entry["vulnerable_lines"]["1"]["line_content"],
            "password = 'secret123'"
        );
    }

    #[test]
    fn test_wire_field_names_func_granularity() {
        let temp = TempDir::new().unwrap();
        let config = test_config(temp.path(), ScanMode::Functions);
        let store = CacheStore::new(&config);

        let units = vec![AnalysisUnit::new(
            UnitId::Func("copy_buf".to_string()),
            "void copy_buf(char *d, char *s) { strcpy(d, s); }".to_string(),
        )];
        let mut entry = CacheEntry::new(fingerprint(&units));
        entry.findings.insert(
            UnitId::Func("copy_buf".to_string()),
            Finding::new(Label::Vulnerable, units[0].content.clone()),
        );

        let mut cache = ScanCache::new();
        cache.insert("/project/util.c".to_string(), entry);
        store.save(&cache).unwrap();

        let raw = fs::read_to_string(config.cache_file()).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &doc["/project/util.c"];
        assert!(entry["func_hashes"]["copy_buf"].is_string());
        assert_eq!(entry["vulnerable_funcs"]["copy_buf"]["prediction"], "Vulnerable");
        assert!(entry["vulnerable_funcs"]["copy_buf"]["body"]
            .as_str()
            .unwrap()
            .contains("strcpy"));
    }

    #[test]
    fn test_load_drops_finding_without_unit_hash() {
        let temp = TempDir::new().unwrap();
        let config = test_config(temp.path(), ScanMode::Credentials);
        fs::create_dir_all(&config.cache_dir).unwrap();

        // Finding for line 5, but the fingerprint only knows line 0:
        // the orphaned finding must not survive the load.
        let doc = r#"{
            "/project/a.py": {
                "file_hash": "abc",
                "line_hashes": { "0": "h0" },
                "vulnerable_lines": {
                    "5": { "credential_type": "Password", "line_content": "stale" }
                }
            }
        }"#;
        fs::write(config.cache_file(), doc).unwrap();

        let loaded = CacheStore::new(&config).load();
        let entry = loaded.get("/project/a.py").unwrap();
        assert!(entry.findings.is_empty());
        assert_eq!(entry.fingerprint.unit_hashes.len(), 1);
    }

    #[test]
    fn test_granularities_use_separate_documents() {
        let temp = TempDir::new().unwrap();
        let cred_config = test_config(temp.path(), ScanMode::Credentials);
        let func_config = test_config(temp.path(), ScanMode::Functions);

        let mut cache = ScanCache::new();
        cache.insert("/project/settings.py".to_string(), sample_entry());
        CacheStore::new(&cred_config).save(&cache).unwrap();

        // The function-granularity store must not see line entries.
        assert!(CacheStore::new(&func_config).load().is_empty());
        assert_ne!(cred_config.cache_file(), func_config.cache_file());
    }
}
