//! Scan target discovery
//!
//! Resolves a file-or-directory target into the list of files to scan.
//! Credential mode takes any file that looks like text (no NUL byte in
//! the first 1 KiB); function mode takes C-family sources by extension.

use crate::config::{Config, ScanMode};
use crate::error::{Result, SiftError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use walkdir::WalkDir;

/// C/C++ source and header extensions accepted in function mode
const C_EXTENSIONS: [&str; 7] = ["c", "cc", "cpp", "cxx", "h", "hpp", "hxx"];

/// Probe whether a file is text: no NUL byte in its first 1 KiB.
/// Unreadable files are treated as non-text and skipped.
fn is_text_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };
    let mut buf = [0u8; 1024];
    match file.read(&mut buf) {
        Ok(n) => !buf[..n].contains(&0),
        Err(_) => false,
    }
}

/// Whether the file has a C-family source extension
fn is_c_type_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| C_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn matches_mode(path: &Path, mode: ScanMode) -> bool {
    match mode {
        ScanMode::Credentials => is_text_file(path),
        ScanMode::Functions => is_c_type_file(path),
    }
}

/// Directories never descended into
fn is_skipped_dir(name: &str) -> bool {
    name == ".git" || name == ".siftscan" || name == ".svn" || name == ".hg"
}

/// Resolve the scan target into absolute file paths, in walk order.
///
/// A single-file target is returned as-is when it matches the mode; a
/// directory is walked recursively. Cache keys are absolute paths, so
/// everything is canonicalized relative to the current directory first.
pub fn discover_files(config: &Config) -> Result<Vec<String>> {
    let target = &config.target;
    if !target.exists() {
        return Err(SiftError::TargetNotFound(target.display().to_string()));
    }

    let absolute = target
        .canonicalize()
        .map_err(|e| SiftError::FileUnreadable {
            path: target.display().to_string(),
            reason: e.to_string(),
        })?;

    if absolute.is_file() {
        if matches_mode(&absolute, config.mode) {
            return Ok(vec![absolute.to_string_lossy().to_string()]);
        }
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(&absolute).into_iter().filter_entry(|entry| {
        entry
            .file_name()
            .to_str()
            .map(|name| !is_skipped_dir(name))
            .unwrap_or(true)
    });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            // Permission errors on a subtree skip that subtree, not the run
            Err(_) => continue,
        };
        if entry.file_type().is_file() && matches_mode(entry.path(), config.mode) {
            files.push(entry.path().to_string_lossy().to_string());
        }
    }

    Ok(files)
}
