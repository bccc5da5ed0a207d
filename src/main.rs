//! siftscan - Incremental credential and vulnerability scanner
//!
//! Scans source trees for sensitive lines and vulnerable C functions,
//! caching fingerprints and findings between runs so that only changed
//! units are ever reclassified.

mod cache;
mod classify;
mod cli;
mod config;
mod core;
mod discover;
mod error;
mod export;
mod parse;

use cache::CacheStore;
use clap::Parser;
use classify::{Classifier, CredentialClassifier, VulnerabilityClassifier};
use cli::Cli;
use config::ScanMode;
use crate::core::scan_files;
use export::{create_exporter, get_output_writer};
use parse::{FunctionParser, LineParser, UnitParser};
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = match cli.into_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    // Progress callback for logging
    let progress = |msg: &str| {
        eprintln!("{}", msg);
    };

    // === Phase 1: File Discovery ===
    let file_list = match discover::discover_files(&config) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    if file_list.is_empty() {
        progress(match config.mode {
            ScanMode::Credentials => "No readable text files found.",
            ScanMode::Functions => "No C/C++ files found.",
        });
        return ExitCode::SUCCESS;
    }
    progress(&format!(
        "Found {} files for {} scan",
        file_list.len(),
        config.mode.name()
    ));

    // === Phase 2: Load Cache ===
    let store = CacheStore::new(&config);
    let mut cache = if config.reset_cache {
        progress("Resetting cache...");
        store.reset()
    } else {
        store.load()
    };

    // === Phase 3: Scan ===
    let parser: Box<dyn UnitParser> = match config.mode {
        ScanMode::Credentials => Box::new(LineParser),
        ScanMode::Functions => Box::new(FunctionParser::new()),
    };
    let classifier: Box<dyn Classifier> = match config.mode {
        ScanMode::Credentials => Box::new(CredentialClassifier::new()),
        ScanMode::Functions => Box::new(VulnerabilityClassifier::new()),
    };

    let report = match scan_files(
        &file_list,
        &config,
        parser.as_ref(),
        classifier.as_ref(),
        &mut cache,
        progress,
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    // === Phase 4: Persist Cache ===
    // The one fatal failure past setup: silently losing the cache would
    // degrade every future run.
    if !config.no_cache {
        if let Err(e) = store.save(&cache) {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    }

    // === Phase 5: Export Results ===
    let exporter = create_exporter(config.output_format);
    let mut writer = match get_output_writer(&config.output_filename) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error creating output: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Err(e) = exporter.export(&report, &config, &mut *writer) {
        eprintln!("Error writing output: {}", e);
        return ExitCode::from(2);
    }

    if let Err(e) = writer.flush() {
        eprintln!("Error flushing output: {}", e);
        return ExitCode::from(2);
    }

    // === Phase 6: Exit Code ===
    if report.has_findings() {
        ExitCode::from(1) // Findings present
    } else {
        ExitCode::SUCCESS // Nothing of interest
    }
}
