//! CLI argument parsing using clap

use crate::config::{Config, OutputFormat, ScanMode};
use crate::error::{Result, SiftError};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Granularity selector as exposed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Line-level credential detection
    Credentials,
    /// Function-level vulnerability detection (C/C++)
    Functions,
}

/// Incremental credential and vulnerability scanner
#[derive(Parser, Debug)]
#[command(name = "siftscan")]
#[command(version)]
#[command(about = "Scan source trees for credentials and vulnerable code", long_about = None)]
pub struct Cli {
    /// File or directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Scan mode
    #[arg(
        short = 'm',
        long = "mode",
        value_enum,
        value_name = "MODE",
        default_value = "credentials"
    )]
    pub mode: ModeArg,

    /// Force a full scan: bypass the cache and do not update it
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Clear the persisted cache before scanning
    #[arg(long = "reset-cache")]
    pub reset_cache: bool,

    /// Skip reclassification when no previously-flagged unit changed
    /// (faster, but may miss a benign line that became sensitive)
    #[arg(long = "conservative")]
    pub conservative: bool,

    /// Directory for persisted cache documents
    #[arg(long = "cache-dir", value_name = "DIR", default_value = ".siftscan")]
    pub cache_dir: PathBuf,

    /// Output in JSON format
    #[arg(long = "json")]
    pub json: bool,

    /// Output file for results (use "-" for stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = "-")]
    pub output: String,

    /// Number of threads for parallel fingerprinting
    #[arg(short = 'j', long = "threads", value_name = "N")]
    pub threads: Option<usize>,
}

impl Cli {
    /// Parse command line arguments into a Config
    pub fn into_config(self) -> Result<Config> {
        if self.threads == Some(0) {
            return Err(SiftError::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }

        let output_format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Console
        };

        let mode = match self.mode {
            ModeArg::Credentials => ScanMode::Credentials,
            ModeArg::Functions => ScanMode::Functions,
        };

        Ok(Config {
            target: self.path,
            mode,
            no_cache: self.no_cache,
            reset_cache: self.reset_cache,
            conservative_rescan: self.conservative,
            cache_dir: self.cache_dir,
            output_format,
            output_filename: self.output,
            num_threads: self.threads.unwrap_or_else(num_cpus::get),
        })
    }
}
