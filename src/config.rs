//! Configuration types for siftscan

use std::path::PathBuf;

/// Scan granularity: what the smallest re-analyzable unit of a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Line-level credential detection
    #[default]
    Credentials,
    /// Function-level vulnerability detection
    Functions,
}

impl ScanMode {
    /// Name used in log messages
    pub fn name(&self) -> &'static str {
        match self {
            ScanMode::Credentials => "credential",
            ScanMode::Functions => "function",
        }
    }
}

/// Output format for scan results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable console output
    #[default]
    Console,
    /// JSON output with structured data
    Json,
}

/// Configuration options for a scan run
#[derive(Debug, Clone)]
pub struct Config {
    /// File or directory to scan
    pub target: PathBuf,

    /// Scan granularity (credentials = lines, functions = C functions)
    pub mode: ScanMode,

    /// Bypass the cache entirely: classify everything, update nothing
    pub no_cache: bool,

    /// Clear persisted cache state before scanning
    pub reset_cache: bool,

    /// Skip reclassification when no unit with a recorded finding changed.
    /// Faster, but a changed benign unit that became sensitive is missed
    /// until a finding-bearing unit is touched.
    pub conservative_rescan: bool,

    /// Directory holding the persisted cache documents (default: .siftscan)
    pub cache_dir: PathBuf,

    /// Output format (console or json)
    pub output_format: OutputFormat,

    /// Path to output file (or "-" for stdout)
    pub output_filename: String,

    /// Number of threads for the parse/fingerprint/reconcile phase
    pub num_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: PathBuf::from("."),
            mode: ScanMode::Credentials,
            no_cache: false,
            reset_cache: false,
            conservative_rescan: false,
            cache_dir: PathBuf::from(".siftscan"),
            output_format: OutputFormat::Console,
            output_filename: String::from("-"),
            num_threads: num_cpus::get(),
        }
    }
}

impl Config {
    /// Path of the persisted cache document for the configured granularity.
    /// The two granularities never share a document, so a line-keyed entry
    /// can never collide with a function-keyed one for the same path.
    pub fn cache_file(&self) -> PathBuf {
        let name = match self.mode {
            ScanMode::Credentials => "cred_cache.json",
            ScanMode::Functions => "vuln_cache.json",
        };
        self.cache_dir.join(name)
    }
}
