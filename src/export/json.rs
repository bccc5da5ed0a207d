//! JSON exporter for tool integration

use crate::config::Config;
use crate::core::ScanReport;
use crate::error::{Result, SiftError};
use crate::export::Exporter;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct JsonFinding<'a> {
    unit: String,
    label: String,
    content: &'a str,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: &'a str,
    from_cache: bool,
    findings: Vec<JsonFinding<'a>>,
}

#[derive(Serialize)]
struct JsonSummary {
    mode: &'static str,
    files_scanned: usize,
    files_skipped: usize,
    cache_hits: usize,
    units_classified: usize,
    findings: usize,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    files: Vec<JsonFile<'a>>,
    summary: JsonSummary,
}

/// Structured JSON output exporter
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn export(&self, report: &ScanReport, config: &Config, writer: &mut dyn Write) -> Result<()> {
        let files: Vec<JsonFile> = report
            .files
            .iter()
            .filter(|f| !f.findings.is_empty())
            .map(|f| JsonFile {
                path: &f.path,
                from_cache: f.from_cache,
                findings: f
                    .findings
                    .iter()
                    .map(|(id, finding)| JsonFinding {
                        unit: id.key(),
                        label: finding.label.to_string(),
                        content: &finding.content,
                    })
                    .collect(),
            })
            .collect();

        let output = JsonOutput {
            files,
            summary: JsonSummary {
                mode: config.mode.name(),
                files_scanned: report.files_scanned,
                files_skipped: report.files_skipped,
                cache_hits: report.cache_hits,
                units_classified: report.units_classified,
                findings: report.total_findings(),
            },
        };

        serde_json::to_writer_pretty(&mut *writer, &output)
            .map_err(|e| SiftError::Other(format!("Failed to write JSON output: {}", e)))?;
        writeln!(writer)?;
        Ok(())
    }
}
