//! Console (human-readable) exporter

use crate::config::{Config, ScanMode};
use crate::core::ScanReport;
use crate::error::Result;
use crate::export::Exporter;
use std::io::Write;

/// Human-readable console output exporter
pub struct ConsoleExporter;

impl Exporter for ConsoleExporter {
    fn export(&self, report: &ScanReport, config: &Config, writer: &mut dyn Write) -> Result<()> {
        for file in &report.files {
            if file.findings.is_empty() {
                continue;
            }

            if file.from_cache {
                writeln!(writer, "Results for {} (from cache)", file.path)?;
            } else {
                writeln!(writer, "Results for {}", file.path)?;
            }
            for (unit_id, finding) in &file.findings {
                match config.mode {
                    ScanMode::Credentials => {
                        writeln!(
                            writer,
                            "  {}: {} [{}]",
                            unit_id, finding.label, finding.content
                        )?;
                    }
                    ScanMode::Functions => {
                        writeln!(writer, "  {} -> [function name : {}]", finding.label, unit_id)?;
                    }
                }
            }
            writeln!(writer)?;
        }

        writeln!(writer, "Summary:")?;
        writeln!(writer, "  Mode: {}", config.mode.name())?;
        writeln!(writer, "  Files scanned: {}", report.files_scanned)?;
        writeln!(writer, "  Files skipped: {}", report.files_skipped)?;
        writeln!(writer, "  Served from cache: {}", report.cache_hits)?;
        writeln!(writer, "  Units classified: {}", report.units_classified)?;
        writeln!(writer, "  Findings: {}", report.total_findings())?;

        Ok(())
    }
}
