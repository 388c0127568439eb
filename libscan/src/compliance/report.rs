use serde::Serialize;
use std::io::{self, Write};

use super::checker::Finding;
use crate::scan::ScanStats;

/// Verdict of one audit run
#[derive(Debug, Default, Serialize)]
pub struct ComplianceReport {
    pub findings: Vec<Finding>,
    pub stats: ScanStats,
}

impl ComplianceReport {
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.findings.is_empty()
    }

    /// One line per finding, or a single all-clear line
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_text<W: Write>(&self, mut out: W) -> io::Result<()> {
        if self.is_compliant() {
            return writeln!(out, "Everything is OK.");
        }
        for finding in &self.findings {
            writeln!(
                out,
                "Process {}[{}] linked to the `{}` that is not up to date",
                finding.comm, finding.pid.0, finding.library
            )?;
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if serialization or writing fails.
    pub fn write_json<W: Write>(&self, mut out: W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)
    }

    /// Short summary line for stderr
    #[must_use]
    pub fn summary(&self) -> String {
        let stats = &self.stats;
        format!(
            "{} processes scanned ({} skipped), {} libraries checked across {} inodes \
             ({} from live memory, {} unknown), {} outdated",
            stats.processes_scanned,
            stats.processes_skipped,
            stats.libraries_checked,
            stats.distinct_inodes,
            stats.live_memory_extractions,
            stats.unknown_fingerprints,
            self.findings.len(),
        )
    }
}
