//! One complete audit: manifest, scan, verdict

use log::debug;

use crate::compliance::{check, ComplianceReport, ManifestSource};
use crate::correlate::Correlator;
use crate::domain::AuditError;
use crate::fingerprint::Fingerprinter;
use crate::procfs::ProcessTable;
use crate::scan::{scan, ScanOptions};

/// Fetch the manifest, scan every selected process, and compare
///
/// The manifest is fetched before any process is touched, so a manifest
/// failure ends the run without scanning.
///
/// # Errors
/// Returns an error if the manifest cannot be obtained or the process
/// table cannot be read.
pub fn audit<P, F, M>(
    table: &P,
    fingerprinter: F,
    manifest_source: &M,
    options: &ScanOptions,
) -> Result<ComplianceReport, AuditError>
where
    P: ProcessTable,
    F: Fingerprinter,
    M: ManifestSource + ?Sized,
{
    let manifest = manifest_source.fetch()?;

    let mut correlator = Correlator::new(fingerprinter);
    let outcome = scan(table, &mut correlator, options)?;

    let report = check(&manifest, outcome, table);
    if report.is_compliant() {
        debug!("Everything is OK.");
    }
    Ok(report)
}
