use log::debug;
use serde::Serialize;

use super::manifest::Manifest;
use super::report::ComplianceReport;
use crate::domain::{BuildId, Fingerprint, Pid};
use crate::procfs::ProcessTable;
use crate::scan::ScanOutcome;

/// A running process that maps an outdated library
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub pid: Pid,
    /// Empty if the command name could not be read
    pub comm: String,
    pub library: String,
    pub observed: BuildId,
    pub expected: BuildId,
}

/// Expected build-id when `library` with `fingerprint` is out of date
///
/// Libraries are matched by basename alone, so two unrelated files that
/// share a name are held to the same manifest entry. An unknown
/// fingerprint is never outdated.
#[must_use]
pub fn expected_update<'m>(
    manifest: &'m Manifest,
    library: &str,
    fingerprint: &Fingerprint,
) -> Option<&'m BuildId> {
    let observed = fingerprint.build_id()?;
    manifest.expected(library).filter(|expected| *expected != observed)
}

/// Fold scan observations against the manifest
pub fn check<P: ProcessTable>(manifest: &Manifest, outcome: ScanOutcome, table: &P) -> ComplianceReport {
    let mut findings = Vec::new();

    for observation in &outcome.observations {
        let Some(observed) = observation.fingerprint.build_id() else {
            continue;
        };
        let Some(expected) = expected_update(manifest, &observation.library, &observation.fingerprint) else {
            continue;
        };

        let finding = Finding {
            pid: observation.pid,
            comm: table.comm(observation.pid),
            library: observation.library.clone(),
            observed: observed.clone(),
            expected: expected.clone(),
        };
        debug!(
            "Process {}[{}] linked to the `{}` that is not up to date",
            finding.comm, finding.pid.0, finding.library
        );
        findings.push(finding);
    }

    ComplianceReport { findings, stats: outcome.stats }
}
