//! Scan driver: enumerate processes, resolve libraries, correlate fingerprints

use log::{debug, warn};
use serde::Serialize;

use crate::correlate::{Correlator, Observation};
use crate::domain::{Pid, ScanError};
use crate::fingerprint::Fingerprinter;
use crate::libraries::{mapped_libraries, LibraryRef};
use crate::procfs::{is_match, Access, ProcessTable};

/// Which processes and libraries a scan covers
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Only these processes (empty = all)
    pub pids: Vec<Pid>,
    /// Only processes whose command or executable name matches
    pub process_name: Option<String>,
    /// Only pathnames that look like shared objects
    pub shared_objects_only: bool,
}

impl ScanOptions {
    fn wants<P: ProcessTable>(&self, table: &P, pid: Pid) -> bool {
        if !self.pids.is_empty() && !self.pids.contains(&pid) {
            return false;
        }
        match &self.process_name {
            Some(pattern) => is_match(&table.comm(pid), table.exe(pid).as_deref(), pattern),
            None => true,
        }
    }
}

/// Summary counters for one scan
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct ScanStats {
    pub processes_scanned: u64,
    /// Denied, exited, or unreadable before their maps could be parsed
    pub processes_skipped: u64,
    pub libraries_checked: u64,
    pub distinct_inodes: u64,
    pub live_memory_extractions: u64,
    pub unknown_fingerprints: u64,
    pub cache_hits: u64,
}

/// Everything a scan observed
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub observations: Vec<Observation>,
    pub stats: ScanStats,
}

/// Walk every selected process and fingerprint the libraries it maps
///
/// Processes that exit, refuse access, or fail to yield their maps are
/// skipped; one bad process never ends the scan.
///
/// # Errors
/// Returns an error if the process list cannot be read.
pub fn scan<P, F>(
    table: &P,
    correlator: &mut Correlator<F>,
    options: &ScanOptions,
) -> Result<ScanOutcome, ScanError>
where
    P: ProcessTable,
    F: Fingerprinter,
{
    let mut outcome = ScanOutcome::default();

    for pid in table.pids()? {
        if !options.wants(table, pid) {
            continue;
        }

        let entries = match table.maps(pid) {
            Ok(Access::Granted(entries)) => entries,
            Ok(Access::Denied | Access::Vanished) => {
                outcome.stats.processes_skipped += 1;
                continue;
            }
            Err(err) => {
                warn!("Skipping {pid}: {err}");
                outcome.stats.processes_skipped += 1;
                continue;
            }
        };
        outcome.stats.processes_scanned += 1;

        let mut libraries = mapped_libraries(&entries);
        if options.shared_objects_only {
            libraries.retain(LibraryRef::is_shared_object);
        }
        debug!("{pid}: {} mapped libraries", libraries.len());

        let observations = correlator.correlate(pid, &libraries);
        outcome.stats.libraries_checked += observations.len() as u64;
        outcome.stats.unknown_fingerprints +=
            observations.iter().filter(|o| !o.fingerprint.is_known()).count() as u64;
        outcome.observations.extend(observations);
    }

    let correlator_stats = correlator.stats();
    outcome.stats.distinct_inodes = correlator.distinct_inodes() as u64;
    outcome.stats.live_memory_extractions = correlator_stats.live_memory_extractions;
    outcome.stats.cache_hits = correlator_stats.cache_hits;

    Ok(outcome)
}
