use log::debug;
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use super::cache::BuildIdCache;
use crate::domain::{Fingerprint, Inode, Pid};
use crate::fingerprint::Fingerprinter;
use crate::libraries::LibraryRef;

/// Where a library's bytes will be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteSource {
    /// The file at the mapped pathname is still the mapped inode
    Disk,
    /// The disk copy is gone or replaced; read the process's own mapping
    LiveMemory,
}

/// Decide whether the disk copy of a mapping can be trusted
#[must_use]
pub fn choose_source(pathname: &str, inode: Inode) -> ByteSource {
    match fs::metadata(Path::new(pathname)) {
        Ok(meta) if meta.is_file() && meta.ino() == inode.0 => ByteSource::Disk,
        _ => ByteSource::LiveMemory,
    }
}

/// One mapped library of one process with its fingerprint
#[derive(Debug, Clone)]
pub struct Observation {
    pub pid: Pid,
    pub library: String,
    pub inode: Inode,
    pub fingerprint: Fingerprint,
}

/// Counters kept while resolving
#[derive(Debug, Default, Clone, Copy)]
pub struct CorrelatorStats {
    pub cache_hits: u64,
    pub disk_extractions: u64,
    pub live_memory_extractions: u64,
}

/// Resolves fingerprints for (pid, library) pairs, once per inode
pub struct Correlator<F> {
    fingerprinter: F,
    cache: BuildIdCache,
    stats: CorrelatorStats,
}

impl<F: Fingerprinter> Correlator<F> {
    pub fn new(fingerprinter: F) -> Self {
        Self { fingerprinter, cache: BuildIdCache::new(), stats: CorrelatorStats::default() }
    }

    /// Fingerprint one library as mapped by `pid`
    ///
    /// A cached inode is returned as is. Otherwise the disk file is used when
    /// it is still the mapped inode, and the process's memory when it is not.
    /// A mapping the kernel marks `(deleted)` always goes to memory: its inode
    /// number may since have been reused by whatever now sits at the path.
    pub fn resolve(&mut self, pid: Pid, library: &LibraryRef) -> Fingerprint {
        if let Some(cached) = self.cache.get(library.inode) {
            self.stats.cache_hits += 1;
            return cached.clone();
        }

        let source = if library.deleted {
            ByteSource::LiveMemory
        } else {
            choose_source(&library.pathname, library.inode)
        };
        let fingerprint = match source {
            ByteSource::Disk => {
                self.stats.disk_extractions += 1;
                self.fingerprinter.fingerprint_file(Path::new(&library.pathname))
            }
            ByteSource::LiveMemory => {
                self.stats.live_memory_extractions += 1;
                let fingerprint = self.fingerprinter.fingerprint_memory(pid, library.inode);
                debug!(
                    "`{}` (inode {}) gathered from live memory of {pid}: {fingerprint}",
                    library.pathname, library.inode
                );
                fingerprint
            }
        };

        self.cache.insert(library.inode, fingerprint).clone()
    }

    /// Fingerprint every library of one process
    pub fn correlate(&mut self, pid: Pid, libraries: &[LibraryRef]) -> Vec<Observation> {
        libraries
            .iter()
            .map(|library| {
                let fingerprint = self.resolve(pid, library);
                debug!("For {pid} `{}` was found with build id = {fingerprint}", library.basename());
                Observation {
                    pid,
                    library: library.basename().to_string(),
                    inode: library.inode,
                    fingerprint,
                }
            })
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> CorrelatorStats {
        self.stats
    }

    /// Number of distinct inodes fingerprinted so far
    #[must_use]
    pub fn distinct_inodes(&self) -> usize {
        self.cache.len()
    }
}
