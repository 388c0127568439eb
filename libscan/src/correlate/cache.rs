//! Per-scan build-id memo keyed by inode

use std::collections::HashMap;

use crate::domain::{Fingerprint, Inode};

/// Fingerprints already resolved during this scan
///
/// Scoped to one scan and never persisted: inodes are reused once a file is
/// freed, so a result is only trustworthy for the snapshot it came from.
#[derive(Debug, Default)]
pub struct BuildIdCache {
    entries: HashMap<Inode, Fingerprint>,
}

impl BuildIdCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, inode: Inode) -> Option<&Fingerprint> {
        self.entries.get(&inode)
    }

    /// Record the fingerprint for `inode` unless one is already present
    ///
    /// The first resolution wins, even if a later process could have offered
    /// a better byte source. Returns the stored value.
    pub fn insert(&mut self, inode: Inode, fingerprint: Fingerprint) -> &Fingerprint {
        self.entries.entry(inode).or_insert(fingerprint)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
