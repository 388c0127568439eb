//! Mapped-library resolution
//!
//! Reduces a process's mapping table to the distinct files worth
//! fingerprinting. Pseudo-mappings, anonymous memory and device windows are
//! dropped; `(deleted)` mappings are kept because they are exactly the
//! libraries whose disk copy is gone while the code still runs.

use std::collections::HashSet;
use std::path::Path;

use crate::domain::Inode;
use crate::procfs::MappingEntry;

/// Kernel-provided pseudo-mappings
const PSEUDO_NAMES: &[&str] = &["[heap]", "[stack]", "[vdso]", "[vsyscall]", "[vvar]", "[vvar_vclock]"];

/// Pathname prefixes of anonymous or shared-memory mappings
const ANONYMOUS_PREFIXES: &[&str] = &["[anon", "anon_inode:", "/SYSV", "//anon", "/memfd:"];

const DEVICE_PREFIX: &str = "/dev/";

/// A mapped file as seen by one process
///
/// The inode is the content identity; the pathname is what the process
/// loaded it as and is only used for presentation and for deciding whether
/// the disk copy can still be trusted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryRef {
    pub pathname: String,
    pub inode: Inode,
    pub deleted: bool,
}

impl LibraryRef {
    /// Final path component, the key the manifest is indexed by
    #[must_use]
    pub fn basename(&self) -> &str {
        Path::new(&self.pathname).file_name().and_then(|n| n.to_str()).unwrap_or(&self.pathname)
    }

    /// Whether the basename looks like a shared object (`libx.so`, `libx.so.6`)
    #[must_use]
    pub fn is_shared_object(&self) -> bool {
        let name = self.basename();
        name.ends_with(".so") || name.contains(".so.")
    }
}

/// Whether a mapping refers to a real file that could hold a build-id
#[must_use]
pub fn is_file_backed(entry: &MappingEntry) -> bool {
    let path = entry.pathname.as_str();
    if path.is_empty() {
        return false;
    }
    if PSEUDO_NAMES.contains(&path) || (path.starts_with('[') && path.ends_with(']')) {
        return false;
    }
    if ANONYMOUS_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) || path.starts_with(DEVICE_PREFIX) {
        return false;
    }
    true
}

/// Distinct (pathname, inode) pairs mapped by one process, in first-seen order
#[must_use]
pub fn mapped_libraries(entries: &[MappingEntry]) -> Vec<LibraryRef> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter(|entry| is_file_backed(entry))
        .map(|entry| LibraryRef {
            pathname: entry.pathname.clone(),
            inode: entry.inode,
            deleted: entry.deleted,
        })
        .filter(|library| seen.insert((library.pathname.clone(), library.inode)))
        .collect()
}
