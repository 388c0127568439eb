//! # Build-ID Fingerprinting
//!
//! A library's fingerprint is its GNU build-id: a hash the linker writes
//! into an `NT_GNU_BUILD_ID` note. Two builds of a library share a build-id
//! only if they are the same build, so comparing the build-id of what a
//! process has mapped against the build-id of the current release tells us
//! whether the process is running stale code.
//!
//! ## Byte Sources
//!
//! ```text
//!                       ┌────────────────────┐
//!  disk file ──────────▶│                    │
//!  (inode unchanged)    │  extract_build_id  │──▶ BuildId / unknown
//!                       │   (Read + Seek)    │
//!  LiveMemoryReader ───▶│                    │
//!  (deleted/replaced)   └────────────────────┘
//! ```
//!
//! The extractor only ever sees `Read + Seek`; it cannot tell a file from
//! a process image reassembled from `/proc/<pid>/mem`.
//!
//! ## Limitations
//!
//! - Only 64-bit little-endian ELF is understood. Other images are unknown.
//! - Reading another process's memory needs ptrace access to it. Without it
//!   the fingerprint is unknown; permission boundaries are not bypassed.

pub mod build_id;
pub mod live_memory;

#[cfg(test)]
pub(crate) mod test_support;

use log::{debug, warn};
use std::fs::File;
use std::path::Path;

pub use build_id::extract_build_id;
pub use live_memory::LiveMemoryReader;

use crate::domain::{BuildId, ExtractError, Fingerprint, Inode, Pid};
use crate::procfs::access::{is_permission_error, is_vanished_error};
use crate::procfs::Access;

/// Strategy for turning a library into a fingerprint
///
/// The correlator decides *which* source to use; implementors decide how to
/// read it. [`ElfFingerprinter`] is the real one.
pub trait Fingerprinter {
    /// Fingerprint the file on disk at `path`
    fn fingerprint_file(&mut self, path: &Path) -> Fingerprint;

    /// Fingerprint the copy of `inode` mapped into process `pid`
    fn fingerprint_memory(&mut self, pid: Pid, inode: Inode) -> Fingerprint;
}

/// Reads build-ids from disk files and `/proc/<pid>/mem`
#[derive(Debug, Default)]
pub struct ElfFingerprinter;

impl ElfFingerprinter {
    fn file_build_id(path: &Path) -> Result<BuildId, ExtractError> {
        let file = File::open(path).map_err(open_error)?;
        extract_build_id(file)
    }

    fn memory_build_id(pid: Pid, inode: Inode) -> Result<BuildId, ExtractError> {
        let reader = match LiveMemoryReader::open(pid, inode) {
            Ok(Access::Granted(reader)) => reader,
            Ok(Access::Denied) => return Err(ExtractError::PermissionDenied),
            Ok(Access::Vanished) => return Err(ExtractError::Vanished),
            Err(err) => {
                warn!("Cannot read memory of {pid}: {err}");
                return Err(ExtractError::Scan(err));
            }
        };
        if reader.ranges().is_empty() {
            return Err(ExtractError::NoRanges);
        }
        extract_build_id(reader)
    }
}

impl Fingerprinter for ElfFingerprinter {
    fn fingerprint_file(&mut self, path: &Path) -> Fingerprint {
        collapse(Self::file_build_id(path), &path.display().to_string())
    }

    fn fingerprint_memory(&mut self, pid: Pid, inode: Inode) -> Fingerprint {
        collapse(Self::memory_build_id(pid, inode), &format!("inode {inode} in {pid}"))
    }
}

fn open_error(err: std::io::Error) -> ExtractError {
    if is_permission_error(&err) {
        ExtractError::PermissionDenied
    } else if is_vanished_error(&err) {
        ExtractError::Vanished
    } else {
        ExtractError::Io(err)
    }
}

/// Every extraction failure means the same thing downstream: no information
fn collapse(result: Result<BuildId, ExtractError>, what: &str) -> Fingerprint {
    match result {
        Ok(id) => Fingerprint::Known(id),
        Err(ExtractError::PermissionDenied) => {
            debug!("Permission error: {what}");
            Fingerprint::Unknown
        }
        Err(err) => {
            debug!("No build-id for {what}: {err}");
            Fingerprint::Unknown
        }
    }
}
