//! # Process and Map Enumeration
//!
//! Everything libscan knows about running processes comes from `/proc`:
//!
//! ```text
//! /proc/<pid>/maps   which files are mapped where   → MappingEntry
//! /proc/<pid>/mem    the mapped bytes themselves    → LiveMemoryReader
//! /proc/<pid>/comm   the command name               → Finding presentation
//! /proc/<pid>/exe    the executable                 → process name filter
//! ```
//!
//! ## Races and Permissions
//!
//! The listing of `/proc` is a snapshot. A process can exit, or `exec` into
//! a different image, between the moment it is listed and the moment its
//! maps are read. Likewise, an unprivileged scan cannot read the maps of
//! other users' processes. Both outcomes are normal, and are reported as
//! [`Access::Vanished`] and [`Access::Denied`] rather than as errors.
//!
//! ## Maps Line Format
//!
//! ```text
//! 7f1c2a028000-7f1c2a1bd000 r-xp 00028000 fd:01 1055937   /usr/lib/libc.so.6
//! └──── start-end ────────┘ perms offset  dev   inode     pathname [(deleted)]
//! ```
//!
//! Parsing never fails on a single bad line: absent trailing fields default
//! to empty values.

pub mod access;
pub mod memory_maps;
pub mod process;

use std::path::PathBuf;

pub use access::Access;
pub use memory_maps::{parse_maps, ranges_for_inode, read_maps, MappingEntry, Range};
pub use process::{is_match, list_pids, read_comm, read_exe};

use crate::domain::{Pid, ScanError};

/// Source of process listings, maps and names
///
/// [`ProcFs`] reads the live system; tests substitute synthetic tables.
pub trait ProcessTable {
    /// # Errors
    /// Returns an error if the process list itself is unavailable.
    fn pids(&self) -> Result<Vec<Pid>, ScanError>;

    /// # Errors
    /// Returns an error for unexpected I/O failures reading the maps.
    fn maps(&self, pid: Pid) -> Result<Access<Vec<MappingEntry>>, ScanError>;

    /// Command name, empty if unavailable
    fn comm(&self, pid: Pid) -> String;

    fn exe(&self, pid: Pid) -> Option<PathBuf>;
}

/// The running system's `/proc`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcFs;

impl ProcessTable for ProcFs {
    fn pids(&self) -> Result<Vec<Pid>, ScanError> {
        list_pids()
    }

    fn maps(&self, pid: Pid) -> Result<Access<Vec<MappingEntry>>, ScanError> {
        read_maps(pid)
    }

    fn comm(&self, pid: Pid) -> String {
        read_comm(pid)
    }

    fn exe(&self, pid: Pid) -> Option<PathBuf> {
        read_exe(pid)
    }
}
