//! Memory mapping utilities for process address space analysis
//!
//! This module parses `/proc/<pid>/maps` into [`MappingEntry`] values and
//! derives the file-offset windows ([`Range`]) a process holds for one
//! inode, which is what the live memory reader translates through.

use log::debug;
use std::fs;

use super::access::Access;
use crate::domain::{Inode, Pid, ScanError};

const DELETED_SUFFIX: &str = " (deleted)";

/// One line of `/proc/<pid>/maps`
///
/// Format: `start-end perms offset dev inode pathname`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingEntry {
    pub start: u64,
    pub end: u64,
    pub perms: String,
    pub offset: u64,
    pub device: String,
    pub inode: Inode,
    /// Pathname with any ` (deleted)` suffix stripped
    pub pathname: String,
    pub deleted: bool,
}

impl MappingEntry {
    /// Parse a single maps line
    ///
    /// Never fails: missing trailing fields become empty and unparsable
    /// numbers become 0, so one damaged line cannot sink the whole table.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut rest = line;
        let addresses = next_field(&mut rest);
        let perms = next_field(&mut rest);
        let offset = next_field(&mut rest);
        let device = next_field(&mut rest);
        let inode = next_field(&mut rest);
        let pathname = rest.trim();

        let (start, end) = addresses.split_once('-').unwrap_or((addresses, ""));
        let (pathname, deleted) = match pathname.strip_suffix(DELETED_SUFFIX) {
            Some(stripped) => (stripped, true),
            None => (pathname, false),
        };

        Self {
            start: parse_hex(start),
            end: parse_hex(end),
            perms: perms.to_string(),
            offset: parse_hex(offset),
            device: device.to_string(),
            inode: Inode(inode.parse().unwrap_or(0)),
            pathname: pathname.to_string(),
            deleted,
        }
    }

    #[must_use]
    pub fn range(&self) -> Range {
        Range {
            offset: self.offset,
            size: self.end.saturating_sub(self.start),
            start: self.start,
            end: self.end,
        }
    }
}

/// A window of a mapped file: `size` bytes at file `offset`, living at
/// virtual addresses `start..end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub offset: u64,
    pub size: u64,
    pub start: u64,
    pub end: u64,
}

impl Range {
    /// Check if a file offset falls within this window
    #[must_use]
    pub fn contains_offset(&self, offset: u64) -> bool {
        offset >= self.offset && offset - self.offset < self.size
    }

    /// Virtual address holding the given file offset
    ///
    /// Only meaningful when [`Range::contains_offset`] holds.
    #[must_use]
    pub fn translate(&self, offset: u64) -> u64 {
        self.start + (offset - self.offset)
    }
}

/// Parse the contents of a maps file
///
/// Separated from [`read_maps`] for testability.
#[must_use]
pub fn parse_maps(content: &str) -> Vec<MappingEntry> {
    content.lines().filter(|line| !line.trim().is_empty()).map(MappingEntry::parse).collect()
}

/// Read and parse `/proc/<pid>/maps`
///
/// # Errors
/// Returns an error only for I/O failures other than permission denied or
/// the process having exited; those come back as [`Access::Denied`] and
/// [`Access::Vanished`].
pub fn read_maps(pid: Pid) -> Result<Access<Vec<MappingEntry>>, ScanError> {
    let maps_path = format!("/proc/{}/maps", pid.0);
    let access = Access::classify(fs::read(&maps_path), &maps_path)
        .map_err(|source| ScanError::MapsReadFailed { pid: pid.0, source })?;
    Ok(access.map(|bytes| {
        // Pathnames are raw bytes; a non-UTF-8 name must not sink the table
        let entries = parse_maps(&String::from_utf8_lossy(&bytes));
        debug!("{maps_path}: {} mappings", entries.len());
        entries
    }))
}

/// Collect the windows a process has mapped for one inode, ordered by file offset
#[must_use]
pub fn ranges_for_inode(entries: &[MappingEntry], inode: Inode) -> Vec<Range> {
    let mut ranges: Vec<Range> =
        entries.iter().filter(|entry| entry.inode == inode).map(MappingEntry::range).collect();
    ranges.sort_by_key(|range| range.offset);
    ranges
}

fn next_field<'a>(rest: &mut &'a str) -> &'a str {
    let trimmed = rest.trim_start();
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    let (field, tail) = trimmed.split_at(end);
    *rest = tail;
    field
}

fn parse_hex(field: &str) -> u64 {
    u64::from_str_radix(field, 16).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
55d0c7a00000-55d0c7a02000 r--p 00000000 fd:01 1048601                    /usr/bin/cat
7f1c2a000000-7f1c2a028000 r--p 00000000 fd:01 1055937                    /usr/lib/x86_64-linux-gnu/libc.so.6
7f1c2a028000-7f1c2a1bd000 r-xp 00028000 fd:01 1055937                    /usr/lib/x86_64-linux-gnu/libc.so.6
7f1c2a1bd000-7f1c2a215000 r--p 001bd000 fd:01 1055937                    /usr/lib/x86_64-linux-gnu/libc.so.6
7f1c2a300000-7f1c2a301000 rw-p 00000000 00:00 0
7ffd4e1f0000-7ffd4e211000 rw-p 00000000 00:00 0                          [stack]
";

    #[test]
    fn test_range_contains_offset() {
        let range = Range { offset: 0x1000, size: 0x1000, start: 0x7000, end: 0x8000 };

        assert!(range.contains_offset(0x1000));
        assert!(range.contains_offset(0x1500));
        assert!(range.contains_offset(0x1FFF));
        assert!(!range.contains_offset(0x0FFF));
        assert!(!range.contains_offset(0x2000));
        assert_eq!(range.translate(0x1500), 0x7500);
    }

    #[test]
    fn test_parse_full_line() {
        let entries = parse_maps(SAMPLE);
        assert_eq!(entries.len(), 6);

        let text = &entries[2];
        assert_eq!(text.start, 0x7f1c_2a02_8000);
        assert_eq!(text.end, 0x7f1c_2a1b_d000);
        assert_eq!(text.perms, "r-xp");
        assert_eq!(text.offset, 0x28000);
        assert_eq!(text.device, "fd:01");
        assert_eq!(text.inode, Inode(1_055_937));
        assert_eq!(text.pathname, "/usr/lib/x86_64-linux-gnu/libc.so.6");
        assert!(!text.deleted);

        assert_eq!(entries[4].pathname, "");
        assert!(entries[4].inode.is_anonymous());
        assert_eq!(entries[5].pathname, "[stack]");
    }

    #[test]
    fn test_parse_deleted_suffix() {
        let entry = MappingEntry::parse(
            "7f00-8f00 r-xp 00001000 08:01 4242 /usr/lib/libfoo.so.1 (deleted)",
        );
        assert_eq!(entry.pathname, "/usr/lib/libfoo.so.1");
        assert!(entry.deleted);
    }

    #[test]
    fn test_parse_pathname_with_spaces() {
        let entry = MappingEntry::parse("1000-2000 r--p 00000000 08:01 7 /opt/my app/libx.so");
        assert_eq!(entry.pathname, "/opt/my app/libx.so");
    }

    #[test]
    fn test_parse_missing_trailing_fields() {
        let entry = MappingEntry::parse("1000-2000 r--p");
        assert_eq!(entry.start, 0x1000);
        assert_eq!(entry.end, 0x2000);
        assert_eq!(entry.perms, "r--p");
        assert_eq!(entry.offset, 0);
        assert_eq!(entry.device, "");
        assert_eq!(entry.inode, Inode(0));
        assert_eq!(entry.pathname, "");
        assert!(!entry.deleted);
    }

    #[test]
    fn test_parse_garbage_numbers_default_to_zero() {
        let entry = MappingEntry::parse("zz-yy r--p nothex 08:01 notanumber /lib/libz.so");
        assert_eq!(entry.start, 0);
        assert_eq!(entry.end, 0);
        assert_eq!(entry.offset, 0);
        assert_eq!(entry.inode, Inode(0));
        assert_eq!(entry.pathname, "/lib/libz.so");
        assert_eq!(entry.range().size, 0);
    }

    #[test]
    fn test_ranges_for_inode_sorted() {
        let entries = parse_maps(
            "3000-4000 r--p 00002000 08:01 9 /lib/liba.so\n\
             1000-2000 r--p 00000000 08:01 9 /lib/liba.so\n\
             5000-6000 r--p 00000000 08:01 10 /lib/libb.so\n",
        );
        let ranges = ranges_for_inode(&entries, Inode(9));
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].offset, 0);
        assert_eq!(ranges[1].offset, 0x2000);
        assert_eq!(ranges[1].start, 0x3000);
    }

    #[test]
    fn test_non_utf8_pathname_keeps_table() {
        let raw = b"1000-2000 r--p 00000000 08:01 7 /opt/lib\xff\xfe.so\n\
3000-4000 r-xp 00000000 08:01 8 /usr/lib/libz.so.1\n";
        let entries = parse_maps(&String::from_utf8_lossy(raw));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].inode, Inode(7));
        assert!(entries[0].pathname.starts_with("/opt/lib"));
        assert_eq!(entries[1].pathname, "/usr/lib/libz.so.1");
    }

    #[test]
    fn test_read_maps_self() {
        #[allow(clippy::cast_possible_wrap)]
        let pid = Pid(std::process::id() as i32);

        let entries = read_maps(pid).expect("maps read failed").granted().expect("own maps denied");
        assert!(!entries.is_empty());
        assert!(entries.iter().any(|e| e.pathname == "[stack]"));
    }

    #[test]
    fn test_read_maps_vanished_process() {
        let result = read_maps(Pid(999_999_999)).expect("missing process is not an error");
        assert!(matches!(result, Access::Vanished));
    }
}
