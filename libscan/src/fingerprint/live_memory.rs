//! Reading a mapped library back out of a live process
//!
//! When a library has been deleted or replaced on disk, the only copy of the
//! code a process is running is in that process's address space. The
//! loader mapped it as a handful of page-aligned windows, each recording the
//! file offset it came from:
//!
//! ```text
//! file offsets     0x0000 ─────── 0x2000        0x5000 ─────── 0x9000
//!                     │  r--p window  │     hole     │  r-xp window  │
//!                     ▼               ▼              ▼               ▼
//! virtual      0x7f..a000 ──── 0x7f..c000    0x7f..f000 ──── 0x7f..13000
//! ```
//!
//! [`LiveMemoryReader`] turns that window table back into a seekable file
//! view: seeking to a logical file offset lands the underlying memory
//! cursor at `window.start + (offset - window.offset)`. Offsets in holes the
//! loader never mapped cannot be read, and the image ends where the last
//! window ends.
//!
//! The memory handle is generic so the translation can be exercised
//! against a synthetic address space; [`LiveMemoryReader::open`] builds one
//! over `/proc/<pid>/mem`.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use crate::domain::{Inode, Pid, ScanError};
use crate::procfs::{ranges_for_inode, read_maps, Access, Range};

/// Seekable file view over the windows a process has mapped for one inode
#[derive(Debug)]
pub struct LiveMemoryReader<M> {
    memory: M,
    ranges: Vec<Range>,
    position: u64,
    /// Whether `memory` is positioned at `position`
    synced: bool,
}

impl LiveMemoryReader<File> {
    /// Gather the process's windows for `inode` and open its memory
    ///
    /// # Errors
    /// Returns an error for I/O failures other than permission denied or the
    /// process having exited.
    pub fn open(pid: Pid, inode: Inode) -> Result<Access<Self>, ScanError> {
        let entries = match read_maps(pid)? {
            Access::Granted(entries) => entries,
            Access::Denied => return Ok(Access::Denied),
            Access::Vanished => return Ok(Access::Vanished),
        };
        let ranges = ranges_for_inode(&entries, inode);

        let mem_path = format!("/proc/{}/mem", pid.0);
        let memory = Access::classify(File::open(&mem_path), &mem_path)
            .map_err(|err| ScanError::MemoryOpenFailed(pid, err))?;
        Ok(memory.map(|memory| Self::new(memory, ranges)))
    }
}

impl<M: Read + Seek> LiveMemoryReader<M> {
    pub fn new(memory: M, mut ranges: Vec<Range>) -> Self {
        ranges.sort_by_key(|range| range.offset);
        Self { memory, ranges, position: 0, synced: false }
    }

    #[must_use]
    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// One past the highest mapped file offset
    #[must_use]
    pub fn logical_len(&self) -> u64 {
        self.ranges.iter().map(|range| range.offset + range.size).max().unwrap_or(0)
    }

    fn locate(&self, offset: u64) -> Option<&Range> {
        self.ranges.iter().find(|range| range.contains_offset(offset))
    }

    /// Point the memory cursor at the logical position
    fn sync(&mut self) -> io::Result<()> {
        let offset = self.position;
        let address = self
            .locate(offset)
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("file offset 0x{offset:x} is not mapped"))
            })?
            .translate(offset);
        self.memory.seek(SeekFrom::Start(address))?;
        self.synced = true;
        Ok(())
    }
}

impl<M: Read + Seek> Seek for LiveMemoryReader<M> {
    /// Moves the logical position only; landing in a hole is allowed, but
    /// reading there fails. `End` is relative to the end of the last window.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let offset = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
            SeekFrom::End(delta) => self.logical_len().checked_add_signed(delta),
        }
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "seek before start of image"))?;

        self.position = offset;
        self.synced = false;
        if self.locate(offset).is_some() {
            self.sync()?;
        }
        Ok(offset)
    }
}

impl<M: Read + Seek> Read for LiveMemoryReader<M> {
    /// Reads are not clamped to the current window; a read running past the
    /// end of a window continues at the following virtual addresses.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.synced {
            self.sync()?;
        }
        let n = self.memory.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}
