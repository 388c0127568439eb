//! Shared fixtures for integration tests: synthetic processes, ELF images
//! and manifests

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use libscan::compliance::{Manifest, ManifestSource};
use libscan::domain::{BuildId, Fingerprint, Inode, ManifestError, Pid, ScanError};
use libscan::fingerprint::{extract_build_id, ElfFingerprinter, Fingerprinter, LiveMemoryReader};
use libscan::procfs::{Access, MappingEntry, ProcessTable, Range};

/// Minimal ELF64 LE image: header, one PT_NOTE, one GNU build-id note
#[allow(clippy::cast_possible_truncation)]
pub fn elf_with_build_id(build_id: &[u8]) -> Vec<u8> {
    const PHOFF: usize = 64;
    const NOTES: usize = PHOFF + 56;

    let mut note = Vec::new();
    note.extend_from_slice(&4u32.to_le_bytes());
    note.extend_from_slice(&(build_id.len() as u32).to_le_bytes());
    note.extend_from_slice(&object::elf::NT_GNU_BUILD_ID.to_le_bytes());
    note.extend_from_slice(b"GNU\0");
    note.extend_from_slice(build_id);
    while note.len() % 4 != 0 {
        note.push(0);
    }

    let mut image = vec![0x7f, b'E', b'L', b'F', 2, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    image.extend_from_slice(&3u16.to_le_bytes()); // ET_DYN
    image.extend_from_slice(&62u16.to_le_bytes()); // EM_X86_64
    image.extend_from_slice(&1u32.to_le_bytes());
    image.extend_from_slice(&0u64.to_le_bytes());
    image.extend_from_slice(&(PHOFF as u64).to_le_bytes());
    image.extend_from_slice(&0u64.to_le_bytes());
    image.extend_from_slice(&0u32.to_le_bytes());
    image.extend_from_slice(&64u16.to_le_bytes());
    image.extend_from_slice(&56u16.to_le_bytes());
    image.extend_from_slice(&1u16.to_le_bytes()); // e_phnum
    image.extend_from_slice(&[0; 6]);

    image.extend_from_slice(&object::elf::PT_NOTE.to_le_bytes());
    image.extend_from_slice(&4u32.to_le_bytes());
    for value in [NOTES as u64, NOTES as u64, NOTES as u64, note.len() as u64, note.len() as u64, 4] {
        image.extend_from_slice(&value.to_le_bytes());
    }
    assert_eq!(image.len(), NOTES);

    image.extend_from_slice(&note);
    image
}

pub fn mapping(pathname: &str, inode: u64) -> MappingEntry {
    MappingEntry {
        start: 0x1000,
        end: 0x2000,
        perms: "r--p".to_string(),
        offset: 0,
        device: "fd:01".to_string(),
        inode: Inode(inode),
        pathname: pathname.to_string(),
        deleted: false,
    }
}

pub fn inode_of(path: &Path) -> u64 {
    std::os::unix::fs::MetadataExt::ino(&std::fs::metadata(path).unwrap())
}

/// What a synthetic process looks like from `/proc`
pub enum FakeProcess {
    Running { comm: String, maps: Vec<MappingEntry> },
    Denied,
    Exited,
    /// Maps exist but reading them fails with a plain I/O error
    Unreadable,
}

/// In-memory process table
#[derive(Default)]
pub struct FakeTable {
    pub processes: BTreeMap<i32, FakeProcess>,
    pub listings: Cell<u32>,
}

impl FakeTable {
    pub fn with(mut self, pid: i32, comm: &str, maps: Vec<MappingEntry>) -> Self {
        self.processes.insert(pid, FakeProcess::Running { comm: comm.to_string(), maps });
        self
    }

    pub fn with_process(mut self, pid: i32, process: FakeProcess) -> Self {
        self.processes.insert(pid, process);
        self
    }
}

impl ProcessTable for FakeTable {
    fn pids(&self) -> Result<Vec<Pid>, ScanError> {
        self.listings.set(self.listings.get() + 1);
        Ok(self.processes.keys().copied().map(Pid).collect())
    }

    fn maps(&self, pid: Pid) -> Result<Access<Vec<MappingEntry>>, ScanError> {
        Ok(match self.processes.get(&pid.0) {
            Some(FakeProcess::Running { maps, .. }) => Access::Granted(maps.clone()),
            Some(FakeProcess::Denied) => Access::Denied,
            Some(FakeProcess::Exited) | None => Access::Vanished,
            Some(FakeProcess::Unreadable) => {
                return Err(ScanError::MapsReadFailed {
                    pid: pid.0,
                    source: std::io::Error::from(std::io::ErrorKind::InvalidData),
                })
            }
        })
    }

    fn comm(&self, pid: Pid) -> String {
        match self.processes.get(&pid.0) {
            Some(FakeProcess::Running { comm, .. }) => comm.clone(),
            _ => String::new(),
        }
    }

    fn exe(&self, pid: Pid) -> Option<PathBuf> {
        match self.processes.get(&pid.0) {
            Some(FakeProcess::Running { comm, .. }) => Some(PathBuf::from("/usr/bin").join(comm)),
            _ => None,
        }
    }
}

/// Reads disk files for real and process memory from synthetic address
/// spaces through the same translating reader used against `/proc/<pid>/mem`
#[derive(Default)]
pub struct SimulatedMemory {
    address_spaces: HashMap<(i32, u64), (Vec<u8>, Vec<Range>)>,
    pub memory_reads: u32,
}

impl SimulatedMemory {
    /// Place `image` at virtual address `start` in `pid`'s view of `inode`
    #[allow(clippy::cast_possible_truncation)]
    pub fn map(mut self, pid: i32, inode: u64, start: u64, image: &[u8]) -> Self {
        let mut memory = vec![0u8; start as usize];
        memory.extend_from_slice(image);
        memory.resize(memory.len() + 0x100, 0);
        let size = image.len() as u64;
        let range = Range { offset: 0, size, start, end: start + size };
        self.address_spaces.insert((pid, inode), (memory, vec![range]));
        self
    }
}

impl Fingerprinter for SimulatedMemory {
    fn fingerprint_file(&mut self, path: &Path) -> Fingerprint {
        ElfFingerprinter.fingerprint_file(path)
    }

    fn fingerprint_memory(&mut self, pid: Pid, inode: Inode) -> Fingerprint {
        self.memory_reads += 1;
        let Some((memory, ranges)) = self.address_spaces.get(&(pid.0, inode.0)) else {
            return Fingerprint::Unknown;
        };
        let reader = LiveMemoryReader::new(Cursor::new(memory.clone()), ranges.clone());
        extract_build_id(reader).ok().into()
    }
}

/// Fingerprints keyed by inode, no I/O
pub struct FixedFingerprints(pub HashMap<u64, Fingerprint>);

impl Fingerprinter for FixedFingerprints {
    fn fingerprint_file(&mut self, _path: &Path) -> Fingerprint {
        Fingerprint::Unknown
    }

    fn fingerprint_memory(&mut self, _pid: Pid, inode: Inode) -> Fingerprint {
        self.0.get(&inode.0).cloned().unwrap_or(Fingerprint::Unknown)
    }
}

/// Manifest that is already in hand
pub struct StaticManifest(pub Manifest);

impl StaticManifest {
    pub fn of(entries: &[(&str, &str)]) -> Self {
        Self(entries.iter().map(|(name, id)| ((*name).to_string(), BuildId::from(*id))).collect())
    }
}

impl ManifestSource for StaticManifest {
    fn fetch(&self) -> Result<Manifest, ManifestError> {
        Ok(self.0.clone())
    }
}
