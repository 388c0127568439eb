//! Synthetic ELF images for unit tests

use object::elf::{PT_LOAD, PT_NOTE};

pub const NOTE_ABI_TAG: u32 = object::elf::NT_GNU_ABI_TAG;

const EHDR_SIZE: usize = 64;
const PHDR_SIZE: usize = 56;

/// Shape of a minimal ELF64 little-endian shared object
pub struct ElfSpec {
    pub notes: Vec<(u32, Vec<u8>)>,
    pub note_name: Vec<u8>,
    pub note_segment: bool,
    pub phoff_override: Option<u64>,
    /// Zero bytes appended after the notes
    pub trailing: usize,
}

impl Default for ElfSpec {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            note_name: b"GNU\0".to_vec(),
            note_segment: true,
            phoff_override: None,
            trailing: 0,
        }
    }
}

impl ElfSpec {
    pub fn note(mut self, n_type: u32, desc: &[u8]) -> Self {
        self.notes.push((n_type, desc.to_vec()));
        self
    }
}

fn pad4(buf: &mut Vec<u8>) {
    while buf.len() % 4 != 0 {
        buf.push(0);
    }
}

#[allow(clippy::cast_possible_truncation)]
pub fn elf_image(spec: &ElfSpec) -> Vec<u8> {
    let phnum: usize = if spec.note_segment { 2 } else { 1 };
    let notes_offset = EHDR_SIZE + phnum * PHDR_SIZE;

    let mut notes = Vec::new();
    for (n_type, desc) in &spec.notes {
        notes.extend_from_slice(&(spec.note_name.len() as u32).to_le_bytes());
        notes.extend_from_slice(&(desc.len() as u32).to_le_bytes());
        notes.extend_from_slice(&n_type.to_le_bytes());
        notes.extend_from_slice(&spec.note_name);
        pad4(&mut notes);
        notes.extend_from_slice(desc);
        pad4(&mut notes);
    }
    let file_size = (notes_offset + notes.len() + spec.trailing) as u64;

    let mut image = Vec::with_capacity(file_size as usize);
    // e_ident: magic, ELFCLASS64, ELFDATA2LSB, EV_CURRENT
    image.extend_from_slice(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]);
    image.extend_from_slice(&[0; 8]);
    image.extend_from_slice(&3u16.to_le_bytes()); // ET_DYN
    image.extend_from_slice(&62u16.to_le_bytes()); // EM_X86_64
    image.extend_from_slice(&1u32.to_le_bytes());
    image.extend_from_slice(&0u64.to_le_bytes()); // e_entry
    image.extend_from_slice(&spec.phoff_override.unwrap_or(EHDR_SIZE as u64).to_le_bytes());
    image.extend_from_slice(&0u64.to_le_bytes()); // e_shoff
    image.extend_from_slice(&0u32.to_le_bytes()); // e_flags
    image.extend_from_slice(&(EHDR_SIZE as u16).to_le_bytes());
    image.extend_from_slice(&(PHDR_SIZE as u16).to_le_bytes());
    image.extend_from_slice(&(phnum as u16).to_le_bytes());
    image.extend_from_slice(&64u16.to_le_bytes()); // e_shentsize
    image.extend_from_slice(&0u16.to_le_bytes()); // e_shnum
    image.extend_from_slice(&0u16.to_le_bytes()); // e_shstrndx
    assert_eq!(image.len(), EHDR_SIZE);

    push_phdr(&mut image, PT_LOAD, 0, file_size, 0x1000);
    if spec.note_segment {
        push_phdr(&mut image, PT_NOTE, notes_offset as u64, notes.len() as u64, 4);
    }
    assert_eq!(image.len(), notes_offset);

    image.extend_from_slice(&notes);
    image.resize(file_size as usize, 0);
    image
}

fn push_phdr(image: &mut Vec<u8>, p_type: u32, offset: u64, size: u64, align: u64) {
    image.extend_from_slice(&p_type.to_le_bytes());
    image.extend_from_slice(&4u32.to_le_bytes()); // PF_R
    image.extend_from_slice(&offset.to_le_bytes());
    image.extend_from_slice(&offset.to_le_bytes()); // p_vaddr
    image.extend_from_slice(&offset.to_le_bytes()); // p_paddr
    image.extend_from_slice(&size.to_le_bytes());
    image.extend_from_slice(&size.to_le_bytes());
    image.extend_from_slice(&align.to_le_bytes());
}
