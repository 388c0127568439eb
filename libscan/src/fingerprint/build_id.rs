//! GNU build-id extraction from ELF images
//!
//! Only the program header table is consulted. Section headers live at the
//! end of the file and are usually not mapped, so a section-based lookup
//! would not work against a process's memory image; `PT_NOTE` segments are
//! always inside a loaded segment.

use object::elf::{FileHeader64, ProgramHeader64, ELFCLASS64, ELFDATA2LSB, ELFMAG, NT_GNU_BUILD_ID, PT_NOTE};
use object::read::elf::{FileHeader, ProgramHeader};
use object::read::{ReadCache, ReadRef};
use object::LittleEndian;
use std::io::{Read, Seek};

use crate::domain::{BuildId, ExtractError};

const IDENT_LEN: u64 = 16;

/// Extract the build-id from any seekable ELF byte source
///
/// Walks the `e_phnum` program headers in order and returns the descriptor
/// of the first `NT_GNU_BUILD_ID` note found in a `PT_NOTE` segment.
///
/// # Errors
/// Returns the reason no build-id could be produced: unsupported class or
/// byte order, missing program headers, no matching note, or a read or
/// parse failure.
pub fn extract_build_id<R: Read + Seek>(source: R) -> Result<BuildId, ExtractError> {
    let cache = ReadCache::new(source);
    let data = &cache;

    // e_ident: magic[4], class, data encoding, ...
    let ident = data.read_bytes_at(0, IDENT_LEN).map_err(|()| ExtractError::BadMagic)?;
    if ident[..4] != ELFMAG {
        return Err(ExtractError::BadMagic);
    }
    if ident[4] != ELFCLASS64 {
        return Err(ExtractError::UnsupportedClass(ident[4]));
    }
    if ident[5] != ELFDATA2LSB {
        return Err(ExtractError::UnsupportedEndian(ident[5]));
    }

    let endian = LittleEndian;
    let header = FileHeader64::<LittleEndian>::parse(data)?;
    let phoff = header.e_phoff(endian);
    if phoff == 0 {
        return Err(ExtractError::NoProgramHeaders);
    }

    let phnum = usize::from(header.e_phnum(endian));
    let program_headers: &[ProgramHeader64<LittleEndian>] = data
        .read_slice_at(phoff, phnum)
        .map_err(|()| ExtractError::Truncated("program header table"))?;

    for segment in program_headers {
        if segment.p_type(endian) != PT_NOTE {
            continue;
        }
        let Some(mut notes) = segment.notes(endian, data)? else {
            continue;
        };
        while let Some(note) = notes.next()? {
            if note.n_type(endian) == NT_GNU_BUILD_ID {
                return Ok(BuildId::from_bytes(note.desc()));
            }
        }
    }

    Err(ExtractError::NoBuildId)
}
