//! Text segment location
//!
//! Finds the file offset of the segment that holds the program's code. A core
//! dump records where a segment was mapped, not where its bytes live in the
//! file; this offset bridges the two.

use log::{debug, trace};
use object::read::elf::{FileHeader, ProgramHeader};

use super::width::{Elf32, Elf64, ElfWidth};
use crate::domain::{ElfClass, ElfImage, TextSegmentOffset};

/// Return the file offset of the first executable segment of `image`.
///
/// Never fails. A missing identification header, a truncated file header or a
/// program-header table that does not fit in the buffer all yield offset 0,
/// which callers treat as an identity translation.
#[must_use]
pub fn find_text_offset(image: &ElfImage<'_>) -> TextSegmentOffset {
    let offset = match image.class() {
        Some(ElfClass::Elf64) => scan_program_headers::<Elf64>(image.data()),
        Some(ElfClass::Elf32) => scan_program_headers::<Elf32>(image.data()),
        None => {
            debug!("Image has no valid ELF identification ({} bytes)", image.data().len());
            None
        }
    }
    .unwrap_or_default();

    debug!("Returning text offset {offset}");
    offset
}

fn scan_program_headers<W: ElfWidth>(data: &[u8]) -> Option<TextSegmentOffset> {
    let header = match W::Header::parse(data) {
        Ok(header) => header,
        Err(e) => {
            debug!("Unreadable {} file header: {e}", W::CLASS);
            return None;
        }
    };
    let endian = header.endian().ok()?;

    // The whole table is bounds-checked against `data` before any entry is read
    let phdrs = match header.program_headers(endian, data) {
        Ok(phdrs) => phdrs,
        Err(e) => {
            debug!("Program header table out of bounds: {e}");
            return None;
        }
    };

    phdrs.iter().enumerate().find(|(_, phdr)| W::is_text_segment(phdr, endian)).map(
        |(index, phdr)| {
            let offset: u64 = phdr.p_offset(endian).into();
            trace!("Program header {index} is the text segment, file offset 0x{offset:x}");
            TextSegmentOffset(offset)
        },
    )
}
