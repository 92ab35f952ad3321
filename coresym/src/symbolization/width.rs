//! Per-width ELF layouts.
//!
//! 32-bit and 64-bit headers differ in field sizes and in the position of
//! `p_flags`, so every field read goes through the decoder of one width. The
//! width is picked from `e_ident[EI_CLASS]` before anything else is read.

use object::elf::{FileHeader32, FileHeader64, PF_X, PT_LOAD};
use object::read::elf::{FileHeader, ProgramHeader};
use object::Endianness;

use crate::domain::ElfClass;

type ProgramHeaderOf<W> = <<W as ElfWidth>::Header as FileHeader>::ProgramHeader;

/// Strictly-typed field decoders for one ELF word width
pub trait ElfWidth {
    type Header: FileHeader<Endian = Endianness>;

    const CLASS: ElfClass;

    /// Mask applied to translated addresses so they wrap like a target word
    const ADDR_MASK: u64;

    /// Whether `phdr` is the segment holding the program's machine code
    fn is_text_segment(phdr: &ProgramHeaderOf<Self>, endian: Endianness) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Elf32;

#[derive(Debug, Clone, Copy, Default)]
pub struct Elf64;

impl ElfWidth for Elf32 {
    type Header = FileHeader32<Endianness>;

    const CLASS: ElfClass = ElfClass::Elf32;
    const ADDR_MASK: u64 = 0xffff_ffff;

    // 32-bit images match on the executable flag alone, so a non-PT_LOAD
    // entry carrying PF_X (e.g. PT_GNU_STACK on some toolchains) wins if it
    // comes first. Kept as-is; see DESIGN.md.
    fn is_text_segment(phdr: &ProgramHeaderOf<Self>, endian: Endianness) -> bool {
        phdr.p_flags(endian) & PF_X == PF_X
    }
}

impl ElfWidth for Elf64 {
    type Header = FileHeader64<Endianness>;

    const CLASS: ElfClass = ElfClass::Elf64;
    const ADDR_MASK: u64 = u64::MAX;

    fn is_text_segment(phdr: &ProgramHeaderOf<Self>, endian: Endianness) -> bool {
        phdr.p_type(endian) == PT_LOAD && phdr.p_flags(endian) & PF_X == PF_X
    }
}
