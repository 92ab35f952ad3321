//! Core value types shared by the locator, the resolver and the providers

use object::elf::{ELFCLASS32, ELFCLASS64, ELFMAG};
use object::Endianness;
use std::borrow::Cow;
use std::fmt;

/// Index of the class byte in `e_ident`
const EI_CLASS: usize = 4;

/// ELF word width, as encoded in `e_ident[EI_CLASS]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfClass {
    Elf32,
    Elf64,
}

impl ElfClass {
    /// Decode the width from an ELF identification header.
    ///
    /// Returns `None` for buffers too short to hold the class byte, for a bad
    /// magic number, and for class values other than 32 or 64 bit.
    #[must_use]
    pub fn from_ident(data: &[u8]) -> Option<Self> {
        if data.len() <= EI_CLASS || data[..ELFMAG.len()] != ELFMAG {
            return None;
        }
        match data[EI_CLASS] {
            ELFCLASS32 => Some(ElfClass::Elf32),
            ELFCLASS64 => Some(ElfClass::Elf64),
            _ => None,
        }
    }
}

impl fmt::Display for ElfClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElfClass::Elf32 => write!(f, "ELF32"),
            ElfClass::Elf64 => write!(f, "ELF64"),
        }
    }
}

/// Borrowed view of the on-disk bytes of one ELF object.
///
/// The bytes belong to the image provider. A view never outlives the
/// resolution call that obtained it.
#[derive(Debug, Clone, Copy)]
pub struct ElfImage<'data> {
    data: &'data [u8],
    class: Option<ElfClass>,
}

impl<'data> ElfImage<'data> {
    #[must_use]
    pub fn new(data: &'data [u8]) -> Self {
        Self { data, class: ElfClass::from_ident(data) }
    }

    #[must_use]
    pub fn data(&self) -> &'data [u8] {
        self.data
    }

    /// Word width, or `None` when the identification header is malformed
    #[must_use]
    pub fn class(&self) -> Option<ElfClass> {
        self.class
    }
}

/// File offset of the first executable segment.
///
/// Zero means "not found" and turns the address translation into an identity
/// mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct TextSegmentOffset(pub u64);

impl TextSegmentOffset {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TextSegmentOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Opaque token naming the image a provider currently has mapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image#{}", self.0)
    }
}

/// Target address space the caller is unwinding.
///
/// Passed through the resolver to symbol lookup unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AddressSpace {
    /// Byte order of the target. Images in the other byte order are rejected.
    pub byte_order: Endianness,
}

impl AddressSpace {
    #[must_use]
    pub fn new(byte_order: Endianness) -> Self {
        Self { byte_order }
    }
}

/// Where an image was loaded, as seen by symbol lookup.
///
/// `segbase` is the runtime address of the segment whose file offset is
/// `mapoff`. Both zero means addresses are file-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadBias {
    pub segbase: u64,
    pub mapoff: u64,
}

impl LoadBias {
    /// Addresses are offsets from the start of the ELF file
    pub const FILE_RELATIVE: LoadBias = LoadBias { segbase: 0, mapoff: 0 };

    #[must_use]
    pub fn is_file_relative(&self) -> bool {
        *self == Self::FILE_RELATIVE
    }
}

/// Result of a successful lookup that wrote a name into the caller's buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcName {
    /// Number of name bytes written to the buffer
    pub len: usize,
    /// Distance from the start of the procedure to the queried address
    pub offset: u64,
    /// The symbol name was longer than the buffer
    pub truncated: bool,
}

impl ProcName {
    /// The name bytes inside the buffer that was passed to the lookup
    #[must_use]
    pub fn name<'b>(&self, buf: &'b [u8]) -> &'b [u8] {
        &buf[..self.len.min(buf.len())]
    }

    #[must_use]
    pub fn name_lossy<'b>(&self, buf: &'b [u8]) -> Cow<'b, str> {
        String::from_utf8_lossy(self.name(buf))
    }
}

/// Owned procedure name and offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSymbol {
    pub name: String,
    pub offset: u64,
}

impl ResolvedSymbol {
    #[must_use]
    pub fn from_proc_name(proc_name: &ProcName, buf: &[u8]) -> Self {
        Self { name: proc_name.name_lossy(buf).into_owned(), offset: proc_name.offset }
    }
}

impl fmt::Display for ResolvedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+0x{:x}", self.name, self.offset)
    }
}
