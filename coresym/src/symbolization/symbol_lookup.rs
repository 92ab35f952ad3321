//! Nearest-symbol lookup inside one ELF image
//!
//! [`SymbolLookup`] is the seam between the resolver and whatever knows how to
//! read symbol tables. [`ElfSymbolLookup`] is the default implementation: it
//! scans `.symtab` and then `.dynsym` for the closest function symbol at or
//! below the queried address.

use log::{debug, trace};
use object::elf::{PT_LOAD, SHT_DYNSYM, SHT_SYMTAB, STT_FUNC};
use object::read::elf::{FileHeader, ProgramHeader, Sym};
use object::Endianness;
use std::marker::PhantomData;

use super::width::ElfWidth;
use crate::domain::{AddressSpace, ElfImage, LoadBias, ProcName, ResolveError};

/// Resolves an address inside an image to the enclosing procedure.
///
/// On success the procedure name is written to `out_buf`, truncated to its
/// length. On failure `out_buf` must be left untouched.
pub trait SymbolLookup {
    /// Look up `addr`, expressed in the address space described by `bias`.
    ///
    /// # Errors
    /// `NoInfo` if the image cannot be read as an object of the expected
    /// width or byte order, `NotFound` if no function symbol precedes `addr`.
    fn resolve_in_image(
        &self,
        address_space: &AddressSpace,
        image: &ElfImage<'_>,
        bias: LoadBias,
        addr: u64,
        out_buf: &mut [u8],
    ) -> Result<ProcName, ResolveError>;
}

/// Symbol-table scan for images of width `W`
#[derive(Debug, Clone, Copy)]
pub struct ElfSymbolLookup<W> {
    _width: PhantomData<W>,
}

impl<W> ElfSymbolLookup<W> {
    #[must_use]
    pub fn new() -> Self {
        Self { _width: PhantomData }
    }
}

impl<W> Default for ElfSymbolLookup<W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Loadable segment, reduced to what address conversion needs
#[derive(Debug, Clone, Copy)]
struct LoadSegment {
    vaddr: u64,
    memsz: u64,
    offset: u64,
}

/// How symbol values map into the address space of the query
#[derive(Debug)]
enum Placement {
    /// Symbol value converted to a file offset through its segment
    FileRelative(Vec<LoadSegment>),
    /// Symbol value shifted by a constant load offset
    Biased(u64),
}

impl Placement {
    fn position(&self, value: u64) -> Option<u64> {
        match self {
            Placement::FileRelative(segments) => segments
                .iter()
                .find(|seg| value >= seg.vaddr && value - seg.vaddr < seg.memsz)
                .and_then(|seg| seg.offset.checked_add(value - seg.vaddr)),
            Placement::Biased(load_offset) => Some(value.wrapping_add(*load_offset)),
        }
    }
}

/// Best candidate found so far
#[derive(Debug, Clone, Copy)]
struct Candidate<'data> {
    name: &'data [u8],
    distance: u64,
}

impl<W: ElfWidth> ElfSymbolLookup<W> {
    fn placement(
        segments: &[<W::Header as FileHeader>::ProgramHeader],
        endian: Endianness,
        bias: LoadBias,
    ) -> Option<Placement> {
        let mut loads = segments.iter().filter(|phdr| phdr.p_type(endian) == PT_LOAD);

        if bias.is_file_relative() {
            let loads = loads
                .map(|phdr| LoadSegment {
                    vaddr: phdr.p_vaddr(endian).into(),
                    memsz: phdr.p_memsz(endian).into(),
                    offset: phdr.p_offset(endian).into(),
                })
                .collect();
            return Some(Placement::FileRelative(loads));
        }

        // The segment mapped at `mapoff` was loaded at `segbase`
        loads
            .find(|phdr| {
                let offset: u64 = phdr.p_offset(endian).into();
                offset == bias.mapoff
            })
            .map(|phdr| {
                let vaddr: u64 = phdr.p_vaddr(endian).into();
                Placement::Biased(bias.segbase.wrapping_sub(vaddr))
            })
    }
}

impl<W: ElfWidth> SymbolLookup for ElfSymbolLookup<W> {
    fn resolve_in_image(
        &self,
        address_space: &AddressSpace,
        image: &ElfImage<'_>,
        bias: LoadBias,
        addr: u64,
        out_buf: &mut [u8],
    ) -> Result<ProcName, ResolveError> {
        let data = image.data();
        let header = W::Header::parse(data).map_err(|e| {
            debug!("Image is not a valid {} object: {e}", W::CLASS);
            ResolveError::NoInfo
        })?;
        let endian = header.endian().map_err(|_| ResolveError::NoInfo)?;
        if endian != address_space.byte_order {
            debug!(
                "Image byte order {endian:?} does not match target {:?}",
                address_space.byte_order
            );
            return Err(ResolveError::NoInfo);
        }

        let segments = header.program_headers(endian, data).map_err(|e| {
            debug!("Unreadable program headers: {e}");
            ResolveError::NoInfo
        })?;
        let placement = Self::placement(segments, endian, bias).ok_or_else(|| {
            debug!("No loadable segment at file offset 0x{:x}", bias.mapoff);
            ResolveError::NoInfo
        })?;
        let sections = header.sections(endian, data).map_err(|e| {
            debug!("Unreadable section headers: {e}");
            ResolveError::NoInfo
        })?;

        let mut best: Option<Candidate<'_>> = None;
        for sh_type in [SHT_SYMTAB, SHT_DYNSYM] {
            let symbols = match sections.symbols(endian, data, sh_type) {
                Ok(symbols) => symbols,
                Err(e) => {
                    debug!("Skipping unreadable symbol table (type {sh_type}): {e}");
                    continue;
                }
            };

            for symbol in symbols.iter() {
                if symbol.st_type() != STT_FUNC || symbol.is_undefined(endian) {
                    continue;
                }
                let Some(position) = placement.position(symbol.st_value(endian).into()) else {
                    continue;
                };
                if position > addr {
                    continue;
                }
                let distance = addr - position;
                if best.is_some_and(|b| b.distance <= distance) {
                    continue;
                }
                let Ok(name) = symbol.name(endian, symbols.strings()) else {
                    continue;
                };
                best = Some(Candidate { name, distance });
            }
        }

        let Some(best) = best else {
            debug!("No function symbol at or below 0x{addr:x}");
            return Err(ResolveError::NotFound(addr));
        };

        let len = best.name.len().min(out_buf.len());
        out_buf[..len].copy_from_slice(&best.name[..len]);
        let truncated = len < best.name.len();
        trace!(
            "0x{addr:x} -> {}+0x{:x}{}",
            String::from_utf8_lossy(best.name),
            best.distance,
            if truncated { " (truncated)" } else { "" }
        );

        Ok(ProcName { len, offset: best.distance, truncated })
    }
}
