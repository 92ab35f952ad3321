//! Procedure-name resolution for one target width

use log::debug;
use std::marker::PhantomData;

use super::segment_locator::find_text_offset;
use super::symbol_lookup::{ElfSymbolLookup, SymbolLookup};
use super::width::ElfWidth;
use crate::coredump::{CoredumpUnwindContext, ImageProvider};
use crate::domain::{AddressSpace, LoadBias, ProcName, ResolveError};

/// Resolves captured instruction pointers to `name+offset`.
///
/// Nothing is cached between calls: every resolution locates the image again
/// and re-derives its text offset. Memoization, if a workload ever needs it,
/// belongs in a layer above this type.
#[derive(Debug, Clone)]
pub struct AddressResolver<W, L = ElfSymbolLookup<W>> {
    lookup: L,
    _width: PhantomData<W>,
}

impl<W: ElfWidth, L: SymbolLookup + Default> Default for AddressResolver<W, L> {
    fn default() -> Self {
        Self::new(L::default())
    }
}

impl<W: ElfWidth, L: SymbolLookup> AddressResolver<W, L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup, _width: PhantomData }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Resolve `ip` to the procedure containing it.
    ///
    /// The name is written to `out_buf`; the returned [`ProcName`] says how
    /// much of it and at which offset into the procedure `ip` lies.
    ///
    /// # Errors
    /// `NoInfo` if no image covers `ip`; otherwise whatever the symbol lookup
    /// reports. `out_buf` is only written on success.
    pub fn resolve_proc_name<P: ImageProvider>(
        &self,
        context: &mut CoredumpUnwindContext<P>,
        address_space: &AddressSpace,
        ip: u64,
        out_buf: &mut [u8],
    ) -> Result<ProcName, ResolveError> {
        // Serving the new request may free the bytes behind the old mapping
        let Some(located) = context.invalidate().locate(ip) else {
            debug!("No image covers ip 0x{ip:x}");
            return Err(ResolveError::NoInfo);
        };
        let Some(image) = context.mapped_image() else {
            debug!("Provider lost {} right after locating it", located.handle);
            return Err(ResolveError::NoInfo);
        };

        let text_offset = find_text_offset(&image);
        let file_relative_ip =
            ip.wrapping_sub(located.load_vaddr).wrapping_add(text_offset.get()) & W::ADDR_MASK;
        debug!(
            "ip 0x{ip:x} -> file-relative 0x{file_relative_ip:x} (load 0x{:x}, text offset {})",
            located.load_vaddr, text_offset
        );

        self.lookup.resolve_in_image(
            address_space,
            &image,
            LoadBias::FILE_RELATIVE,
            file_relative_ip,
            out_buf,
        )
    }
}
