//! Image provider interface

use crate::domain::{ElfImage, ImageHandle};

/// An image located for an instruction pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedImage {
    pub handle: ImageHandle,
    /// Virtual address at which the covering mapping starts in the snapshot
    pub load_vaddr: u64,
}

/// Source of ELF images backing the mappings of a core dump.
///
/// A provider owns the image bytes. It may drop or reuse the bytes behind an
/// old handle while serving a new `locate` request, which is why callers must
/// go through [`CoredumpUnwindContext::invalidate`](super::CoredumpUnwindContext::invalidate)
/// before asking for another image.
pub trait ImageProvider {
    /// Find the image whose mapping covers `ip`
    fn locate(&mut self, ip: u64) -> Option<LocatedImage>;

    /// Borrow the bytes behind `handle`, if it is still mapped
    fn image(&self, handle: ImageHandle) -> Option<ElfImage<'_>>;

    /// The context no longer refers to `handle`
    fn release(&mut self, _handle: ImageHandle) {}
}
