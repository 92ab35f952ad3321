//! Per-session unwind context for a core dump

use log::trace;

use super::provider::{ImageProvider, LocatedImage};
use crate::domain::{ElfImage, ImageHandle};

/// Which image, if any, the context currently refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingState {
    #[default]
    Unmapped,
    Mapped(ImageHandle),
}

/// State of one unwind session over a core dump.
///
/// All operations take `&mut self`: a context serves one resolution at a time.
#[derive(Debug)]
pub struct CoredumpUnwindContext<P> {
    provider: P,
    mapping: MappingState,
}

impl<P: ImageProvider> CoredumpUnwindContext<P> {
    pub fn new(provider: P) -> Self {
        Self { provider, mapping: MappingState::Unmapped }
    }

    #[must_use]
    pub fn mapping(&self) -> MappingState {
        self.mapping
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Drop the reference to the currently mapped image.
    ///
    /// The returned token is the only way to request a new image, so a lookup
    /// can never start while the context still points at an old mapping.
    pub fn invalidate(&mut self) -> UnmappedContext<'_, P> {
        if let MappingState::Mapped(handle) = std::mem::take(&mut self.mapping) {
            trace!("Releasing {handle}");
            self.provider.release(handle);
        }
        UnmappedContext { context: self }
    }

    /// Borrow the bytes of the currently mapped image
    #[must_use]
    pub fn mapped_image(&self) -> Option<ElfImage<'_>> {
        match self.mapping {
            MappingState::Mapped(handle) => self.provider.image(handle),
            MappingState::Unmapped => None,
        }
    }
}

/// A context that has just been invalidated
#[derive(Debug)]
pub struct UnmappedContext<'a, P> {
    context: &'a mut CoredumpUnwindContext<P>,
}

impl<P: ImageProvider> UnmappedContext<'_, P> {
    /// Ask the provider for the image covering `ip` and map it.
    ///
    /// The context stays unmapped when nothing covers `ip`.
    pub fn locate(self, ip: u64) -> Option<LocatedImage> {
        let located = self.context.provider.locate(ip)?;
        trace!("Mapped {} at 0x{:x} for ip 0x{ip:x}", located.handle, located.load_vaddr);
        self.context.mapping = MappingState::Mapped(located.handle);
        Some(located)
    }
}
