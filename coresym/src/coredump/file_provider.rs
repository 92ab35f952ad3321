//! Image provider backed by files on disk

use log::{debug, warn};
use std::fs;

use super::memory_maps::Mapping;
use super::provider::{ImageProvider, LocatedImage};
use crate::domain::{ElfImage, ImageHandle};

#[derive(Debug)]
struct LoadedImage {
    handle: ImageHandle,
    bytes: Vec<u8>,
}

/// Serves images by reading the file behind the mapping that covers an
/// address.
///
/// At most one file is held in memory; locating a new image drops the previous
/// one. Files are re-read on every `locate`.
#[derive(Debug)]
pub struct FileImageProvider {
    mappings: Vec<Mapping>,
    loaded: Option<LoadedImage>,
    next_handle: u64,
}

impl FileImageProvider {
    #[must_use]
    pub fn new(mappings: Vec<Mapping>) -> Self {
        Self { mappings, loaded: None, next_handle: 0 }
    }
}

impl ImageProvider for FileImageProvider {
    fn locate(&mut self, ip: u64) -> Option<LocatedImage> {
        let Some(mapping) = self.mappings.iter().find(|m| m.contains(ip)) else {
            debug!("No mapping covers 0x{ip:x}");
            return None;
        };

        // The old bytes go away here, whatever handle still names them
        self.loaded = None;
        let bytes = match fs::read(&mapping.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot read {} for 0x{ip:x}: {e}", mapping.path.display());
                return None;
            }
        };

        self.next_handle += 1;
        let handle = ImageHandle(self.next_handle);
        debug!(
            "Loaded {} ({} bytes, mapped from offset 0x{:x}) as {handle}",
            mapping.path.display(),
            bytes.len(),
            mapping.offset
        );

        let load_vaddr = mapping.start;
        self.loaded = Some(LoadedImage { handle, bytes });
        Some(LocatedImage { handle, load_vaddr })
    }

    fn image(&self, handle: ImageHandle) -> Option<ElfImage<'_>> {
        self.loaded
            .as_ref()
            .filter(|loaded| loaded.handle == handle)
            .map(|loaded| ElfImage::new(&loaded.bytes))
    }

    fn release(&mut self, handle: ImageHandle) {
        if self.loaded.as_ref().is_some_and(|loaded| loaded.handle == handle) {
            self.loaded = None;
        }
    }
}
