//! # Procedure-Name Resolution for Core Dumps
//!
//! Translates an instruction pointer captured in a core dump into the name of
//! the enclosing function and the offset into it.
//!
//! ## The Translation Problem
//!
//! A core dump says which virtual range each file was mapped at, but symbol
//! tables are searched here by **file offset**. The loader maps segments at
//! page-aligned addresses, so the text segment's virtual start and its file
//! offset generally differ:
//!
//! ```text
//! Text segment:  p_offset = 0x1000, mapped at 0x55f3a2b4d000
//! Captured ip:   0x55f3a2b4d780
//!
//! File-relative ip = ip - mapping start + text offset
//!                  = 0x55f3a2b4d780 - 0x55f3a2b4d000 + 0x1000
//!                  = 0x1780
//! ```
//!
//! The text offset comes from the program headers of the image itself, which
//! is why both ELF widths have to be decoded.
//!
//! ## Resolution Flow
//!
//! ```text
//! 1. Invalidate the context's current mapping
//! 2. Ask the image provider for the image covering ip      (NoInfo if none)
//! 3. Scan program headers for the text segment offset      (0 if none)
//! 4. Translate ip to a file-relative address
//! 5. Nearest function symbol at or below that address      (NotFound if none)
//! ```
//!
//! ## Module Structure
//!
//! - **`width`**: `Elf32` / `Elf64` field decoders and text-segment predicates
//! - **`segment_locator`**: `find_text_offset`, tolerant of truncated headers
//! - **`symbol_lookup`**: the `SymbolLookup` seam and the `.symtab`/`.dynsym` scan
//! - **`resolver`**: `AddressResolver`, steps 1 to 5 for one width
//! - **`dispatch`**: picks the resolver for the configured target width
//!
//! ## Example
//!
//! ```rust,ignore
//! let mappings = load_memory_maps(Path::new("core.1234.maps"))?;
//! let mut context = CoredumpUnwindContext::new(FileImageProvider::new(mappings));
//!
//! let mut buf = [0u8; 256];
//! let proc_name = get_proc_name(
//!     &TargetConfig::from_build(),
//!     &mut context,
//!     &AddressSpace::default(),
//!     0x55f3a2b4d780,
//!     &mut buf,
//! )?;
//! println!("{}+0x{:x}", proc_name.name_lossy(&buf), proc_name.offset);
//! ```
//!
//! ## Limitations
//!
//! - **No caching**: each call re-reads the image and rescans its headers
//! - **No demangling**: names are returned as stored in the symbol table
//! - **No line tables**: DWARF is never consulted

pub mod dispatch;
pub mod resolver;
pub mod segment_locator;
pub mod symbol_lookup;
pub mod width;


pub use dispatch::{get_proc_name, resolve_symbol, TargetConfig, TargetWidth};
pub use resolver::AddressResolver;
pub use segment_locator::find_text_offset;
pub use symbol_lookup::{ElfSymbolLookup, SymbolLookup};
pub use width::{Elf32, Elf64, ElfWidth};
