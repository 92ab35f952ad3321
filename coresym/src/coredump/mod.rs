//! Core dump side of symbol resolution
//!
//! - **`context`**: the per-session [`CoredumpUnwindContext`] and its explicit
//!   `Unmapped`/`Mapped` state
//! - **`provider`**: the [`ImageProvider`] interface the resolver consumes
//! - **`file_provider`**: a provider that reads backing files from disk
//! - **`memory_maps`**: parsing of maps listings describing the dumped process

pub mod context;
pub mod file_provider;
pub mod memory_maps;
pub mod provider;

pub use context::{CoredumpUnwindContext, MappingState, UnmappedContext};
pub use file_provider::FileImageProvider;
pub use memory_maps::{load_memory_maps, parse_memory_maps, Mapping};
pub use provider::{ImageProvider, LocatedImage};
