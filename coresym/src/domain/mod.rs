//! Domain model for coresym
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via newtype pattern (file offsets vs. handles)
//! - Borrowed, width-tagged views of ELF images
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{
    AddressSpace, ElfClass, ElfImage, ImageHandle, LoadBias, ProcName, ResolvedSymbol,
    TextSegmentOffset,
};

pub use errors::{ParseWidthError, ResolveError};
