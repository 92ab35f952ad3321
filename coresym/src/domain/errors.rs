//! Structured error types for coresym
//!
//! Using thiserror for automatic Display implementation.

use thiserror::Error;

/// Failure of a procedure-name resolution.
///
/// A malformed program-header table is deliberately absent here: it degrades
/// the text offset to zero instead of failing the resolution.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// No image covers the address, no target width is configured, or the
    /// image is not a readable ELF object of the expected width.
    #[error("no unwind information available")]
    NoInfo,

    /// The image was found but no function symbol precedes the address.
    #[error("no symbol encloses address 0x{0:x}")]
    NotFound(u64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid target width '{0}', expected 32 or 64")]
pub struct ParseWidthError(pub String);
