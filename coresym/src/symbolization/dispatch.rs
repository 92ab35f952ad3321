//! Target-width selection
//!
//! Whether the dumped process was 32- or 64-bit is decided by the build
//! (`elf64` / `elf32` Cargo features) or overridden at runtime. With neither,
//! resolution fails rather than guessing.

use log::debug;
use std::fmt;
use std::str::FromStr;

use super::resolver::AddressResolver;
use super::width::{Elf32, Elf64};
use crate::coredump::{CoredumpUnwindContext, ImageProvider};
use crate::domain::{AddressSpace, ParseWidthError, ProcName, ResolveError, ResolvedSymbol};

/// Address width of the process that produced the core dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetWidth {
    W32,
    W64,
}

impl FromStr for TargetWidth {
    type Err = ParseWidthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "32" => Ok(TargetWidth::W32),
            "64" => Ok(TargetWidth::W64),
            other => Err(ParseWidthError(other.to_string())),
        }
    }
}

impl fmt::Display for TargetWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetWidth::W32 => write!(f, "32"),
            TargetWidth::W64 => write!(f, "64"),
        }
    }
}

/// Resolution settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetConfig {
    pub width: Option<TargetWidth>,
}

impl TargetConfig {
    /// Width selected by Cargo features; `elf64` takes precedence
    #[must_use]
    pub fn from_build() -> Self {
        let width = if cfg!(feature = "elf64") {
            Some(TargetWidth::W64)
        } else if cfg!(feature = "elf32") {
            Some(TargetWidth::W32)
        } else {
            None
        };
        Self { width }
    }

    /// Replace the width when `width` is set
    #[must_use]
    pub fn with_width(self, width: Option<TargetWidth>) -> Self {
        Self { width: width.or(self.width) }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self::from_build()
    }
}

/// Resolve `ip` with the resolver matching the configured width.
///
/// # Errors
/// `NoInfo` immediately if no width is configured, otherwise the result of
/// [`AddressResolver::resolve_proc_name`].
pub fn get_proc_name<P: ImageProvider>(
    config: &TargetConfig,
    context: &mut CoredumpUnwindContext<P>,
    address_space: &AddressSpace,
    ip: u64,
    out_buf: &mut [u8],
) -> Result<ProcName, ResolveError> {
    match config.width {
        Some(TargetWidth::W64) => AddressResolver::<Elf64>::default().resolve_proc_name(
            context,
            address_space,
            ip,
            out_buf,
        ),
        Some(TargetWidth::W32) => AddressResolver::<Elf32>::default().resolve_proc_name(
            context,
            address_space,
            ip,
            out_buf,
        ),
        None => {
            debug!("No target width configured, cannot resolve 0x{ip:x}");
            Err(ResolveError::NoInfo)
        }
    }
}

/// [`get_proc_name`] into a scratch buffer of `max_name_len` bytes
///
/// # Errors
/// Same as [`get_proc_name`].
pub fn resolve_symbol<P: ImageProvider>(
    config: &TargetConfig,
    context: &mut CoredumpUnwindContext<P>,
    address_space: &AddressSpace,
    ip: u64,
    max_name_len: usize,
) -> Result<ResolvedSymbol, ResolveError> {
    let mut buf = vec![0u8; max_name_len];
    let proc_name = get_proc_name(config, context, address_space, ip, &mut buf)?;
    Ok(ResolvedSymbol::from_proc_name(&proc_name, &buf))
}
