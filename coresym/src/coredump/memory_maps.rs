//! Memory mapping listings for core dump address spaces
//!
//! A core dump records which file backs each mapped range. This module reads
//! that listing in the kernel's `/proc/<pid>/maps` text format, so a maps file
//! saved next to the dump can be used as-is.

use anyhow::{bail, Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// One executable, file-backed range of the dumped process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub start: u64,
    pub end: u64,
    /// Offset of `start` within the backing file
    pub offset: u64,
    pub path: PathBuf,
}

impl Mapping {
    /// Check if an address falls within this mapping
    #[must_use]
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.start && addr < self.end
    }
}

/// Read and parse a maps listing from disk
///
/// # Errors
/// Returns an error if the file cannot be read or contains a malformed line
pub fn load_memory_maps(path: &Path) -> Result<Vec<Mapping>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mappings = parse_memory_maps(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    info!("Loaded {} executable mappings from {}", mappings.len(), path.display());
    Ok(mappings)
}

/// Parse `/proc/<pid>/maps`-format text into executable, file-backed mappings
///
/// Each line has the form "start-end perms offset dev inode [pathname]".
/// Anonymous and non-executable ranges are skipped.
///
/// # Errors
/// Returns an error naming the line number of the first malformed line
pub fn parse_memory_maps(text: &str) -> Result<Vec<Mapping>> {
    let mut mappings = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(mapping) =
            parse_line(line).with_context(|| format!("line {}: '{line}'", index + 1))?
        {
            mappings.push(mapping);
        }
    }

    Ok(mappings)
}

fn parse_line(line: &str) -> Result<Option<Mapping>> {
    // The pathname is the remainder of the line and may contain spaces
    let mut parts = line.splitn(6, char::is_whitespace).filter(|p| !p.is_empty());
    let (Some(range), Some(perms), Some(offset), Some(_dev), Some(_inode)) =
        (parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
    else {
        bail!("expected at least 5 fields");
    };
    let path = parts.next().map(str::trim).filter(|p| !p.is_empty());

    let (start, end) = range.split_once('-').context("range has no '-'")?;
    let start = u64::from_str_radix(start, 16).context("Failed to parse range start")?;
    let end = u64::from_str_radix(end, 16).context("Failed to parse range end")?;
    if end < start {
        bail!("range end 0x{end:x} precedes start 0x{start:x}");
    }
    let offset = u64::from_str_radix(offset, 16).context("Failed to parse file offset")?;

    if perms.len() < 3 || !perms.is_ascii() {
        bail!("malformed permissions '{perms}'");
    }
    let executable = perms.as_bytes()[2] == b'x';

    // "[vdso]", "[stack]" and friends have no file behind them
    match path {
        Some(path) if executable && !path.starts_with('[') => {
            Ok(Some(Mapping { start, end, offset, path: PathBuf::from(path) }))
        }
        _ => Ok(None),
    }
}
