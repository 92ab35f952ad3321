//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::symbolization::TargetWidth;

#[derive(Parser, Debug)]
#[command(
    name = "coresym",
    about = "Resolve core dump instruction pointers to function names",
    after_help = "\
EXAMPLES:
    coresym --maps core.1234.maps 0x55f3a2b4d780
    coresym --maps core.maps --width 32 0x8049a10 0x8049b22
    RUST_LOG=debug coresym --maps core.maps 0x401136"
)]
pub struct Args {
    /// Instruction pointers to resolve (hex with 0x prefix, or bare hex)
    #[arg(value_name = "IP", required = true, value_parser = parse_address)]
    pub addresses: Vec<u64>,

    /// Maps listing of the dumped process ("start-end perms offset dev inode path")
    #[arg(short, long, value_name = "FILE")]
    pub maps: PathBuf,

    /// Address width of the dumped process (defaults to the build's width)
    #[arg(short, long, value_name = "32|64")]
    pub width: Option<TargetWidth>,

    /// Maximum length of a printed name; longer names are truncated
    #[arg(long, default_value = "256")]
    pub name_len: usize,
}

/// Parse an address, accepting an optional `0x` prefix. Digits are always hex.
///
/// # Errors
/// Returns a message if the text is not a valid 64-bit hex number
pub fn parse_address(text: &str) -> Result<u64, String> {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid address '{text}': {e}"))
}
