//! # coresym - Main Entry Point
//!
//! Loads the maps listing of a dumped process, then resolves each address
//! given on the command line to `function+offset`:
//!
//! ```text
//! 0x0000000000401136 main+0x6
//! 0x00007f1c2a0b5000 ?? (no unwind information available)
//! ```

use anyhow::Result;
use clap::Parser;
use log::{debug, info};

use coresym::cli::Args;
use coresym::coredump::{load_memory_maps, CoredumpUnwindContext, FileImageProvider};
use coresym::domain::AddressSpace;
use coresym::symbolization::{resolve_symbol, TargetConfig};

// Exit codes; clap exits with 2 on usage errors
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;

fn main() {
    env_logger::init();
    let args = Args::parse();
    std::process::exit(match run(&args) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_ERROR,
        Err(e) => {
            eprintln!("error: {e:#}");
            EXIT_ERROR
        }
    });
}

/// Resolve every requested address; returns whether all of them resolved
fn run(args: &Args) -> Result<bool> {
    let mappings = load_memory_maps(&args.maps)?;
    if mappings.is_empty() {
        anyhow::bail!("{} lists no executable file-backed mappings", args.maps.display());
    }

    let config = TargetConfig::from_build().with_width(args.width);
    match config.width {
        Some(width) => info!("Resolving {} addresses as {width}-bit", args.addresses.len()),
        None => info!("No target width configured; every lookup will fail"),
    }

    let mut context = CoredumpUnwindContext::new(FileImageProvider::new(mappings));
    let address_space = AddressSpace::default();
    let mut all_resolved = true;

    for &ip in &args.addresses {
        match resolve_symbol(&config, &mut context, &address_space, ip, args.name_len) {
            Ok(symbol) => println!("0x{ip:016x} {symbol}"),
            Err(e) => {
                debug!("0x{ip:x}: {e:?}");
                println!("0x{ip:016x} ?? ({e})");
                all_resolved = false;
            }
        }
    }

    Ok(all_resolved)
}
