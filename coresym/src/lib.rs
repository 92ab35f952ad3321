//! # coresym - Procedure Names for Core Dump Addresses
//!
//! coresym resolves instruction pointers captured in a core dump to
//! `function+offset`, using the symbol tables of the ELF files that backed the
//! dumped process's mappings.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────┐  ip   ┌──────────────────┐  locate(ip)   ┌───────────────┐
//! │    Caller    │──────▶│  AddressResolver │──────────────▶│ ImageProvider │
//! │ (unwinder,   │       │  (per ELF width) │◀──────────────│ (maps + files)│
//! │  CLI)        │       └────────┬─────────┘  ElfImage      └───────────────┘
//! └──────────────┘                │
//!        ▲                        ├──▶ find_text_offset(image)
//!        │                        │
//!        │  name+offset           ▼
//!        └────────────────  SymbolLookup (.symtab / .dynsym)
//! ```
//!
//! ## Module Structure
//!
//! - [`symbolization`]: text-segment location, address translation, symbol
//!   lookup and target-width dispatch
//! - [`coredump`]: the unwind context, the image provider interface and a
//!   file-backed provider driven by a maps listing
//! - [`domain`]: value types and the [`domain::ResolveError`] taxonomy
//! - [`cli`]: command-line argument definitions
//!
//! ## Concurrency
//!
//! Everything is synchronous. A [`coredump::CoredumpUnwindContext`] is used
//! through `&mut`, one resolution at a time; image bytes are only borrowed
//! for the duration of a call.

// Expose modules for testing
pub mod cli;
pub mod coredump;
pub mod domain;
pub mod symbolization;
