//! Minimal little-endian ELF writer for integration tests.
//!
//! Emits a file header, a program-header table, and a `.text`, `.symtab`,
//! `.strtab` and `.shstrtab` section so symbol lookup has something to read.

#![allow(dead_code)]

use object::elf::{
    ELFCLASS32, ELFCLASS64, ELFDATA2LSB, ELFMAG, EM_386, EM_X86_64, ET_EXEC, EV_CURRENT,
    SHT_PROGBITS, SHT_STRTAB, SHT_SYMTAB, STB_GLOBAL, STT_FUNC, STT_OBJECT,
};

pub use object::elf::{PF_R, PF_W, PF_X, PT_LOAD, PT_NOTE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    W32,
    W64,
}

#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub p_type: u32,
    pub flags: u32,
    pub offset: u64,
    pub vaddr: u64,
    pub size: u64,
}

impl Segment {
    pub fn load(flags: u32, offset: u64, vaddr: u64, size: u64) -> Self {
        Self { p_type: PT_LOAD, flags, offset, vaddr, size }
    }
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    pub value: u64,
    pub size: u64,
    pub func: bool,
}

impl Symbol {
    pub fn func(name: &str, value: u64, size: u64) -> Self {
        Self { name: name.to_string(), value, size, func: true }
    }

    pub fn object(name: &str, value: u64, size: u64) -> Self {
        Self { name: name.to_string(), value, size, func: false }
    }
}

struct Writer {
    width: Width,
    buf: Vec<u8>,
}

impl Writer {
    fn u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Address-sized field
    fn word(&mut self, v: u64) {
        match self.width {
            Width::W32 => self.u32(u32::try_from(v).expect("value does not fit a 32-bit field")),
            Width::W64 => self.buf.extend_from_slice(&v.to_le_bytes()),
        }
    }

    fn align(&mut self, to: usize) {
        while self.buf.len() % to != 0 {
            self.buf.push(0);
        }
    }

    fn pad_to(&mut self, len: usize) {
        if self.buf.len() < len {
            self.buf.resize(len, 0);
        }
    }

    fn section_header(&mut self, s: &SectionHeader) {
        self.u32(s.name);
        self.u32(s.sh_type);
        self.word(0); // sh_flags
        self.word(s.addr);
        self.word(s.offset);
        self.word(s.size);
        self.u32(s.link);
        self.u32(s.info);
        self.word(s.align);
        self.word(s.entsize);
    }
}

#[derive(Default)]
struct SectionHeader {
    name: u32,
    sh_type: u32,
    addr: u64,
    offset: u64,
    size: u64,
    link: u32,
    info: u32,
    align: u64,
    entsize: u64,
}

fn string_table(names: &[&str]) -> (Vec<u8>, Vec<u32>) {
    let mut table = vec![0u8];
    let mut offsets = Vec::new();
    for name in names {
        offsets.push(u32::try_from(table.len()).unwrap());
        table.extend_from_slice(name.as_bytes());
        table.push(0);
    }
    (table, offsets)
}

/// Build an executable image with the given segments and symbols.
///
/// Function symbols are placed in `.text`, which covers the first executable
/// loadable segment.
pub fn build_elf(width: Width, segments: &[Segment], symbols: &[Symbol]) -> Vec<u8> {
    let (ehsize, phentsize, shentsize, symentsize) = match width {
        Width::W32 => (52usize, 32usize, 40usize, 16usize),
        Width::W64 => (64, 56, 64, 24),
    };
    let mut w = Writer { width, buf: vec![0u8; ehsize] };

    // Program headers
    for seg in segments {
        w.u32(seg.p_type);
        match width {
            Width::W64 => {
                w.u32(seg.flags);
                w.word(seg.offset);
                w.word(seg.vaddr);
                w.word(seg.vaddr);
                w.word(seg.size);
                w.word(seg.size);
                w.word(0x1000);
            }
            Width::W32 => {
                w.word(seg.offset);
                w.word(seg.vaddr);
                w.word(seg.vaddr);
                w.word(seg.size);
                w.word(seg.size);
                w.u32(seg.flags);
                w.word(0x1000);
            }
        }
    }

    // Segment contents are zeros; only their file extent matters
    let segments_end = segments.iter().map(|s| s.offset + s.size).max().unwrap_or(0);
    w.pad_to(usize::try_from(segments_end).unwrap());

    let text = segments.iter().find(|s| s.p_type == PT_LOAD && s.flags & PF_X != 0);

    // .strtab
    let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
    let (strtab, name_offsets) = string_table(&names);
    let strtab_offset = w.buf.len();
    w.buf.extend_from_slice(&strtab);

    // .symtab: null symbol, then the given ones
    w.align(8);
    let symtab_offset = w.buf.len();
    w.buf.extend(std::iter::repeat(0u8).take(symentsize));
    for (sym, name) in symbols.iter().zip(&name_offsets) {
        let info = (STB_GLOBAL << 4) | if sym.func { STT_FUNC } else { STT_OBJECT };
        let shndx: u16 = 1; // .text
        match width {
            Width::W64 => {
                w.u32(*name);
                w.u8(info);
                w.u8(0);
                w.u16(shndx);
                w.word(sym.value);
                w.word(sym.size);
            }
            Width::W32 => {
                w.u32(*name);
                w.word(sym.value);
                w.word(sym.size);
                w.u8(info);
                w.u8(0);
                w.u16(shndx);
            }
        }
    }
    let symtab_size = w.buf.len() - symtab_offset;

    // .shstrtab
    let (shstrtab, sh_names) = string_table(&[".text", ".symtab", ".strtab", ".shstrtab"]);
    let shstrtab_offset = w.buf.len();
    w.buf.extend_from_slice(&shstrtab);

    w.align(8);
    let shoff = w.buf.len();
    let headers = [
        SectionHeader::default(),
        SectionHeader {
            name: sh_names[0],
            sh_type: SHT_PROGBITS,
            addr: text.map_or(0, |t| t.vaddr),
            offset: text.map_or(0, |t| t.offset),
            size: text.map_or(0, |t| t.size),
            align: 16,
            ..Default::default()
        },
        SectionHeader {
            name: sh_names[1],
            sh_type: SHT_SYMTAB,
            offset: symtab_offset as u64,
            size: symtab_size as u64,
            link: 3,
            info: 1,
            align: 8,
            entsize: symentsize as u64,
            ..Default::default()
        },
        SectionHeader {
            name: sh_names[2],
            sh_type: SHT_STRTAB,
            offset: strtab_offset as u64,
            size: strtab.len() as u64,
            align: 1,
            ..Default::default()
        },
        SectionHeader {
            name: sh_names[3],
            sh_type: SHT_STRTAB,
            offset: shstrtab_offset as u64,
            size: shstrtab.len() as u64,
            align: 1,
            ..Default::default()
        },
    ];
    for header in &headers {
        w.section_header(header);
    }

    // File header, written last now that all offsets are known
    let body = std::mem::take(&mut w.buf);
    w.buf.extend_from_slice(&ELFMAG);
    w.u8(match width {
        Width::W32 => ELFCLASS32,
        Width::W64 => ELFCLASS64,
    });
    w.u8(ELFDATA2LSB);
    w.u8(EV_CURRENT);
    w.buf.extend_from_slice(&[0u8; 9]);
    w.u16(ET_EXEC);
    w.u16(match width {
        Width::W32 => EM_386,
        Width::W64 => EM_X86_64,
    });
    w.u32(1);
    w.word(text.map_or(0, |t| t.vaddr)); // e_entry
    w.word(if segments.is_empty() { 0 } else { ehsize as u64 }); // e_phoff
    w.word(shoff as u64);
    w.u32(0); // e_flags
    w.u16(u16::try_from(ehsize).unwrap());
    w.u16(u16::try_from(phentsize).unwrap());
    w.u16(u16::try_from(segments.len()).unwrap());
    w.u16(u16::try_from(shentsize).unwrap());
    w.u16(u16::try_from(headers.len()).unwrap());
    w.u16(4); // e_shstrndx
    assert_eq!(w.buf.len(), ehsize);

    let mut image = w.buf;
    image.extend_from_slice(&body[ehsize..]);
    image
}
