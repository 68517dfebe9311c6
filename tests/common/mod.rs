//! Shared fixtures for integration tests.
//!
//! Executables with a real entry point are assembled byte by byte; relocatable
//! objects for other formats and machines come from `object::write`.

#![allow(dead_code)]

use object::write::{self, Mangling, StandardSection, SymbolSection};
use object::{Architecture, BinaryFormat, Endianness, SymbolFlags, SymbolKind, SymbolScope};
use std::io::Write;
use tempfile::NamedTempFile;

/// `push rbp; mov rbp, rsp; xor eax, eax; pop rbp; ret` padded with nops.
pub const TEXT: [u8; 16] = [
    0x55, 0x48, 0x89, 0xe5, 0x31, 0xc0, 0x5d, 0xc3, 0x90, 0x90, 0x90, 0x90, 0x90, 0x90, 0x90, 0x90,
];
pub const DATA: [u8; 8] = [1, 0, 0, 0, 2, 0, 0, 0];

pub const ELF_TEXT_ADDR: u64 = 0x401000;
pub const ELF_DATA_ADDR: u64 = 0x402000;
pub const ELF_BSS_ADDR: u64 = 0x402008;
pub const ELF_BSS_SIZE: u64 = 0x20;
pub const ELF_INIT_ARRAY_ADDR: u64 = 0x402028;

pub const PE_IMAGE_BASE: u64 = 0x1_4000_0000;
pub const PE_ENTRY_RVA: u32 = 0x1000;
pub const PE32_IMAGE_BASE: u64 = 0x40_0000;

/// Creates a temporary file with the given content.
pub fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn align(buf: &mut Vec<u8>, to: usize) {
    while buf.len() % to != 0 {
        buf.push(0);
    }
}

fn add_name(table: &mut Vec<u8>, name: &str) -> u32 {
    let off = table.len() as u32;
    table.extend_from_slice(name.as_bytes());
    table.push(0);
    off
}

struct Shdr {
    name: u32,
    typ: u32,
    flags: u64,
    addr: u64,
    offset: u64,
    size: u64,
    link: u32,
    info: u32,
    align: u64,
    entsize: u64,
}

impl Shdr {
    fn write(&self, buf: &mut Vec<u8>) {
        put_u32(buf, self.name);
        put_u32(buf, self.typ);
        put_u64(buf, self.flags);
        put_u64(buf, self.addr);
        put_u64(buf, self.offset);
        put_u64(buf, self.size);
        put_u32(buf, self.link);
        put_u32(buf, self.info);
        put_u64(buf, self.align);
        put_u64(buf, self.entsize);
    }
}

const SHT_PROGBITS: u32 = 1;
const SHT_SYMTAB: u32 = 2;
const SHT_STRTAB: u32 = 3;
const SHT_NOBITS: u32 = 8;
const SHT_DYNSYM: u32 = 11;
const SHT_INIT_ARRAY: u32 = 14;
const SHF_WRITE: u64 = 1;
const SHF_ALLOC: u64 = 2;
const SHF_EXECINSTR: u64 = 4;

/// Options for the hand-assembled ELF64 executable.
#[derive(Debug, Clone)]
pub struct ElfFixture {
    pub machine: u16,
    pub entry: u64,
    /// Emit `.symtab` with `main` (function) and `counter` (object).
    pub static_symbols: bool,
    /// Emit `.dynsym` exporting `main`.
    pub dynamic_symbols: bool,
    /// Emit `.init_array` holding one pointer to `main`.
    pub init_array: bool,
    /// Point every `.symtab` name past the end of `.strtab`.
    pub corrupt_symbol_names: bool,
}

impl Default for ElfFixture {
    fn default() -> Self {
        Self {
            machine: 62, // EM_X86_64
            entry: ELF_TEXT_ADDR,
            static_symbols: true,
            dynamic_symbols: false,
            init_array: false,
            corrupt_symbol_names: false,
        }
    }
}

fn symtab_bytes(entries: &[(u32, u8, u16, u64, u64)]) -> Vec<u8> {
    // null symbol first
    let mut out = vec![0u8; 24];
    for &(name, info, shndx, value, size) in entries {
        put_u32(&mut out, name);
        out.push(info);
        out.push(0);
        put_u16(&mut out, shndx);
        put_u64(&mut out, value);
        put_u64(&mut out, size);
    }
    out
}

impl ElfFixture {
    /// A stripped x86-64 executable: no symbol tables at all.
    pub fn stripped() -> Self {
        Self {
            static_symbols: false,
            ..Self::default()
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; 64];
        let mut shstrtab = vec![0u8];
        let mut headers = vec![Shdr {
            name: 0,
            typ: 0,
            flags: 0,
            addr: 0,
            offset: 0,
            size: 0,
            link: 0,
            info: 0,
            align: 0,
            entsize: 0,
        }];

        align(&mut out, 16);
        let text_off = out.len() as u64;
        out.extend_from_slice(&TEXT);
        headers.push(Shdr {
            name: add_name(&mut shstrtab, ".text"),
            typ: SHT_PROGBITS,
            flags: SHF_ALLOC | SHF_EXECINSTR,
            addr: ELF_TEXT_ADDR,
            offset: text_off,
            size: TEXT.len() as u64,
            link: 0,
            info: 0,
            align: 16,
            entsize: 0,
        });

        align(&mut out, 8);
        let data_off = out.len() as u64;
        out.extend_from_slice(&DATA);
        headers.push(Shdr {
            name: add_name(&mut shstrtab, ".data"),
            typ: SHT_PROGBITS,
            flags: SHF_WRITE | SHF_ALLOC,
            addr: ELF_DATA_ADDR,
            offset: data_off,
            size: DATA.len() as u64,
            link: 0,
            info: 0,
            align: 8,
            entsize: 0,
        });

        headers.push(Shdr {
            name: add_name(&mut shstrtab, ".bss"),
            typ: SHT_NOBITS,
            flags: SHF_WRITE | SHF_ALLOC,
            addr: ELF_BSS_ADDR,
            offset: data_off + DATA.len() as u64,
            size: ELF_BSS_SIZE,
            link: 0,
            info: 0,
            align: 8,
            entsize: 0,
        });

        if self.init_array {
            align(&mut out, 8);
            let init_off = out.len() as u64;
            put_u64(&mut out, ELF_TEXT_ADDR);
            headers.push(Shdr {
                name: add_name(&mut shstrtab, ".init_array"),
                typ: SHT_INIT_ARRAY,
                flags: SHF_WRITE | SHF_ALLOC,
                addr: ELF_INIT_ARRAY_ADDR,
                offset: init_off,
                size: 8,
                link: 0,
                info: 0,
                align: 8,
                entsize: 8,
            });
        }

        if self.static_symbols {
            let mut strtab = vec![0u8];
            let main = add_name(&mut strtab, "main");
            let counter = add_name(&mut strtab, "counter");
            let (main, counter) = if self.corrupt_symbol_names {
                (0xffff, 0xfff0)
            } else {
                (main, counter)
            };
            // STB_GLOBAL << 4 | STT_FUNC, STB_GLOBAL << 4 | STT_OBJECT
            let syms = symtab_bytes(&[
                (main, 0x12, 1, ELF_TEXT_ADDR, TEXT.len() as u64),
                (counter, 0x11, 2, ELF_DATA_ADDR, DATA.len() as u64),
            ]);
            let strtab_index = headers.len() as u32 + 1;
            align(&mut out, 8);
            let symtab_off = out.len() as u64;
            out.extend_from_slice(&syms);
            headers.push(Shdr {
                name: add_name(&mut shstrtab, ".symtab"),
                typ: SHT_SYMTAB,
                flags: 0,
                addr: 0,
                offset: symtab_off,
                size: syms.len() as u64,
                link: strtab_index,
                info: 1,
                align: 8,
                entsize: 24,
            });
            let strtab_off = out.len() as u64;
            out.extend_from_slice(&strtab);
            headers.push(Shdr {
                name: add_name(&mut shstrtab, ".strtab"),
                typ: SHT_STRTAB,
                flags: 0,
                addr: 0,
                offset: strtab_off,
                size: strtab.len() as u64,
                link: 0,
                info: 0,
                align: 1,
                entsize: 0,
            });
        }

        if self.dynamic_symbols {
            let mut dynstr = vec![0u8];
            let main = add_name(&mut dynstr, "main");
            let syms = symtab_bytes(&[(main, 0x12, 1, ELF_TEXT_ADDR, TEXT.len() as u64)]);
            let dynstr_index = headers.len() as u32 + 1;
            align(&mut out, 8);
            let dynsym_off = out.len() as u64;
            out.extend_from_slice(&syms);
            headers.push(Shdr {
                name: add_name(&mut shstrtab, ".dynsym"),
                typ: SHT_DYNSYM,
                flags: SHF_ALLOC,
                addr: 0,
                offset: dynsym_off,
                size: syms.len() as u64,
                link: dynstr_index,
                info: 1,
                align: 8,
                entsize: 24,
            });
            let dynstr_off = out.len() as u64;
            out.extend_from_slice(&dynstr);
            headers.push(Shdr {
                name: add_name(&mut shstrtab, ".dynstr"),
                typ: SHT_STRTAB,
                flags: SHF_ALLOC,
                addr: 0,
                offset: dynstr_off,
                size: dynstr.len() as u64,
                link: 0,
                info: 0,
                align: 1,
                entsize: 0,
            });
        }

        let shstrtab_name = add_name(&mut shstrtab, ".shstrtab");
        let shstrtab_off = out.len() as u64;
        out.extend_from_slice(&shstrtab);
        headers.push(Shdr {
            name: shstrtab_name,
            typ: SHT_STRTAB,
            flags: 0,
            addr: 0,
            offset: shstrtab_off,
            size: shstrtab.len() as u64,
            link: 0,
            info: 0,
            align: 1,
            entsize: 0,
        });

        align(&mut out, 8);
        let shoff = out.len() as u64;
        for h in &headers {
            h.write(&mut out);
        }

        let mut hdr = Vec::with_capacity(64);
        hdr.extend_from_slice(&[0x7f, b'E', b'L', b'F', 2, 1, 1, 0]);
        hdr.extend_from_slice(&[0u8; 8]);
        put_u16(&mut hdr, 2); // ET_EXEC
        put_u16(&mut hdr, self.machine);
        put_u32(&mut hdr, 1);
        put_u64(&mut hdr, self.entry);
        put_u64(&mut hdr, 0); // no program headers
        put_u64(&mut hdr, shoff);
        put_u32(&mut hdr, 0);
        put_u16(&mut hdr, 64);
        put_u16(&mut hdr, 56);
        put_u16(&mut hdr, 0);
        put_u16(&mut hdr, 64);
        put_u16(&mut hdr, headers.len() as u16);
        put_u16(&mut hdr, headers.len() as u16 - 1);
        assert_eq!(hdr.len(), 64);
        out[..64].copy_from_slice(&hdr);
        out
    }
}

fn pe_section(buf: &mut Vec<u8>, name: &[u8; 8], vsize: u32, va: u32, raw_ptr: u32, chars: u32) {
    buf.extend_from_slice(name);
    put_u32(buf, vsize);
    put_u32(buf, va);
    put_u32(buf, 0x200); // SizeOfRawData
    put_u32(buf, raw_ptr);
    put_u32(buf, 0);
    put_u32(buf, 0);
    put_u16(buf, 0);
    put_u16(buf, 0);
    put_u32(buf, chars);
}

/// A minimal PE32+ x86-64 image with `.text` and `.data` and no symbols.
pub fn pe64_executable() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"MZ");
    out.resize(0x3c, 0);
    put_u32(&mut out, 0x40); // e_lfanew

    out.extend_from_slice(b"PE\0\0");
    put_u16(&mut out, 0x8664); // IMAGE_FILE_MACHINE_AMD64
    put_u16(&mut out, 2);
    put_u32(&mut out, 0);
    put_u32(&mut out, 0);
    put_u32(&mut out, 0);
    put_u16(&mut out, 240); // SizeOfOptionalHeader
    put_u16(&mut out, 0x0022); // EXECUTABLE_IMAGE | LARGE_ADDRESS_AWARE

    let opt_start = out.len();
    put_u16(&mut out, 0x20b); // PE32+
    out.push(14);
    out.push(0);
    put_u32(&mut out, 0x200); // SizeOfCode
    put_u32(&mut out, 0x200); // SizeOfInitializedData
    put_u32(&mut out, 0);
    put_u32(&mut out, PE_ENTRY_RVA);
    put_u32(&mut out, 0x1000); // BaseOfCode
    put_u64(&mut out, PE_IMAGE_BASE);
    put_u32(&mut out, 0x1000); // SectionAlignment
    put_u32(&mut out, 0x200); // FileAlignment
    for v in [6u16, 0, 0, 0, 6, 0] {
        put_u16(&mut out, v);
    }
    put_u32(&mut out, 0);
    put_u32(&mut out, 0x3000); // SizeOfImage
    put_u32(&mut out, 0x200); // SizeOfHeaders
    put_u32(&mut out, 0);
    put_u16(&mut out, 3); // console
    put_u16(&mut out, 0x8160);
    for v in [0x10_0000u64, 0x1000, 0x10_0000, 0x1000] {
        put_u64(&mut out, v);
    }
    put_u32(&mut out, 0);
    put_u32(&mut out, 16);
    out.resize(out.len() + 16 * 8, 0);
    assert_eq!(out.len() - opt_start, 240);

    pe_section(&mut out, b".text\0\0\0", TEXT.len() as u32, 0x1000, 0x200, 0x6000_0020);
    pe_section(&mut out, b".data\0\0\0", DATA.len() as u32, 0x2000, 0x400, 0xC000_0040);

    out.resize(0x200, 0);
    out.extend_from_slice(&TEXT);
    out.resize(0x400, 0);
    out.extend_from_slice(&DATA);
    out.resize(0x600, 0);
    out
}

/// A minimal PE32 i386 image with the same layout as [`pe64_executable`].
pub fn pe32_executable() -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"MZ");
    out.resize(0x3c, 0);
    put_u32(&mut out, 0x40); // e_lfanew

    out.extend_from_slice(b"PE\0\0");
    put_u16(&mut out, 0x14c); // IMAGE_FILE_MACHINE_I386
    put_u16(&mut out, 2);
    put_u32(&mut out, 0);
    put_u32(&mut out, 0);
    put_u32(&mut out, 0);
    put_u16(&mut out, 224); // SizeOfOptionalHeader
    put_u16(&mut out, 0x0102); // EXECUTABLE_IMAGE | 32BIT_MACHINE

    let opt_start = out.len();
    put_u16(&mut out, 0x10b); // PE32
    out.push(14);
    out.push(0);
    put_u32(&mut out, 0x200); // SizeOfCode
    put_u32(&mut out, 0x200); // SizeOfInitializedData
    put_u32(&mut out, 0);
    put_u32(&mut out, PE_ENTRY_RVA);
    put_u32(&mut out, 0x1000); // BaseOfCode
    put_u32(&mut out, 0x2000); // BaseOfData
    put_u32(&mut out, PE32_IMAGE_BASE as u32);
    put_u32(&mut out, 0x1000); // SectionAlignment
    put_u32(&mut out, 0x200); // FileAlignment
    for v in [6u16, 0, 0, 0, 6, 0] {
        put_u16(&mut out, v);
    }
    put_u32(&mut out, 0);
    put_u32(&mut out, 0x3000); // SizeOfImage
    put_u32(&mut out, 0x200); // SizeOfHeaders
    put_u32(&mut out, 0);
    put_u16(&mut out, 3); // console
    put_u16(&mut out, 0);
    for v in [0x10_0000u32, 0x1000, 0x10_0000, 0x1000] {
        put_u32(&mut out, v);
    }
    put_u32(&mut out, 0);
    put_u32(&mut out, 16);
    out.resize(out.len() + 16 * 8, 0);
    assert_eq!(out.len() - opt_start, 224);

    pe_section(&mut out, b".text\0\0\0", TEXT.len() as u32, 0x1000, 0x200, 0x6000_0020);
    pe_section(&mut out, b".data\0\0\0", DATA.len() as u32, 0x2000, 0x400, 0xC000_0040);

    out.resize(0x200, 0);
    out.extend_from_slice(&TEXT);
    out.resize(0x400, 0);
    out.extend_from_slice(&DATA);
    out.resize(0x600, 0);
    out
}

/// A relocatable object with `.text` (defining `main`) and `.data`.
pub fn relocatable(format: BinaryFormat, arch: Architecture) -> Vec<u8> {
    let mut obj = write::Object::new(format, arch, Endianness::Little);
    obj.set_mangling(Mangling::None);
    let text = obj.section_id(StandardSection::Text);
    let off = obj.append_section_data(text, &TEXT, 16);
    obj.add_symbol(write::Symbol {
        name: b"main".to_vec(),
        value: off,
        size: TEXT.len() as u64,
        kind: SymbolKind::Text,
        scope: SymbolScope::Linkage,
        weak: false,
        section: SymbolSection::Section(text),
        flags: SymbolFlags::None,
    });
    let data = obj.section_id(StandardSection::Data);
    obj.append_section_data(data, &DATA, 8);
    obj.write().unwrap()
}
