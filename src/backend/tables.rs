//! Mapping tables from back-end codes to the normalized model.
//!
//! Supporting a new container format or machine is a row here, not a new
//! match arm in the loader.

use object::{Architecture, BinaryFormat};

use crate::core::binary::{ArchKind, FormatKind};

/// Container flavor -> normalized format. COFF objects share the PE kind.
pub static FORMAT_TABLE: &[(BinaryFormat, FormatKind)] = &[
    (BinaryFormat::Elf, FormatKind::ELF),
    (BinaryFormat::Pe, FormatKind::PE),
    (BinaryFormat::Coff, FormatKind::PE),
];

/// Machine -> (architecture, bit width). Only the two x86 variants are
/// supported; the x32 ABI is deliberately absent.
pub static ARCH_TABLE: &[(Architecture, ArchKind, u8)] = &[
    (Architecture::I386, ArchKind::X86, 32),
    (Architecture::X86_64, ArchKind::X86, 64),
];

pub fn format_kind(flavor: BinaryFormat) -> Option<FormatKind> {
    FORMAT_TABLE
        .iter()
        .find(|(f, _)| *f == flavor)
        .map(|(_, kind)| *kind)
}

pub fn arch_kind(machine: Architecture) -> Option<(ArchKind, u8)> {
    ARCH_TABLE
        .iter()
        .find(|(m, _, _)| *m == machine)
        .map(|(_, kind, bits)| (*kind, *bits))
}

fn lower_debug<T: std::fmt::Debug>(value: T) -> String {
    format!("{:?}", value).to_lowercase()
}

/// Printable machine name in the style of the classic BFD names.
pub fn arch_printable_name(machine: Architecture) -> String {
    match machine {
        Architecture::I386 => "i386".to_string(),
        Architecture::X86_64 => "i386:x86-64".to_string(),
        Architecture::X86_64_X32 => "i386:x64-32".to_string(),
        Architecture::Unknown => "unknown".to_string(),
        other => lower_debug(other),
    }
}

fn target_suffix(machine: Architecture) -> String {
    match machine {
        Architecture::I386 => "i386".to_string(),
        Architecture::X86_64 | Architecture::X86_64_X32 => "x86-64".to_string(),
        Architecture::Arm => "littlearm".to_string(),
        Architecture::Aarch64 => "littleaarch64".to_string(),
        other => lower_debug(other),
    }
}

/// Native target name such as `elf64-x86-64` or `pei-i386`.
pub fn target_name(flavor: BinaryFormat, machine: Architecture, is_64: bool) -> String {
    let suffix = target_suffix(machine);
    match flavor {
        BinaryFormat::Elf => format!("elf{}-{}", if is_64 { 64 } else { 32 }, suffix),
        BinaryFormat::Pe => format!("pei-{}", suffix),
        BinaryFormat::Coff => format!("pe-{}", suffix),
        BinaryFormat::MachO => format!("mach-o-{}", suffix),
        other => lower_debug(other),
    }
}
