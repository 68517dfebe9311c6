//! Binary types for binary analysis.
//!
//! This module provides the normalized `Binary` model handed to downstream
//! analysis: format and architecture metadata, the entry point, and the
//! ordered section and symbol lists.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::section::Section;
use crate::core::symbol::Symbol;
use crate::error::{LoaderError, Result};

/// The executable container format of a binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatKind {
    /// Executable and Linkable Format (Linux, Unix)
    ELF,
    /// Portable Executable / COFF (Windows)
    PE,
    /// Not yet classified
    Unknown,
}

/// The CPU architecture family of a binary. Bit width is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchKind {
    /// x86 (both i386 and x86-64)
    X86,
    /// Not yet classified
    Unknown,
}

/// Caller-side hint for the expected container format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryType {
    /// Accept whatever the back-end detects
    #[default]
    Auto,
    Elf,
    Pe,
}

impl BinaryType {
    /// Whether a detected format satisfies this hint.
    pub fn accepts(&self, format: FormatKind) -> bool {
        match self {
            BinaryType::Auto => true,
            BinaryType::Elf => format == FormatKind::ELF,
            BinaryType::Pe => format == FormatKind::PE,
        }
    }
}

/// A loaded program, normalized across container formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    /// Filesystem path the binary was loaded from
    pub filename: String,
    /// Entry point virtual address
    pub entry: u64,
    pub format: FormatKind,
    /// Back-end's native type name (e.g. "elf64-x86-64")
    pub format_name: String,
    pub arch: ArchKind,
    /// Back-end's printable architecture name (e.g. "i386:x86-64")
    pub arch_name: String,
    /// Bit width (32 or 64)
    pub bits: u8,
    pub sections: Vec<Section>,
    pub symbols: Vec<Symbol>,
}

impl Binary {
    /// The state a binary is in before the loader fills it.
    pub fn empty() -> Self {
        Self {
            filename: String::new(),
            entry: 0,
            format: FormatKind::Unknown,
            format_name: String::new(),
            arch: ArchKind::Unknown,
            arch_name: String::new(),
            bits: 0,
            sections: Vec::new(),
            symbols: Vec::new(),
        }
    }

    pub fn is_64_bit(&self) -> bool {
        self.bits == 64
    }

    pub fn section_by_name(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// First section whose address range covers `addr`.
    pub fn section_containing(&self, addr: u64) -> Option<&Section> {
        self.sections.iter().find(|s| s.contains(addr))
    }

    pub fn code_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.is_code())
    }

    /// The `.text` section, falling back to the first code section.
    pub fn text_section(&self) -> Option<&Section> {
        self.section_by_name(".text")
            .or_else(|| self.code_sections().next())
    }

    pub fn symbol_by_name(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    pub fn functions(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.is_function())
    }

    /// Release every section buffer. Returns how many buffers this call freed;
    /// a repeated unload frees nothing and returns 0.
    pub fn unload(&mut self) -> usize {
        self.sections
            .iter_mut()
            .map(|s| s.release())
            .filter(|freed| *freed)
            .count()
    }

    /// Serialize the metadata to JSON. Section contents are not included.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| LoaderError::Serialization(format!("JSON serialization error: {}", e)))
    }

    pub fn from_json_str(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| LoaderError::Serialization(format!("JSON deserialization error: {}", e)))
    }
}

impl fmt::Display for FormatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatKind::ELF => write!(f, "ELF"),
            FormatKind::PE => write!(f, "PE"),
            FormatKind::Unknown => write!(f, "Unknown"),
        }
    }
}

impl fmt::Display for ArchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchKind::X86 => write!(f, "x86"),
            ArchKind::Unknown => write!(f, "unknown"),
        }
    }
}

impl fmt::Display for BinaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryType::Auto => write!(f, "auto"),
            BinaryType::Elf => write!(f, "ELF"),
            BinaryType::Pe => write!(f, "PE"),
        }
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{} ({}/{} {}-bit) entry@0x{:016x}",
            self.filename,
            self.format_name,
            self.format,
            self.arch_name,
            self.arch,
            self.bits,
            self.entry
        )
    }
}
