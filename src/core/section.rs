//! Section type for file-format organizational units.
//!
//! Sections correspond to sections in executable formats like ELF and PE.
//! Each section owns an independent copy of its file-backed bytes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a section, derived from back-end flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    /// Executable instructions
    Code,
    /// Initialized or zero-initialized program data
    Data,
    /// Metadata, notes, debug info and everything else
    Other,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Code => write!(f, "CODE"),
            SectionKind::Data => write!(f, "DATA"),
            SectionKind::Other => write!(f, "OTHER"),
        }
    }
}

/// One loadable or non-loadable region of a binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section name (e.g., ".text", ".data")
    pub name: String,
    /// Base virtual address
    pub address: u64,
    /// Size in bytes as declared by the file
    pub size: u64,
    pub kind: SectionKind,
    /// File offset of the contents, None for zero-initialized or virtual sections
    pub file_offset: Option<u64>,
    /// Raw contents; None when the section has no file-backed data or was released
    #[serde(skip)]
    pub bytes: Option<Bytes>,
}

impl Section {
    pub fn new(
        name: impl Into<String>,
        address: u64,
        size: u64,
        kind: SectionKind,
        file_offset: Option<u64>,
        bytes: Option<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            address,
            size,
            kind,
            file_offset,
            bytes: bytes.filter(|b| !b.is_empty()),
        }
    }

    /// True when `addr` falls inside `[address, address + size)`.
    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.address && addr - self.address < self.size
    }

    pub fn end_address(&self) -> u64 {
        self.address.saturating_add(self.size)
    }

    pub fn is_code(&self) -> bool {
        self.kind == SectionKind::Code
    }

    pub fn is_data(&self) -> bool {
        self.kind == SectionKind::Data
    }

    pub fn has_bytes(&self) -> bool {
        self.bytes.is_some()
    }

    /// The section contents, empty if there are none.
    pub fn data(&self) -> &[u8] {
        self.bytes.as_deref().unwrap_or(&[])
    }

    /// Bytes starting at virtual address `addr`, up to the end of the contents.
    pub fn data_at(&self, addr: u64) -> Option<&[u8]> {
        if !self.contains(addr) {
            return None;
        }
        let off = usize::try_from(addr - self.address).ok()?;
        self.bytes.as_deref()?.get(off..)
    }

    /// Free the owned buffer. Returns false if there was nothing to free.
    pub fn release(&mut self) -> bool {
        self.bytes.take().is_some()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:016x} {:<8} {:<20} {}",
            self.address, self.size, self.name, self.kind
        )
    }
}
