//! Format back-end adapter.
//!
//! A `FormatBackend` turns a mapped file into a `BackendHandle`, which answers
//! the questions the loader asks: flavor, machine, entry point, sections and
//! symbols. Dropping the handle is the one and only "close".
//!
//! Format and architecture classification live here as provided methods over
//! the mapping tables in [`tables`], so every back-end rejects the same inputs.

pub mod object_backend;
pub mod tables;

pub use object_backend::{ObjectBackend, ObjectHandle};

use object::{Architecture, BinaryFormat};
use std::path::Path;

use crate::core::binary::{ArchKind, FormatKind};
use crate::core::section::Section;
use crate::core::symbol::Symbol;
use crate::error::{LoaderError, Result};
use crate::io::MappedImage;

/// Something that can open a mapped file as an object file.
pub trait FormatBackend {
    type Handle<'data>: BackendHandle;

    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Probe `image`; fails with `NotAnObject` if it is not an object file.
    fn open<'data>(&self, image: &'data MappedImage) -> Result<Self::Handle<'data>>;
}

/// An open back-end session over one file.
pub trait BackendHandle {
    fn path(&self) -> &Path;

    /// Declared entry point virtual address.
    fn entry(&self) -> u64;

    /// The back-end's container flavor tag.
    fn flavor(&self) -> BinaryFormat;

    /// The back-end's machine code.
    fn machine(&self) -> Architecture;

    /// Native type name, e.g. `elf64-x86-64`.
    fn format_name(&self) -> String;

    /// Printable machine name, e.g. `i386:x86-64`.
    fn arch_name(&self) -> String;

    /// Every section with an owned copy of its contents.
    fn sections(&self) -> Result<Vec<Section>>;

    /// Defined symbols from the static (`dynamic == false`) or dynamic table.
    /// A missing table is an empty list; an unreadable one is `SymbolRead`.
    fn symbols(&self, dynamic: bool) -> Result<Vec<Symbol>>;

    fn classify_format(&self) -> Result<FormatKind> {
        tables::format_kind(self.flavor()).ok_or_else(|| LoaderError::UnsupportedFormat {
            path: self.path().to_path_buf(),
            format: self.format_name(),
        })
    }

    fn classify_architecture(&self) -> Result<(ArchKind, u8)> {
        tables::arch_kind(self.machine()).ok_or_else(|| LoaderError::UnsupportedArch {
            path: self.path().to_path_buf(),
            arch: self.arch_name(),
        })
    }
}
