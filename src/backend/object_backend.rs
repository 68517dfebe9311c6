//! Production back-end built on the `object` crate.

use bytes::Bytes;
use object::read::{Object, ObjectSection, ObjectSymbol};
use object::{elf, Architecture, BinaryFormat, SectionFlags};
use once_cell::sync::Lazy;
use std::path::Path;
use tracing::{debug, info, trace};

use super::tables;
use super::{BackendHandle, FormatBackend};
use crate::core::section::{Section, SectionKind};
use crate::core::symbol::{Symbol, SymbolKind};
use crate::error::{LoaderError, Result};
use crate::io::MappedImage;

static BACKEND: Lazy<ObjectBackend> = Lazy::new(|| {
    let formats: Vec<String> = tables::FORMAT_TABLE
        .iter()
        .map(|(flavor, kind)| format!("{:?}->{}", flavor, kind))
        .collect();
    let arches: Vec<String> = tables::ARCH_TABLE
        .iter()
        .map(|(machine, kind, bits)| format!("{:?}->{}/{}", machine, kind, bits))
        .collect();
    info!(
        formats = %formats.join(","),
        architectures = %arches.join(","),
        "object back-end initialized"
    );
    ObjectBackend { _private: () }
});

/// Stateless adapter over `object::File`.
#[derive(Debug)]
pub struct ObjectBackend {
    _private: (),
}

impl ObjectBackend {
    /// The process-wide back-end, initialized on first use.
    pub fn global() -> &'static ObjectBackend {
        &BACKEND
    }
}

impl FormatBackend for ObjectBackend {
    type Handle<'data> = ObjectHandle<'data>;

    fn name(&self) -> &'static str {
        "object"
    }

    fn open<'data>(&self, image: &'data MappedImage) -> Result<ObjectHandle<'data>> {
        if image.is_empty() {
            return Err(LoaderError::NotAnObject {
                path: image.path().to_path_buf(),
                reason: "empty file".to_string(),
            });
        }
        let file = object::File::parse(image.data()).map_err(|e| LoaderError::NotAnObject {
            path: image.path().to_path_buf(),
            reason: e.to_string(),
        })?;
        trace!(path = %image.path().display(), format = ?file.format(), "back-end handle opened");
        Ok(ObjectHandle {
            path: image.path(),
            file,
        })
    }
}

/// An open `object::File` borrowing the mapped image.
pub struct ObjectHandle<'data> {
    path: &'data Path,
    file: object::File<'data>,
}

impl Drop for ObjectHandle<'_> {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), "back-end handle closed");
    }
}

/// ELF sections follow the section header flags: allocated and executable is
/// code, any other allocated section is data. `.init_array` and `.dynamic`
/// have no dedicated `object` kind but are loaded data all the same.
fn section_kind(kind: object::SectionKind, flags: SectionFlags) -> SectionKind {
    use object::SectionKind as K;
    if let SectionFlags::Elf { sh_flags } = flags {
        if sh_flags & u64::from(elf::SHF_ALLOC) != 0 {
            return if sh_flags & u64::from(elf::SHF_EXECINSTR) != 0 {
                SectionKind::Code
            } else {
                SectionKind::Data
            };
        }
    }
    match kind {
        K::Text => SectionKind::Code,
        K::Data
        | K::ReadOnlyData
        | K::ReadOnlyString
        | K::Tls
        | K::UninitializedData
        | K::UninitializedTls
        | K::Common => SectionKind::Data,
        _ => SectionKind::Other,
    }
}

fn symbol_kind(kind: object::SymbolKind) -> Option<SymbolKind> {
    use object::SymbolKind as K;
    match kind {
        K::Text => Some(SymbolKind::Function),
        K::Data | K::Tls => Some(SymbolKind::Data),
        K::Section | K::File => None,
        _ => Some(SymbolKind::Other),
    }
}

impl BackendHandle for ObjectHandle<'_> {
    fn path(&self) -> &Path {
        self.path
    }

    fn entry(&self) -> u64 {
        self.file.entry()
    }

    fn flavor(&self) -> BinaryFormat {
        self.file.format()
    }

    fn machine(&self) -> Architecture {
        self.file.architecture()
    }

    fn format_name(&self) -> String {
        tables::target_name(self.flavor(), self.machine(), self.file.is_64())
    }

    fn arch_name(&self) -> String {
        tables::arch_printable_name(self.machine())
    }

    fn sections(&self) -> Result<Vec<Section>> {
        let mut out = Vec::new();
        for sec in self.file.sections() {
            let name = sec.name().map_err(|e| LoaderError::SectionRead {
                path: self.path.to_path_buf(),
                section: format!("#{}", sec.index().0),
                reason: e.to_string(),
            })?;
            let size = sec.size();
            // ELF's null section header
            if name.is_empty() && size == 0 {
                continue;
            }
            let name = if name.is_empty() { "<unnamed>" } else { name };

            let file_offset = sec.file_range().map(|(offset, _)| offset);
            let bytes = match file_offset {
                Some(_) => {
                    let data = sec.data().map_err(|e| LoaderError::SectionRead {
                        path: self.path.to_path_buf(),
                        section: name.to_string(),
                        reason: e.to_string(),
                    })?;
                    Some(Bytes::copy_from_slice(data))
                }
                None => None,
            };

            out.push(Section::new(
                name,
                sec.address(),
                size,
                section_kind(sec.kind(), sec.flags()),
                file_offset,
                bytes,
            ));
        }
        debug!(path = %self.path.display(), count = out.len(), "sections extracted");
        Ok(out)
    }

    fn symbols(&self, dynamic: bool) -> Result<Vec<Symbol>> {
        let mut out = Vec::new();
        let mut skipped = 0usize;
        let iter = if dynamic {
            self.file.dynamic_symbols()
        } else {
            self.file.symbols()
        };
        for sym in iter {
            if sym.is_undefined() {
                continue;
            }
            let Some(kind) = symbol_kind(sym.kind()) else {
                continue;
            };
            let name = match sym.name() {
                Ok(name) if !name.is_empty() => name,
                Ok(_) => continue,
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };
            out.push(Symbol::new(name, sym.address(), sym.size(), kind, dynamic));
        }
        if skipped > 0 && out.is_empty() {
            return Err(LoaderError::SymbolRead {
                path: self.path.to_path_buf(),
                reason: format!(
                    "{} {} symbol name(s) unreadable",
                    skipped,
                    if dynamic { "dynamic" } else { "static" }
                ),
            });
        }
        if skipped > 0 {
            debug!(
                path = %self.path.display(),
                dynamic,
                skipped,
                "symbols with unreadable names skipped"
            );
        }
        Ok(out)
    }
}
