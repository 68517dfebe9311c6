//! Binary model builder.
//!
//! Drives a [`FormatBackend`] through one load: open, classify format,
//! classify architecture, best-effort symbols, mandatory sections. The
//! back-end handle lives only inside [`load_binary_with`] and is dropped
//! (closed) exactly once on every exit path; the returned [`Binary`] holds
//! independent copies of everything it needs.

mod symbols;

use std::path::Path;
use tracing::{debug, info, info_span, warn};

use crate::backend::{BackendHandle, FormatBackend, ObjectBackend};
use crate::config::{LoaderConfig, SectionSelection};
use crate::core::binary::{Binary, BinaryType};
use crate::core::section::Section;
use crate::error::{LoaderError, Result};
use crate::io::MappedImage;
use crate::log_error;

/// Load `path` with the default back-end and configuration.
pub fn load_binary<P: AsRef<Path>>(path: P, requested: BinaryType) -> Result<Binary> {
    load_binary_with(ObjectBackend::global(), path, requested, &LoaderConfig::default())
}

/// Load `path` with the default back-end and a custom configuration.
pub fn load_binary_with_config<P: AsRef<Path>>(
    path: P,
    requested: BinaryType,
    config: &LoaderConfig,
) -> Result<Binary> {
    load_binary_with(ObjectBackend::global(), path, requested, config)
}

/// Load `path` through an explicit back-end.
pub fn load_binary_with<B, P>(
    backend: &B,
    path: P,
    requested: BinaryType,
    config: &LoaderConfig,
) -> Result<Binary>
where
    B: FormatBackend,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let span = info_span!("load_binary", path = %path.display(), backend = backend.name());
    let _guard = span.enter();

    let image = MappedImage::open(path, &config.io).map_err(|e| log_error!(e))?;
    let handle = backend.open(&image).map_err(|e| log_error!(e))?;

    let result = populate(&handle, requested, config);
    drop(handle);

    match result {
        Ok(bin) => {
            info!(
                format = %bin.format_name,
                arch = %bin.arch_name,
                bits = bin.bits,
                entry = %format!("{:#x}", bin.entry),
                sections = bin.sections.len(),
                symbols = bin.symbols.len(),
                "binary loaded"
            );
            Ok(bin)
        }
        Err(e) => Err(log_error!(e)),
    }
}

/// Release every section buffer owned by `bin`. Safe to call twice; the
/// second call frees nothing. Returns the number of buffers freed.
pub fn unload_binary(bin: &mut Binary) -> usize {
    let freed = bin.unload();
    debug!(path = %bin.filename, freed, "binary unloaded");
    freed
}

fn populate<H: BackendHandle>(
    handle: &H,
    requested: BinaryType,
    config: &LoaderConfig,
) -> Result<Binary> {
    let mut bin = Binary::empty();
    bin.filename = handle.path().display().to_string();
    bin.entry = handle.entry();
    let format_name = handle.format_name();

    let format = handle.classify_format()?;
    debug!(format = %format, name = %format_name, "format classified");
    if !requested.accepts(format) {
        if config.strict_type {
            return Err(LoaderError::TypeMismatch {
                path: handle.path().to_path_buf(),
                requested: requested.to_string(),
                found: format.to_string(),
            });
        }
        warn!(requested = %requested, found = %format, "requested type differs from detected format");
    }

    let (arch, bits) = handle.classify_architecture()?;
    let arch_name = handle.arch_name();
    debug!(arch = %arch, bits, name = %arch_name, "architecture classified");

    bin.format = format;
    bin.format_name = format_name;
    bin.arch = arch;
    bin.arch_name = arch_name;
    bin.bits = bits;

    // Symbol tables are best-effort only; they may not even be present.
    bin.symbols = symbols::collect(handle, &config.symbols);

    bin.sections = load_sections(handle, config.sections)?;

    Ok(bin)
}

fn load_sections<H: BackendHandle>(handle: &H, selection: SectionSelection) -> Result<Vec<Section>> {
    let mut sections = handle.sections()?;
    if selection == SectionSelection::CodeAndData {
        sections.retain(|s| s.is_code() || s.is_data());
    }
    if sections.is_empty() {
        return Err(LoaderError::SectionRead {
            path: handle.path().to_path_buf(),
            section: "*".to_string(),
            reason: "no sections could be extracted".to_string(),
        });
    }
    Ok(sections)
}
