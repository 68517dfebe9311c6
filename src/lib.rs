//! binloader: loads ELF and PE executables into one architecture-neutral
//! in-memory model for downstream disassembly and analysis.
//!
//! ```no_run
//! use binloader::{load_binary, unload_binary, BinaryType};
//!
//! binloader::init();
//! let mut bin = load_binary("/bin/true", BinaryType::Auto)?;
//! for sec in &bin.sections {
//!     println!("{}", sec);
//! }
//! unload_binary(&mut bin);
//! # Ok::<(), binloader::LoaderError>(())
//! ```

/// Format back-end adapter and mapping tables
pub mod backend;
pub mod config;
/// Core data types module
pub mod core;
pub mod demangle;
pub mod error;
pub mod io;
pub mod loader;
pub mod logging;

pub use crate::backend::{BackendHandle, FormatBackend, ObjectBackend};
pub use crate::config::{IOLimits, LoaderConfig, SectionSelection, SymbolConfig};
pub use crate::core::binary::{ArchKind, Binary, BinaryType, FormatKind};
pub use crate::core::section::{Section, SectionKind};
pub use crate::core::symbol::{Symbol, SymbolKind};
pub use crate::error::{ErrorKind, LoaderError, Result};
pub use crate::loader::{load_binary, load_binary_with, load_binary_with_config, unload_binary};

/// One-time back-end initialization. Call once at startup before loading;
/// later calls are no-ops.
pub fn init() {
    let _ = ObjectBackend::global();
}
