//! Symbol type for named program entities.
//!
//! Symbols come from the static and dynamic symbol tables. They own only
//! their names; nothing here points back into the file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbol kinds for different types of program entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Function symbol
    Function,
    /// Data object symbol
    Data,
    /// Other/unknown symbol type
    Other,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Function => write!(f, "FUNC"),
            SymbolKind::Data => write!(f, "DATA"),
            SymbolKind::Other => write!(f, "OTHER"),
        }
    }
}

/// Named address binding from a symbol table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// Mangled/exported name
    pub name: String,
    /// Virtual address
    pub address: u64,
    /// Size in bytes, 0 when unknown
    pub size: u64,
    pub kind: SymbolKind,
    /// Present in the dynamic symbol table
    pub is_dynamic: bool,
    /// Demangled name (optional)
    pub demangled: Option<String>,
}

impl Symbol {
    pub fn new(
        name: impl Into<String>,
        address: u64,
        size: u64,
        kind: SymbolKind,
        is_dynamic: bool,
    ) -> Self {
        Self {
            name: name.into(),
            address,
            size,
            kind,
            is_dynamic,
            demangled: None,
        }
    }

    /// Get the display name (demangled if available, otherwise mangled)
    pub fn display_name(&self) -> &str {
        self.demangled.as_deref().unwrap_or(&self.name)
    }

    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<40} 0x{:016x} {}{}",
            self.display_name(),
            self.address,
            self.kind,
            if self.is_dynamic { " (dynamic)" } else { "" }
        )
    }
}
