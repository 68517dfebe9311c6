//! Configuration for the loader.
//!
//! Provides centralized configuration for all loader components with
//! sensible defaults. Everything is serde-friendly so callers can keep it in
//! a JSON file next to their own settings.

use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, Result};

/// Master configuration for a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// I/O limits applied before the back-end sees the file.
    pub io: IOLimits,
    /// Which sections end up in the model.
    pub sections: SectionSelection,
    /// Symbol table handling.
    pub symbols: SymbolConfig,
    /// Fail with `TypeMismatch` when the requested type disagrees with the file.
    pub strict_type: bool,
}

impl LoaderConfig {
    pub fn from_json_str(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| LoaderError::Serialization(format!("invalid loader config: {}", e)))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LoaderError::Serialization(format!("JSON serialization error: {}", e)))
    }
}

/// Defines the resource limits for I/O operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IOLimits {
    /// The absolute maximum file size that can be opened.
    pub max_file_size: u64,
}

impl Default for IOLimits {
    fn default() -> Self {
        Self {
            max_file_size: 512 * 1024 * 1024, // 512MB
        }
    }
}

/// Section filtering policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionSelection {
    /// Keep every named section the back-end reports.
    #[default]
    All,
    /// Keep only sections tagged code or data.
    CodeAndData,
}

/// Symbol table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolConfig {
    /// Read the static symbol table.
    pub load_static: bool,
    /// Read the dynamic symbol table.
    pub load_dynamic: bool,
    /// Attach demangled names where a demangler recognizes the symbol.
    pub demangle: bool,
}

impl Default for SymbolConfig {
    fn default() -> Self {
        Self {
            load_static: true,
            load_dynamic: true,
            demangle: true,
        }
    }
}
