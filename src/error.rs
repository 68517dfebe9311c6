//! Error types for the binloader crate.
//!
//! Every fatal load failure is a `LoaderError` carrying the offending path.
//! Symbol enumeration failures never reach this type; they are swallowed by
//! the loader and reported as "no symbols".

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for loader operations.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The input path does not exist
    #[error("failed to open binary '{}': file not found", .path.display())]
    NotFound { path: PathBuf },

    /// The input exists but could not be read
    #[error("failed to open binary '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input exceeds the configured size limit
    #[error(
        "binary '{}' is {found} bytes, exceeding the limit of {limit} bytes",
        .path.display()
    )]
    FileTooLarge {
        path: PathBuf,
        limit: u64,
        found: u64,
    },

    /// The back-end could not classify the file as an object file
    #[error("file '{}' does not look like an executable ({reason})", .path.display())]
    NotAnObject { path: PathBuf, reason: String },

    /// Recognized object file, but not a container format we normalize
    #[error("unsupported binary type for '{}' ({format})", .path.display())]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Recognized format, but an unhandled machine type
    #[error("unsupported architecture for '{}' ({arch})", .path.display())]
    UnsupportedArch { path: PathBuf, arch: String },

    /// Detected format disagrees with the requested one (strict mode only)
    #[error(
        "binary '{}' was requested as {requested} but is {found}",
        .path.display()
    )]
    TypeMismatch {
        path: PathBuf,
        requested: String,
        found: String,
    },

    /// Section contents could not be extracted
    #[error("failed to read section '{section}' of '{}': {reason}", .path.display())]
    SectionRead {
        path: PathBuf,
        section: String,
        reason: String,
    },

    /// A symbol table is present but none of its entries could be read.
    /// Back-ends return it from `symbols`; the loader logs it and continues.
    #[error("failed to read symbols of '{}': {reason}", .path.display())]
    SymbolRead { path: PathBuf, reason: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Fieldless tag for each failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Io,
    FileTooLarge,
    NotAnObject,
    UnsupportedFormat,
    UnsupportedArch,
    TypeMismatch,
    SectionRead,
    SymbolRead,
    Serialization,
}

impl LoaderError {
    /// Build an open error from an `std::io::Error`, splitting out `NotFound`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            LoaderError::NotFound { path }
        } else {
            LoaderError::Io { path, source }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LoaderError::NotFound { .. } => ErrorKind::NotFound,
            LoaderError::Io { .. } => ErrorKind::Io,
            LoaderError::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            LoaderError::NotAnObject { .. } => ErrorKind::NotAnObject,
            LoaderError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            LoaderError::UnsupportedArch { .. } => ErrorKind::UnsupportedArch,
            LoaderError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            LoaderError::SectionRead { .. } => ErrorKind::SectionRead,
            LoaderError::SymbolRead { .. } => ErrorKind::SymbolRead,
            LoaderError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// The path the failing load was attempted on, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            LoaderError::NotFound { path }
            | LoaderError::Io { path, .. }
            | LoaderError::FileTooLarge { path, .. }
            | LoaderError::NotAnObject { path, .. }
            | LoaderError::UnsupportedFormat { path, .. }
            | LoaderError::UnsupportedArch { path, .. }
            | LoaderError::TypeMismatch { path, .. }
            | LoaderError::SectionRead { path, .. }
            | LoaderError::SymbolRead { path, .. } => Some(path),
            LoaderError::Serialization(_) => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NotFound"),
            ErrorKind::Io => write!(f, "IOError"),
            ErrorKind::FileTooLarge => write!(f, "FileTooLarge"),
            ErrorKind::NotAnObject => write!(f, "NotAnObject"),
            ErrorKind::UnsupportedFormat => write!(f, "UnsupportedFormat"),
            ErrorKind::UnsupportedArch => write!(f, "UnsupportedArch"),
            ErrorKind::TypeMismatch => write!(f, "TypeMismatch"),
            ErrorKind::SectionRead => write!(f, "SectionReadError"),
            ErrorKind::SymbolRead => write!(f, "SymbolReadError"),
            ErrorKind::Serialization => write!(f, "Serialization"),
        }
    }
}

/// Result type alias for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;
