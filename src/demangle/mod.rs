//! Demangler helpers for Rust, C++ (Itanium) and MSVC symbols.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::symbol::Symbol;

static RE_ITA_MANGLED: Lazy<Regex> = Lazy::new(|| {
    // Itanium (GCC/Clang) ABI: _Z...
    Regex::new(r#"^_Z[a-zA-Z0-9_][a-zA-Z0-9_.$]*$"#).expect("valid itanium mangled regex")
});
static RE_MSVC_MANGLED: Lazy<Regex> = Lazy::new(|| {
    // MSVC: ?name@@... or ??0...
    Regex::new(r#"^\?\??[A-Za-z0-9_@\$\?]+@@[A-Za-z0-9_@\$\?]+$"#)
        .expect("valid msvc mangled regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolFlavor {
    Rust,
    Itanium,
    Msvc,
    Unknown,
}

pub fn detect_flavor(s: &str) -> SymbolFlavor {
    if rustc_demangle::try_demangle(s).is_ok() {
        return SymbolFlavor::Rust;
    }
    if RE_ITA_MANGLED.is_match(s) {
        return SymbolFlavor::Itanium;
    }
    if RE_MSVC_MANGLED.is_match(s) {
        return SymbolFlavor::Msvc;
    }
    SymbolFlavor::Unknown
}

/// Attempt to demangle a single name. Returns None when not recognized.
pub fn demangle_one(s: &str) -> Option<String> {
    match detect_flavor(s) {
        // Rust (v0 + legacy); `{:#}` drops the trailing hash
        SymbolFlavor::Rust => rustc_demangle::try_demangle(s)
            .ok()
            .map(|dm| format!("{:#}", dm)),
        SymbolFlavor::Itanium => cpp_demangle::Symbol::new(s).ok().map(|sym| sym.to_string()),
        SymbolFlavor::Msvc => {
            msvc_demangler::demangle(s, msvc_demangler::DemangleFlags::COMPLETE).ok()
        }
        SymbolFlavor::Unknown => None,
    }
}

/// Fill in `demangled` for every symbol a demangler recognizes.
/// Returns the number of symbols that gained a demangled name.
pub fn demangle_symbols(symbols: &mut [Symbol]) -> usize {
    let mut count = 0;
    for sym in symbols.iter_mut() {
        if let Some(dm) = demangle_one(&sym.name) {
            if dm != sym.name {
                sym.demangled = Some(dm);
                count += 1;
            }
        }
    }
    count
}
