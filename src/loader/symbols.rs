//! Best-effort symbol collection: static and dynamic tables merged into one
//! ordered list. Nothing here can fail a load.

use std::collections::HashSet;
use tracing::debug;

use crate::backend::BackendHandle;
use crate::config::SymbolConfig;
use crate::core::symbol::Symbol;
use crate::demangle;

pub(super) fn collect<H: BackendHandle>(handle: &H, config: &SymbolConfig) -> Vec<Symbol> {
    let statics = if config.load_static {
        read_table(handle, false)
    } else {
        Vec::new()
    };
    let dynamics = if config.load_dynamic {
        read_table(handle, true)
    } else {
        Vec::new()
    };

    let mut merged = merge(statics, dynamics);
    if config.demangle {
        let count = demangle::demangle_symbols(&mut merged);
        debug!(count, "symbols demangled");
    }
    merged
}

fn read_table<H: BackendHandle>(handle: &H, dynamic: bool) -> Vec<Symbol> {
    match handle.symbols(dynamic) {
        Ok(syms) => {
            debug!(dynamic, count = syms.len(), "symbol table read");
            syms
        }
        Err(e) => {
            debug!(dynamic, error = %e, "symbol table unavailable, continuing without it");
            Vec::new()
        }
    }
}

/// Static symbols keep their order and are flagged dynamic when the dynamic
/// table has the same name at the same address; dynamic-only symbols follow.
pub(super) fn merge(statics: Vec<Symbol>, dynamics: Vec<Symbol>) -> Vec<Symbol> {
    let dynamic_keys: HashSet<(String, u64)> = dynamics
        .iter()
        .map(|s| (s.name.clone(), s.address))
        .collect();

    let mut merged = statics;
    let mut seen: HashSet<(String, u64)> = HashSet::with_capacity(merged.len());
    for sym in merged.iter_mut() {
        let key = (sym.name.clone(), sym.address);
        if dynamic_keys.contains(&key) {
            sym.is_dynamic = true;
        }
        seen.insert(key);
    }

    for sym in dynamics {
        if seen.insert((sym.name.clone(), sym.address)) {
            merged.push(Symbol {
                is_dynamic: true,
                ..sym
            });
        }
    }
    merged
}
