#![no_main]
use libfuzzer_sys::fuzz_target;
use std::io::Write;

use binloader::{load_binary, unload_binary, BinaryType};

fuzz_target!(|data: &[u8]| {
    let Ok(mut file) = tempfile::NamedTempFile::new() else {
        return;
    };
    if file.write_all(data).is_err() {
        return;
    }
    // Any outcome is fine as long as nothing panics.
    if let Ok(mut bin) = load_binary(file.path(), BinaryType::Auto) {
        assert!(bin.bits == 32 || bin.bits == 64);
        assert!(!bin.sections.is_empty());
        unload_binary(&mut bin);
        assert_eq!(unload_binary(&mut bin), 0);
    }
});
