#![no_main]

use libfuzzer_sys::fuzz_target;
use typegen_core::{ItemKind, lex};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut last = 0;
        let mut terminal = false;

        for item in lex(s) {
            assert!(!terminal, "item after a terminal item");
            assert!(item.offset >= last, "offsets went backwards");
            assert!(item.offset <= s.len());
            last = item.offset;
            terminal = matches!(item.kind, ItemKind::Eof | ItemKind::Error);
        }
    }
});
