#![no_main]

use libfuzzer_sys::fuzz_target;
use typegen_core::{EvaluationError, Type, parse};

const DIRECTIVE: &str = "+gen";

fn eval(name: &str) -> Result<Type, EvaluationError> {
    match name.strip_prefix('*') {
        Some(bare) => Ok(Type::named(bare).with_pointer(true)),
        None => Ok(Type::named(name)),
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    match parse(s, DIRECTIVE, &eval) {
        Ok(Some(annotation)) => {
            let printed = annotation.to_comment(DIRECTIVE);
            let reparsed = parse(&printed, DIRECTIVE, &eval);
            assert_eq!(reparsed, Ok(Some(annotation)), "{printed}");
        }
        Ok(None) => {}
        Err(err) => assert!(err.offset <= s.len()),
    }
});
