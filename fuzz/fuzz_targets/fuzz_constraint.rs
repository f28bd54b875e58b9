#![no_main]

use libfuzzer_sys::fuzz_target;
use typegen_core::{Capabilities, Constraint, Type};

fuzz_target!(|input: (Constraint, Capabilities, Capabilities)| {
    let (constraint, small, extra) = input;
    let large = Capabilities {
        comparable: small.comparable || extra.comparable,
        numeric: small.numeric || extra.numeric,
        ordered: small.ordered || extra.ordered,
    };

    if constraint.is_satisfied_by(&Type::new("T", small)) {
        assert!(constraint.is_satisfied_by(&Type::new("T", large)));
    }
});
