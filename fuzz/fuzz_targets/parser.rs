#![no_main]

use libfuzzer_sys::fuzz_target;
use urm::{Parser, Program};
use urm_fuzz::restricted_string::RestrictedString;

fuzz_target!(|source: RestrictedString| {
	let Ok(program) = Parser::new().parse(&source) else { return };

	let again: Program = program.to_string().parse().expect("listing should parse");

	assert_eq!(program, again);
});
