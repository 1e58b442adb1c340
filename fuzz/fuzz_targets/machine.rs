#![no_main]

use libfuzzer_sys::{fuzz_target, Corpus};
use urm::{Machine, MachineError, Parser, Register, Value};
use urm_fuzz::structured_string::StructuredString;

const STEP_LIMIT: u64 = 100_000;

fuzz_target!(|data: (StructuredString, Vec<Value>)| -> Corpus {
	let (source, input) = data;
	let Ok(program) = Parser::new().parse(&source) else { return Corpus::Reject };

	let mut machine = Machine::new(&program, &input).expect("input should fit");

	match machine.run_bounded(STEP_LIMIT) {
		Ok(result) => assert_eq!(result, machine.registers().get(Register::RESULT)),
		Err(MachineError::StepLimit { .. }) => assert_eq!(machine.steps(), STEP_LIMIT),
		Err(err) => panic!("unexpected failure: {err}"),
	}

	Corpus::Keep
});
