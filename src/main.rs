use std::process::ExitCode;

use argh::FromArgs;
use log::Level;
use thiserror::Error;
use urm::{Machine, Parser, Program, Value};

/// An interpreter for Unlimited Register Machine programs.
#[derive(FromArgs)]
struct Arguments {
	/// the initial register values, starting at register 1
	#[argh(positional)]
	registers: Vec<Value>,

	/// the program file to run
	/// if not specified, stdin is used
	#[argh(option, short = 'i')]
	input: Option<String>,

	/// stop with an error after this many steps
	#[argh(option)]
	max_steps: Option<u64>,

	/// print the parsed program before running it
	#[argh(switch, short = 'l')]
	list: bool,

	/// log parsing and register growth
	#[argh(switch, short = 'v')]
	verbose: bool,

	/// log every executed instruction
	#[argh(switch)]
	trace: bool,
}

impl Arguments {
	const fn log_level(&self) -> Level {
		if self.trace {
			Level::Trace
		} else if self.verbose {
			Level::Debug
		} else {
			Level::Warn
		}
	}
}

#[derive(Debug, Error)]
enum Failure {
	#[error("failed to read program: {0}")]
	Read(#[from] std::io::Error),

	#[error(transparent)]
	Run(#[from] urm::Error),
}

fn load_input(name: Option<&str>) -> std::io::Result<String> {
	if let Some(name) = name {
		std::fs::read_to_string(name)
	} else {
		let stdin = std::io::stdin().lock();

		std::io::read_to_string(stdin)
	}
}

fn write_listing(program: &Program) {
	let width = program.len().to_string().len();

	for (index, insn) in program.instructions().iter().enumerate() {
		println!("{:>width$}: {insn}", index + 1);
	}
}

fn run(arguments: &Arguments) -> Result<Value, Failure> {
	let source = load_input(arguments.input.as_deref())?;
	let program = Parser::new()
		.parse(&source)
		.map_err(urm::Error::from)?;

	if arguments.list {
		write_listing(&program);
	}

	let mut machine = Machine::new(&program, &arguments.registers).map_err(urm::Error::from)?;

	let result = match arguments.max_steps {
		Some(limit) => machine.run_bounded(limit),
		None => machine.run(),
	};

	Ok(result.map_err(urm::Error::from)?)
}

fn main() -> ExitCode {
	let arguments = argh::from_env::<Arguments>();

	if let Err(err) = simple_logger::init_with_level(arguments.log_level()) {
		eprintln!("failed to initialize logging: {err}");
	}

	// Reported directly so the diagnostic survives a missing logger.
	match run(&arguments) {
		Ok(result) => {
			println!("RES = {result}");

			ExitCode::SUCCESS
		}
		Err(err) => {
			eprintln!("error: {err}");

			ExitCode::FAILURE
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn arguments(input: &str, registers: Vec<Value>) -> Arguments {
		Arguments {
			registers,
			input: Some(input.to_string()),
			max_steps: Some(1000),
			list: false,
			verbose: false,
			trace: false,
		}
	}

	fn write_program(name: &str, source: &str) -> String {
		let path = std::env::temp_dir().join(format!("urm-{}-{name}", std::process::id()));

		std::fs::write(&path, source).unwrap();

		path.to_string_lossy().into_owned()
	}

	#[test]
	fn runs_a_program_file() {
		let path = write_program("add", "J 2 3 5\nS 1\nS 3\nJ 1 1 1\n");

		assert_eq!(run(&arguments(&path, vec![2, 5])).unwrap(), 7);
	}

	#[test]
	fn missing_file_has_a_diagnostic() {
		let err = run(&arguments("/nonexistent/urm/program", Vec::new())).unwrap_err();

		assert!(matches!(err, Failure::Read(_)));
		assert!(err.to_string().starts_with("failed to read program: "));
	}

	#[test]
	fn syntax_error_has_a_diagnostic() {
		let path = write_program("syntax", "S 1\nQ 1\n");
		let err = run(&arguments(&path, Vec::new())).unwrap_err();

		assert_eq!(err.to_string(), "syntax error at 2:1: unknown instruction `Q`");
	}

	#[test]
	fn step_limit_has_a_diagnostic() {
		let path = write_program("loop", "J 1 1 1\n");
		let err = run(&arguments(&path, Vec::new())).unwrap_err();

		assert_eq!(err.to_string(), "program did not halt within 1000 steps");
	}
}
