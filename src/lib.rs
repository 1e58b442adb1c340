//! An interpreter for Unlimited Register Machine programs.
//!
//! Programs are written one instruction per line, with registers and jump
//! targets counted from 1:
//!
//! ```text
//! Z n      set register n to 0
//! S n      add 1 to register n
//! T m n    copy register m into register n
//! J m n k  continue at instruction k if registers m and n are equal
//! ```
//!
//! A run halts when the program counter leaves the program, leaving its result
//! in register 1.
//!
//! ```
//! let result = urm::evaluate("J 2 3 5\nS 1\nS 3\nJ 1 1 1\n", &[3, 4]).unwrap();
//!
//! assert_eq!(result, 7);
//! ```

use thiserror::Error;

pub mod machine;
pub mod program;

pub use machine::engine::{execute, Machine, MachineError, State};
pub use program::{
	data::{Instruction, Program, Register, Value},
	parser::{ParseError, Parser},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	#[error("syntax error at {0}")]
	Parse(#[from] ParseError),

	#[error(transparent)]
	Machine(#[from] MachineError),
}

/// Parses `source` and runs it to completion on `input`.
///
/// # Errors
///
/// Returns `Error::Parse` if the source is malformed.
/// Returns `Error::Machine` if the run fails.
pub fn evaluate(source: &str, input: &[Value]) -> Result<Value, Error> {
	let program = Parser::new().parse(source)?;

	Ok(execute(&program, input)?)
}
