use std::{iter::Peekable, str::Chars, str::FromStr};

use log::debug;
use thiserror::Error;

use super::data::{Instruction, Program, Register};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
	#[error("{line}:{column}: unknown instruction `{found}`")]
	UnknownOpcode {
		line: usize,
		column: usize,
		found: char,
	},

	#[error("{line}:{column}: expected a number")]
	MissingOperand { line: usize, column: usize },

	#[error("{line}:{column}: register 0 does not exist")]
	InvalidOperand { line: usize, column: usize },

	#[error("{line}:{column}: expected end of line, found `{found}`")]
	TrailingContent {
		line: usize,
		column: usize,
		found: char,
	},
}

// Any whitespace but the line feed, which separates instructions.
const fn is_blank(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\r' | '\x0b' | '\x0c')
}

struct Cursor<'a> {
	chars: Peekable<Chars<'a>>,
	line: usize,
	column: usize,
}

impl<'a> Cursor<'a> {
	fn new(source: &'a str) -> Self {
		Self {
			chars: source.chars().peekable(),
			line: 1,
			column: 1,
		}
	}

	fn peek(&mut self) -> Option<char> {
		self.chars.peek().copied()
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.chars.next()?;

		if c == '\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}

		Some(c)
	}

	fn skip_blanks(&mut self) {
		while self.peek().is_some_and(is_blank) {
			self.bump();
		}
	}
}

#[derive(Default)]
pub struct Parser {
	code: Vec<Instruction>,
}

impl Parser {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	fn parse_number(cursor: &mut Cursor) -> Result<usize, ParseError> {
		cursor.skip_blanks();

		let (line, column) = (cursor.line, cursor.column);
		let mut value: Option<usize> = None;

		while let Some(digit) = cursor.peek().and_then(|c| c.to_digit(10)) {
			cursor.bump();

			let total = value.unwrap_or_default();

			value = Some(total.wrapping_mul(10).wrapping_add(digit as usize));
		}

		value.ok_or(ParseError::MissingOperand { line, column })
	}

	fn parse_register(cursor: &mut Cursor) -> Result<Register, ParseError> {
		cursor.skip_blanks();

		let (line, column) = (cursor.line, cursor.column);
		let index = Self::parse_number(cursor)?;

		Register::new(index).ok_or(ParseError::InvalidOperand { line, column })
	}

	fn parse_instruction(cursor: &mut Cursor, opcode: char) -> Result<Instruction, ParseError> {
		let instruction = match opcode {
			'Z' => Instruction::Zero {
				register: Self::parse_register(cursor)?,
			},
			'S' => Instruction::Succ {
				register: Self::parse_register(cursor)?,
			},
			'T' => Instruction::Transfer {
				from: Self::parse_register(cursor)?,
				to: Self::parse_register(cursor)?,
			},
			'J' => Instruction::Jump {
				lhs: Self::parse_register(cursor)?,
				rhs: Self::parse_register(cursor)?,
				target: Self::parse_number(cursor)?,
			},
			found => {
				return Err(ParseError::UnknownOpcode {
					line: cursor.line,
					column: cursor.column - 1,
					found,
				})
			}
		};

		Ok(instruction)
	}

	fn parse_line_end(cursor: &mut Cursor) -> Result<(), ParseError> {
		cursor.skip_blanks();

		match cursor.peek() {
			None => Ok(()),
			Some('\n') => {
				cursor.bump();

				Ok(())
			}
			Some(found) => Err(ParseError::TrailingContent {
				line: cursor.line,
				column: cursor.column,
				found,
			}),
		}
	}

	fn parse_line(&mut self, cursor: &mut Cursor) -> Result<(), ParseError> {
		cursor.skip_blanks();

		let Some(opcode) = cursor.bump() else {
			return Ok(());
		};

		if opcode == '\n' {
			return Ok(());
		}

		let instruction = Self::parse_instruction(cursor, opcode)?;

		self.code.push(instruction);

		Self::parse_line_end(cursor)
	}

	/// Parses `source` into a program with one instruction per non-blank line.
	///
	/// # Errors
	///
	/// Returns `ParseError::UnknownOpcode` if a line starts with anything but `Z`, `S`, `T` or `J`.
	/// Returns `ParseError::MissingOperand` if an instruction has fewer operands than it requires.
	/// Returns `ParseError::InvalidOperand` if an instruction addresses register 0.
	/// Returns `ParseError::TrailingContent` if a line continues after its last operand.
	pub fn parse(&mut self, source: &str) -> Result<Program, ParseError> {
		// Leftovers from a failed run must not leak into this one.
		self.code.clear();

		let mut cursor = Cursor::new(source);

		while cursor.peek().is_some() {
			self.parse_line(&mut cursor)?;
		}

		let code = std::mem::take(&mut self.code);

		debug!("parsed {} instructions", code.len());

		Ok(code.into())
	}
}

impl FromStr for Program {
	type Err = ParseError;

	fn from_str(source: &str) -> Result<Self, Self::Err> {
		Parser::new().parse(source)
	}
}
