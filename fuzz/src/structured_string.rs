use std::{fmt::Write, ops::Deref};

use arbitrary::{Arbitrary, Result, Unstructured};

// Keeps the register file small enough to fuzz quickly.
const MAX_REGISTER: usize = 64;

#[derive(Arbitrary)]
enum Opcode {
	Zero,
	Succ,
	Transfer,
	Jump,
}

fn add_blanks(u: &mut Unstructured, buffer: &mut String) -> Result<()> {
	let len = u.int_in_range(0..=2)?;

	for _ in 0..len {
		buffer.push(if u.arbitrary()? { ' ' } else { '\t' });
	}

	Ok(())
}

fn add_operand(u: &mut Unstructured, buffer: &mut String, max: usize) -> Result<()> {
	let value = u.int_in_range(1..=max)?;

	buffer.push(' ');
	add_blanks(u, buffer)?;

	write!(buffer, "{value}").map_err(|_| arbitrary::Error::IncorrectFormat)
}

fn add_instruction(u: &mut Unstructured, buffer: &mut String, len: usize) -> Result<()> {
	add_blanks(u, buffer)?;

	match Opcode::arbitrary(u)? {
		Opcode::Zero => {
			buffer.push('Z');
			add_operand(u, buffer, MAX_REGISTER)?;
		}
		Opcode::Succ => {
			buffer.push('S');
			add_operand(u, buffer, MAX_REGISTER)?;
		}
		Opcode::Transfer => {
			buffer.push('T');
			add_operand(u, buffer, MAX_REGISTER)?;
			add_operand(u, buffer, MAX_REGISTER)?;
		}
		Opcode::Jump => {
			buffer.push('J');
			add_operand(u, buffer, MAX_REGISTER)?;
			add_operand(u, buffer, MAX_REGISTER)?;
			// Targets may leave the program, which halts it.
			add_operand(u, buffer, len + 2)?;
		}
	}

	add_blanks(u, buffer)?;

	Ok(())
}

/// Well formed program text with occasional blank lines.
#[derive(Debug)]
pub struct StructuredString {
	content: String,
}

impl Arbitrary<'_> for StructuredString {
	fn arbitrary(u: &mut Unstructured) -> Result<Self> {
		let len = u.arbitrary_len::<Opcode>()?;
		let mut content = String::new();

		for _ in 0..len {
			if u.ratio(1, 8)? {
				content.push('\n');
			}

			add_instruction(u, &mut content, len)?;
			content.push('\n');
		}

		Ok(Self { content })
	}
}

impl Deref for StructuredString {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.content
	}
}
