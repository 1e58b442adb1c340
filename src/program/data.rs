use std::{
	fmt::{Display, Formatter, Result},
	num::NonZeroUsize,
};

/// The content of a single register.
pub type Value = u64;

/// A 1-based register index. Index 0 does not name a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register {
	index: NonZeroUsize,
}

impl Register {
	/// The register holding the result of a run.
	pub const RESULT: Self = Self {
		index: NonZeroUsize::MIN,
	};

	#[must_use]
	pub const fn new(index: usize) -> Option<Self> {
		match NonZeroUsize::new(index) {
			Some(index) => Some(Self { index }),
			None => None,
		}
	}

	#[must_use]
	pub const fn index(self) -> usize {
		self.index.get()
	}

	/// Position of the register in 0-based storage.
	#[must_use]
	pub const fn offset(self) -> usize {
		self.index.get() - 1
	}
}

impl Display for Register {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result {
		self.index.fmt(f)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
	Zero {
		register: Register,
	},

	Succ {
		register: Register,
	},

	Transfer {
		from: Register,
		to: Register,
	},

	/// Continues at `target` when both registers hold the same value. Any
	/// target outside the program halts the machine.
	Jump {
		lhs: Register,
		rhs: Register,
		target: usize,
	},
}

impl Instruction {
	/// The highest register the instruction may address.
	#[must_use]
	pub fn highest_register(&self) -> Register {
		match *self {
			Self::Zero { register } | Self::Succ { register } => register,
			Self::Transfer { from, to } => from.max(to),
			Self::Jump { lhs, rhs, .. } => lhs.max(rhs),
		}
	}

	#[must_use]
	pub const fn opcode(&self) -> char {
		match self {
			Self::Zero { .. } => 'Z',
			Self::Succ { .. } => 'S',
			Self::Transfer { .. } => 'T',
			Self::Jump { .. } => 'J',
		}
	}
}

impl Display for Instruction {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result {
		let opcode = self.opcode();

		match self {
			Self::Zero { register } | Self::Succ { register } => write!(f, "{opcode} {register}"),
			Self::Transfer { from, to } => write!(f, "{opcode} {from} {to}"),
			Self::Jump { lhs, rhs, target } => write!(f, "{opcode} {lhs} {rhs} {target}"),
		}
	}
}

/// An immutable instruction sequence, addressed from 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
	code: Box<[Instruction]>,
}

impl Program {
	#[must_use]
	pub const fn new(code: Box<[Instruction]>) -> Self {
		Self { code }
	}

	#[must_use]
	pub fn instructions(&self) -> &[Instruction] {
		&self.code
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.code.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.code.is_empty()
	}

	/// Returns the instruction at the 1-based address `pc`, or `None` if the
	/// address is outside the program.
	#[must_use]
	pub fn fetch(&self, pc: usize) -> Option<&Instruction> {
		self.code.get(pc.checked_sub(1)?)
	}

	/// The highest register addressed anywhere in the program.
	#[must_use]
	pub fn highest_register(&self) -> Option<Register> {
		self.code.iter().map(Instruction::highest_register).max()
	}
}

impl From<Vec<Instruction>> for Program {
	fn from(code: Vec<Instruction>) -> Self {
		Self::new(code.into_boxed_slice())
	}
}

impl Display for Program {
	fn fmt(&self, f: &mut Formatter<'_>) -> Result {
		self.code.iter().try_for_each(|insn| writeln!(f, "{insn}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn reg(index: usize) -> Register {
		Register::new(index).unwrap()
	}

	#[test]
	fn register_zero_is_not_representable() {
		assert_eq!(Register::new(0), None);
		assert_eq!(reg(1), Register::RESULT);
		assert_eq!(reg(7).offset(), 6);
	}

	#[test]
	fn fetch_is_one_based() {
		let program = Program::from(vec![
			Instruction::Zero { register: reg(1) },
			Instruction::Succ { register: reg(2) },
		]);

		assert_eq!(program.fetch(0), None);
		assert_eq!(program.fetch(1), Some(&Instruction::Zero { register: reg(1) }));
		assert_eq!(program.fetch(2), Some(&Instruction::Succ { register: reg(2) }));
		assert_eq!(program.fetch(3), None);
		assert_eq!(program.fetch(usize::MAX), None);
	}

	#[test]
	fn highest_register_covers_every_operand() {
		let jump = Instruction::Jump {
			lhs: reg(3),
			rhs: reg(9),
			target: 100,
		};
		let transfer = Instruction::Transfer {
			from: reg(12),
			to: reg(4),
		};

		assert_eq!(jump.highest_register(), reg(9));
		assert_eq!(transfer.highest_register(), reg(12));

		let program = Program::from(vec![jump, transfer]);

		assert_eq!(program.highest_register(), Some(reg(12)));
		assert_eq!(Program::default().highest_register(), None);
	}

	#[test]
	fn display_uses_source_form() {
		let program = Program::from(vec![
			Instruction::Zero { register: reg(1) },
			Instruction::Transfer {
				from: reg(2),
				to: reg(3),
			},
			Instruction::Jump {
				lhs: reg(1),
				rhs: reg(2),
				target: 0,
			},
		]);

		assert_eq!(program.to_string(), "Z 1\nT 2 3\nJ 1 2 0\n");
	}
}
