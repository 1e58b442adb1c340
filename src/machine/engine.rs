use log::{debug, trace};
use thiserror::Error;

use crate::program::data::{Instruction, Program, Register, Value};

use super::registers::Registers;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
	#[error("out of memory growing the register file to {cells} cells")]
	OutOfMemory { cells: usize },

	#[error("program did not halt within {limit} steps")]
	StepLimit { limit: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
	Running,
	Halted,
}

/// A single run of a program, from the first instruction until the program
/// counter leaves the program.
pub struct Machine<'a> {
	program: &'a Program,
	registers: Registers,
	pc: usize,
	steps: u64,
}

impl<'a> Machine<'a> {
	/// Prepares a run of `program` with `input[i]` in register `i + 1`.
	///
	/// # Errors
	///
	/// Returns `MachineError::OutOfMemory` if the register file cannot hold the input.
	pub fn new(program: &'a Program, input: &[Value]) -> Result<Self, MachineError> {
		let registers = Registers::with_input(input)?;

		Ok(Self {
			program,
			registers,
			pc: 1,
			steps: 0,
		})
	}

	/// The 1-based address of the next instruction.
	#[must_use]
	pub const fn pc(&self) -> usize {
		self.pc
	}

	#[must_use]
	pub const fn steps(&self) -> u64 {
		self.steps
	}

	#[must_use]
	pub const fn registers(&self) -> &Registers {
		&self.registers
	}

	#[must_use]
	pub fn is_halted(&self) -> bool {
		self.program.fetch(self.pc).is_none()
	}

	/// The value of register 1, which holds the result once halted.
	#[must_use]
	pub fn result(&self) -> Value {
		self.registers.get(Register::RESULT)
	}

	fn apply(&mut self, instruction: Instruction) {
		let registers = &mut self.registers;

		self.pc = match instruction {
			Instruction::Zero { register } => {
				*registers.cell_mut(register) = 0;

				self.pc + 1
			}
			Instruction::Succ { register } => {
				let cell = registers.cell_mut(register);

				*cell = cell.wrapping_add(1);

				self.pc + 1
			}
			Instruction::Transfer { from, to } => {
				let value = registers.cell(from);

				*registers.cell_mut(to) = value;

				self.pc + 1
			}
			Instruction::Jump { lhs, rhs, target } => {
				if registers.cell(lhs) == registers.cell(rhs) {
					target
				} else {
					self.pc + 1
				}
			}
		};
	}

	/// Executes the instruction at the program counter. A halted machine stays
	/// halted.
	///
	/// # Errors
	///
	/// Returns `MachineError::OutOfMemory` if the register file cannot grow to
	/// cover the instruction's registers.
	pub fn step(&mut self) -> Result<State, MachineError> {
		let Some(&instruction) = self.program.fetch(self.pc) else {
			return Ok(State::Halted);
		};

		trace!("{:>6}: {instruction}", self.pc);

		self.registers.reserve(instruction.highest_register())?;
		self.apply(instruction);
		self.steps += 1;

		if self.is_halted() {
			debug!("halted at {} after {} steps", self.pc, self.steps);

			Ok(State::Halted)
		} else {
			Ok(State::Running)
		}
	}

	/// Runs until the program counter leaves the program and returns register 1.
	/// Does not return for a program that never halts.
	///
	/// # Errors
	///
	/// Returns `MachineError::OutOfMemory` if the register file cannot grow.
	pub fn run(&mut self) -> Result<Value, MachineError> {
		while self.step()? == State::Running {}

		Ok(self.result())
	}

	/// Runs like `run` but gives up once `limit` instructions were executed
	/// without halting.
	///
	/// # Errors
	///
	/// Returns `MachineError::StepLimit` if the program is still running after `limit` steps.
	/// Returns `MachineError::OutOfMemory` if the register file cannot grow.
	pub fn run_bounded(&mut self, limit: u64) -> Result<Value, MachineError> {
		while !self.is_halted() {
			if self.steps >= limit {
				return Err(MachineError::StepLimit { limit });
			}

			self.step()?;
		}

		Ok(self.result())
	}
}

/// Runs `program` to completion on `input` and returns register 1.
///
/// # Errors
///
/// Returns `MachineError::OutOfMemory` if the register file cannot grow.
pub fn execute(program: &Program, input: &[Value]) -> Result<Value, MachineError> {
	Machine::new(program, input)?.run()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::machine::registers::INITIAL_CAPACITY;

	fn program(source: &str) -> Program {
		source.parse().unwrap()
	}

	#[test]
	fn succ_counts_up() {
		assert_eq!(execute(&program("Z 1\nS 1\nS 1\n"), &[]), Ok(2));
	}

	#[test]
	fn unterminated_final_line() {
		assert_eq!(execute(&program("S 1"), &[5]), Ok(6));
	}

	#[test]
	fn empty_program_returns_first_input() {
		assert_eq!(execute(&program(""), &[9, 4]), Ok(9));
		assert_eq!(execute(&program(""), &[]), Ok(0));
	}

	#[test]
	fn jump_past_the_end_halts() {
		let code = program("J 1 2 4\nS 1\nJ 1 2 4\nT 1 1\n");
		let mut machine = Machine::new(&code, &[3, 3]).unwrap();

		assert_eq!(machine.step(), Ok(State::Running));
		assert_eq!(machine.pc(), 4);
		assert_eq!(machine.step(), Ok(State::Halted));
		assert_eq!(machine.pc(), 5);
		assert_eq!(machine.result(), 3);
	}

	#[test]
	fn jump_to_zero_halts() {
		let code = program("S 2\nJ 1 1 0\nS 1\n");
		let mut machine = Machine::new(&code, &[7]).unwrap();

		assert_eq!(machine.run(), Ok(7));
		assert_eq!(machine.pc(), 0);
		assert_eq!(machine.steps(), 2);
		assert_eq!(machine.registers().get(Register::new(2).unwrap()), 1);
	}

	#[test]
	fn unequal_jump_falls_through() {
		assert_eq!(execute(&program("J 1 2 9\nS 1\n"), &[1, 2]), Ok(2));
	}

	#[test]
	fn transfer_copies() {
		let code = program("T 2 1\n");
		let mut machine = Machine::new(&code, &[1, 8]).unwrap();

		assert_eq!(machine.run(), Ok(8));
		assert_eq!(machine.registers().get(Register::new(2).unwrap()), 8);
	}

	#[test]
	fn addition() {
		// R1 + R2, counting R3 up to R2.
		let code = program("J 2 3 5\nS 1\nS 3\nJ 1 1 1\n");

		assert_eq!(execute(&code, &[3, 4]), Ok(7));
		assert_eq!(execute(&code, &[0, 0]), Ok(0));
		assert_eq!(execute(&code, &[10, 0]), Ok(10));
	}

	#[test]
	fn far_registers_grow_the_file() {
		let code = program("S 5000\nS 5000\nT 5000 1\n");
		let mut machine = Machine::new(&code, &[1, 2, 3]).unwrap();

		assert_eq!(machine.run(), Ok(2));
		assert_eq!(machine.registers().capacity(), 8192);
		assert_eq!(machine.registers().get(Register::new(2).unwrap()), 2);
		assert_eq!(machine.registers().get(Register::new(3).unwrap()), 3);
	}

	#[test]
	fn registers_past_the_file_read_as_zero() {
		let code = program("S 1\n");
		let mut machine = Machine::new(&code, &[]).unwrap();

		assert_eq!(machine.run(), Ok(1));

		let far = Register::new(INITIAL_CAPACITY + 44).unwrap();

		assert_eq!(machine.registers().capacity(), INITIAL_CAPACITY);
		assert_eq!(machine.registers().get(far), 0);
	}

	#[test]
	fn halted_machine_does_not_resume() {
		let code = program("S 1\n");
		let mut machine = Machine::new(&code, &[]).unwrap();

		assert_eq!(machine.run(), Ok(1));
		assert_eq!(machine.step(), Ok(State::Halted));
		assert_eq!(machine.run(), Ok(1));
		assert_eq!(machine.steps(), 1);
	}

	#[test]
	fn succ_wraps() {
		assert_eq!(execute(&program("S 1"), &[Value::MAX]), Ok(0));
	}

	#[test]
	fn bounded_run_stops_infinite_loops() {
		let code = program("J 1 1 1\n");
		let mut machine = Machine::new(&code, &[]).unwrap();

		assert_eq!(machine.run_bounded(100), Err(MachineError::StepLimit { limit: 100 }));
		assert_eq!(machine.steps(), 100);
	}

	#[test]
	fn bounded_run_allows_exact_step_count() {
		let code = program("S 1\nS 1\nS 1\n");
		let mut machine = Machine::new(&code, &[]).unwrap();

		assert_eq!(machine.run_bounded(3), Ok(3));
	}
}
