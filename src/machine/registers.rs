use log::debug;

use crate::program::data::{Register, Value};

use super::engine::MachineError;

/// Cells allocated before any register is addressed.
pub const INITIAL_CAPACITY: usize = 256;

/// A zero-initialized register file that grows on demand. Registers that were
/// never reserved read as 0.
#[derive(Debug, Clone)]
pub struct Registers {
	cells: Vec<Value>,
}

impl Registers {
	/// # Errors
	///
	/// Returns `MachineError::OutOfMemory` if the initial cells cannot be allocated.
	pub fn new() -> Result<Self, MachineError> {
		let mut registers = Self { cells: Vec::new() };

		registers.grow_to(INITIAL_CAPACITY)?;

		Ok(registers)
	}

	/// Creates a register file holding `input[i]` in register `i + 1`.
	///
	/// # Errors
	///
	/// Returns `MachineError::OutOfMemory` if the input does not fit in memory.
	pub fn with_input(input: &[Value]) -> Result<Self, MachineError> {
		let mut registers = Self::new()?;

		if let Some(last) = Register::new(input.len()) {
			registers.reserve(last)?;
		}

		registers.cells[..input.len()].copy_from_slice(input);

		Ok(registers)
	}

	#[must_use]
	pub fn capacity(&self) -> usize {
		self.cells.len()
	}

	#[must_use]
	pub fn as_slice(&self) -> &[Value] {
		&self.cells
	}

	#[must_use]
	pub fn get(&self, register: Register) -> Value {
		self.cells.get(register.offset()).copied().unwrap_or_default()
	}

	// The register must have been reserved.
	pub(crate) fn cell(&self, register: Register) -> Value {
		self.cells[register.offset()]
	}

	pub(crate) fn cell_mut(&mut self, register: Register) -> &mut Value {
		&mut self.cells[register.offset()]
	}

	fn grow_to(&mut self, capacity: usize) -> Result<(), MachineError> {
		let additional = capacity - self.cells.len();

		self.cells
			.try_reserve_exact(additional)
			.map_err(|_| MachineError::OutOfMemory { cells: capacity })?;

		self.cells.resize(capacity, 0);

		Ok(())
	}

	/// Makes `register` and every register below it addressable, doubling the
	/// capacity until it is large enough. Existing values are kept and new
	/// cells hold 0.
	///
	/// # Errors
	///
	/// Returns `MachineError::OutOfMemory` if the cells cannot be allocated.
	pub fn reserve(&mut self, register: Register) -> Result<(), MachineError> {
		let needed = register.index();

		if needed <= self.cells.len() {
			return Ok(());
		}

		let mut capacity = self.cells.len().max(1);

		while capacity < needed {
			capacity = capacity
				.checked_mul(2)
				.ok_or(MachineError::OutOfMemory { cells: needed })?;
		}

		debug!("growing register file from {} to {capacity} cells", self.cells.len());

		self.grow_to(capacity)
	}
}
