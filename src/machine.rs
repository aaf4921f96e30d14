//! The abstract tape machine shared by both execution strategies.
//!
//! A [`Machine`] pairs a fixed-size tape of byte cells with a cursor. It is
//! constructed by the caller and lent mutably to the interpreter or the JIT,
//! there is no process-wide instance.
//!
//! Cursor movement wraps around both ends of the tape.

/// Number of cells on the tape.
pub const TAPE_SIZE: usize = 30000;

/// Value stored by `,` once input is exhausted.
pub const EOF_CELL: u8 = u8::MAX;

/// Deepest loop nesting accepted by either execution strategy.
pub const MAX_NESTING: usize = 100;

/// Tape plus cursor.
///
/// The tape is boxed so its address stays put while generated code holds a
/// raw pointer into it.
pub struct Machine {
	tape:   Box<[u8; TAPE_SIZE]>,
	cursor: usize,
}

impl Default for Machine {
	fn default() -> Self { Self::new() }
}

impl Machine {
	pub fn new() -> Self { Self { tape: Box::new([0; TAPE_SIZE]), cursor: 0 } }

	/// Zero every cell and put the cursor back on the first one.
	pub fn initialize(&mut self) {
		self.tape.fill(0);
		self.cursor = 0;
	}

	pub fn tape(&self) -> &[u8; TAPE_SIZE] { &self.tape }

	pub fn cursor(&self) -> usize { self.cursor }

	/// Value of the cell under the cursor.
	pub fn cell(&self) -> u8 { self.tape[self.cursor] }

	pub(crate) fn set_cell(&mut self, value: u8) { self.tape[self.cursor] = value; }

	/// Add `n` to the current cell, wrapping modulo 256.
	pub(crate) fn increment(&mut self, n: usize) {
		let cell = &mut self.tape[self.cursor];
		*cell = cell.wrapping_add((n % 256) as u8);
	}

	/// Subtract `n` from the current cell, wrapping modulo 256.
	pub(crate) fn decrement(&mut self, n: usize) {
		let cell = &mut self.tape[self.cursor];
		*cell = cell.wrapping_sub((n % 256) as u8);
	}

	pub(crate) fn move_right(&mut self, n: usize) { self.cursor = (self.cursor + n % TAPE_SIZE) % TAPE_SIZE; }

	pub(crate) fn move_left(&mut self, n: usize) {
		self.cursor = (self.cursor + TAPE_SIZE - n % TAPE_SIZE) % TAPE_SIZE;
	}

	/// Address of the first cell, materialized into generated code.
	pub(crate) fn tape_base(&mut self) -> *mut u8 { self.tape.as_mut_ptr() }

	/// Reposition the cursor after native code ran. Out of range values are
	/// folded back onto the tape.
	pub(crate) fn set_cursor(&mut self, cursor: usize) { self.cursor = cursor % TAPE_SIZE; }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_zeroed() {
		let machine = Machine::new();
		assert_eq!(machine.cursor(), 0);
		assert!(machine.tape().iter().all(|&c| c == 0));
	}

	#[test]
	fn initialize_resets_state() {
		let mut machine = Machine::new();
		machine.move_right(17);
		machine.increment(5);
		machine.initialize();
		assert_eq!(machine.cursor(), 0);
		assert_eq!(machine.tape()[17], 0);
	}

	#[test]
	fn cell_arithmetic_wraps() {
		let mut machine = Machine::new();
		machine.decrement(1);
		assert_eq!(machine.cell(), 255);
		machine.increment(257);
		assert_eq!(machine.cell(), 0);
		machine.increment(1000);
		assert_eq!(machine.cell(), (1000 % 256) as u8);
	}

	#[test]
	fn cursor_wraps_at_both_ends() {
		let mut machine = Machine::new();
		machine.move_left(1);
		assert_eq!(machine.cursor(), TAPE_SIZE - 1);
		machine.move_right(2);
		assert_eq!(machine.cursor(), 1);
		machine.move_right(TAPE_SIZE * 3);
		assert_eq!(machine.cursor(), 1);
	}
}
