//! Direct execution of a token stream.
//!
//! The interpreter never recurses and never pre-computes jump targets. It
//! walks the stream once with a [`Scanner`] and keeps two pieces of state:
//!
//! - **Loop stack**: for every `[` it has passed, the offset just after it.
//!   A `]` on a non-zero cell seeks back there. The stack is bounded by
//!   [`MAX_NESTING`].
//! - **Skip depth**: when a `[` is reached on a zero cell the body still has
//!   to be scanned to find the matching `]`. While the depth is non-zero
//!   tokens are read but not executed, nested `[` deepen it and each `]`
//!   unwinds one level.
//!
//! Reaching the end of the stream halts the program, unless a loop is still
//! open there.

use std::io::{ErrorKind, Read, StdinLock, StdoutLock, Write};

use tracing::debug;

use crate::{error::interpreter::InterpreterError, machine::{EOF_CELL, MAX_NESTING, Machine}, scanner::{Scanner, Symbol::*, Token, TokenStream}, utils::BoundedStack};

/// Interpreter reading `,` from `R` and writing `.` to `W`.
pub struct Interpreter<R, W> {
	input:  R,
	output: W,
}

impl Interpreter<StdinLock<'static>, StdoutLock<'static>> {
	/// Interpreter bound to the process's stdin and stdout.
	pub fn stdio() -> Self { Self::new(std::io::stdin().lock(), std::io::stdout().lock()) }
}

impl<R: Read, W: Write> Interpreter<R, W> {
	pub fn new(input: R, output: W) -> Self { Self { input, output } }

	/// Give back the output sink, mostly for inspecting captured output.
	pub fn into_output(self) -> W { self.output }

	/// Run `program` against `machine` until the end of the stream.
	pub fn interpret(&mut self, program: &TokenStream, machine: &mut Machine) -> Result<(), InterpreterError> {
		debug!(bytes = program.len(), "interpreting program");
		let result = self.execute(program.scanner(), machine);
		self.output.flush()?;
		result
	}

	fn execute(&mut self, mut scanner: Scanner<'_>, machine: &mut Machine) -> Result<(), InterpreterError> {
		let mut loops = BoundedStack::<usize, MAX_NESTING>::new();
		let mut skip_depth = 0usize;

		while let Some(Token { symbol, count, position }) = scanner.next_token() {
			let skipping = skip_depth != 0;
			match symbol {
				Increment if !skipping => machine.increment(count),
				Decrement if !skipping => machine.decrement(count),
				Right if !skipping => machine.move_right(count),
				Left if !skipping => machine.move_left(count),
				Input if !skipping => {
					// Anything prompting for this byte has to be visible first.
					self.output.flush()?;
					let byte = self.read_byte()?;
					machine.set_cell(byte);
				}
				Output if !skipping => self.output.write_all(&[machine.cell()])?,
				LoopOpen => {
					loops
						.try_push(scanner.position())
						.map_err(|_| InterpreterError::NestingTooDeep { position, limit: MAX_NESTING })?;
					if skipping || machine.cell() == 0 {
						skip_depth += 1;
					}
				}
				LoopClose => {
					let body = loops.peek().ok_or(InterpreterError::UnmatchedClose { position })?;
					if !skipping && machine.cell() != 0 {
						scanner.seek(body);
					} else {
						loops.pop();
						skip_depth = skip_depth.saturating_sub(1);
					}
				}
				_ => {}
			}
		}
		if !loops.is_empty() {
			return Err(InterpreterError::UnmatchedOpen { count: loops.len() });
		}
		Ok(())
	}

	/// Read one byte, or [`EOF_CELL`] once the input is exhausted.
	fn read_byte(&mut self) -> Result<u8, InterpreterError> {
		let mut byte = [0u8; 1];
		loop {
			match self.input.read(&mut byte) {
				Ok(0) => return Ok(EOF_CELL),
				Ok(_) => return Ok(byte[0]),
				Err(e) if e.kind() == ErrorKind::Interrupted => {}
				Err(e) => return Err(e.into()),
			}
		}
	}
}
