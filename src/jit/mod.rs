//! Just-in-time compilation to x86-64.
//!
//! Two phases, kept apart:
//!
//! 1. [`codegen::generate`] turns a token stream into a [`CompiledCode`]
//!    buffer. Nothing runs, the tape address is only baked in as a number.
//! 2. [`Jit::run`] maps the buffer executable, jumps into it and writes the
//!    final cursor back into the [`Machine`].
//!
//! The generated code talks to the kernel directly with `read`/`write`
//! syscalls on fds 0 and 1.

pub mod codegen;
pub mod encoding;
#[cfg(all(unix, target_arch = "x86_64"))]
pub mod memory;

pub use codegen::{CompiledCode, Relocation};

use crate::{BfError, machine::Machine, scanner::TokenStream};

/// Native compiler and runner.
pub struct Jit;

impl Jit {
	/// Generate code for `program` working on the tape at `tape`. The address
	/// is only embedded, so a null one gives a listing that is never run.
	pub fn compile(&self, program: &TokenStream, tape: *const u8) -> Result<CompiledCode, BfError> {
		Ok(codegen::generate(program, tape)?)
	}

	/// Compile `program` and run it natively against `machine`.
	#[cfg(all(unix, target_arch = "x86_64"))]
	pub fn run(&self, program: &TokenStream, machine: &mut Machine) -> Result<(), BfError> {
		use std::io::Write;

		use anyhow::Context;

		let tape = machine.tape_base() as usize;
		let compiled = codegen::generate(program, tape as *const u8)?;
		let memory = memory::ExecutableMemory::install(compiled.code())?;

		// Generated code writes to fd 1 directly, behind any buffered output.
		std::io::stdout().flush().context("Failed flush stdout")?;
		// SAFETY: the code was generated for this tape, which `machine` keeps
		// borrowed and in place until the call returns.
		let cell = unsafe { memory.enter() };
		machine.set_cursor(cell.wrapping_sub(tape));
		Ok(())
	}

	#[cfg(not(all(unix, target_arch = "x86_64")))]
	pub fn run(&self, _program: &TokenStream, _machine: &mut Machine) -> Result<(), BfError> {
		Err(BfError::UnsupportedHost)
	}
}
