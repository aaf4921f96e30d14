use std::{io::Write, path::Path};

use anyhow::Context;
use tracing::debug;

use crate::{BfError, interpreter::Interpreter, jit::{CompiledCode, Jit}, machine::Machine, scanner::TokenStream};

/// How a program gets executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
	/// Walk the token stream directly.
	#[default]
	Interpret,
	/// Compile to native code and jump into it.
	Jit,
}

/// Runner is the entry point for loading and running programs.
pub struct Runner;

impl Runner {
	/// Load the program at `path` and run it on a fresh machine.
	pub fn run_file<P: AsRef<Path>>(&self, path: P, mode: ExecutionMode) -> Result<(), BfError> {
		let program = TokenStream::load(path)?;
		self.run(&program, mode).map(|_| ())
	}

	/// Run `program` on a fresh machine with stdin and stdout attached, and
	/// hand back the machine in its final state.
	pub fn run(&self, program: &TokenStream, mode: ExecutionMode) -> Result<Machine, BfError> {
		let mut machine = Machine::new();
		debug!(?mode, "running program");
		match mode {
			ExecutionMode::Interpret => Interpreter::stdio().interpret(program, &mut machine)?,
			ExecutionMode::Jit => Jit.run(program, &mut machine)?,
		}
		Ok(machine)
	}

	/// Write a hex listing of the native code generated for the program at
	/// `path`, followed by its loop relocations. The code is generated for a
	/// tape at address zero.
	pub fn dump_file<P: AsRef<Path>, W: Write>(&self, path: P, out: &mut W) -> Result<(), BfError> {
		let program = TokenStream::load(path)?;
		let compiled = Jit.compile(&program, std::ptr::null())?;
		write_listing(&compiled, out).context("Failed write listing")?;
		Ok(())
	}
}

fn write_listing<W: Write>(compiled: &CompiledCode, out: &mut W) -> std::io::Result<()> {
	for (line, chunk) in compiled.code().chunks(16).enumerate() {
		write!(out, "{:06x}:", line * 16)?;
		for byte in chunk {
			write!(out, " {byte:02x}")?;
		}
		writeln!(out)?;
	}
	writeln!(out, "relocations: {}", compiled.relocations().len())?;
	for relocation in compiled.relocations() {
		writeln!(out, "  [ {:06x} <-> ] {:06x}", relocation.open, relocation.close)?;
	}
	out.flush()
}
