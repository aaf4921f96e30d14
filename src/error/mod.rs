pub mod codegen;
pub mod interpreter;
pub mod memory;

/// BfError is the top-level error type for running a program.
#[derive(thiserror::Error, Debug)]
pub enum BfError {
	/// Host failure outside the machine, such as an unreadable program file
	#[error("{0:#}")]
	InternalError(#[from] anyhow::Error),
	/// The interpreter rejected or failed to run the program
	#[error("Interpreter error: {0}")]
	InterpreterError(#[from] interpreter::InterpreterError),
	/// Native code could not be generated for the program
	#[error("Codegen error: {0}")]
	CodegenError(#[from] codegen::CodegenError),
	/// Executable memory could not be set up
	#[error("Executable memory error: {0}")]
	MemoryError(#[from] memory::MemoryError),
	/// The JIT only targets x86-64 Unix hosts
	#[error("JIT compilation is not supported on this host")]
	UnsupportedHost,
}
