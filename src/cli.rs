use std::path::PathBuf;

use palc::{Parser, Subcommand};

use crate::ExecutionMode;

#[derive(Parser)]
#[command(name = "zbfjit", after_long_help = "Set RUST_LOG=debug to see what the interpreter and compiler are doing.")]
pub struct Cli {
	#[command(subcommand)]
	pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
	/// Run a program file
	Run {
		path: PathBuf,
		/// Compile to native code instead of interpreting
		#[arg(long)]
		jit:  bool,
	},
	/// Print the native code generated for a program file
	Dump { path: PathBuf },
}

impl Mode {
	pub fn execution_mode(&self) -> ExecutionMode {
		match self {
			Mode::Run { jit: true, .. } => ExecutionMode::Jit,
			_ => ExecutionMode::Interpret,
		}
	}
}
