/// Errors that stop the interpreter.
#[derive(thiserror::Error, Debug)]
pub enum InterpreterError {
	/// A `]` with no open loop
	#[error("offset {position}: unmatched ']'")]
	UnmatchedClose { position: usize },
	/// The stream ended inside `count` loops
	#[error("{count} unmatched '['")]
	UnmatchedOpen { count: usize },
	/// Loops nested deeper than the machine allows
	#[error("offset {position}: loops nested deeper than {limit}")]
	NestingTooDeep { position: usize, limit: usize },
	/// Reading stdin or writing stdout failed
	#[error("I/O failure: {0}")]
	Io(#[from] std::io::Error),
}
