/// Errors found while generating native code. They are raised before the
/// offending jump is patched, so a partial buffer is never left corrupted.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CodegenError {
	#[error("offset {position}: unmatched ']'")]
	UnmatchedClose { position: usize },
	#[error("{count} unmatched '['")]
	UnmatchedOpen { count: usize },
	#[error("offset {position}: loops nested deeper than {limit}")]
	NestingTooDeep { position: usize, limit: usize },
	/// A jump does not fit a 32-bit displacement
	#[error("offset {position}: jump displacement out of range")]
	DisplacementOverflow { position: usize },
}
