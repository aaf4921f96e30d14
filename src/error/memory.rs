/// Errors from mapping executable memory.
#[derive(thiserror::Error, Debug)]
pub enum MemoryError {
	#[error("refusing to map an empty code buffer")]
	EmptyCode,
	#[error("mmap failed: {0}")]
	MapFailed(#[source] std::io::Error),
}
