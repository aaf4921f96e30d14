//! Executable memory and the jump into it.
//!
//! Generated code is not a function: it is entered with a jump and leaves
//! with one. The calling convention is
//!
//! 1. the host saves `rbx`, pushes the address it wants to resume at and
//!    jumps to the start of the region;
//! 2. the code may clobber `rax rcx rdx rsi rdi r11 r12 r13` and leaves the
//!    final cell address in `rbx`;
//! 3. the epilogue pops the resume address into `rax` and jumps to it;
//! 4. the host reads `rbx` and restores it.

use std::{io, ptr::{self, NonNull}};

use tracing::debug;

use crate::error::memory::MemoryError;

/// An anonymous private mapping that is readable, writable and executable,
/// holding a copy of a code buffer. Unmapped on drop.
pub struct ExecutableMemory {
	ptr: NonNull<u8>,
	len: usize,
}

impl ExecutableMemory {
	/// Map enough whole pages for `code` and copy it in.
	pub fn install(code: &[u8]) -> Result<Self, MemoryError> {
		if code.is_empty() {
			return Err(MemoryError::EmptyCode);
		}
		let len = round_to_pages(code.len(), page_size());
		let mapped = unsafe {
			libc::mmap(
				ptr::null_mut(),
				len,
				libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC,
				libc::MAP_PRIVATE | libc::MAP_ANON,
				-1,
				0,
			)
		};
		if mapped == libc::MAP_FAILED {
			return Err(MemoryError::MapFailed(io::Error::last_os_error()));
		}
		let ptr = NonNull::new(mapped.cast::<u8>()).ok_or_else(|| MemoryError::MapFailed(io::Error::other("mmap returned null")))?;
		unsafe { ptr::copy_nonoverlapping(code.as_ptr(), ptr.as_ptr(), code.len()) };
		debug!(code = code.len(), mapped = len, "installed executable memory");
		Ok(Self { ptr, len })
	}

	/// The whole mapping, a whole number of pages.
	#[cfg(test)]
	fn as_slice(&self) -> &[u8] { unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) } }

	/// Jump into the region and return the value of `rbx` once it jumps back.
	///
	/// # Safety
	///
	/// The region must hold code that follows the module's calling convention,
	/// and every address it touches must be valid for the whole run.
	pub unsafe fn enter(&self) -> usize {
		let entry = self.ptr.as_ptr() as usize;
		let cell: usize;
		unsafe {
			std::arch::asm!(
				"push rbx",
				"lea rax, [rip + 2f]",
				"push rax",
				"jmp rcx",
				"2:",
				"mov rcx, rbx",
				"pop rbx",
				inout("rcx") entry => cell,
				out("rax") _,
				out("rdx") _,
				out("rsi") _,
				out("rdi") _,
				out("r11") _,
				out("r12") _,
				out("r13") _,
			);
		}
		cell
	}
}

impl Drop for ExecutableMemory {
	fn drop(&mut self) {
		unsafe { libc::munmap(self.ptr.as_ptr().cast(), self.len) };
	}
}

fn page_size() -> usize {
	match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
		size if size > 0 => size as usize,
		_ => 4096,
	}
}

/// Smallest multiple of `page` that holds `len` bytes.
fn round_to_pages(len: usize, page: usize) -> usize { len.div_ceil(page) * page }
