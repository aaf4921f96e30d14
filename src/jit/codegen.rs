//! Native code generation.
//!
//! Generation is a pure function of the token stream and the tape address:
//! it only appends to a byte buffer and never executes anything. The buffer
//! is laid out as
//!
//! ``` text
//! preamble   mov rbx, tape ; mov r12, tape ; mov r13, tape + TAPE_SIZE
//! body       one instruction group per collapsed token
//! epilogue   pop rax ; jmp rax
//! ```
//!
//! # Loop relocation
//!
//! A `[` is emitted as `cmp byte [rbx], 0 ; je rel32` with a zero
//! displacement, and the offset just past that displacement is pushed on the
//! loop stack. The matching `]` is emitted as `cmp byte [rbx], 0 ; jne rel32`,
//! then both displacements are patched in place: the `jne` goes back to just
//! after the `je`, the `je` goes forward to just after the `jne`. Both jumps
//! are relative to the end of their own instruction, so the two values are
//! negatives of each other.
//!
//! # Close chains
//!
//! When a `]` falls through the cell is zero, and it stays zero through any
//! `]` directly following it. So after a `]` that is followed by `k` more,
//! an unconditional jump skips their `k` compare-and-branch pairs (and the
//! `k - 1` jumps emitted for them).

use tracing::{debug, trace};

use super::encoding::{CELL, Condition, FD_STDIN, FD_STDOUT, Instruction::{self, *}, Reg, SYS_READ, SYS_WRITE, TAPE_END, TAPE_START, encode_all};
use crate::{error::codegen::CodegenError, machine::{EOF_CELL, MAX_NESTING, TAPE_SIZE}, scanner::{Scanner, Symbol, Token, TokenStream}, utils::BoundedStack};

/// A patched loop: offsets just past the `je` of `[` and the `jne` of `]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
	pub open:  usize,
	pub close: usize,
}

/// Finished code buffer together with the loop jumps that were patched in it.
#[derive(Debug, Clone)]
pub struct CompiledCode {
	code:        Vec<u8>,
	relocations: Vec<Relocation>,
}

impl CompiledCode {
	pub fn code(&self) -> &[u8] { &self.code }

	pub fn relocations(&self) -> &[Relocation] { &self.relocations }
}

/// Generate native code for `program` operating on the tape at `tape`.
pub fn generate(program: &TokenStream, tape: *const u8) -> Result<CompiledCode, CodegenError> {
	let generator = CodeGenerator::new(program.scanner(), tape as u64);
	let compiled = generator.run()?;
	debug!(bytes = compiled.code.len(), loops = compiled.relocations.len(), "generated native code");
	Ok(compiled)
}

struct CodeGenerator<'a> {
	scanner:     Scanner<'a>,
	tape:        u64,
	code:        Vec<u8>,
	/// Offsets just past each unresolved `je`.
	loops:       BoundedStack<usize, MAX_NESTING>,
	relocations: Vec<Relocation>,
}

impl<'a> CodeGenerator<'a> {
	fn new(scanner: Scanner<'a>, tape: u64) -> Self {
		Self { scanner, tape, code: Vec::new(), loops: BoundedStack::new(), relocations: Vec::new() }
	}

	fn run(mut self) -> Result<CompiledCode, CodegenError> {
		self.emit(&[MovImm64(CELL, self.tape), MovImm64(TAPE_START, self.tape), MovImm64(TAPE_END, self.tape + TAPE_SIZE as u64)]);

		while let Some(token) = self.scanner.next_token() {
			self.token(token)?;
		}
		if !self.loops.is_empty() {
			return Err(CodegenError::UnmatchedOpen { count: self.loops.len() });
		}

		self.emit(&[Pop(Reg::Rax), JumpReg(Reg::Rax)]);
		Ok(CompiledCode { code: self.code, relocations: self.relocations })
	}

	fn emit(&mut self, instructions: &[Instruction]) { encode_all(&mut self.code, instructions); }

	fn token(&mut self, Token { symbol, count, position }: Token) -> Result<(), CodegenError> {
		match symbol {
			Symbol::Increment => {
				let n = (count % 256) as u8;
				if n != 0 {
					self.emit(&[AddCell(n)]);
				}
			}
			Symbol::Decrement => {
				let n = (count % 256) as u8;
				if n != 0 {
					self.emit(&[SubCell(n)]);
				}
			}
			Symbol::Right => {
				let n = (count % TAPE_SIZE) as u32;
				if n != 0 {
					// Past the end: pull back by one tape length.
					let wrap = SubPtr(TAPE_SIZE as u32);
					self.emit(&[AddPtr(n), CmpPtr(TAPE_END), JumpShort(Condition::Below, wrap.encoded_len() as i8), wrap]);
				}
			}
			Symbol::Left => {
				let n = (count % TAPE_SIZE) as u32;
				if n != 0 {
					let wrap = AddPtr(TAPE_SIZE as u32);
					self.emit(&[SubPtr(n), CmpPtr(TAPE_START), JumpShort(Condition::AboveOrEqual, wrap.encoded_len() as i8), wrap]);
				}
			}
			Symbol::Input => {
				self.syscall(SYS_READ, FD_STDIN);
				// read returns 0 at end of input and a negative errno on failure.
				let eof = StoreCell(EOF_CELL);
				self.emit(&[Test32(Reg::Rax), JumpShort(Condition::Greater, eof.encoded_len() as i8), eof]);
			}
			Symbol::Output => self.syscall(SYS_WRITE, FD_STDOUT),
			Symbol::LoopOpen => self.loop_open(position)?,
			Symbol::LoopClose => self.loop_close(position)?,
		}
		Ok(())
	}

	/// `number(fd, rbx, 1)`
	fn syscall(&mut self, number: u32, fd: u32) {
		self.emit(&[
			MovImm32(Reg::Rax, number),
			MovImm32(Reg::Rdi, fd),
			MovReg { dst: Reg::Rsi, src: CELL },
			MovImm32(Reg::Rdx, 1),
			Syscall,
		]);
	}

	fn loop_open(&mut self, position: usize) -> Result<(), CodegenError> {
		self.emit(&[CmpCell(0), JumpNear(Condition::Equal, 0)]);
		self
			.loops
			.try_push(self.code.len())
			.map_err(|_| CodegenError::NestingTooDeep { position, limit: MAX_NESTING })
	}

	fn loop_close(&mut self, position: usize) -> Result<(), CodegenError> {
		let open = self.loops.pop().ok_or(CodegenError::UnmatchedClose { position })?;
		self.emit(&[CmpCell(0), JumpNear(Condition::NotEqual, 0)]);
		let close = self.code.len();

		let forward = i32::try_from(close - open).map_err(|_| CodegenError::DisplacementOverflow { position })?;
		patch_rel32(&mut self.code, close, -forward);
		patch_rel32(&mut self.code, open, forward);
		trace!(open, close, "patched loop");
		self.relocations.push(Relocation { open, close });

		let following = self.scanner.count_ahead(b']');
		if following > 0 {
			let pair = CmpCell(0).encoded_len() + JumpNear(Condition::NotEqual, 0).encoded_len();
			let skip = following * pair + (following - 1) * Jump(0).encoded_len();
			let skip = i32::try_from(skip).map_err(|_| CodegenError::DisplacementOverflow { position })?;
			self.emit(&[Jump(skip)]);
		}
		Ok(())
	}
}

/// Overwrite the rel32 displacement that ends at `end`.
fn patch_rel32(code: &mut [u8], end: usize, rel: i32) { code[end - 4..end].copy_from_slice(&rel.to_le_bytes()); }
