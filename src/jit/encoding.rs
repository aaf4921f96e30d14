//! x86-64 instruction table.
//!
//! Generated code is built only from the [`Instruction`]s below, each of which
//! knows its own opcode bytes. The generator never writes literal bytes, and
//! the lengths it needs for jump arithmetic come from encoding the same
//! instructions.
//!
//! Register roles inside generated code:
//!
//! | register | role |
//! |---|---|
//! | `rbx` | address of the current cell |
//! | `r12` | address of the first cell |
//! | `r13` | address one past the last cell |
//! | `rax` `rdi` `rsi` `rdx` | syscall arguments, scratch |

/// Syscall numbers of the host kernel.
#[cfg(target_os = "macos")]
pub const SYS_READ: u32 = 0x200_0003;
#[cfg(target_os = "macos")]
pub const SYS_WRITE: u32 = 0x200_0004;
#[cfg(not(target_os = "macos"))]
pub const SYS_READ: u32 = 0;
#[cfg(not(target_os = "macos"))]
pub const SYS_WRITE: u32 = 1;

pub const FD_STDIN: u32 = 0;
pub const FD_STDOUT: u32 = 1;

/// General purpose registers by hardware number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
	Rax = 0,
	Rdx = 2,
	Rbx = 3,
	Rsi = 6,
	Rdi = 7,
	R12 = 12,
	R13 = 13,
}

impl Reg {
	/// Low three bits, as placed in ModRM or the opcode.
	fn low(self) -> u8 { self as u8 & 0b111 }

	/// Whether the register needs a REX extension bit.
	fn extended(self) -> bool { self as u8 >= 8 }
}

/// Register holding the current cell's address.
pub const CELL: Reg = Reg::Rbx;
/// Register holding the tape's first cell address.
pub const TAPE_START: Reg = Reg::R12;
/// Register holding the address one past the tape.
pub const TAPE_END: Reg = Reg::R13;

/// Condition codes, the low nibble of `Jcc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
	Below = 0x2,
	AboveOrEqual = 0x3,
	Equal = 0x4,
	NotEqual = 0x5,
	Greater = 0xF,
}

/// Every instruction the generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
	/// `mov reg, imm64`
	MovImm64(Reg, u64),
	/// `mov reg32, imm32`, zero-extending
	MovImm32(Reg, u32),
	/// `mov dst, src`
	MovReg { dst: Reg, src: Reg },
	/// `add byte [rbx], imm8`
	AddCell(u8),
	/// `sub byte [rbx], imm8`
	SubCell(u8),
	/// `mov byte [rbx], imm8`
	StoreCell(u8),
	/// `cmp byte [rbx], imm8`
	CmpCell(u8),
	/// `add rbx, imm`, 8-bit form when the immediate fits a signed byte
	AddPtr(u32),
	/// `sub rbx, imm`, 8-bit form when the immediate fits a signed byte
	SubPtr(u32),
	/// `cmp rbx, reg`
	CmpPtr(Reg),
	/// `test reg32, reg32`
	Test32(Reg),
	Syscall,
	/// `jcc rel8`
	JumpShort(Condition, i8),
	/// `jcc rel32`
	JumpNear(Condition, i32),
	/// `jmp rel32`
	Jump(i32),
	/// `pop reg`
	Pop(Reg),
	/// `jmp reg`
	JumpReg(Reg),
}

const REX_W: u8 = 0x48;
const REX_R: u8 = 0x04;
const REX_B: u8 = 0x01;

/// ModRM for `[rbx]` with `reg` as the opcode extension or register field.
fn modrm_cell(reg: u8) -> u8 { (reg << 3) | CELL.low() }

/// ModRM for a register-direct operand pair.
fn modrm_direct(reg: u8, rm: Reg) -> u8 { 0b1100_0000 | (reg << 3) | rm.low() }

fn fits_i8(imm: u32) -> bool { imm <= i8::MAX as u32 }

impl Instruction {
	/// Append the machine encoding to `code`.
	pub fn encode(&self, code: &mut Vec<u8>) {
		use Instruction::*;
		match *self {
			MovImm64(reg, imm) => {
				let rex = if reg.extended() { REX_W | REX_B } else { REX_W };
				code.extend_from_slice(&[rex, 0xB8 + reg.low()]);
				code.extend_from_slice(&imm.to_le_bytes());
			}
			MovImm32(reg, imm) => {
				if reg.extended() {
					code.push(0x40 | REX_B);
				}
				code.push(0xB8 + reg.low());
				code.extend_from_slice(&imm.to_le_bytes());
			}
			MovReg { dst, src } => {
				let mut rex = REX_W;
				if src.extended() {
					rex |= REX_R;
				}
				if dst.extended() {
					rex |= REX_B;
				}
				code.extend_from_slice(&[rex, 0x89, modrm_direct(src.low(), dst)]);
			}
			AddCell(imm) => code.extend_from_slice(&[0x80, modrm_cell(0), imm]),
			SubCell(imm) => code.extend_from_slice(&[0x80, modrm_cell(5), imm]),
			StoreCell(imm) => code.extend_from_slice(&[0xC6, modrm_cell(0), imm]),
			CmpCell(imm) => code.extend_from_slice(&[0x80, modrm_cell(7), imm]),
			AddPtr(imm) => Self::encode_ptr_arith(code, 0, imm),
			SubPtr(imm) => Self::encode_ptr_arith(code, 5, imm),
			CmpPtr(reg) => {
				let rex = if reg.extended() { REX_W | REX_R } else { REX_W };
				code.extend_from_slice(&[rex, 0x39, modrm_direct(reg.low(), CELL)]);
			}
			Test32(reg) => {
				if reg.extended() {
					code.push(0x40 | REX_R | REX_B);
				}
				code.extend_from_slice(&[0x85, modrm_direct(reg.low(), reg)]);
			}
			Syscall => code.extend_from_slice(&[0x0F, 0x05]),
			JumpShort(cond, rel) => code.extend_from_slice(&[0x70 | cond as u8, rel as u8]),
			JumpNear(cond, rel) => {
				code.extend_from_slice(&[0x0F, 0x80 | cond as u8]);
				code.extend_from_slice(&rel.to_le_bytes());
			}
			Jump(rel) => {
				code.push(0xE9);
				code.extend_from_slice(&rel.to_le_bytes());
			}
			Pop(reg) => {
				if reg.extended() {
					code.push(0x40 | REX_B);
				}
				code.push(0x58 + reg.low());
			}
			JumpReg(reg) => {
				if reg.extended() {
					code.push(0x40 | REX_B);
				}
				code.extend_from_slice(&[0xFF, modrm_direct(4, reg)]);
			}
		}
	}

	/// `add`/`sub` on the cell pointer, `ext` selects the operation.
	fn encode_ptr_arith(code: &mut Vec<u8>, ext: u8, imm: u32) {
		if fits_i8(imm) {
			code.extend_from_slice(&[REX_W, 0x83, modrm_direct(ext, CELL), imm as u8]);
		} else {
			code.extend_from_slice(&[REX_W, 0x81, modrm_direct(ext, CELL)]);
			code.extend_from_slice(&imm.to_le_bytes());
		}
	}

	/// Encoded size in bytes.
	pub fn encoded_len(&self) -> usize {
		use Instruction::*;
		let rex = |reg: Reg| usize::from(reg.extended());
		match *self {
			MovImm64(..) => 10,
			MovImm32(reg, _) => rex(reg) + 5,
			MovReg { .. } | CmpPtr(_) => 3,
			AddCell(_) | SubCell(_) | StoreCell(_) | CmpCell(_) => 3,
			AddPtr(imm) | SubPtr(imm) => {
				if fits_i8(imm) {
					4
				} else {
					7
				}
			}
			Test32(reg) => rex(reg) + 2,
			Syscall | JumpShort(..) => 2,
			JumpNear(..) => 6,
			Jump(_) => 5,
			Pop(reg) => rex(reg) + 1,
			JumpReg(reg) => rex(reg) + 2,
		}
	}
}

/// Encode a sequence of instructions.
pub fn encode_all(code: &mut Vec<u8>, instructions: &[Instruction]) {
	for instruction in instructions {
		instruction.encode(code);
	}
}

#[cfg(test)]
mod tests {
	use super::{Instruction::*, *};

	fn bytes(instruction: Instruction) -> Vec<u8> {
		let mut code = Vec::new();
		instruction.encode(&mut code);
		assert_eq!(code.len(), instruction.encoded_len());
		code
	}

	#[test]
	fn cell_operations() {
		assert_eq!(bytes(AddCell(3)), [0x80, 0x03, 0x03]);
		assert_eq!(bytes(SubCell(255)), [0x80, 0x2B, 0xFF]);
		assert_eq!(bytes(CmpCell(0)), [0x80, 0x3B, 0x00]);
		assert_eq!(bytes(StoreCell(0xFF)), [0xC6, 0x03, 0xFF]);
	}

	#[test]
	fn pointer_arithmetic_picks_immediate_width() {
		assert_eq!(bytes(AddPtr(1)), [0x48, 0x83, 0xC3, 0x01]);
		assert_eq!(bytes(SubPtr(127)), [0x48, 0x83, 0xEB, 0x7F]);
		assert_eq!(bytes(AddPtr(128)), [0x48, 0x81, 0xC3, 0x80, 0x00, 0x00, 0x00]);
		assert_eq!(bytes(SubPtr(30000)), [0x48, 0x81, 0xEB, 0x30, 0x75, 0x00, 0x00]);
	}

	#[test]
	fn register_moves() {
		assert_eq!(bytes(MovImm64(Reg::Rbx, 0x1122_3344_5566_7788)), [
			0x48, 0xBB, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11
		]);
		assert_eq!(bytes(MovImm64(Reg::R12, 0))[..2], [0x49, 0xBC]);
		assert_eq!(bytes(MovImm64(Reg::R13, 0))[..2], [0x49, 0xBD]);
		assert_eq!(bytes(MovImm32(Reg::Rax, 1)), [0xB8, 0x01, 0x00, 0x00, 0x00]);
		assert_eq!(bytes(MovImm32(Reg::Rdi, 0)), [0xBF, 0x00, 0x00, 0x00, 0x00]);
		assert_eq!(bytes(MovImm32(Reg::Rdx, 1)), [0xBA, 0x01, 0x00, 0x00, 0x00]);
		assert_eq!(bytes(MovReg { dst: Reg::Rsi, src: Reg::Rbx }), [0x48, 0x89, 0xDE]);
	}

	#[test]
	fn bounds_checks() {
		assert_eq!(bytes(CmpPtr(Reg::R13)), [0x4C, 0x39, 0xEB]);
		assert_eq!(bytes(CmpPtr(Reg::R12)), [0x4C, 0x39, 0xE3]);
		assert_eq!(bytes(Test32(Reg::Rax)), [0x85, 0xC0]);
	}

	#[test]
	fn extended_registers_take_a_prefix() {
		assert_eq!(bytes(MovImm32(Reg::R12, 7)), [0x41, 0xBC, 0x07, 0x00, 0x00, 0x00]);
		assert_eq!(bytes(Test32(Reg::R13)), [0x45, 0x85, 0xED]);
		assert_eq!(bytes(Pop(Reg::R12)), [0x41, 0x5C]);
		assert_eq!(bytes(JumpReg(Reg::R13)), [0x41, 0xFF, 0xE5]);
		assert_eq!(bytes(MovReg { dst: Reg::R12, src: Reg::R13 }), [0x4D, 0x89, 0xEC]);
	}

	#[test]
	fn jumps() {
		assert_eq!(bytes(JumpShort(Condition::Below, 7)), [0x72, 0x07]);
		assert_eq!(bytes(JumpShort(Condition::Greater, 3)), [0x7F, 0x03]);
		assert_eq!(bytes(JumpNear(Condition::Equal, 0)), [0x0F, 0x84, 0, 0, 0, 0]);
		assert_eq!(bytes(JumpNear(Condition::NotEqual, -2)), [0x0F, 0x85, 0xFE, 0xFF, 0xFF, 0xFF]);
		assert_eq!(bytes(Jump(16)), [0xE9, 0x10, 0, 0, 0]);
		assert_eq!(bytes(Pop(Reg::Rax)), [0x58]);
		assert_eq!(bytes(JumpReg(Reg::Rax)), [0xFF, 0xE0]);
		assert_eq!(bytes(Syscall), [0x0F, 0x05]);
	}
}
