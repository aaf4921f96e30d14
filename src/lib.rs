//! # Running a tape program two ways
//!
//! Source: `++[>+<-]>.`
//!
//! The language has eight symbols working on a tape of byte cells and a
//! cursor. `+`/`-` change the current cell, `<`/`>` move the cursor, `,`/`.`
//! read and write one byte, and `[`/`]` loop while the current cell is
//! non-zero. Everything else in a file is commentary.

//! ## Scanning
//!
//! There is no parser. The program stays a flat byte sequence and a scanner
//! reads it token by token, collapsing runs: `+++` is one token with a count
//! of three. That is the only optimization the interpreter gets and most of
//! what the compiler gets.
//!
//! `["+" x2, "[", ">", "+", "<", "-", "]", ">", "."]`

//! ## Tree-walking interpreter
//!
//! Executes each token as it is scanned. Loops cost nothing up front: the
//! interpreter remembers where each `[` body starts and seeks back there from
//! the `]`. A `[` on a zero cell puts it into skipping mode until the matching
//! `]`, counting nested loops on the way.

//! ## Just-in-time compilation
//!
//! Each token becomes a few x86-64 instructions working on a register that
//! holds the address of the current cell.
//!
//! ``` text
//! ++      add byte [rbx], 2
//! [       cmp byte [rbx], 0 ; je  <after ]>
//! >       add rbx, 1        ; (wrap around the tape end)
//! ...
//! ]       cmp byte [rbx], 0 ; jne <after [>
//! .       mov eax, write ; mov edi, 1 ; mov rsi, rbx ; mov edx, 1 ; syscall
//! ```
//!
//! Jump targets are unknown when a `[` is emitted, so it gets a placeholder
//! that the matching `]` patches. The buffer is then copied into executable
//! memory and the host jumps into it, leaving a return address on the stack
//! for the last instruction to jump back to.

pub mod cli;
mod error;
pub mod interpreter;
pub mod jit;
pub mod machine;
mod runner;
pub mod scanner;
mod utils;

pub use error::{BfError, codegen::CodegenError, interpreter::InterpreterError, memory::MemoryError};
pub use runner::{ExecutionMode, Runner};
pub use utils::BoundedStack;
