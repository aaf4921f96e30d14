#![allow(dead_code)]

use std::{io::Cursor, path::PathBuf};

use zbfjit::{InterpreterError, interpreter::Interpreter, machine::Machine, scanner::TokenStream};

pub const HELLO: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

pub fn program_path(name: &str) -> PathBuf { PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("programs").join(name) }

/// Interpret `program` with `input` on stdin, returning the machine and what
/// was written.
pub fn interpret(program: &str, input: &[u8]) -> Result<(Machine, Vec<u8>), InterpreterError> {
	let mut machine = Machine::new();
	let mut interpreter = Interpreter::new(Cursor::new(input.to_vec()), Vec::new());
	interpreter.interpret(&TokenStream::from(program), &mut machine)?;
	Ok((machine, interpreter.into_output()))
}

/// `levels` loops nested inside each other, each counting a cell down from 3.
/// The innermost body adds one to cell `levels`, so it ends up at
/// `3^levels mod 256`.
pub fn nested_counters(levels: usize) -> String {
	let mut program = String::from("+++");
	for _ in 1..levels {
		program.push_str("[>+++");
	}
	program.push_str("[>+<-]");
	for _ in 1..levels {
		program.push_str("<-]");
	}
	program
}
