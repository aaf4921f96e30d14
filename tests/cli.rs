mod common;

use std::{io::Write, process::{Command, Output, Stdio}};

use common::program_path;

fn zbfjit(args: &[&str], stdin: &[u8]) -> Output {
	let mut child = Command::new(env!("CARGO_BIN_EXE_zbfjit"))
		.args(args)
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.unwrap();
	child.stdin.take().unwrap().write_all(stdin).unwrap();
	child.wait_with_output().unwrap()
}

fn run(name: &str, jit: bool, stdin: &[u8]) -> Output {
	let path = program_path(name);
	let path = path.to_str().unwrap();
	if jit { zbfjit(&["run", path, "--jit"], stdin) } else { zbfjit(&["run", path], stdin) }
}

#[test]
fn hello_world_interpreted() {
	let output = run("hello.bf", false, b"");
	assert!(output.status.success());
	assert_eq!(output.stdout, b"Hello World!\n");
}

#[test]
fn echo_interpreted() {
	let output = run("echo.bf", false, b"Q");
	assert!(output.status.success());
	assert_eq!(output.stdout, b"Q");
}

#[test]
fn unmatched_close_fails_interpreted() {
	let output = run("unmatched.bf", false, b"");
	assert!(!output.status.success());
	assert!(output.stdout.is_empty());
	assert!(String::from_utf8_lossy(&output.stderr).contains("unmatched ']'"));
}

#[test]
fn unclosed_loop_fails_interpreted() {
	let output = run("unclosed.bf", false, b"");
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("unmatched '['"));
}

#[test]
fn missing_file_fails() {
	let output = zbfjit(&["run", "/nonexistent/program.bf"], b"");
	assert!(!output.status.success());
}

#[cfg(all(unix, target_arch = "x86_64"))]
mod jit {
	use super::*;

	#[test]
	fn hello_world_matches_interpreter() {
		let interpreted = run("hello.bf", false, b"");
		let compiled = run("hello.bf", true, b"");
		assert!(compiled.status.success());
		assert_eq!(compiled.stdout, interpreted.stdout);
		assert_eq!(compiled.stdout, b"Hello World!\n");
	}

	#[test]
	fn echo() {
		let output = run("echo.bf", true, b"Q");
		assert!(output.status.success());
		assert_eq!(output.stdout, b"Q");
	}

	#[test]
	fn end_of_input_matches_interpreter() {
		let interpreted = run("echo.bf", false, b"");
		let compiled = run("echo.bf", true, b"");
		assert_eq!(compiled.stdout, [0xFF]);
		assert_eq!(compiled.stdout, interpreted.stdout);
	}

	#[test]
	fn unmatched_close_fails() {
		let output = run("unmatched.bf", true, b"");
		assert!(!output.status.success());
		assert!(output.stdout.is_empty());
	}

	#[test]
	fn unclosed_loop_fails() {
		let output = run("unclosed.bf", true, b"");
		assert!(!output.status.success());
		assert_eq!(output.status.code(), run("unclosed.bf", false, b"").status.code());
	}

	#[test]
	fn dump_lists_code() {
		let path = program_path("echo.bf");
		let output = zbfjit(&["dump", path.to_str().unwrap()], b"");
		assert!(output.status.success());
		let listing = String::from_utf8(output.stdout).unwrap();
		assert!(listing.starts_with("000000: 48 bb"));
		assert!(listing.ends_with("relocations: 0\n"));
	}
}
