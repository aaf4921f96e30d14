//! Token streams and the scanner that walks them.
//!
//! A [`TokenStream`] is the program exactly as loaded, bytes and all. The
//! [`Scanner`] turns it into collapsed [`Token`]s on the fly: a run of `n`
//! identical `+`, `-`, `<` or `>` becomes one token with `count = n`, blanks
//! and any other unrecognized bytes are skipped. Both the interpreter and the
//! code generator read programs through it, so they agree on what a program
//! means.
mod token;

use std::path::Path;

use anyhow::Context;
pub use token::*;

/// Immutable program text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStream {
	bytes: Box<[u8]>,
}

impl TokenStream {
	pub fn new(source: impl Into<Vec<u8>>) -> Self { Self { bytes: source.into().into_boxed_slice() } }

	/// Read a whole program file into memory.
	pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
		let path = path.as_ref();
		let bytes = std::fs::read(path).with_context(|| format!("Failed read program {}", path.display()))?;
		Ok(Self::new(bytes))
	}

	pub fn as_bytes(&self) -> &[u8] { &self.bytes }

	pub fn len(&self) -> usize { self.bytes.len() }

	pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

	pub fn scanner(&self) -> Scanner<'_> { Scanner::new(&self.bytes) }
}

impl From<&str> for TokenStream {
	fn from(source: &str) -> Self { Self::new(source.as_bytes()) }
}

/// Forward reader over a token stream that can be repositioned.
pub struct Scanner<'a> {
	source:   &'a [u8],
	/// Offset of the next unread byte.
	position: usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a [u8]) -> Self { Self { source, position: 0 } }

	/// Offset of the next unread byte.
	pub fn position(&self) -> usize { self.position }

	/// Resume scanning at `position`, used to jump back to a loop body.
	pub fn seek(&mut self, position: usize) { self.position = position.min(self.source.len()); }

	/// Read the next token, skipping everything that is not a symbol.
	pub fn next_token(&mut self) -> Option<Token> {
		loop {
			let &byte = self.source.get(self.position)?;
			let Some(symbol) = Symbol::from_byte(byte) else {
				// Blanks go as a whole run.
				self.position += self.count_ahead(byte);
				continue;
			};
			let position = self.position;
			let count = if symbol.is_collapsible() { self.count_ahead(byte) } else { 1 };
			self.position += count;
			return Some(Token { symbol, count, position });
		}
	}

	/// Number of consecutive `byte`s starting at the current position.
	pub fn count_ahead(&self, byte: u8) -> usize {
		self.source[self.position..].iter().take_while(|&&b| b == byte).count()
	}
}

impl Iterator for Scanner<'_> {
	type Item = Token;

	fn next(&mut self) -> Option<Token> { self.next_token() }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn scan(input: &str) -> Vec<(Symbol, usize)> {
		TokenStream::from(input).scanner().map(|t| (t.symbol, t.count)).collect()
	}

	#[test]
	fn collapses_runs() {
		use Symbol::*;
		assert_eq!(scan("+++"), vec![(Increment, 3)]);
		assert_eq!(scan("++--<<<>"), vec![(Increment, 2), (Decrement, 2), (Left, 3), (Right, 1)]);
	}

	#[test]
	fn io_and_loops_are_not_collapsed() {
		use Symbol::*;
		assert_eq!(scan(",,..[[]]"), vec![
			(Input, 1),
			(Input, 1),
			(Output, 1),
			(Output, 1),
			(LoopOpen, 1),
			(LoopOpen, 1),
			(LoopClose, 1),
			(LoopClose, 1),
		]);
	}

	#[test]
	fn skips_blanks_and_comments() {
		use Symbol::*;
		assert_eq!(scan("  + add one\n\t+ "), vec![(Increment, 1), (Increment, 1)]);
		assert!(scan("hello world").is_empty());
		assert!(scan("").is_empty());
	}

	#[test]
	fn positions_and_seek() {
		let stream = TokenStream::from("ab[-]");
		let mut scanner = stream.scanner();
		let open = scanner.next_token().unwrap();
		assert_eq!(open.symbol, Symbol::LoopOpen);
		assert_eq!(open.position, 2);
		let body = scanner.position();
		assert_eq!(scanner.next_token().unwrap().symbol, Symbol::Decrement);
		scanner.seek(body);
		assert_eq!(scanner.next_token().unwrap().position, 3);
	}

	#[test]
	fn counts_closes_ahead() {
		let stream = TokenStream::from("]]]+");
		let scanner = stream.scanner();
		assert_eq!(scanner.count_ahead(b']'), 3);
		assert_eq!(scanner.count_ahead(b'+'), 0);
	}
}
