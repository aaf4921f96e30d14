/// One of the eight symbols the machine understands. Every other byte of a
/// program is ignored.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
	/// `+` increment the current cell.
	Increment = b'+',
	/// `-` decrement the current cell.
	Decrement = b'-',
	/// `<` move the cursor left.
	Left = b'<',
	/// `>` move the cursor right.
	Right = b'>',
	/// `,` read one byte into the current cell.
	Input = b',',
	/// `.` write the current cell.
	Output = b'.',
	/// `[` skip the loop when the current cell is zero.
	LoopOpen = b'[',
	/// `]` repeat the loop while the current cell is non-zero.
	LoopClose = b']',
}

impl Symbol {
	pub fn from_byte(byte: u8) -> Option<Self> {
		use Symbol::*;
		Some(match byte {
			b'+' => Increment,
			b'-' => Decrement,
			b'<' => Left,
			b'>' => Right,
			b',' => Input,
			b'.' => Output,
			b'[' => LoopOpen,
			b']' => LoopClose,
			_ => return None,
		})
	}

	/// Whether consecutive copies of the symbol collapse into one operation.
	pub fn is_collapsible(self) -> bool { matches!(self, Symbol::Increment | Symbol::Decrement | Symbol::Left | Symbol::Right) }
}

/// A collapsed operation read from the token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
	pub symbol:   Symbol,
	/// How many identical symbols were merged, always 1 for non-collapsible
	/// symbols.
	pub count:    usize,
	/// Byte offset of the first merged symbol.
	pub position: usize,
}
