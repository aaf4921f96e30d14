/// Fixed-capacity stack addressed by index.
///
/// Storage is a plain array of `N` slots, nothing is allocated after
/// construction. Pushing onto a full stack hands the item back instead of
/// growing.
#[derive(Debug, Clone)]
pub struct BoundedStack<T, const N: usize> {
	items: [T; N],
	len:   usize,
}

impl<T: Copy + Default, const N: usize> Default for BoundedStack<T, N> {
	fn default() -> Self { Self::new() }
}

impl<T: Copy + Default, const N: usize> BoundedStack<T, N> {
	pub fn new() -> Self { Self { items: [T::default(); N], len: 0 } }

	/// Push `item`, or return it if all `N` slots are taken.
	pub fn try_push(&mut self, item: T) -> Result<(), T> {
		if self.len == N {
			return Err(item);
		}
		self.items[self.len] = item;
		self.len += 1;
		Ok(())
	}

	pub fn pop(&mut self) -> Option<T> {
		self.len = self.len.checked_sub(1)?;
		Some(self.items[self.len])
	}

	pub fn peek(&self) -> Option<T> { self.len.checked_sub(1).map(|top| self.items[top]) }

	pub fn len(&self) -> usize { self.len }

	pub fn is_empty(&self) -> bool { self.len == 0 }

	pub const fn capacity(&self) -> usize { N }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn push_pop_order() {
		let mut stack = BoundedStack::<usize, 4>::new();
		assert!(stack.is_empty());
		stack.try_push(1).unwrap();
		stack.try_push(2).unwrap();
		assert_eq!(stack.peek(), Some(2));
		assert_eq!(stack.pop(), Some(2));
		assert_eq!(stack.pop(), Some(1));
		assert_eq!(stack.pop(), None);
		assert_eq!(stack.peek(), None);
	}

	#[test]
	fn rejects_past_capacity() {
		let mut stack = BoundedStack::<u8, 2>::new();
		assert_eq!(stack.capacity(), 2);
		assert!(stack.try_push(1).is_ok());
		assert!(stack.try_push(2).is_ok());
		assert_eq!(stack.try_push(3), Err(3));
		assert_eq!(stack.len(), 2);
	}
}
