use std::ops::Range;

use crate::record::Address;

/// Discovery-ordered sequence of keys giving each record its row.
#[derive(Debug, Default, Clone)]
pub struct PositionIndex {
	rows: Vec<Address>,
}

impl PositionIndex {
	/// Creates an empty index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `address` and returns its row.
	pub fn push(&mut self, address: Address) -> usize {
		self.rows.push(address);
		self.rows.len() - 1
	}

	/// Returns the key at `row`.
	pub fn get(&self, row: usize) -> Option<&Address> {
		self.rows.get(row)
	}

	/// Returns the row holding `address`.
	///
	/// Linear in the number of rows.
	pub fn position_of(&self, address: &str) -> Option<usize> {
		self.rows.iter().position(|key| key.as_str() == address)
	}

	/// Removes the key at `row`, shifting later rows down by one.
	pub fn remove(&mut self, row: usize) -> Option<Address> {
		(row < self.rows.len()).then(|| self.rows.remove(row))
	}

	/// Removes the keys in `range`, shifting later rows down by its length.
	///
	/// Returns `None` without touching the index if the range is out of bounds.
	pub fn drain(&mut self, range: Range<usize>) -> Option<Vec<Address>> {
		if range.start > range.end || range.end > self.rows.len() {
			return None;
		}
		Some(self.rows.drain(range).collect())
	}

	/// Returns the number of rows.
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Returns true if there are no rows.
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Iterates keys in row order.
	pub fn iter(&self) -> std::slice::Iter<'_, Address> {
		self.rows.iter()
	}
}
