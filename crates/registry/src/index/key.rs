use rustc_hash::FxHashMap;

use crate::record::{Address, Record};

/// Address-keyed record storage. Keys are unique; iteration order is unspecified.
#[derive(Debug, Default, Clone)]
pub struct KeyIndex {
	records: FxHashMap<Address, Record>,
}

impl KeyIndex {
	/// Creates an empty index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or replaces the record stored under its own address.
	///
	/// Returns the replaced record, if any.
	pub fn upsert(&mut self, record: Record) -> Option<Record> {
		self.records.insert(record.address().clone(), record)
	}

	/// Returns the record for `address`.
	pub fn get(&self, address: &str) -> Option<&Record> {
		self.records.get(address)
	}

	/// Returns the record for `address` for in-place update.
	pub fn get_mut(&mut self, address: &str) -> Option<&mut Record> {
		self.records.get_mut(address)
	}

	/// Removes and returns the record for `address`.
	pub fn remove(&mut self, address: &str) -> Option<Record> {
		self.records.remove(address)
	}

	/// Returns true if `address` has a record.
	pub fn contains(&self, address: &str) -> bool {
		self.records.contains_key(address)
	}

	/// Returns the number of records.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Returns true if there are no records.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Iterates `(key, record)` pairs in unspecified order.
	pub fn iter(&self) -> impl Iterator<Item = (&Address, &Record)> {
		self.records.iter()
	}
}
