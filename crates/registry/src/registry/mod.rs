//! The address registry.
//!
//! [`Registry`] composes a [`KeyIndex`] and a [`PositionIndex`] and is the
//! only place either is mutated. Each mutation keeps three properties:
//!
//! - a record exists iff it has a contact or known activity,
//! - at most one record exists per address,
//! - every key has exactly one row and every row resolves to a key.
//!
//! Rows follow discovery order. Merging into an existing record never moves it.

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::change::{Outcome, RowChange};
use crate::config::{ActivityMerge, RegistryConfig};
use crate::error::{Field, InvariantViolation, RegistryError};
use crate::index::{KeyIndex, PositionIndex};
use crate::record::{Address, ContactRef, Record, Timestamp};

#[cfg(test)]
mod tests;

/// Deduplicated, order-stable collection of address records.
#[derive(Debug, Default, Clone)]
pub struct Registry {
	keys: KeyIndex,
	rows: PositionIndex,
	config: RegistryConfig,
}

impl Registry {
	/// Creates an empty registry with the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty registry with `config`.
	pub fn with_config(config: RegistryConfig) -> Self {
		Self {
			keys: KeyIndex::new(),
			rows: PositionIndex::new(),
			config,
		}
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Links `address` to `contact`, creating the record if needed.
	///
	/// An existing contact link is overwritten.
	pub fn record_from_contact(&mut self, address: impl Into<Address>, contact: ContactRef) -> RowChange {
		let address = address.into();
		let change = match self.keys.get_mut(address.as_str()) {
			Some(record) => {
				record.contact = Some(contact);
				debug!(%address, %contact, "contact linked");
				RowChange::Changed {
					row: self.row_of(address.as_str()),
				}
			}
			None => self.insert(Record::from_contact(address, contact)),
		};
		self.audit();
		change
	}

	/// Notes activity on `address` using the configured merge policy.
	pub fn record_activity(&mut self, address: impl Into<Address>, at: Timestamp) -> RowChange {
		let merge = self.config.activity_merge;
		self.record_activity_with(address, at, merge)
	}

	/// Notes activity on `address`, combining with known activity per `merge`.
	pub fn record_activity_with(&mut self, address: impl Into<Address>, at: Timestamp, merge: ActivityMerge) -> RowChange {
		let address = address.into();
		let change = match self.keys.get_mut(address.as_str()) {
			Some(record) => {
				let merged = merge.merge(record.last_activity, at);
				record.last_activity = Some(merged);
				debug!(%address, at = %merged, ?merge, "activity updated");
				RowChange::Changed {
					row: self.row_of(address.as_str()),
				}
			}
			None => self.insert(Record::from_activity(address, at)),
		};
		self.audit();
		change
	}

	/// Unlinks the contact from `address`.
	///
	/// The record survives if it still has activity and is removed otherwise.
	pub fn clear_contact(&mut self, address: &str) -> Outcome {
		self.clear_field(address, Field::Contact)
	}

	/// Forgets all activity for `address`.
	///
	/// The record survives if it is still linked to a contact and is removed otherwise.
	pub fn clear_activity(&mut self, address: &str) -> Outcome {
		self.clear_field(address, Field::Activity)
	}

	/// Removes `count` rows starting at `start`.
	///
	/// Fails without mutating anything if the range does not fit the current rows.
	pub fn remove_range(&mut self, start: usize, count: usize) -> Result<RowChange, RegistryError> {
		let len = self.rows.len();
		let out_of_range = RegistryError::OutOfRange { start, count, len };
		let end = start.checked_add(count).ok_or_else(|| out_of_range.clone())?;
		let removed = self.rows.drain(start..end).ok_or(out_of_range)?;

		for (offset, address) in removed.iter().enumerate() {
			info!(%address, "removing address");
			if self.keys.remove(address.as_str()).is_none() {
				violation(InvariantViolation::DanglingRow {
					row: start + offset,
					address: address.clone(),
				});
			}
		}
		self.audit();
		Ok(RowChange::Removed { start, count })
	}

	/// Removes the single row at `row`.
	pub fn remove_row(&mut self, row: usize) -> Result<RowChange, RegistryError> {
		self.remove_range(row, 1)
	}

	/// Returns the contact linked to `address`, if any.
	pub fn lookup_contact(&self, address: &str) -> Option<ContactRef> {
		self.keys.get(address).and_then(|record| record.contact)
	}

	/// Returns the record for `address`.
	pub fn get(&self, address: &str) -> Option<&Record> {
		self.keys.get(address)
	}

	/// Returns the record at `row`.
	pub fn row(&self, row: usize) -> Option<&Record> {
		let address = self.rows.get(row)?;
		match self.keys.get(address.as_str()) {
			Some(record) => Some(record),
			None => violation(InvariantViolation::DanglingRow {
				row,
				address: address.clone(),
			}),
		}
	}

	/// Returns the row currently holding `address`.
	pub fn position_of(&self, address: &str) -> Option<usize> {
		self.keys.contains(address).then(|| self.row_of(address))
	}

	/// Returns the number of records.
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Returns true if there are no records.
	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Iterates records in row order.
	pub fn iter(&self) -> impl Iterator<Item = &Record> + '_ {
		(0..self.rows.len()).filter_map(|row| self.row(row))
	}

	/// Copies every record in row order.
	pub fn snapshot(&self) -> Vec<Record> {
		self.iter().cloned().collect()
	}

	/// Audits liveness, uniqueness and coherence of both indices.
	///
	/// Linear in the number of records.
	pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
		if self.keys.len() != self.rows.len() {
			return Err(InvariantViolation::LengthMismatch {
				keys: self.keys.len(),
				rows: self.rows.len(),
			});
		}

		let mut positions = FxHashMap::with_capacity_and_hasher(self.rows.len(), Default::default());
		for (row, address) in self.rows.iter().enumerate() {
			let Some(record) = self.keys.get(address.as_str()) else {
				return Err(InvariantViolation::DanglingRow {
					row,
					address: address.clone(),
				});
			};
			if let Some(first) = positions.insert(address.as_str(), row) {
				return Err(InvariantViolation::DuplicateRow {
					address: address.clone(),
					first,
					second: row,
				});
			}
			if !record.is_live() {
				return Err(InvariantViolation::DeadRecord { address: address.clone() });
			}
		}

		for (key, record) in self.keys.iter() {
			if key != record.address() {
				return Err(InvariantViolation::KeyMismatch {
					key: key.clone(),
					address: record.address().clone(),
				});
			}
			if !positions.contains_key(key.as_str()) {
				return Err(InvariantViolation::MissingRow { address: key.clone() });
			}
		}

		Ok(())
	}

	fn insert(&mut self, record: Record) -> RowChange {
		let address = record.address().clone();
		debug!(%address, contact = ?record.contact, at = ?record.last_activity, "address discovered");
		self.keys.upsert(record);
		RowChange::Inserted {
			row: self.rows.push(address),
		}
	}

	fn clear_field(&mut self, address: &str, field: Field) -> Outcome {
		let Some(record) = self.keys.get_mut(address) else {
			warn!(%address, %field, "unable to clear field: address not found");
			return Outcome::Skipped(RegistryError::NotFound {
				address: Address::from(address),
			});
		};

		let was_set = match field {
			Field::Contact => record.contact.take().is_some(),
			Field::Activity => record.last_activity.take().is_some(),
		};
		let warning = (!was_set).then(|| {
			warn!(%address, %field, "field is already empty");
			RegistryError::EmptyField {
				address: record.address().clone(),
				field,
			}
		});
		let live = record.is_live();

		let row = self.row_of(address);
		let outcome = if live {
			Outcome::Changed { row, warning }
		} else {
			info!(%address, "removing address");
			self.keys.remove(address);
			self.rows.remove(row);
			Outcome::Removed { row }
		};
		self.audit();
		outcome
	}

	/// Resolves the row of a key known to be present in the key index.
	fn row_of(&self, address: &str) -> usize {
		match self.rows.position_of(address) {
			Some(row) => row,
			None => violation(InvariantViolation::MissingRow {
				address: Address::from(address),
			}),
		}
	}

	fn audit(&self) {
		if self.config.verify_invariants
			&& let Err(err) = self.check_invariants()
		{
			violation(err);
		}
	}
}

#[cold]
#[track_caller]
fn violation(err: InvariantViolation) -> ! {
	panic!("address registry invariant violated: {err}")
}
