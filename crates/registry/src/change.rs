use crate::error::RegistryError;

/// Structural change produced by a single registry mutation.
///
/// Rows are positions in the ordered view at the moment the change was
/// produced. Consumers must re-fetch rows after every change instead of
/// caching positions across changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowChange {
	/// A new row was appended at `row`.
	Inserted { row: usize },
	/// The record at `row` was updated in place.
	Changed { row: usize },
	/// `count` rows starting at `start` were removed; later rows shifted down by `count`.
	Removed { start: usize, count: usize },
}

impl RowChange {
	/// Returns the first row affected by this change.
	pub fn first_row(&self) -> usize {
		match *self {
			Self::Inserted { row } | Self::Changed { row } => row,
			Self::Removed { start, .. } => start,
		}
	}

	/// Returns the signed change in row count caused by this change.
	pub fn row_delta(&self) -> isize {
		match *self {
			Self::Inserted { .. } => 1,
			Self::Changed { .. } => 0,
			Self::Removed { count, .. } => -(count as isize),
		}
	}
}

/// Result of clearing one field of a record.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// The record is still live and was updated at `row`.
	///
	/// `warning` is set when the cleared field was already empty.
	Changed { row: usize, warning: Option<RegistryError> },
	/// The record lost its last field and was removed from `row`.
	Removed { row: usize },
	/// Nothing was mutated; the triggering event was stale.
	Skipped(RegistryError),
}

impl Outcome {
	/// Returns the change to publish, or `None` when nothing was mutated.
	pub fn change(&self) -> Option<RowChange> {
		match *self {
			Self::Changed { row, .. } => Some(RowChange::Changed { row }),
			Self::Removed { row } => Some(RowChange::Removed { start: row, count: 1 }),
			Self::Skipped(_) => None,
		}
	}

	/// Returns the non-fatal error reported alongside a change, if any.
	pub fn warning(&self) -> Option<&RegistryError> {
		match self {
			Self::Changed { warning, .. } => warning.as_ref(),
			Self::Removed { .. } | Self::Skipped(_) => None,
		}
	}

	/// Returns true when the operation removed the record.
	pub fn is_removed(&self) -> bool {
		matches!(self, Self::Removed { .. })
	}

	/// Returns true when the operation was skipped.
	pub fn is_skipped(&self) -> bool {
		matches!(self, Self::Skipped(_))
	}
}
