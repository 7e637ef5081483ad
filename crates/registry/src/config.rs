//! Registry behaviour knobs.

use serde::Deserialize;

/// How `record_activity` combines a new timestamp with an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityMerge {
	/// The new timestamp always replaces the stored one.
	///
	/// Correct for a single source that delivers events in time order.
	#[default]
	Overwrite,
	/// The later of the two timestamps is kept.
	///
	/// Required whenever several sources compete for the same address.
	KeepLatest,
}

impl ActivityMerge {
	/// Combines `existing` with `incoming` according to this policy.
	pub fn merge<T: Ord>(self, existing: Option<T>, incoming: T) -> T {
		match (self, existing) {
			(Self::KeepLatest, Some(existing)) => existing.max(incoming),
			_ => incoming,
		}
	}
}

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistryConfig {
	/// Policy used by `record_activity` for incremental events.
	pub activity_merge: ActivityMerge,
	/// Audits both indices after every mutation and panics on violation.
	pub verify_invariants: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			activity_merge: ActivityMerge::default(),
			verify_invariants: cfg!(debug_assertions),
		}
	}
}
