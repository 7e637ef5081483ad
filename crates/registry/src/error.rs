use std::path::PathBuf;

use thiserror::Error;

use crate::record::Address;

/// Record field that a clear operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
	/// The contact link.
	Contact,
	/// The last activity timestamp.
	Activity,
}

impl std::fmt::Display for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Contact => f.write_str("contact"),
			Self::Activity => f.write_str("activity"),
		}
	}
}

/// Non-fatal errors reported by registry operations.
///
/// None of these leave the registry partially mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
	/// The operation referenced an address that is not recorded.
	#[error("address not found: {address}")]
	NotFound { address: Address },
	/// A cleared field was already empty.
	#[error("`{field}` field is already empty on address: {address}")]
	EmptyField { address: Address, field: Field },
	/// A positional removal fell outside the current rows.
	#[error("row range {start}+{count} is out of range (len {len})")]
	OutOfRange { start: usize, count: usize, len: usize },
}

/// Broken index coherence, liveness or uniqueness.
///
/// This only ever signals a bug inside the registry itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
	/// Both indices must hold the same number of keys.
	#[error("index sizes disagree: {keys} keys, {rows} rows")]
	LengthMismatch { keys: usize, rows: usize },
	/// A key is present in the key index but has no row.
	#[error("address {address} has no row")]
	MissingRow { address: Address },
	/// A row refers to a key that the key index does not hold.
	#[error("row {row} refers to unknown address {address}")]
	DanglingRow { row: usize, address: Address },
	/// The same key occupies more than one row.
	#[error("address {address} occupies rows {first} and {second}")]
	DuplicateRow { address: Address, first: usize, second: usize },
	/// A record is stored under a key different from its own address.
	#[error("record {address} is stored under key {key}")]
	KeyMismatch { key: Address, address: Address },
	/// A record with neither contact nor activity was retained.
	#[error("record {address} has neither contact nor activity")]
	DeadRecord { address: Address },
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
	/// The config file could not be read.
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	/// The config text is not valid TOML for this schema.
	#[error("invalid config: {0}")]
	Parse(String),
}
