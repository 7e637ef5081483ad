use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Point in time at which communication with an address last happened.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Canonical identifier of a communication endpoint (e.g. `sip:alice@example.org`).
///
/// Cheap to clone. Both indices key on this type, so it borrows as `str` for
/// lookups.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(Arc<str>);

impl Address {
	/// Creates an address from anything string-like.
	pub fn new(value: impl Into<Arc<str>>) -> Self {
		Self(value.into())
	}

	/// Returns the address text.
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for Address {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for Address {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for Address {
	fn from(value: &str) -> Self {
		Self(Arc::from(value))
	}
}

impl From<String> for Address {
	fn from(value: String) -> Self {
		Self(Arc::from(value))
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Debug for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Address({:?})", &*self.0)
	}
}

/// Logical handle to a contact owned by the contact directory.
///
/// This is a back reference only. The registry stores and compares it but
/// never resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactRef(pub u64);

impl ContactRef {
	/// Returns the underlying u64 value.
	#[inline]
	pub fn as_u64(self) -> u64 {
		self.0
	}
}

impl fmt::Display for ContactRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "contact#{}", self.0)
	}
}

/// Aggregated state for one address.
///
/// A record is only kept while it is live, i.e. while it is linked to a
/// contact or has known activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
	address: Address,
	/// Contact currently reporting this address, if any.
	pub contact: Option<ContactRef>,
	/// Most recent history or call time known for this address.
	pub last_activity: Option<Timestamp>,
}

impl Record {
	/// Creates a record linked to a contact and without activity.
	pub fn from_contact(address: Address, contact: ContactRef) -> Self {
		Self {
			address,
			contact: Some(contact),
			last_activity: None,
		}
	}

	/// Creates a record with activity and without a contact.
	pub fn from_activity(address: Address, at: Timestamp) -> Self {
		Self {
			address,
			contact: None,
			last_activity: Some(at),
		}
	}

	/// Returns the address, which is also this record's key.
	#[inline]
	pub fn address(&self) -> &Address {
		&self.address
	}

	/// Returns true while the record has a reason to exist.
	#[inline]
	pub fn is_live(&self) -> bool {
		self.contact.is_some() || self.last_activity.is_some()
	}
}
