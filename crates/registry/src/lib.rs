//! Address aggregation registry.
//!
//! This crate provides the core of the address book:
//! - [`Record`]: Aggregated state for one [`Address`]
//! - [`KeyIndex`] / [`PositionIndex`]: Key and row indices over the records
//! - [`Registry`]: Owner of both indices and all mutation logic
//! - [`RowChange`] / [`Outcome`]: Change descriptors emitted by mutations
//! - [`Subscribers`]: In-process callback list used for change delivery
//!
//! The registry is not internally synchronized. Callers serialize mutations,
//! typically through `addrbook-view`'s adapter.

pub mod change;
pub mod config;
pub mod error;
pub mod index;
pub mod record;
pub mod registry;
pub mod subscription;

pub use change::{Outcome, RowChange};
pub use config::{ActivityMerge, RegistryConfig};
pub use error::{ConfigError, Field, InvariantViolation, RegistryError};
pub use index::{KeyIndex, PositionIndex};
pub use record::{Address, ContactRef, Record, Timestamp};
pub use registry::Registry;
pub use subscription::{Listener, SubscriptionId, Subscribers};
