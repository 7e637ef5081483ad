use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn at(secs: i64) -> Timestamp {
	Utc.timestamp_opt(secs, 0).unwrap()
}

fn checked() -> Registry {
	Registry::with_config(RegistryConfig {
		verify_invariants: true,
		..RegistryConfig::default()
	})
}

fn addresses(registry: &Registry) -> Vec<&str> {
	registry.iter().map(|record| record.address().as_str()).collect()
}

#[test]
fn contact_creates_then_updates_in_place() {
	let mut registry = checked();

	assert_eq!(registry.record_from_contact("sip:a", ContactRef(1)), RowChange::Inserted { row: 0 });
	assert_eq!(registry.record_from_contact("sip:b", ContactRef(2)), RowChange::Inserted { row: 1 });
	assert_eq!(registry.record_from_contact("sip:a", ContactRef(3)), RowChange::Changed { row: 0 });

	assert_eq!(registry.lookup_contact("sip:a"), Some(ContactRef(3)));
	assert_eq!(addresses(&registry), ["sip:a", "sip:b"]);
}

#[test]
fn record_from_contact_is_idempotent() {
	let mut once = checked();
	once.record_from_contact("sip:a", ContactRef(1));

	let mut twice = checked();
	twice.record_from_contact("sip:a", ContactRef(1));
	let second = twice.record_from_contact("sip:a", ContactRef(1));

	assert_eq!(second, RowChange::Changed { row: 0 });
	assert_eq!(once.snapshot(), twice.snapshot());
}

#[test]
fn contact_then_clear_removes_address() {
	let mut registry = checked();
	registry.record_from_contact("sip:a", ContactRef(1));
	registry.record_activity("sip:z", at(1));
	assert_eq!(registry.len(), 2);

	let outcome = registry.clear_contact("sip:a");

	assert_eq!(outcome, Outcome::Removed { row: 0 });
	assert_eq!(outcome.change(), Some(RowChange::Removed { start: 0, count: 1 }));
	assert_eq!(registry.len(), 1);
	assert!(registry.get("sip:a").is_none());
	assert_eq!(registry.position_of("sip:z"), Some(0));
}

#[test]
fn history_keeps_address_alive() {
	let mut registry = checked();
	registry.record_activity("sip:b", at(10));
	registry.record_from_contact("sip:b", ContactRef(7));

	let outcome = registry.clear_contact("sip:b");

	assert_eq!(outcome, Outcome::Changed { row: 0, warning: None });
	let record = registry.get("sip:b").unwrap();
	assert_eq!(record.last_activity, Some(at(10)));
	assert_eq!(record.contact, None);
}

#[test]
fn contact_keeps_address_alive_when_history_cleared() {
	let mut registry = checked();
	registry.record_from_contact("sip:c", ContactRef(1));
	registry.record_activity("sip:c", at(5));

	assert_eq!(registry.clear_activity("sip:c"), Outcome::Changed { row: 0, warning: None });
	assert_eq!(registry.get("sip:c").unwrap().last_activity, None);

	assert_eq!(registry.clear_contact("sip:c"), Outcome::Removed { row: 0 });
	assert!(registry.is_empty());
}

#[test]
fn clearing_unknown_address_is_skipped() {
	let mut registry = checked();
	registry.record_activity("sip:a", at(1));

	let outcome = registry.clear_contact("sip:nobody");

	assert!(outcome.is_skipped());
	assert_eq!(outcome.change(), None);
	assert_eq!(
		outcome,
		Outcome::Skipped(RegistryError::NotFound {
			address: Address::from("sip:nobody")
		})
	);
	assert_eq!(registry.len(), 1);
}

#[test]
fn clearing_empty_contact_reports_change_with_warning() {
	let mut registry = checked();
	registry.record_activity("sip:a", at(1));

	let outcome = registry.clear_contact("sip:a");

	assert_eq!(
		outcome,
		Outcome::Changed {
			row: 0,
			warning: Some(RegistryError::EmptyField {
				address: Address::from("sip:a"),
				field: Field::Contact,
			}),
		}
	);
	assert_eq!(outcome.change(), Some(RowChange::Changed { row: 0 }));
	assert_eq!(registry.get("sip:a").unwrap().last_activity, Some(at(1)));
}

#[test]
fn clearing_empty_activity_keeps_contact_and_warns() {
	let mut registry = checked();
	registry.record_from_contact("sip:b", ContactRef(4));
	registry.record_from_contact("sip:c", ContactRef(5));

	let outcome = registry.clear_activity("sip:c");

	assert!(matches!(
		outcome.warning(),
		Some(RegistryError::EmptyField { field: Field::Activity, .. })
	));
	assert_eq!(outcome.change(), Some(RowChange::Changed { row: 1 }));
	assert!(!outcome.is_removed());
	assert_eq!(registry.lookup_contact("sip:c"), Some(ContactRef(5)));
	assert_eq!(addresses(&registry), ["sip:b", "sip:c"]);
}

#[test]
fn default_config_handles_thousands_of_addresses() {
	let mut registry = Registry::new();

	for n in 0..3000u64 {
		registry.record_from_contact(format!("sip:user{n}"), ContactRef(n));
	}
	for n in (0..3000u64).step_by(2) {
		let _ = registry.clear_contact(&format!("sip:user{n}"));
	}

	assert_eq!(registry.len(), 1500);
	assert_eq!(registry.position_of("sip:user1"), Some(0));
	assert_eq!(registry.check_invariants(), Ok(()));
}

#[test]
fn overwrite_policy_accepts_older_timestamp() {
	let mut registry = checked();
	registry.record_activity("sip:a", at(20));
	registry.record_activity("sip:a", at(10));

	assert_eq!(registry.get("sip:a").unwrap().last_activity, Some(at(10)));
}

#[test]
fn keep_latest_policy_ignores_older_timestamp() {
	let mut registry = checked();
	registry.record_activity("sip:a", at(20));
	let change = registry.record_activity_with("sip:a", at(10), ActivityMerge::KeepLatest);

	assert_eq!(change, RowChange::Changed { row: 0 });
	assert_eq!(registry.get("sip:a").unwrap().last_activity, Some(at(20)));
}

#[test]
fn configured_policy_applies_to_record_activity() {
	let mut registry = Registry::with_config(RegistryConfig {
		activity_merge: ActivityMerge::KeepLatest,
		verify_invariants: true,
	});
	registry.record_activity("sip:a", at(20));
	registry.record_activity("sip:a", at(10));

	assert_eq!(registry.get("sip:a").unwrap().last_activity, Some(at(20)));
}

#[test]
fn merging_never_moves_rows() {
	let mut registry = checked();
	registry.record_activity("sip:a", at(1));
	registry.record_activity("sip:b", at(2));
	registry.record_activity("sip:c", at(3));

	registry.record_activity("sip:a", at(100));
	registry.record_from_contact("sip:b", ContactRef(1));

	assert_eq!(addresses(&registry), ["sip:a", "sip:b", "sip:c"]);
}

#[test]
fn remove_range_out_of_bounds_leaves_registry_untouched() {
	let mut registry = checked();
	for (i, address) in ["sip:a", "sip:b", "sip:c"].into_iter().enumerate() {
		registry.record_activity(address, at(i as i64));
	}
	let before = registry.snapshot();

	let err = registry.remove_range(0, 100).unwrap_err();

	assert_eq!(err, RegistryError::OutOfRange { start: 0, count: 100, len: 3 });
	assert_eq!(registry.snapshot(), before);
	assert!(registry.remove_range(usize::MAX, 2).is_err());
	assert!(registry.remove_row(3).is_err());
}

#[test]
fn remove_range_shifts_later_rows() {
	let mut registry = checked();
	for (i, address) in ["sip:a", "sip:b", "sip:c", "sip:d"].into_iter().enumerate() {
		registry.record_activity(address, at(i as i64));
	}

	assert_eq!(registry.remove_range(1, 2), Ok(RowChange::Removed { start: 1, count: 2 }));

	assert_eq!(addresses(&registry), ["sip:a", "sip:d"]);
	assert_eq!(registry.position_of("sip:d"), Some(1));
	assert!(registry.get("sip:b").is_none());
}

#[test]
fn empty_range_at_end_is_accepted() {
	let mut registry = checked();
	registry.record_activity("sip:a", at(1));

	assert_eq!(registry.remove_range(1, 0), Ok(RowChange::Removed { start: 1, count: 0 }));
	assert_eq!(registry.len(), 1);
}

#[test]
fn removed_address_is_rediscovered_at_the_end() {
	let mut registry = checked();
	registry.record_from_contact("sip:a", ContactRef(1));
	registry.record_from_contact("sip:b", ContactRef(2));
	let _ = registry.clear_contact("sip:a");

	assert_eq!(registry.record_activity("sip:a", at(9)), RowChange::Inserted { row: 1 });
	assert_eq!(addresses(&registry), ["sip:b", "sip:a"]);
}

#[test]
fn row_and_position_lookups_agree() {
	let mut registry = checked();
	registry.record_activity("sip:a", at(1));
	registry.record_from_contact("sip:b", ContactRef(2));

	for row in 0..registry.len() {
		let record = registry.row(row).unwrap();
		assert_eq!(registry.position_of(record.address().as_str()), Some(row));
	}
	assert!(registry.row(2).is_none());
	assert_eq!(registry.position_of("sip:x"), None);
}

#[derive(Debug, Clone)]
enum Op {
	Contact(u8, u8),
	Activity(u8, i64),
	ActivityLatest(u8, i64),
	ClearContact(u8),
	ClearActivity(u8),
	RemoveRange(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		(0u8..6, 0u8..4).prop_map(|(a, c)| Op::Contact(a, c)),
		(0u8..6, 0i64..1_000).prop_map(|(a, t)| Op::Activity(a, t)),
		(0u8..6, 0i64..1_000).prop_map(|(a, t)| Op::ActivityLatest(a, t)),
		(0u8..6).prop_map(Op::ClearContact),
		(0u8..6).prop_map(Op::ClearActivity),
		(0usize..8, 0usize..4).prop_map(|(s, n)| Op::RemoveRange(s, n)),
	]
}

fn key(n: u8) -> String {
	format!("sip:user{n}@example.org")
}

fn apply(registry: &mut Registry, op: &Op) -> Option<RowChange> {
	match *op {
		Op::Contact(a, c) => Some(registry.record_from_contact(key(a), ContactRef(c.into()))),
		Op::Activity(a, t) => Some(registry.record_activity(key(a), at(t))),
		Op::ActivityLatest(a, t) => Some(registry.record_activity_with(key(a), at(t), ActivityMerge::KeepLatest)),
		Op::ClearContact(a) => registry.clear_contact(&key(a)).change(),
		Op::ClearActivity(a) => registry.clear_activity(&key(a)).change(),
		Op::RemoveRange(s, n) => registry.remove_range(s, n).ok(),
	}
}

proptest! {
	#[test]
	fn invariants_hold_for_any_operation_sequence(ops in proptest::collection::vec(op(), 0..64)) {
		let mut registry = Registry::with_config(RegistryConfig {
			verify_invariants: false,
			..RegistryConfig::default()
		});

		for op in &ops {
			let before = registry.len();
			let change = apply(&mut registry, op);

			prop_assert_eq!(registry.check_invariants(), Ok(()));
			prop_assert!(registry.iter().all(Record::is_live));

			let expected = before as isize + change.map_or(0, |c| c.row_delta());
			prop_assert_eq!(registry.len() as isize, expected);
		}
	}

	#[test]
	fn rows_keep_relative_order(ops in proptest::collection::vec(op(), 0..64)) {
		let mut registry = Registry::new();
		let mut order: Vec<String> = Vec::new();

		for op in &ops {
			let change = apply(&mut registry, op);
			match change {
				Some(RowChange::Inserted { row }) => {
					prop_assert_eq!(row, order.len());
					order.push(registry.row(row).unwrap().address().to_string());
				}
				Some(RowChange::Removed { start, count }) => {
					order.drain(start..start + count);
				}
				Some(RowChange::Changed { row }) => {
					prop_assert_eq!(registry.row(row).unwrap().address().as_str(), order[row].as_str());
				}
				None => {}
			}
			let current: Vec<String> = registry.iter().map(|r| r.address().to_string()).collect();
			prop_assert_eq!(&current, &order);
		}
	}
}
