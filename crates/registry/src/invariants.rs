//! Behavioural contract of override resolution, one proof per property.
//!
//! Each function states the property it checks, where it is enforced, and what breaks when it
//! does not hold.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use proptest::prelude::*;

use crate::host::SlotHost;
use crate::key::SlotKey;
use crate::producer::Producer;
use crate::resolve::resolve;
use crate::scope::{OverrideScope, override_map};
use crate::store::OverrideStore;
use crate::table::SlotTable;
use crate::view::{AnyView, View};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker(usize);

impl View for Marker {
	fn render(&self) -> String {
		format!("marker {}", self.0)
	}
}

fn key(s: &str) -> SlotKey {
	SlotKey::new(s).unwrap()
}

fn marker(n: usize) -> Producer {
	Producer::new(move || Marker(n))
}

fn marker_of(view: &AnyView) -> usize {
	view.downcast_ref::<Marker>().expect("marker view").0
}

const DEFAULT: usize = usize::MAX;

fn resolved(store: &OverrideStore, k: &str) -> usize {
	marker_of(&resolve(store, k, || Marker(DEFAULT)))
}

/// Must fall back to the default for keys without an override.
///
/// - Enforced in: `resolve::resolve`
/// - Failure symptom: Slots render nothing, or another slot's override, on first render.
#[cfg_attr(test, test)]
pub(crate) fn test_fallback_for_absent_keys() {
	let store = OverrideStore::default();
	store.set(key("other"), marker(1));
	assert_eq!(resolved(&store, "header"), DEFAULT);
}

/// Must return the override's output regardless of the default.
///
/// - Enforced in: `resolve::resolve`
/// - Failure symptom: Caller customizations are ignored.
#[cfg_attr(test, test)]
pub(crate) fn test_override_wins() {
	let store = OverrideStore::default();
	store.set(key("header"), marker(7));
	assert_eq!(resolved(&store, "header"), 7);
}

/// Must restore the default after the override is removed.
///
/// - Enforced in: `OverrideStore::remove`
/// - Failure symptom: Removed overrides keep rendering.
#[cfg_attr(test, test)]
pub(crate) fn test_removal_restores_default() {
	let store = OverrideStore::default();
	store.set(key("header"), marker(7));
	store.remove("header");
	assert_eq!(resolved(&store, "header"), DEFAULT);
}

/// Must restore every default after a reset.
///
/// - Enforced in: `OverrideStore::reset_all`
/// - Failure symptom: Some slots stay customized after a reset.
#[cfg_attr(test, test)]
pub(crate) fn test_reset_restores_defaults() {
	let store = OverrideStore::default();
	for i in 0..10 {
		store.set(key(&i.to_string()), marker(i));
	}
	assert_eq!(store.reset_all(), 10);
	for i in 0..10 {
		assert_eq!(resolved(&store, &i.to_string()), DEFAULT);
	}
}

/// Must retain every write when distinct keys are written concurrently.
///
/// - Enforced in: `OverrideStore::write`
/// - Failure symptom: Overrides issued from background tasks silently vanish.
#[cfg_attr(test, test)]
pub(crate) fn test_concurrent_distinct_key_writes() {
	let store = OverrideStore::new("concurrent");
	thread::scope(|s| {
		for i in 0..100 {
			let store = &store;
			s.spawn(move || {
				store.set(key(&i.to_string()), marker(i));
			});
		}
	});

	assert_eq!(store.len(), 100);
	for i in 0..100 {
		let producer = store.get(&i.to_string()).expect("write was lost");
		assert_eq!(marker_of(&producer.invoke()), i);
	}
	assert_eq!(store.generation(), 100);
}

/// Must merge scopes right-biased without touching the ancestor's mapping.
///
/// - Enforced in: `OverrideScope::merged`
/// - Failure symptom: Inner overrides are ignored, or leak to siblings.
#[cfg_attr(test, test)]
pub(crate) fn test_scope_merge_right_bias() {
	let ancestor = OverrideScope::root().overriding(key("A"), marker(1));
	let descendant = override_map([(key("A"), marker(2)), (key("B"), marker(3))]);

	ancestor.provide(&descendant, |scope| {
		assert_eq!(marker_of(&resolve(scope, "A", || Marker(DEFAULT))), 2);
		assert_eq!(marker_of(&resolve(scope, "B", || Marker(DEFAULT))), 3);
	});

	assert_eq!(ancestor.len(), 1);
	assert_eq!(marker_of(&resolve(&ancestor, "A", || Marker(DEFAULT))), 1);
	assert!(!ancestor.contains("B"));
}

/// Must accept a reset of an empty store.
///
/// - Enforced in: `OverrideStore::reset_all`
/// - Failure symptom: Resetting twice panics or notifies subscribers spuriously.
#[cfg_attr(test, test)]
pub(crate) fn test_idempotent_reset() {
	let store = OverrideStore::default();
	assert_eq!(store.reset_all(), 0);
	assert_eq!(store.reset_all(), 0);
	assert!(store.is_empty());
	assert_eq!(store.generation(), 0);
}

/// Must keep the last of two sequential writes to one key.
///
/// - Enforced in: `OverrideStore::set`
/// - Failure symptom: Re-overriding a slot has no effect.
#[cfg_attr(test, test)]
pub(crate) fn test_last_write_wins() {
	let store = OverrideStore::default();
	let second = marker(2);
	store.set(key("K"), marker(1));
	store.set(key("K"), second.clone());
	assert!(store.get("K").unwrap().ptr_eq(&second));
	assert_eq!(resolved(&store, "K"), 2);
}

/// Must never expose a partially cleared store or a stale write to readers.
///
/// - Enforced in: `OverrideStore::write` (single atomic publication per mutation)
/// - Failure symptom: One render pass mixes overridden and default slots after a reset.
#[cfg_attr(test, test)]
pub(crate) fn test_readers_never_observe_torn_state() {
	const KEYS: usize = 50;
	const ROUNDS: usize = 200;

	let store = OverrideStore::new("torn");
	let done = AtomicBool::new(false);

	thread::scope(|s| {
		for _ in 0..4 {
			s.spawn(|| {
				let mut last = 0;
				while !done.load(Ordering::Acquire) {
					let snap = store.snapshot();
					let len = snap.len();
					assert!(len == 0 || len == KEYS, "observed partial state: {len} entries");
					if let Some(p) = snap.get("0") {
						let seen = marker_of(&p.invoke()) / KEYS;
						assert!(seen >= last, "round went backwards: {seen} < {last}");
						last = seen;
					}
				}
			});
		}

		for round in 0..ROUNDS {
			let batch = override_map((0..KEYS).map(|i| (key(&i.to_string()), marker(round * KEYS + i))));
			store.replace_all(batch);
			store.reset_all();
		}
		done.store(true, Ordering::Release);
	});
}

/// A host's render pass must see one store snapshot for all of its slots.
///
/// - Enforced in: `host::SlotHost::render_all` (loads the snapshot once per pass)
/// - Failure symptom: Some slots show a bulk override while others already show defaults.
#[cfg_attr(test, test)]
pub(crate) fn test_render_pass_uses_one_snapshot() {
	const SLOTS: usize = 40;
	const ROUNDS: usize = 300;

	let table = (0..SLOTS)
		.fold(SlotTable::builder("Grid"), |builder, i| {
			builder.slot_keyed(i.to_string(), Producer::new(|| Marker(DEFAULT)))
		})
		.build()
		.unwrap();
	let host = SlotHost::new(table);
	let store = host.store();
	let done = AtomicBool::new(false);

	thread::scope(|s| {
		s.spawn(|| {
			for round in 0..ROUNDS {
				store.replace_all(override_map((0..SLOTS).map(|i| (key(&i.to_string()), marker(round)))));
				store.reset_all();
			}
			done.store(true, Ordering::Release);
		});

		while !done.load(Ordering::Acquire) {
			let pass: Vec<usize> = host.render_all().iter().map(|(_, view)| marker_of(view)).collect();
			assert_eq!(pass.len(), SLOTS);
			assert!(
				pass.iter().all(|m| *m == pass[0]),
				"render pass mixed store states: {pass:?}"
			);
		}
	});
}

proptest! {
	/// Overrides win and absent keys fall back, for arbitrary key sets.
	#[test]
	fn prop_override_or_fallback(
		set in proptest::collection::btree_set("[a-z]{1,8}", 0..16),
		lookup in "[a-z]{1,8}",
	) {
		let store = OverrideStore::default();
		for (i, k) in set.iter().enumerate() {
			store.set(key(k), marker(i));
		}
		let expected = set.iter().position(|k| *k == lookup).unwrap_or(DEFAULT);
		prop_assert_eq!(resolved(&store, &lookup), expected);
	}

	/// A sequence of writes to one key leaves the last one visible.
	#[test]
	fn prop_last_write_wins(values in proptest::collection::vec(0usize..1000, 1..20)) {
		let store = OverrideStore::default();
		for v in &values {
			store.set(key("K"), marker(*v));
		}
		prop_assert_eq!(resolved(&store, "K"), *values.last().unwrap());
		prop_assert_eq!(store.len(), 1);
	}

	/// Removing any subset restores exactly those defaults.
	#[test]
	fn prop_remove_subset(removed in proptest::collection::btree_set(0usize..10, 0..10)) {
		let store = OverrideStore::default();
		for i in 0..10 {
			store.set(key(&i.to_string()), marker(i));
		}
		for i in &removed {
			store.remove(&i.to_string());
		}
		for i in 0..10 {
			let expected = if removed.contains(&i) { DEFAULT } else { i };
			prop_assert_eq!(resolved(&store, &i.to_string()), expected);
		}
	}
}
