//! Instance-owned override store.
//!
//! # Role
//!
//! One [`OverrideStore`] belongs to one container instance. It maps slot keys to override
//! producers and is shared with whatever tasks may override that container's slots, so every
//! operation takes `&self`.
//!
//! # Concurrency
//!
//! - **Reads:** Wait-free. Readers load the currently published `Arc<OverrideMap>`.
//! - **Writes:** Serialized by a writer lock. A writer copies the current map, applies its change
//!   and publishes the new map with one atomic swap.
//!
//! # Invariants
//!
//! - Concurrent writes to distinct keys must all be retained.
//!   - Enforced in: `OverrideStore::write` (writer lock spans load, modify and publish).
//!   - Tested by: `invariants::test_concurrent_distinct_key_writes`
//!   - Failure symptom: Overrides issued from background tasks silently vanish.
//!
//! - Readers must never observe a partially applied write or a partially cleared store.
//!   - Enforced in: `OverrideStore::write` (maps are immutable once published).
//!   - Tested by: `invariants::test_readers_never_observe_torn_state`, `invariants::test_render_pass_uses_one_snapshot`
//!   - Failure symptom: A slot renders a mix of old and new overrides within one pass.
//!
//! - The generation counter must advance once per effective mutation.
//!   - Enforced in: `OverrideStore::write`.
//!   - Tested by: `tests::test_generation_counts_effective_mutations`
//!   - Failure symptom: Hosts miss re-renders, or re-render on no-op resets.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio::sync::watch;

use crate::key::SlotKey;
use crate::producer::Producer;

/// Immutable mapping from slot key to override producer.
pub type OverrideMap = FxHashMap<SlotKey, Producer>;

/// Thread-safe mapping of slot overrides for one container.
pub struct OverrideStore {
	label: Box<str>,
	snap: ArcSwap<OverrideMap>,
	writer: Mutex<()>,
	generation: watch::Sender<u64>,
}

impl Default for OverrideStore {
	fn default() -> Self {
		Self::new("overrides")
	}
}

impl fmt::Debug for OverrideStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OverrideStore")
			.field("label", &self.label)
			.field("len", &self.len())
			.field("generation", &self.generation())
			.finish()
	}
}

impl OverrideStore {
	/// Creates an empty store. `label` only appears in log events.
	pub fn new(label: impl Into<Box<str>>) -> Self {
		let (generation, _) = watch::channel(0);
		Self {
			label: label.into(),
			snap: ArcSwap::from_pointee(OverrideMap::default()),
			writer: Mutex::new(()),
			generation,
		}
	}

	/// Returns the log label.
	pub fn label(&self) -> &str {
		&self.label
	}

	/// Returns the override producer for `key`, if any. The producer is not invoked.
	#[inline]
	pub fn get(&self, key: &str) -> Option<Producer> {
		self.snap.load().get(key).cloned()
	}

	/// Returns true if `key` has an override.
	pub fn contains(&self, key: &str) -> bool {
		self.snap.load().contains_key(key)
	}

	/// Inserts or replaces the override for `key`, returning the replaced producer.
	pub fn set(&self, key: SlotKey, producer: Producer) -> Option<Producer> {
		let replaced = self.write(|map| Some(map.insert(key.clone(), producer)));
		tracing::trace!(
			store = %self.label,
			key = %key,
			replaced = matches!(replaced, Some(Some(_))),
			"slots.store.set"
		);
		replaced.flatten()
	}

	/// Removes the override for `key`. Absent keys are not an error.
	pub fn remove(&self, key: &str) -> Option<Producer> {
		let removed = self.write(|map| map.remove(key));
		tracing::trace!(store = %self.label, key, removed = removed.is_some(), "slots.store.remove");
		removed
	}

	/// Clears every override in one atomic swap, returning how many were dropped.
	///
	/// Resetting an empty store is a no-op and does not advance the generation.
	pub fn reset_all(&self) -> usize {
		let cleared = self
			.write(|map| {
				let n = map.len();
				map.clear();
				(n > 0).then_some(n)
			})
			.unwrap_or(0);
		tracing::trace!(store = %self.label, cleared, "slots.store.reset");
		cleared
	}

	/// Replaces the whole mapping in one atomic swap, returning how many overrides were dropped.
	///
	/// Readers observe either the previous mapping or `overrides`, never a mix.
	pub fn replace_all(&self, overrides: OverrideMap) -> usize {
		let incoming = overrides.len();
		let dropped = self
			.write(|map| {
				if map.is_empty() && overrides.is_empty() {
					return None;
				}
				let n = map.len();
				*map = overrides;
				Some(n)
			})
			.unwrap_or(0);
		tracing::trace!(store = %self.label, dropped, incoming, "slots.store.replace");
		dropped
	}

	/// Returns the currently published mapping.
	///
	/// The returned snapshot stays valid and unchanged across later writes.
	pub fn snapshot(&self) -> Arc<OverrideMap> {
		self.snap.load_full()
	}

	/// Returns the overridden keys in sorted order.
	pub fn keys(&self) -> Vec<SlotKey> {
		let mut keys: Vec<_> = self.snap.load().keys().cloned().collect();
		keys.sort_unstable();
		keys
	}

	/// Returns the number of overrides.
	pub fn len(&self) -> usize {
		self.snap.load().len()
	}

	/// Returns true if no override is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of effective mutations applied so far.
	pub fn generation(&self) -> u64 {
		*self.generation.borrow()
	}

	/// Subscribes to mutation notifications.
	///
	/// The receiver yields the store generation; it changes after every effective mutation.
	pub fn subscribe(&self) -> watch::Receiver<u64> {
		self.generation.subscribe()
	}

	/// Applies `f` to a private copy of the mapping and publishes it when `f` returns `Some`.
	fn write<R>(&self, f: impl FnOnce(&mut OverrideMap) -> Option<R>) -> Option<R> {
		let _guard = self.writer.lock();
		let mut next = OverrideMap::clone(&self.snap.load());
		let out = f(&mut next)?;
		self.snap.store(Arc::new(next));
		self.generation.send_modify(|g| *g += 1);
		Some(out)
	}
}
