//! Environment-propagated override scopes.
//!
//! # Role
//!
//! An [`OverrideScope`] is an immutable mapping handed down a view subtree by explicit
//! parameter passing. A descendant that overrides a slot does not touch its ancestor's scope; it
//! derives a new scope (ancestor entries plus its own, its own winning on collision) and passes
//! that to its own children.
//!
//! # Invariants
//!
//! - Merges must be right-biased: the newer entry replaces an existing one with the same key.
//!   - Enforced in: [`OverrideScope::merged`].
//!   - Tested by: `invariants::test_scope_merge_right_bias`
//!   - Failure symptom: An inner override is ignored in favour of an outer one.
//!
//! - Merges must not modify the input scope.
//!   - Enforced in: [`OverrideScope::merged`] (copy-on-write of the shared map).
//!   - Tested by: `invariants::test_scope_merge_right_bias`
//!   - Failure symptom: Siblings of an overriding subtree pick up its overrides.

use std::fmt;
use std::sync::Arc;

use crate::key::SlotKey;
use crate::producer::Producer;
use crate::resolve::OverrideSource;
use crate::store::OverrideMap;

/// Immutable set of overrides visible to a subtree.
///
/// Cloning is cheap; scopes share their mapping.
#[derive(Clone, Default)]
pub struct OverrideScope {
	map: Arc<OverrideMap>,
	depth: u32,
}

impl fmt::Debug for OverrideScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut keys: Vec<_> = self.map.keys().map(SlotKey::as_str).collect();
		keys.sort_unstable();
		f.debug_struct("OverrideScope")
			.field("depth", &self.depth)
			.field("keys", &keys)
			.finish()
	}
}

impl OverrideScope {
	/// The scope in effect when no ancestor provided one: every slot uses its default.
	pub fn root() -> Self {
		Self::default()
	}

	/// Returns a child scope with `overrides` merged on top of this one.
	pub fn merged(&self, overrides: &OverrideMap) -> Self {
		if overrides.is_empty() {
			return self.child(Arc::clone(&self.map));
		}
		let mut map = OverrideMap::clone(&self.map);
		map.extend(overrides.iter().map(|(k, p)| (k.clone(), p.clone())));
		self.child(Arc::new(map))
	}

	/// Returns a child scope that additionally overrides `key`.
	pub fn overriding(&self, key: SlotKey, producer: Producer) -> Self {
		let mut map = OverrideMap::clone(&self.map);
		map.insert(key, producer);
		self.child(Arc::new(map))
	}

	/// Runs `content` inside a child scope carrying `overrides`.
	///
	/// This scope is left untouched; only `content` and what it passes the child scope to see
	/// the new entries.
	pub fn provide<R>(&self, overrides: &OverrideMap, content: impl FnOnce(&OverrideScope) -> R) -> R {
		let child = self.merged(overrides);
		tracing::trace!(depth = child.depth, keys = overrides.len(), "slots.scope.provide");
		content(&child)
	}

	/// Returns the producer visible for `key` in this scope.
	pub fn get(&self, key: &str) -> Option<&Producer> {
		self.map.get(key)
	}

	/// Returns true if `key` is overridden in this scope.
	pub fn contains(&self, key: &str) -> bool {
		self.map.contains_key(key)
	}

	/// Returns the full mapping visible in this scope.
	pub fn mapping(&self) -> &OverrideMap {
		&self.map
	}

	/// Returns the number of visible overrides.
	pub fn len(&self) -> usize {
		self.map.len()
	}

	/// Returns true if no override is visible.
	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	/// Nesting depth below the root scope.
	pub fn depth(&self) -> u32 {
		self.depth
	}

	fn child(&self, map: Arc<OverrideMap>) -> Self {
		Self {
			map,
			depth: self.depth.saturating_add(1),
		}
	}
}

impl OverrideSource for OverrideScope {
	fn lookup(&self, key: &str) -> Option<Producer> {
		self.get(key).cloned()
	}
}

/// Builds an [`OverrideMap`] from key/producer pairs; later pairs win.
pub fn override_map<I>(entries: I) -> OverrideMap
where
	I: IntoIterator<Item = (SlotKey, Producer)>,
{
	entries.into_iter().collect()
}
