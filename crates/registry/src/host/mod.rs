//! Container instances hosting injectable slots.
//!
//! A [`SlotHost`] pairs a shared [`SlotTable`] with the instance's own [`OverrideStore`] and,
//! optionally, the [`OverrideScope`] provided by its ancestors. Resolution consults the
//! instance store first, then the scope, then the slot's default.

use std::fmt;
use std::sync::Arc;

use slotkit_config::SlotConfig;
use tokio::sync::watch;

use crate::key::SlotKey;
use crate::producer::Producer;
use crate::resolve::{Layered, OverrideSource, resolve_with};
use crate::scope::OverrideScope;
use crate::store::OverrideStore;
use crate::table::{SlotDecl, SlotId, SlotTable};
use crate::view::{AnyView, IntoView};

/// One container instance with overridable slots.
pub struct SlotHost {
	table: Arc<SlotTable>,
	store: Arc<OverrideStore>,
	scope: OverrideScope,
	warn_undeclared: bool,
}

impl fmt::Debug for SlotHost {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SlotHost")
			.field("container", &self.table.container())
			.field("store", &self.store)
			.field("scope", &self.scope)
			.finish()
	}
}

impl SlotHost {
	/// Creates an instance of the container described by `table` with an empty store.
	pub fn new(table: Arc<SlotTable>) -> Self {
		let store = Arc::new(OverrideStore::new(table.container()));
		Self {
			table,
			store,
			scope: OverrideScope::root(),
			warn_undeclared: false,
		}
	}

	/// Creates an instance using diagnostics settings from `config`.
	pub fn with_config(table: Arc<SlotTable>, config: &SlotConfig) -> Self {
		let label = config.store_label.as_deref().unwrap_or(table.container());
		let store = Arc::new(OverrideStore::new(label));
		Self {
			table,
			store,
			scope: OverrideScope::root(),
			warn_undeclared: config.warn_undeclared,
		}
	}

	/// Places this instance inside `scope`.
	pub fn with_scope(mut self, scope: OverrideScope) -> Self {
		self.scope = scope;
		self
	}

	/// Overrides the slot `key` with `builder`. Chainable.
	///
	/// Empty keys are ignored. Keys the container does not declare are stored anyway but never
	/// resolved through [`SlotHost::resolve`].
	pub fn override_slot<F, V>(self, key: &str, builder: F) -> Self
	where
		F: Fn() -> V + Send + Sync + 'static,
		V: IntoView,
	{
		self.set_override(key, Producer::new(builder));
		self
	}

	/// Removes the override for `key`, restoring the scoped or default output. Chainable.
	pub fn remove_override(self, key: &str) -> Self {
		self.store.remove(key);
		self
	}

	/// Removes every instance override. Chainable.
	pub fn reset_overrides(self) -> Self {
		self.store.reset_all();
		self
	}

	/// Non-consuming form of [`SlotHost::override_slot`] for erased producers.
	///
	/// Returns false when the key is empty and nothing was stored.
	pub fn set_override(&self, key: &str, producer: Producer) -> bool {
		let Ok(key) = SlotKey::new(key) else {
			tracing::warn!(container = self.table.container(), "ignoring override with empty slot key");
			return false;
		};
		if !self.table.contains(key.as_str()) {
			if self.warn_undeclared {
				tracing::warn!(container = self.table.container(), key = %key, "override for undeclared slot");
			} else {
				tracing::debug!(container = self.table.container(), key = %key, "override for undeclared slot");
			}
		}
		self.store.set(key, producer);
		true
	}

	/// Resolves a declared slot; `None` if `id` was issued by another container's table.
	pub fn resolve(&self, id: SlotId) -> Option<AnyView> {
		let decl = self.table.decl(id)?;
		Some(self.resolve_decl(&*self.store, decl))
	}

	/// Resolves a slot by key; `None` if the container does not declare it.
	pub fn resolve_key(&self, key: &str) -> Option<AnyView> {
		self.table.get(key).and_then(|id| self.resolve(id))
	}

	/// Resolves every slot in declaration order against one snapshot of the store.
	pub fn render_all(&self) -> Vec<(SlotKey, AnyView)> {
		let snap = self.store.snapshot();
		self.table
			.iter()
			.map(|(_, decl)| (decl.key().clone(), self.resolve_decl(&*snap, decl)))
			.collect()
	}

	fn resolve_decl<S: OverrideSource + ?Sized>(&self, store: &S, decl: &SlotDecl) -> AnyView {
		let source = Layered {
			front: store,
			back: &self.scope,
		};
		resolve_with(&source, decl.key().as_str(), decl.default_producer())
	}

	/// The container's slot declarations.
	pub fn table(&self) -> &Arc<SlotTable> {
		&self.table
	}

	/// The scope this instance was placed in.
	pub fn scope(&self) -> &OverrideScope {
		&self.scope
	}

	/// Shared handle to this instance's store, for tasks that override slots later.
	pub fn store(&self) -> Arc<OverrideStore> {
		Arc::clone(&self.store)
	}

	/// Subscribes to changes of this instance's overrides.
	pub fn subscribe(&self) -> watch::Receiver<u64> {
		self.store.subscribe()
	}
}
