//! Slot tables: validated declarations of a container's slots.
//!
//! # Role
//!
//! A container declares its injectable slots once, each with a key and a default producer. The
//! [`SlotTableBuilder`] is the explicit registration step that turns those declarations into an
//! immutable [`SlotTable`]; malformed declarations are rejected here so that resolution never
//! runs against them. Tables are shared by every instance of the container.
//!
//! # Key Derivation
//!
//! [`SlotTableBuilder::slot`] derives the key from the producer's name by stripping the
//! configured suffix ([`SlotConfig::suffix`]). [`SlotTableBuilder::slot_as`] and
//! [`SlotTableBuilder::slot_keyed`] take the key verbatim.
//!
//! # Invariants
//!
//! - A table must declare at least one slot.
//!   - Enforced in: [`SlotTableBuilder::build`].
//!   - Tested by: `tests::test_rejects_empty_container`
//!   - Failure symptom: A container renders nothing and accepts overrides for nothing.
//!
//! - Keys must be unique within one table.
//!   - Enforced in: [`SlotTableBuilder::build`].
//!   - Tested by: `tests::test_rejects_duplicate_keys`
//!   - Failure symptom: One override silently replaces two slots.

mod macros;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::FxHashMap;
use slotkit_config::SlotConfig;

use crate::error::DeclError;
use crate::key::SlotKey;
use crate::producer::Producer;
use crate::view::IntoView;

static NEXT_TABLE: AtomicU32 = AtomicU32::new(0);

/// Dense index of a slot within the table that issued it.
///
/// Ids are only meaningful to their own table; other tables reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
	table: u32,
	index: u32,
}

impl SlotId {
	/// Returns the declaration index.
	#[inline]
	pub fn index(self) -> usize {
		self.index as usize
	}
}

/// One declared slot.
#[derive(Debug, Clone)]
pub struct SlotDecl {
	key: SlotKey,
	producer_name: Option<Box<str>>,
	default: Producer,
}

impl SlotDecl {
	/// The slot's key.
	pub fn key(&self) -> &SlotKey {
		&self.key
	}

	/// Name of the default producer, when one was declared.
	pub fn producer_name(&self) -> Option<&str> {
		self.producer_name.as_deref()
	}

	/// The default producer.
	pub fn default_producer(&self) -> &Producer {
		&self.default
	}
}

/// Immutable, validated slot declarations of one container type.
pub struct SlotTable {
	id: u32,
	container: Box<str>,
	slots: Box<[SlotDecl]>,
	by_key: FxHashMap<SlotKey, SlotId>,
}

impl fmt::Debug for SlotTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SlotTable")
			.field("container", &self.container)
			.field("keys", &self.slots.iter().map(|s| s.key.as_str()).collect::<Vec<_>>())
			.finish()
	}
}

impl SlotTable {
	/// Starts declaring the slots of `container`.
	pub fn builder(container: impl Into<String>) -> SlotTableBuilder {
		SlotTableBuilder::new(container)
	}

	/// Name of the container type.
	pub fn container(&self) -> &str {
		&self.container
	}

	/// Looks up a slot by key.
	#[inline]
	pub fn get(&self, key: &str) -> Option<SlotId> {
		self.by_key.get(key).copied()
	}

	/// Returns the declaration for `id`; `None` if `id` was issued by another table.
	#[inline]
	pub fn decl(&self, id: SlotId) -> Option<&SlotDecl> {
		if id.table != self.id {
			return None;
		}
		self.slots.get(id.index())
	}

	/// Returns the key of `id`; `None` if `id` was issued by another table.
	pub fn key(&self, id: SlotId) -> Option<&SlotKey> {
		self.decl(id).map(|decl| &decl.key)
	}

	/// Iterates declarations in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = (SlotId, &SlotDecl)> + '_ {
		let table = self.id;
		self.slots.iter().enumerate().map(move |(i, decl)| {
			let id = SlotId {
				table,
				index: i as u32,
			};
			(id, decl)
		})
	}

	/// Returns true if `key` is declared.
	pub fn contains(&self, key: &str) -> bool {
		self.by_key.contains_key(key)
	}

	/// Number of declared slots. Never zero.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Always false for a built table.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}
}

enum SlotName {
	Derived(String),
	Explicit {
		key: String,
		producer_name: Option<String>,
	},
}

struct PendingSlot {
	name: SlotName,
	default: Producer,
}

/// Builder for a [`SlotTable`].
pub struct SlotTableBuilder {
	container: String,
	suffix: String,
	pending: Vec<PendingSlot>,
}

impl SlotTableBuilder {
	/// Creates a builder using the default configuration.
	pub fn new(container: impl Into<String>) -> Self {
		Self {
			container: container.into(),
			suffix: slotkit_config::DEFAULT_SUFFIX.to_string(),
			pending: Vec::new(),
		}
	}

	/// Applies key-derivation settings from `config`.
	pub fn with_config(mut self, config: &SlotConfig) -> Self {
		self.suffix.clone_from(&config.suffix);
		self
	}

	/// Declares a slot whose key is derived from `producer_name`.
	pub fn slot<F, V>(self, producer_name: impl Into<String>, default: F) -> Self
	where
		F: Fn() -> V + Send + Sync + 'static,
		V: IntoView,
	{
		self.push(SlotName::Derived(producer_name.into()), Producer::new(default))
	}

	/// Declares a slot with an explicit key, recording the producer's name.
	pub fn slot_as<F, V>(self, producer_name: impl Into<String>, key: impl Into<String>, default: F) -> Self
	where
		F: Fn() -> V + Send + Sync + 'static,
		V: IntoView,
	{
		let name = SlotName::Explicit {
			key: key.into(),
			producer_name: Some(producer_name.into()),
		};
		self.push(name, Producer::new(default))
	}

	/// Declares a slot with an explicit key and an already erased default.
	pub fn slot_keyed(self, key: impl Into<String>, default: Producer) -> Self {
		let name = SlotName::Explicit {
			key: key.into(),
			producer_name: None,
		};
		self.push(name, default)
	}

	/// Returns the number of slots declared so far.
	pub fn len(&self) -> usize {
		self.pending.len()
	}

	/// Returns true if no slot has been declared yet.
	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}

	/// Validates the declarations and produces the table.
	pub fn build(self) -> Result<Arc<SlotTable>, DeclError> {
		let Self {
			container,
			suffix,
			pending,
		} = self;

		if pending.is_empty() {
			return Err(DeclError::NoSlots { container });
		}

		let table = NEXT_TABLE.fetch_add(1, Ordering::Relaxed);
		let mut slots = Vec::with_capacity(pending.len());
		let mut by_key = FxHashMap::default();
		for PendingSlot { name, default } in pending {
			let keyed = match name {
				SlotName::Derived(producer_name) => SlotKey::derive(&producer_name, &suffix)
					.map(|key| (key, Some(producer_name))),
				SlotName::Explicit { key, producer_name } => {
					SlotKey::new(&key).map(|key| (key, producer_name))
				}
			};
			let (key, producer_name) = keyed.map_err(|source| DeclError::InvalidKey {
				container: container.clone(),
				source,
			})?;

			let id = SlotId {
				table,
				index: slots.len() as u32,
			};
			if by_key.insert(key.clone(), id).is_some() {
				return Err(DeclError::DuplicateKey {
					container,
					key: key.to_string(),
				});
			}
			slots.push(SlotDecl {
				key,
				producer_name: producer_name.map(String::into_boxed_str),
				default,
			});
		}

		tracing::debug!(container = %container, slots = slots.len(), "slots.table.build");
		Ok(Arc::new(SlotTable {
			id: table,
			container: container.into_boxed_str(),
			slots: slots.into_boxed_slice(),
			by_key,
		}))
	}

	fn push(mut self, name: SlotName, default: Producer) -> Self {
		self.pending.push(PendingSlot { name, default });
		self
	}
}
