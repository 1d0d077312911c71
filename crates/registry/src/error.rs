//! Error types for slot keys and slot table declarations.

use thiserror::Error;

/// A string could not be turned into a [`crate::SlotKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
	/// Explicit keys must be non-empty.
	#[error("slot key must not be empty")]
	Empty,
	/// Derived keys require the producer name to end in the marker suffix.
	#[error("producer name {name:?} does not end in {suffix:?}")]
	MissingSuffix { name: String, suffix: String },
	/// Stripping the suffix left nothing behind.
	#[error("producer name {name:?} consists only of the marker suffix")]
	EmptyStem { name: String },
}

/// A container's slot declaration is malformed.
///
/// These are raised while building a [`crate::SlotTable`], before any resolution can run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclError {
	/// A container must declare at least one slot.
	#[error("container {container:?} declares no slots")]
	NoSlots { container: String },
	/// A slot's key could not be formed.
	#[error("container {container:?}: invalid slot: {source}")]
	InvalidKey {
		container: String,
		#[source]
		source: KeyError,
	},
	/// Two slots in one container resolve to the same key.
	#[error("container {container:?} declares slot {key:?} more than once")]
	DuplicateKey { container: String, key: String },
}
