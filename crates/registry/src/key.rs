//! Slot identification.
//!
//! A [`SlotKey`] names one injectable slot inside one container's namespace. Keys are either
//! given explicitly or derived from a default producer's name by stripping the configured
//! trailing marker (`header_view` becomes `header` under the default `_view` suffix).

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::KeyError;

/// Non-empty identifier of a slot, unique within one container.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey(Arc<str>);

impl SlotKey {
	/// Creates a key from an explicit name.
	pub fn new(key: &str) -> Result<Self, KeyError> {
		if key.is_empty() {
			return Err(KeyError::Empty);
		}
		Ok(Self(Arc::from(key)))
	}

	/// Derives a key from a producer name by stripping `suffix`.
	///
	/// Fails when the name does not end in `suffix` or when nothing is left after stripping.
	pub fn derive(producer_name: &str, suffix: &str) -> Result<Self, KeyError> {
		let stem = producer_name
			.strip_suffix(suffix)
			.ok_or_else(|| KeyError::MissingSuffix {
				name: producer_name.to_string(),
				suffix: suffix.to_string(),
			})?;
		if stem.is_empty() {
			return Err(KeyError::EmptyStem {
				name: producer_name.to_string(),
			});
		}
		Ok(Self(Arc::from(stem)))
	}

	/// Returns the key as a string slice.
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for SlotKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&*self.0, f)
	}
}

impl fmt::Display for SlotKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for SlotKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for SlotKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl FromStr for SlotKey {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl TryFrom<&str> for SlotKey {
	type Error = KeyError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl TryFrom<String> for SlotKey {
	type Error = KeyError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(&value)
	}
}
