//! Configuration for slotkit.
//!
//! Slot configuration controls how slot keys are derived from producer names and how loudly
//! the runtime reports suspicious overrides. It is plain data: every container builder and
//! host receives it explicitly, nothing is read from global state.
//!
//! # Configuration File
//!
//! ```toml
//! [slots]
//! suffix = "_view"
//! warn-undeclared = true
//! store-label = "profile"
//! ```
//!
//! Every field is optional; missing fields take the values of [`SlotConfig::default`].

mod error;

use std::path::Path;

pub use error::{ConfigError, Result};
use serde::Deserialize;

/// Suffix stripped from producer names when no explicit key is given.
pub const DEFAULT_SUFFIX: &str = "_view";

/// Slot declaration and diagnostics settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SlotConfig {
	/// Trailing marker every derived producer name must carry.
	pub suffix: String,
	/// Log overrides for undeclared keys at `warn` instead of `debug`.
	pub warn_undeclared: bool,
	/// Label attached to store log events. Defaults to the container name.
	pub store_label: Option<String>,
}

impl Default for SlotConfig {
	fn default() -> Self {
		Self {
			suffix: DEFAULT_SUFFIX.to_string(),
			warn_undeclared: false,
			store_label: None,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
	slots: SlotConfig,
}

impl SlotConfig {
	/// Parses a configuration document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let file: ConfigFile = toml::from_str(input)?;
		file.slots.validate()
	}

	/// Reads and parses a configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// Replaces the derivation suffix.
	pub fn with_suffix(mut self, suffix: impl Into<String>) -> Result<Self> {
		self.suffix = suffix.into();
		self.validate()
	}

	fn validate(self) -> Result<Self> {
		if self.suffix.is_empty() || self.suffix.chars().any(char::is_whitespace) {
			return Err(ConfigError::InvalidSuffix(self.suffix));
		}
		Ok(self)
	}
}
