//! Runtime-overridable slots for declarative UI containers.
//!
//! A container declares injectable slots, each a key plus a default view producer. Callers may
//! override any slot at runtime; at render time every slot resolves to the override if one is
//! present and to its default otherwise.
//!
//! # Modules
//!
//! - [`key`] - Slot keys and the suffix-stripping derivation rule
//! - [`view`] - Type-erased renderable values
//! - [`store`] - Instance-owned, thread-safe override store with change notifications
//! - [`scope`] - Immutable override scopes threaded down a subtree
//! - [`resolve`] - The override-or-default resolution step
//! - [`table`] - Validated slot declarations and the [`slot_table!`] macro
//! - [`host`] - Container instances tying tables, stores and scopes together
//!
//! # Example
//!
//! ```
//! use slotkit_registry::{SlotHost, SlotTable, Text};
//!
//! let table = SlotTable::builder("ProfileCard")
//! 	.slot("header_view", || Text::new("Profile"))
//! 	.slot("footer_view", || Text::new("Updated today"))
//! 	.build()
//! 	.unwrap();
//!
//! let card = SlotHost::new(table).override_slot("footer", || Text::new("Offline"));
//!
//! assert_eq!(card.resolve_key("header").unwrap().render(), "Profile");
//! assert_eq!(card.resolve_key("footer").unwrap().render(), "Offline");
//! ```

pub mod error;
pub mod host;
pub mod key;
pub mod producer;
pub mod resolve;
pub mod scope;
pub mod store;
pub mod table;
pub mod view;

#[cfg(test)]
mod invariants;

pub use error::{DeclError, KeyError};
pub use host::SlotHost;
pub use key::SlotKey;
pub use producer::Producer;
pub use resolve::{Layered, OverrideSource, resolve, resolve_with};
pub use scope::{OverrideScope, override_map};
pub use slotkit_config::SlotConfig;
pub use store::{OverrideMap, OverrideStore};
pub use table::{SlotDecl, SlotId, SlotTable, SlotTableBuilder};
pub use view::{AnyView, IntoView, Text, View};
