//! Zero-argument view producers.

use std::fmt;
use std::sync::Arc;

use crate::view::{AnyView, IntoView};

/// A cloneable factory for an erased view.
///
/// Both slot defaults and overrides are producers. Storing a producer never invokes it; each
/// resolution calls it afresh.
#[derive(Clone)]
pub struct Producer(Arc<dyn Fn() -> AnyView + Send + Sync>);

impl Producer {
	/// Wraps a closure returning any view type.
	pub fn new<F, V>(f: F) -> Self
	where
		F: Fn() -> V + Send + Sync + 'static,
		V: IntoView,
	{
		Self(Arc::new(move || f().into_view()))
	}

	/// Invokes the producer.
	#[inline]
	pub fn invoke(&self) -> AnyView {
		(self.0)()
	}

	/// Returns true if both handles share the same closure.
	pub fn ptr_eq(&self, other: &Producer) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for Producer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Producer(..)")
	}
}
