//! Type-erased renderable values.
//!
//! Slots in one container are satisfied by structurally different view types, yet the override
//! store keeps them in one mapping and the resolver returns one type for every slot. [`View`] is
//! the capability every concrete output implements; [`AnyView`] is the uniform erased handle.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A value that can be rendered by the host framework.
///
/// The host is an external collaborator, so rendering here is the minimal textual form used for
/// diagnostics and the terminal demo.
pub trait View: Any + Send + Sync {
	/// Renders the view to text.
	fn render(&self) -> String;
}

impl View for String {
	fn render(&self) -> String {
		self.clone()
	}
}

impl View for &'static str {
	fn render(&self) -> String {
		(*self).to_string()
	}
}

/// Plain text view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text(pub String);

impl Text {
	/// Creates a text view.
	pub fn new(text: impl Into<String>) -> Self {
		Self(text.into())
	}
}

impl View for Text {
	fn render(&self) -> String {
		self.0.clone()
	}
}

/// Uniform wrapper over any [`View`].
///
/// Cloning shares the underlying view.
#[derive(Clone)]
pub struct AnyView(Arc<dyn View>);

impl AnyView {
	/// Erases a concrete view.
	pub fn new<V: View>(view: V) -> Self {
		Self(Arc::new(view))
	}

	/// Renders the wrapped view.
	pub fn render(&self) -> String {
		self.0.render()
	}

	/// Returns the wrapped view if it is a `V`.
	pub fn downcast_ref<V: View>(&self) -> Option<&V> {
		let any: &dyn Any = &*self.0;
		any.downcast_ref()
	}

	/// Returns true if the wrapped view is a `V`.
	pub fn is<V: View>(&self) -> bool {
		self.downcast_ref::<V>().is_some()
	}
}

impl fmt::Debug for AnyView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("AnyView").field(&self.render()).finish()
	}
}

/// Conversion into an erased view.
///
/// Implemented for every [`View`] and for [`AnyView`] itself, so producers that already return
/// erased values are not wrapped twice.
pub trait IntoView {
	/// Performs the conversion.
	fn into_view(self) -> AnyView;
}

impl<V: View> IntoView for V {
	fn into_view(self) -> AnyView {
		AnyView::new(self)
	}
}

impl IntoView for AnyView {
	fn into_view(self) -> AnyView {
		self
	}
}
