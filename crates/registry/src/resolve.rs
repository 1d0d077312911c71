//! Slot resolution.
//!
//! Every slot accessor reduces to [`resolve`]: ask an [`OverrideSource`] for the slot's key and
//! invoke the override if one exists, otherwise invoke the default and erase its output.
//! Nothing is cached, so an override written between two render passes takes effect on the
//! second one.

use std::sync::Arc;

use crate::producer::Producer;
use crate::store::{OverrideMap, OverrideStore};
use crate::view::{AnyView, IntoView};

/// Read-only lookup of override producers by slot key.
pub trait OverrideSource {
	/// Returns the producer overriding `key`, if any.
	fn lookup(&self, key: &str) -> Option<Producer>;
}

impl OverrideSource for OverrideStore {
	fn lookup(&self, key: &str) -> Option<Producer> {
		self.get(key)
	}
}

impl OverrideSource for OverrideMap {
	fn lookup(&self, key: &str) -> Option<Producer> {
		self.get(key).cloned()
	}
}

impl<S: OverrideSource + ?Sized> OverrideSource for &S {
	fn lookup(&self, key: &str) -> Option<Producer> {
		(**self).lookup(key)
	}
}

impl<S: OverrideSource + ?Sized> OverrideSource for Arc<S> {
	fn lookup(&self, key: &str) -> Option<Producer> {
		(**self).lookup(key)
	}
}

/// Two sources consulted in order; the first one wins.
///
/// Used by hosts to put the instance store in front of an enclosing scope.
#[derive(Debug, Clone, Copy)]
pub struct Layered<A, B> {
	/// Consulted first.
	pub front: A,
	/// Consulted when `front` has no override.
	pub back: B,
}

impl<A: OverrideSource, B: OverrideSource> OverrideSource for Layered<A, B> {
	fn lookup(&self, key: &str) -> Option<Producer> {
		self.front.lookup(key).or_else(|| self.back.lookup(key))
	}
}

/// Resolves a slot against `source`, falling back to `default`.
pub fn resolve<S, F, V>(source: &S, key: &str, default: F) -> AnyView
where
	S: OverrideSource + ?Sized,
	F: FnOnce() -> V,
	V: IntoView,
{
	match source.lookup(key) {
		Some(producer) => {
			tracing::trace!(key, overridden = true, "slots.resolve");
			producer.invoke()
		}
		None => {
			tracing::trace!(key, overridden = false, "slots.resolve");
			default().into_view()
		}
	}
}

/// Resolves a slot whose default is an erased [`Producer`].
#[inline]
pub fn resolve_with<S>(source: &S, key: &str, default: &Producer) -> AnyView
where
	S: OverrideSource + ?Sized,
{
	resolve(source, key, || default.invoke())
}
