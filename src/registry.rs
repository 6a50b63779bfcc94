//! Bookkeeping for delegated listeners.
//!
//! Delegated listeners are installed as wrappers, so the callback passed to [`off`](`crate::Collection::off`)
//! can't be handed to the host directly. Instead, each wrapper is recorded here together with the element it
//! was installed on and the selector it delegates to.

use crate::{Host, Listener};
use core::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
};
use hashbrown::HashMap;
use tracing::trace;

/// The wildcard delegation selector. It matches any target and, in [`off`](`crate::Collection::off`), any delegation.
pub const WILDCARD: &str = "*";

/// Describes one installed delegation wrapper.
pub struct DelegatedListener<H: Host> {
	pub element: H::Element,
	pub delegated_to: String,
	pub original: Listener<H::Event>,
	pub wrapper: Listener<H::Event>,
}
impl<H: Host> DelegatedListener<H> {
	/// Whether [`off`](`crate::Collection::off`) on `element` with `delegate` should remove this listener.
	#[must_use]
	pub fn is_removed_by(&self, element: &H::Element, delegate: &str) -> bool {
		self.element == *element && (self.delegated_to == delegate || self.delegated_to == WILDCARD || delegate == WILDCARD)
	}
}

impl<H: Host> Clone for DelegatedListener<H> {
	fn clone(&self) -> Self {
		Self {
			element: self.element.clone(),
			delegated_to: self.delegated_to.clone(),
			original: self.original.clone(),
			wrapper: self.wrapper.clone(),
		}
	}
}

impl<H: Host> Debug for DelegatedListener<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("DelegatedListener")
			.field("element", &self.element)
			.field("delegated_to", &self.delegated_to)
			.field("original", &self.original)
			.field("wrapper", &self.wrapper)
			.finish()
	}
}

/// Event type → delegated listeners of that type, in installation order.
///
/// Lists are only ever borrowed for the duration of a single method call,
/// so listeners may freely (un)register from inside event handlers.
pub struct ListenerRegistry<H: Host> {
	listeners: RefCell<HashMap<String, Vec<DelegatedListener<H>>>>,
}
impl<H: Host> Default for ListenerRegistry<H> {
	fn default() -> Self {
		Self::new()
	}
}
impl<H: Host> ListenerRegistry<H> {
	#[must_use]
	pub fn new() -> Self {
		Self { listeners: RefCell::new(HashMap::new()) }
	}

	pub(crate) fn insert(&self, event_type: &str, listener: DelegatedListener<H>) {
		let mut listeners = self.listeners.borrow_mut();
		let list = listeners.entry(event_type.to_owned()).or_insert_with(Vec::new);
		list.push(listener);
		trace!(event_type, count = list.len(), "Registered delegated listener.");
	}

	/// The listeners of `event_type` that [`off`](`crate::Collection::off`) on `element` with `delegate` removes,
	/// in reverse installation order.
	///
	/// They stay registered until [`remove`](`ListenerRegistry::remove`)d one by one.
	pub(crate) fn matching(&self, event_type: &str, element: &H::Element, delegate: &str) -> Vec<DelegatedListener<H>> {
		self.listeners.borrow().get(event_type).map_or_else(Vec::new, |list| {
			list.iter().rev().filter(|listener| listener.is_removed_by(element, delegate)).cloned().collect()
		})
	}

	/// Unregisters the installation of `wrapper` on `element`, if it is registered.
	pub(crate) fn remove(&self, event_type: &str, element: &H::Element, wrapper: &Listener<H::Event>) -> bool {
		let mut listeners = self.listeners.borrow_mut();
		let list = match listeners.get_mut(event_type) {
			Some(list) => list,
			None => return false,
		};
		match list.iter().rposition(|listener| listener.element == *element && listener.wrapper == *wrapper) {
			Some(i) => {
				list.remove(i);
				trace!(event_type, remaining = list.len(), "Unregistered delegated listener.");
				true
			}
			None => false,
		}
	}

	/// The number of registered delegated listeners of `event_type`.
	#[must_use]
	pub fn len(&self, event_type: &str) -> usize {
		self.listeners.borrow().get(event_type).map_or(0, Vec::len)
	}

	/// Whether no delegated listeners are registered for any event type.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.listeners.borrow().values().all(Vec::is_empty)
	}

	/// A copy of the registered delegated listeners of `event_type`, in installation order.
	#[must_use]
	pub fn snapshot(&self, event_type: &str) -> Vec<DelegatedListener<H>> {
		self.listeners.borrow().get(event_type).cloned().unwrap_or_default()
	}
}

impl<H: Host> Debug for ListenerRegistry<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ListenerRegistry").field("listeners", &self.listeners).finish()
	}
}
