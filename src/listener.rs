use core::{
	fmt::{self, Debug, Formatter},
	hash::{Hash, Hasher},
};
use std::rc::{Rc, Weak};

/// A shared event callback.
///
/// Listeners compare equal iff they are clones of the same [`Listener::new`] call,
/// which is how [`Collection::off`](`crate::Collection::off`) finds what to remove.
/// Keep a clone around for as long as you may want to detach it.
pub struct Listener<E>(Rc<dyn Fn(&E)>);
impl<E> Listener<E> {
	pub fn new(callback: impl Fn(&E) + 'static) -> Self {
		Self(Rc::new(callback))
	}

	pub fn call(&self, event: &E) {
		(self.0)(event)
	}

	/// A key that is unique among all currently live listeners.
	#[must_use]
	pub fn id(&self) -> usize {
		Rc::as_ptr(&self.0).cast::<()>() as usize
	}

	pub(crate) fn downgrade(&self) -> WeakListener<E> {
		WeakListener(Rc::downgrade(&self.0))
	}
}

impl<E> Clone for Listener<E> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}

impl<E> PartialEq for Listener<E> {
	fn eq(&self, other: &Self) -> bool {
		self.id() == other.id()
	}
}
impl<E> Eq for Listener<E> {}

impl<E> Hash for Listener<E> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id().hash(state)
	}
}

impl<E> Debug for Listener<E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Listener").field(&format_args!("{:#x}", self.id())).finish()
	}
}

/// Lets auto-removing wrappers refer to themselves without a reference cycle.
pub(crate) struct WeakListener<E>(Weak<dyn Fn(&E)>);
impl<E> WeakListener<E> {
	pub(crate) fn upgrade(&self) -> Option<Listener<E>> {
		self.0.upgrade().map(Listener)
	}
}

/// How [`Collection::on`](`crate::Collection::on`) installs a listener.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListenerOptions {
	delegate: Option<String>,
	auto_remove: bool,
}
impl ListenerOptions {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Only call the listener for events whose original target matches `selector`.
	///
	/// `"*"` matches any element target.
	#[must_use]
	pub fn delegate(mut self, selector: impl Into<String>) -> Self {
		self.delegate = Some(selector.into());
		self
	}

	/// Detach the listener right before its first invocation.
	#[must_use]
	pub fn auto_remove(mut self, auto_remove: bool) -> Self {
		self.auto_remove = auto_remove;
		self
	}

	#[must_use]
	pub fn delegate_selector(&self) -> Option<&str> {
		self.delegate.as_deref()
	}

	#[must_use]
	pub fn is_auto_remove(&self) -> bool {
		self.auto_remove
	}
}
