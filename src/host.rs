//! The capabilities `brief-dom` borrows from its environment.

use crate::Listener;
use core::fmt::Debug;

/// A document implementation that [`Collection`](`crate::Collection`)s query and subscribe to.
///
/// `brief-dom` does not parse selectors or dispatch events itself.
/// Everything in this trait is forwarded to the host as-is, including errors for malformed selectors.
///
/// Two implementations are included: [`WebHost`](`crate::web::WebHost`) for the browser DOM
/// and [`MemoryDom`](`crate::memory::MemoryDom`) for deterministic use outside of it.
pub trait Host: Sized + 'static {
	/// A handle to an element. Equality must be identity of the underlying element.
	type Element: Clone + PartialEq + Debug + 'static;
	/// The event value listeners receive.
	type Event: 'static;
	/// The error raised for invalid selectors or failed listener (de)installation.
	type Error: Debug;

	/// Finds all elements matching `selector` in document order.
	///
	/// With a `scope`, only proper descendants of that element are returned.
	///
	/// # Errors
	///
	/// Iff `selector` can't be parsed by the host.
	fn query_selector_all(&self, scope: Option<&Self::Element>, selector: &str) -> Result<Vec<Self::Element>, Self::Error>;

	/// # Errors
	///
	/// Iff `selector` can't be parsed by the host.
	fn matches(&self, element: &Self::Element, selector: &str) -> Result<bool, Self::Error>;

	/// The element the event was originally dispatched to, if that target is an element.
	fn event_target(&self, event: &Self::Event) -> Option<Self::Element>;

	/// Installs `listener` for `event_type` on `element`.
	///
	/// Installing the same (`event_type`, `listener`, `capture`) combination twice should have no additional effect.
	///
	/// # Errors
	///
	/// Iff the host rejects the installation.
	fn add_event_listener(&self, element: &Self::Element, event_type: &str, listener: &Listener<Self::Event>, capture: bool) -> Result<(), Self::Error>;

	/// Uninstalls `listener` for `event_type` from `element`. Absent registrations are ignored.
	///
	/// # Errors
	///
	/// Iff the host rejects the removal.
	fn remove_event_listener(&self, element: &Self::Element, event_type: &str, listener: &Listener<Self::Event>, capture: bool) -> Result<(), Self::Error>;
}
