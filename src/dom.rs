use crate::{registry::ListenerRegistry, Collection, Host, Listener};
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;
use tracing::{debug, instrument, trace};

/// What a new [`Collection`] is selected within. See [`Dom::select`].
pub enum Context<'a, H: Host> {
	/// The whole document. Equivalent to no context.
	Document,
	/// The elements matching this selector.
	Selector(&'a str),
	/// The elements of an existing [`Collection`].
	Collection(&'a Collection<H>),
	Element(H::Element),
	Elements(Vec<H::Element>),
}

impl<H: Host> Debug for Context<'_, H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Context::Document => f.write_str("Document"),
			Context::Selector(selector) => f.debug_tuple("Selector").field(selector).finish(),
			Context::Collection(collection) => f.debug_tuple("Collection").field(collection).finish(),
			Context::Element(element) => f.debug_tuple("Element").field(element).finish(),
			Context::Elements(elements) => f.debug_tuple("Elements").field(elements).finish(),
		}
	}
}

/// Owns a [`Host`] and the delegated listeners installed through it.
///
/// Every [`Collection`] keeps its [`Dom`] alive. Installed listeners only hold weak references,
/// so once the last [`Collection`] and outside reference are dropped, the registry goes away with the host.
pub struct Dom<H: Host> {
	host: H,
	registry: ListenerRegistry<H>,
}
impl<H: Host> Dom<H> {
	#[must_use]
	pub fn new(host: H) -> Rc<Self> {
		trace!("Created Dom.");
		Rc::new(Self {
			host,
			registry: ListenerRegistry::new(),
		})
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn registry(&self) -> &ListenerRegistry<H> {
		&self.registry
	}

	/// An empty [`Collection`], ready for [`push`](`Collection::push`) and friends.
	#[must_use]
	pub fn collection(self: &Rc<Self>) -> Collection<H> {
		Collection::new(Rc::clone(self), Vec::new(), None)
	}

	/// Builds a [`Collection`] from `selector`, optionally within `context`.
	///
	/// - Without either, the result is empty.
	/// - Without a context (or with [`Context::Document`]), all elements in the document matching `selector`.
	/// - With any other context, the context's elements, narrowed to their descendants matching `selector` if one is given.
	///
	/// The resulting [`Collection::selector`] is `selector` if given, otherwise the context's selector, if any.
	///
	/// # Errors
	///
	/// The host's error, unchanged, iff a selector is invalid.
	#[cfg_attr(feature = "dangerous-logging", instrument(skip(self)))]
	#[cfg_attr(not(feature = "dangerous-logging"), instrument(skip_all))]
	pub fn select(self: &Rc<Self>, selector: Option<&str>, context: Option<Context<'_, H>>) -> Result<Collection<H>, H::Error> {
		let (scopes, context_selector) = match context {
			None | Some(Context::Document) => {
				let elements = match selector {
					Some(selector) => self.host.query_selector_all(None, selector)?,
					None => Vec::new(),
				};
				return Ok(Collection::new(Rc::clone(self), elements, selector.map(ToOwned::to_owned)));
			}
			Some(Context::Selector(context)) => (self.host.query_selector_all(None, context)?, Some(context.to_owned())),
			Some(Context::Collection(collection)) => (collection.to_vec(), collection.selector().map(ToOwned::to_owned)),
			Some(Context::Element(element)) => (vec![element], None),
			Some(Context::Elements(elements)) => (elements, None),
		};

		let elements = match selector {
			Some(selector) => self.find_within(&scopes, selector)?,
			None => scopes,
		};
		debug!(count = elements.len(), "Selected elements.");
		Ok(Collection::new(Rc::clone(self), elements, selector.map(ToOwned::to_owned).or(context_selector)))
	}

	pub(crate) fn find_within(&self, scopes: &[H::Element], selector: &str) -> Result<Vec<H::Element>, H::Error> {
		let mut found = Vec::new();
		for scope in scopes {
			found.extend(self.host.query_selector_all(Some(scope), selector)?);
		}
		Ok(found)
	}

	/// Uninstalls and unregisters the delegated listeners of `event_type` on `element` that `delegate` removes.
	///
	/// Listeners are unregistered only once the host has uninstalled them, so on error the rest stay registered
	/// in their original order.
	pub(crate) fn detach_delegated(&self, event_type: &str, element: &H::Element, delegate: &str) -> Result<(), H::Error> {
		for listener in self.registry.matching(event_type, element, delegate) {
			self.detach_wrapper(event_type, &listener.element, &listener.wrapper)?;
		}
		Ok(())
	}

	/// Uninstalls and unregisters one delegation wrapper.
	pub(crate) fn detach_wrapper(&self, event_type: &str, element: &H::Element, wrapper: &Listener<H::Event>) -> Result<(), H::Error> {
		self.host.remove_event_listener(element, event_type, wrapper, true)?;
		self.registry.remove(event_type, element, wrapper);
		Ok(())
	}
}

impl<H: Host + Debug> Debug for Dom<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dom").field("host", &self.host).field("registry", &self.registry).finish()
	}
}
