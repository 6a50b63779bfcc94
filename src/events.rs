//! Listener (de)installation on [`Collection`]s.

use crate::{
	listener::WeakListener,
	registry::{DelegatedListener, WILDCARD},
	Collection, Dom, Error, EventTypes, Host, Listener, ListenerOptions,
};
use core::cell::{Cell, OnceCell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{debug, trace, trace_span, warn};

impl<H: Host> Collection<H> {
	/// Installs `callback` for each of `types` on each element.
	///
	/// With [`ListenerOptions::delegate`], the listener is installed in the capture phase and only called
	/// for events whose original target matches the delegation selector. Such listeners can only be removed
	/// by passing the same selector (or `"*"`) to [`off`](`Collection::off`).
	///
	/// With [`ListenerOptions::auto_remove`], the listener removes itself from all elements (and for all `types`)
	/// before it is first called.
	///
	/// # Errors
	///
	/// - [`Error::NoEventTypes`] or [`Error::InvalidEventType`] for malformed `types`, before anything is installed.
	/// - [`Error::Host`] if the host rejects an installation. Earlier installations are kept.
	pub fn on(&self, types: impl Into<EventTypes>, callback: &Listener<H::Event>, options: ListenerOptions) -> Result<&Self, Error<H::Error>> {
		let types = types.into();
		types.validate::<H::Error>()?;
		let span = trace_span!("on", types = types.len(), elements = self.len(), auto_remove = options.is_auto_remove());
		let _enter = span.enter();

		let host = self.dom.host();
		match options.delegate_selector() {
			None => {
				let listener = if options.is_auto_remove() {
					self.auto_removing(&types, callback)
				} else {
					callback.clone()
				};
				for event_type in &types {
					for element in self {
						host.add_event_listener(element, event_type, &listener, false).map_err(Error::Host)?;
					}
				}
				debug!(delegated = false, "Installed listeners.");
			}
			Some(delegate) => {
				for event_type in &types {
					let group = options.is_auto_remove().then(|| Rc::new(OnceGroup::default()));
					for element in self {
						let wrapper = self.delegating(event_type, delegate, callback, group.clone());
						if let Some(group) = &group {
							group.wrappers.borrow_mut().push((element.clone(), wrapper.downgrade()));
						}
						host.add_event_listener(element, event_type, &wrapper, true).map_err(Error::Host)?;
						self.dom.registry().insert(
							event_type,
							DelegatedListener {
								element: element.clone(),
								delegated_to: delegate.to_owned(),
								original: callback.clone(),
								wrapper,
							},
						);
					}
				}
				if cfg!(feature = "dangerous-logging") {
					debug!(delegated = true, delegate, "Installed listeners.");
				} else {
					debug!(delegated = true, "Installed listeners.");
				}
			}
		}
		Ok(self)
	}

	/// [`on`](`Collection::on`) with [`ListenerOptions::auto_remove`] forced on.
	///
	/// # Errors
	///
	/// See [`on`](`Collection::on`).
	pub fn once(&self, types: impl Into<EventTypes>, callback: &Listener<H::Event>, options: ListenerOptions) -> Result<&Self, Error<H::Error>> {
		self.on(types, callback, options.auto_remove(true))
	}

	/// Removes listeners for each of `types` from each element.
	///
	/// Without `delegate`, `callback` itself is uninstalled. Removing a listener that isn't installed does nothing.
	///
	/// With `delegate`, all delegated listeners on the element that were installed with the same delegation selector
	/// are removed, regardless of `callback`. `"*"` on either side matches any delegation selector.
	///
	/// # Errors
	///
	/// - [`Error::NoEventTypes`] or [`Error::InvalidEventType`] for malformed `types`, before anything is removed.
	/// - [`Error::Host`] if the host rejects a removal. Listeners that weren't removed stay registered.
	pub fn off(&self, types: impl Into<EventTypes>, callback: &Listener<H::Event>, delegate: Option<&str>) -> Result<&Self, Error<H::Error>> {
		let types = types.into();
		types.validate::<H::Error>()?;
		let span = trace_span!("off", types = types.len(), elements = self.len(), delegated = delegate.is_some());
		let _enter = span.enter();

		for event_type in &types {
			for element in self {
				let removed = match delegate {
					None => self.dom.host().remove_event_listener(element, event_type, callback, false),
					Some(delegate) => self.dom.detach_delegated(event_type, element, delegate),
				};
				removed.map_err(Error::Host)?;
			}
		}
		trace!(registry_empty = self.dom.registry().is_empty(), "Removed listeners.");
		Ok(self)
	}

	/// Wraps `callback` so that it uninstalls itself from this collection's elements before running.
	fn auto_removing(&self, types: &EventTypes, callback: &Listener<H::Event>) -> Listener<H::Event> {
		let dom: Weak<Dom<H>> = Rc::downgrade(&self.dom);
		let elements = self.to_vec();
		let types = types.clone();
		let callback = callback.clone();
		let fired = Cell::new(false);
		let this: Rc<OnceCell<WeakListener<H::Event>>> = Rc::new(OnceCell::new());

		let wrapper = Listener::new({
			let this = Rc::clone(&this);
			move |event: &H::Event| {
				if fired.replace(true) {
					trace!("Skipped auto-removed listener.");
					return;
				}
				if let (Some(dom), Some(this)) = (dom.upgrade(), this.get().and_then(WeakListener::upgrade)) {
					for event_type in &types {
						for element in &elements {
							if let Err(error) = dom.host().remove_event_listener(element, event_type, &this, false) {
								warn!(?error, event_type = event_type.as_str(), "Failed to auto-remove listener.");
							}
						}
					}
				}
				callback.call(event)
			}
		});
		// The cell is fresh, so this can't fail.
		let _ = this.set(wrapper.downgrade());
		wrapper
	}

	/// Wraps `callback` so that it only runs for events whose original target matches `delegate`.
	///
	/// With a `group`, the first call uninstalls all of the group's wrappers, and nothing else.
	fn delegating(&self, event_type: &str, delegate: &str, callback: &Listener<H::Event>, group: Option<Rc<OnceGroup<H>>>) -> Listener<H::Event> {
		let dom: Weak<Dom<H>> = Rc::downgrade(&self.dom);
		let event_type = event_type.to_owned();
		let delegate = delegate.to_owned();
		let callback = callback.clone();

		Listener::new(move |event: &H::Event| {
			let dom = match dom.upgrade() {
				Some(dom) => dom,
				None => return,
			};
			let target = match dom.host().event_target(event) {
				Some(target) => target,
				None => {
					trace!("Event target is not an element.");
					return;
				}
			};
			if delegate != WILDCARD {
				match dom.host().matches(&target, &delegate) {
					Ok(true) => (),
					Ok(false) => return,
					Err(error) => {
						warn!(?error, event_type = event_type.as_str(), "Could not match delegated event target.");
						return;
					}
				}
			}

			if let Some(group) = &group {
				if group.fired.replace(true) {
					trace!("Skipped auto-removed listener.");
					return;
				}
				let wrappers = core::mem::take(&mut *group.wrappers.borrow_mut());
				for (element, wrapper) in wrappers {
					if let Some(wrapper) = wrapper.upgrade() {
						if let Err(error) = dom.detach_wrapper(&event_type, &element, &wrapper) {
							warn!(?error, event_type = event_type.as_str(), "Failed to auto-remove delegated listener.");
						}
					}
				}
			}
			callback.call(event)
		})
	}
}

/// The delegation wrappers one auto-removing [`Collection::on`] call installed for one event type.
struct OnceGroup<H: Host> {
	fired: Cell<bool>,
	wrappers: RefCell<Vec<(H::Element, WeakListener<H::Event>)>>,
}
impl<H: Host> Default for OnceGroup<H> {
	fn default() -> Self {
		Self {
			fired: Cell::new(false),
			wrappers: RefCell::new(Vec::new()),
		}
	}
}
