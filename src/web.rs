//! The browser DOM as [`Host`].

use crate::{closure_map::ClosureMap, Host, Listener};
use core::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
};
use tracing::instrument;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event};

/// Queries and subscribes through [`web_sys`].
///
/// Each distinct [`Listener`] is bridged to a single JavaScript function, which is kept alive for as long as
/// it is installed on any element through this host.
///
/// # Dropping
///
/// Listeners that are still installed when the [`WebHost`] (and with it the owning [`Dom`](`crate::Dom`)) is dropped
/// will start throwing errors into JavaScript when their event fires. Remove them with [`off`](`crate::Collection::off`) first.
pub struct WebHost {
	document: Document,
	closures: RefCell<ClosureMap>,
}
impl WebHost {
	#[must_use]
	pub fn new(document: Document) -> Self {
		Self {
			document,
			closures: RefCell::new(ClosureMap::new()),
		}
	}

	/// The current window's document, if there is one.
	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window()?.document().map(Self::new)
	}

	pub fn document(&self) -> &Document {
		&self.document
	}

	/// The number of listeners currently bridged to JavaScript.
	#[must_use]
	pub fn bridge_count(&self) -> usize {
		self.closures.borrow().len()
	}
}

impl Host for WebHost {
	type Element = Element;
	type Event = Event;
	type Error = JsValue;

	fn query_selector_all(&self, scope: Option<&Element>, selector: &str) -> Result<Vec<Element>, JsValue> {
		let nodes = match scope {
			Some(scope) => scope.query_selector_all(selector)?,
			None => self.document.query_selector_all(selector)?,
		};
		Ok((0..nodes.length()).filter_map(|i| nodes.item(i)).filter_map(|node| node.dyn_into::<Element>().ok()).collect())
	}

	fn matches(&self, element: &Element, selector: &str) -> Result<bool, JsValue> {
		element.matches(selector)
	}

	fn event_target(&self, event: &Event) -> Option<Element> {
		event.target()?.dyn_into::<Element>().ok()
	}

	#[cfg_attr(feature = "dangerous-logging", instrument(skip(self, listener)))]
	#[cfg_attr(not(feature = "dangerous-logging"), instrument(skip_all))]
	fn add_event_listener(&self, element: &Element, event_type: &str, listener: &Listener<Event>, capture: bool) -> Result<(), JsValue> {
		let mut closures = self.closures.borrow_mut();
		closures.collect();
		let function = match closures.install(listener, element, event_type, capture) {
			Some(function) => function,
			None => return Ok(()),
		};
		drop(closures);

		element.add_event_listener_with_callback_and_bool(event_type, &function, capture).map_err(|error| {
			self.closures.borrow_mut().uninstall(listener, element, event_type, capture);
			error
		})
	}

	#[cfg_attr(feature = "dangerous-logging", instrument(skip(self, listener)))]
	#[cfg_attr(not(feature = "dangerous-logging"), instrument(skip_all))]
	fn remove_event_listener(&self, element: &Element, event_type: &str, listener: &Listener<Event>, capture: bool) -> Result<(), JsValue> {
		let function = self.closures.borrow_mut().uninstall(listener, element, event_type, capture);
		let result = match function {
			Some(function) => element.remove_event_listener_with_callback_and_bool(event_type, &function, capture),
			None => Ok(()),
		};
		self.closures.borrow_mut().collect();
		result
	}
}

impl Debug for WebHost {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebHost").field("document", &self.document).field("bridges", &self.bridge_count()).finish()
	}
}
