use crate::Listener;
use core::cell::Cell;
use hashbrown::HashMap;
use js_sys::Function;
use std::rc::Rc;
use tracing::trace;
use wasm_bindgen::{closure::Closure, JsCast};

/// Bridges [`Listener`]s to JavaScript functions, one per listener.
///
/// A bridge stays alive while its listener is installed anywhere.
/// Bridges that are no longer installed are only freed once no bridged callback is running,
/// since a listener that removes itself would otherwise free the closure it's called through.
pub(crate) struct ClosureMap {
	bridges: HashMap<usize, Bridge>,
	released: Vec<Bridge>,
	running: Rc<Cell<usize>>,
}

struct Bridge {
	closure: Closure<dyn Fn(web_sys::Event)>,
	installations: Vec<Installation>,
}

#[derive(PartialEq)]
struct Installation {
	element: web_sys::Element,
	event_type: String,
	capture: bool,
}

impl ClosureMap {
	pub(crate) fn new() -> Self {
		Self {
			bridges: HashMap::new(),
			released: Vec::new(),
			running: Rc::new(Cell::new(0)),
		}
	}

	/// Records an installation and returns the function to install, or [`None`] if it's already installed.
	pub(crate) fn install(&mut self, listener: &Listener<web_sys::Event>, element: &web_sys::Element, event_type: &str, capture: bool) -> Option<Function> {
		let running = &self.running;
		let bridge = self.bridges.entry(listener.id()).or_insert_with(|| {
			trace!("Created Closure.");
			let running = Rc::clone(running);
			let listener = listener.clone();
			Bridge {
				closure: Closure::wrap(Box::new(move |event: web_sys::Event| {
					running.set(running.get() + 1);
					listener.call(&event);
					running.set(running.get() - 1);
				}) as Box<dyn Fn(web_sys::Event)>),
				installations: Vec::new(),
			}
		});

		let installation = Installation {
			element: element.clone(),
			event_type: event_type.to_owned(),
			capture,
		};
		if bridge.installations.contains(&installation) {
			return None;
		}
		bridge.installations.push(installation);
		Some(bridge.closure.as_ref().unchecked_ref::<Function>().clone())
	}

	/// Forgets an installation and returns the function to uninstall, or [`None`] if it wasn't installed.
	pub(crate) fn uninstall(&mut self, listener: &Listener<web_sys::Event>, element: &web_sys::Element, event_type: &str, capture: bool) -> Option<Function> {
		let bridge = self.bridges.get_mut(&listener.id())?;
		let i = bridge
			.installations
			.iter()
			.position(|installation| installation.element == *element && installation.event_type == event_type && installation.capture == capture)?;
		bridge.installations.swap_remove(i);
		let function = bridge.closure.as_ref().unchecked_ref::<Function>().clone();

		if bridge.installations.is_empty() {
			if let Some(bridge) = self.bridges.remove(&listener.id()) {
				self.released.push(bridge)
			}
		}
		Some(function)
	}

	/// Frees released bridges, unless a bridged callback is currently running.
	pub(crate) fn collect(&mut self) {
		if self.running.get() == 0 && !self.released.is_empty() {
			trace!("Destroyed {} Closure(s).", self.released.len());
			self.released.clear();
		}
	}

	pub(crate) fn len(&self) -> usize {
		self.bridges.len()
	}
}
