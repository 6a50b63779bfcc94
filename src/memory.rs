//! A small in-memory document, for use outside of browsers.
//!
//! [`MemoryDom`] supports just enough to drive [`Collection`](`crate::Collection`)s deterministically:
//! an element tree with tag names, ids and classes, selectors made of those (plus `*`) joined by
//! descendant and child (`>`) combinators and separated by commas, and capture/bubble event dispatch.

use crate::{Host, Listener};
use core::cell::{Cell, RefCell};
use thiserror::Error;
use tracing::trace;

/// An element handle. Only meaningful for the [`MemoryDom`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
	#[error("{0:?} is not a valid selector")]
	Invalid(String),
}

/// Errors from [`MemoryDom`]'s tree operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
	#[error("{0:?} does not belong to this document")]
	UnknownNode(NodeId),
	#[error("{child:?} can't be appended to {parent:?}, which is the same element or one of its descendants")]
	Cycle { parent: NodeId, child: NodeId },
	#[error(transparent)]
	Selector(#[from] SelectorError),
}

#[derive(Debug)]
struct ElementData {
	tag: String,
	id: Option<String>,
	classes: Vec<String>,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

#[derive(Debug)]
struct Registration {
	element: NodeId,
	event_type: String,
	listener: Listener<MemoryEvent>,
	capture: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
	None,
	Capturing,
	AtTarget,
	Bubbling,
}

/// The event [`MemoryDom::dispatch`] passes to listeners.
#[derive(Debug)]
pub struct MemoryEvent {
	event_type: String,
	target: NodeId,
	current_target: Cell<NodeId>,
	phase: Cell<EventPhase>,
}
impl MemoryEvent {
	#[must_use]
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	#[must_use]
	pub fn target(&self) -> NodeId {
		self.target
	}

	/// The element whose listener is currently running.
	#[must_use]
	pub fn current_target(&self) -> NodeId {
		self.current_target.get()
	}

	#[must_use]
	pub fn phase(&self) -> EventPhase {
		self.phase.get()
	}
}

/// An element tree with a single `html` root.
#[derive(Debug)]
pub struct MemoryDom {
	elements: RefCell<Vec<ElementData>>,
	registrations: RefCell<Vec<Registration>>,
}
impl Default for MemoryDom {
	fn default() -> Self {
		Self::new()
	}
}
impl MemoryDom {
	#[must_use]
	pub fn new() -> Self {
		let dom = Self {
			elements: RefCell::new(Vec::new()),
			registrations: RefCell::new(Vec::new()),
		};
		dom.create_element("html");
		dom
	}

	#[must_use]
	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	/// Creates a detached element. Tag names are stored in lower case.
	pub fn create_element(&self, tag: &str) -> NodeId {
		let mut elements = self.elements.borrow_mut();
		elements.push(ElementData {
			tag: tag.to_ascii_lowercase(),
			id: None,
			classes: Vec::new(),
			parent: None,
			children: Vec::new(),
		});
		NodeId(elements.len() - 1)
	}

	/// Moves `child` to the end of `parent`'s children.
	///
	/// # Errors
	///
	/// - [`TreeError::UnknownNode`] if either element doesn't belong to this document.
	/// - [`TreeError::Cycle`] if `child` is `parent` or one of its ancestors.
	pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
		let mut elements = self.elements.borrow_mut();
		for element in [parent, child] {
			if element.0 >= elements.len() {
				return Err(TreeError::UnknownNode(element));
			}
		}
		let mut ancestor = Some(parent);
		while let Some(current) = ancestor {
			if current == child {
				return Err(TreeError::Cycle { parent, child });
			}
			ancestor = elements[current.0].parent;
		}

		if let Some(old_parent) = elements[child.0].parent.take() {
			elements[old_parent.0].children.retain(|&sibling| sibling != child);
		}
		elements[child.0].parent = Some(parent);
		elements[parent.0].children.push(child);
		Ok(())
	}

	/// # Errors
	///
	/// [`TreeError::UnknownNode`] if `element` doesn't belong to this document.
	pub fn set_id(&self, element: NodeId, id: &str) -> Result<(), TreeError> {
		let mut elements = self.elements.borrow_mut();
		let data = elements.get_mut(element.0).ok_or(TreeError::UnknownNode(element))?;
		data.id = Some(id.to_owned());
		Ok(())
	}

	/// # Errors
	///
	/// [`TreeError::UnknownNode`] if `element` doesn't belong to this document.
	pub fn add_class(&self, element: NodeId, class: &str) -> Result<(), TreeError> {
		let mut elements = self.elements.borrow_mut();
		let classes = &mut elements.get_mut(element.0).ok_or(TreeError::UnknownNode(element))?.classes;
		if !classes.iter().any(|existing| existing == class) {
			classes.push(class.to_owned())
		}
		Ok(())
	}

	/// Creates an element from a compound selector like `li#first.item.active`, then appends it to `parent`.
	///
	/// Elements without a tag name (or with `*`) become `div`s.
	///
	/// # Errors
	///
	/// - [`TreeError::Selector`] iff `description` isn't a single compound selector.
	/// - [`TreeError::UnknownNode`] if `parent` doesn't belong to this document.
	pub fn append(&self, parent: NodeId, description: &str) -> Result<NodeId, TreeError> {
		let invalid = || SelectorError::Invalid(description.to_owned());
		let mut chars = description.trim().chars().peekable();
		let compound = parse_compound(&mut chars).ok_or_else(invalid)?;
		if chars.next().is_some() {
			return Err(invalid().into());
		}
		if parent.0 >= self.elements.borrow().len() {
			return Err(TreeError::UnknownNode(parent));
		}

		let element = self.create_element(compound.tag.as_deref().unwrap_or("div"));
		if let Some(id) = &compound.id {
			self.set_id(element, id)?;
		}
		for class in &compound.classes {
			self.add_class(element, class)?;
		}
		self.append_child(parent, element)?;
		Ok(element)
	}

	#[must_use]
	pub fn parent(&self, element: NodeId) -> Option<NodeId> {
		self.elements.borrow().get(element.0).and_then(|data| data.parent)
	}

	/// Empty for unknown elements.
	#[must_use]
	pub fn children(&self, element: NodeId) -> Vec<NodeId> {
		self.elements.borrow().get(element.0).map_or_else(Vec::new, |data| data.children.clone())
	}

	#[must_use]
	pub fn tag_name(&self, element: NodeId) -> Option<String> {
		self.elements.borrow().get(element.0).map(|data| data.tag.clone())
	}

	/// The number of listeners installed on `element`, over all event types and phases.
	#[must_use]
	pub fn listener_count(&self, element: NodeId) -> usize {
		self.registrations.borrow().iter().filter(|registration| registration.element == element).count()
	}

	/// Dispatches a bubbling event of `event_type` to `target` and returns it once all listeners ran.
	///
	/// Capture listeners run from the root down, then the target's own listeners (capture first),
	/// then non-capture listeners from the target's parent up to the root.
	/// Listeners removed during dispatch are not called anymore, listeners added during dispatch are only
	/// called for elements that haven't been reached yet.
	pub fn dispatch(&self, target: NodeId, event_type: &str) -> MemoryEvent {
		let event = MemoryEvent {
			event_type: event_type.to_owned(),
			target,
			current_target: Cell::new(target),
			phase: Cell::new(EventPhase::None),
		};

		let mut path = Vec::new();
		let mut next = self.parent(target);
		while let Some(ancestor) = next {
			path.push(ancestor);
			next = self.parent(ancestor);
		}
		trace!(event_type, depth = path.len(), "Dispatching event.");

		event.phase.set(EventPhase::Capturing);
		for &element in path.iter().rev() {
			self.invoke(element, &event, true);
		}
		event.phase.set(EventPhase::AtTarget);
		self.invoke(target, &event, true);
		self.invoke(target, &event, false);
		event.phase.set(EventPhase::Bubbling);
		for &element in &path {
			self.invoke(element, &event, false);
		}

		event.phase.set(EventPhase::None);
		event
	}

	fn invoke(&self, element: NodeId, event: &MemoryEvent, capture: bool) {
		event.current_target.set(element);
		let listeners: Vec<_> = self
			.registrations
			.borrow()
			.iter()
			.filter(|registration| registration.element == element && registration.event_type == event.event_type && registration.capture == capture)
			.map(|registration| registration.listener.clone())
			.collect();
		for listener in listeners {
			if self.position(element, &event.event_type, &listener, capture).is_some() {
				listener.call(event)
			}
		}
	}

	fn position(&self, element: NodeId, event_type: &str, listener: &Listener<MemoryEvent>, capture: bool) -> Option<usize> {
		self.registrations.borrow().iter().position(|registration| {
			registration.element == element && registration.event_type == event_type && registration.listener == *listener && registration.capture == capture
		})
	}

	fn matches_selector(&self, element: NodeId, selector: &Selector) -> bool {
		let elements = self.elements.borrow();
		element.0 < elements.len() && selector.0.iter().any(|complex| matches_complex(&elements, element, complex, complex.compounds.len() - 1))
	}

	fn document_order(&self, from: NodeId, include_self: bool) -> Vec<NodeId> {
		let elements = self.elements.borrow();
		let mut order = Vec::new();
		let mut stack = match elements.get(from.0) {
			None => Vec::new(),
			Some(_) if include_self => vec![from],
			Some(data) => data.children.iter().rev().copied().collect(),
		};
		while let Some(element) = stack.pop() {
			order.push(element);
			stack.extend(elements[element.0].children.iter().rev().copied());
		}
		order
	}
}

impl Host for MemoryDom {
	type Element = NodeId;
	type Event = MemoryEvent;
	type Error = SelectorError;

	fn query_selector_all(&self, scope: Option<&NodeId>, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
		let selector = Selector::parse(selector)?;
		let candidates = match scope {
			Some(&scope) => self.document_order(scope, false),
			None => self.document_order(self.root(), true),
		};
		Ok(candidates.into_iter().filter(|&element| self.matches_selector(element, &selector)).collect())
	}

	fn matches(&self, element: &NodeId, selector: &str) -> Result<bool, SelectorError> {
		Ok(self.matches_selector(*element, &Selector::parse(selector)?))
	}

	fn event_target(&self, event: &MemoryEvent) -> Option<NodeId> {
		Some(event.target)
	}

	fn add_event_listener(&self, element: &NodeId, event_type: &str, listener: &Listener<MemoryEvent>, capture: bool) -> Result<(), SelectorError> {
		if self.position(*element, event_type, listener, capture).is_none() {
			self.registrations.borrow_mut().push(Registration {
				element: *element,
				event_type: event_type.to_owned(),
				listener: listener.clone(),
				capture,
			})
		}
		Ok(())
	}

	fn remove_event_listener(&self, element: &NodeId, event_type: &str, listener: &Listener<MemoryEvent>, capture: bool) -> Result<(), SelectorError> {
		if let Some(i) = self.position(*element, event_type, listener, capture) {
			self.registrations.borrow_mut().remove(i);
		}
		Ok(())
	}
}

/// One compound selector, like `li.item`. No tag means any tag.
#[derive(Debug, Default, PartialEq, Eq)]
struct Compound {
	tag: Option<String>,
	id: Option<String>,
	classes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
	Descendant,
	Child,
}

/// `compounds[i]` and `compounds[i + 1]` are joined by `combinators[i]`.
#[derive(Debug)]
struct Complex {
	compounds: Vec<Compound>,
	combinators: Vec<Combinator>,
}

/// A comma-separated selector list.
#[derive(Debug)]
struct Selector(Vec<Complex>);
impl Selector {
	fn parse(selector: &str) -> Result<Self, SelectorError> {
		selector
			.split(',')
			.map(parse_complex)
			.collect::<Option<Vec<_>>>()
			.map(Self)
			.ok_or_else(|| SelectorError::Invalid(selector.to_owned()))
	}
}

fn parse_complex(text: &str) -> Option<Complex> {
	let mut chars = text.chars().peekable();
	let mut compounds = Vec::new();
	let mut combinators = Vec::new();
	let mut pending = None;
	loop {
		while chars.peek().map_or(false, |c| c.is_whitespace()) {
			chars.next();
		}
		match chars.peek() {
			None => break,
			Some('>') => {
				if compounds.is_empty() || pending.is_some() {
					return None;
				}
				chars.next();
				pending = Some(Combinator::Child);
			}
			Some(_) => {
				if !compounds.is_empty() {
					combinators.push(pending.take().unwrap_or(Combinator::Descendant));
				}
				compounds.push(parse_compound(&mut chars)?);
			}
		}
	}
	if compounds.is_empty() || pending.is_some() {
		return None;
	}
	Some(Complex { compounds, combinators })
}

/// Parses `*`, a tag name, `#id`s and `.class`es up to whitespace, `>` or the end.
fn parse_compound(chars: &mut core::iter::Peekable<core::str::Chars<'_>>) -> Option<Compound> {
	let mut compound = Compound::default();
	let mut empty = true;
	if chars.peek() == Some(&'*') {
		chars.next();
		empty = false;
	} else if let Some(tag) = parse_identifier(chars) {
		compound.tag = Some(tag.to_ascii_lowercase());
		empty = false;
	}
	loop {
		match chars.peek() {
			Some('#') => {
				chars.next();
				compound.id = Some(parse_identifier(chars)?);
			}
			Some('.') => {
				chars.next();
				compound.classes.push(parse_identifier(chars)?);
			}
			None | Some('>') => break,
			Some(c) if c.is_whitespace() => break,
			Some(_) => return None,
		}
		empty = false;
	}
	if empty {
		None
	} else {
		Some(compound)
	}
}

fn parse_identifier(chars: &mut core::iter::Peekable<core::str::Chars<'_>>) -> Option<String> {
	let mut identifier = String::new();
	while let Some(&c) = chars.peek() {
		if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
			identifier.push(c);
			chars.next();
		} else {
			break;
		}
	}
	if identifier.is_empty() {
		None
	} else {
		Some(identifier)
	}
}

fn matches_compound(element: &ElementData, compound: &Compound) -> bool {
	compound.tag.as_ref().map_or(true, |tag| *tag == element.tag)
		&& compound.id.as_ref().map_or(true, |id| element.id.as_ref() == Some(id))
		&& compound.classes.iter().all(|class| element.classes.contains(class))
}

fn matches_complex(elements: &[ElementData], element: NodeId, complex: &Complex, index: usize) -> bool {
	if !matches_compound(&elements[element.0], &complex.compounds[index]) {
		return false;
	}
	if index == 0 {
		return true;
	}
	let mut ancestor = elements[element.0].parent;
	match complex.combinators[index - 1] {
		Combinator::Child => ancestor.map_or(false, |parent| matches_complex(elements, parent, complex, index - 1)),
		Combinator::Descendant => {
			while let Some(current) = ancestor {
				if matches_complex(elements, current, complex, index - 1) {
					return true;
				}
				ancestor = elements[current.0].parent;
			}
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{MemoryDom, SelectorError, TreeError};
	use crate::Host;

	#[test]
	fn selectors() {
		let dom = MemoryDom::new();
		let body = dom.append(dom.root(), "body").unwrap();
		let list = dom.append(body, "ul#list.menu").unwrap();
		let item = dom.append(list, "li.item").unwrap();
		let link = dom.append(item, "a").unwrap();

		assert!(dom.matches(&link, "a").unwrap());
		assert!(dom.matches(&link, "ul a").unwrap());
		assert!(dom.matches(&link, "#list > li > a").unwrap());
		assert!(!dom.matches(&link, "#list > a").unwrap());
		assert!(dom.matches(&item, "span, li.item").unwrap());
		assert!(dom.matches(&list, "UL.menu#list").unwrap());
		assert!(dom.matches(&list, "*").unwrap());
		assert!(!dom.matches(&list, ".item").unwrap());
	}

	#[test]
	fn invalid_selectors() {
		let dom = MemoryDom::new();
		for selector in ["", " ", "li,", "> li", "ul >", "ul > > li", "li:first-child", "#", "a..b", "[href]"] {
			assert_eq!(dom.matches(&dom.root(), selector), Err(SelectorError::Invalid(selector.to_owned())), "{:?}", selector);
		}
		assert!(dom.append(dom.root(), "ul li").is_err());
	}

	#[test]
	fn scoped_queries_exclude_the_scope() {
		let dom = MemoryDom::new();
		let outer = dom.append(dom.root(), "div.box").unwrap();
		let inner = dom.append(outer, "div.box").unwrap();
		assert_eq!(dom.query_selector_all(Some(&outer), ".box").unwrap(), [inner]);
		assert_eq!(dom.query_selector_all(None, ".box").unwrap(), [outer, inner]);
	}

	#[test]
	fn append_child_moves() {
		let dom = MemoryDom::new();
		let a = dom.append(dom.root(), "div").unwrap();
		let b = dom.append(dom.root(), "div").unwrap();
		let child = dom.append(a, "span").unwrap();
		dom.append_child(b, child).unwrap();
		assert!(dom.children(a).is_empty());
		assert_eq!(dom.children(b), [child]);
		assert_eq!(dom.parent(child), Some(b));
	}

	#[test]
	fn append_child_rejects_cycles() {
		let dom = MemoryDom::new();
		let outer = dom.append(dom.root(), "div").unwrap();
		let inner = dom.append(outer, "span").unwrap();

		assert_eq!(dom.append_child(inner, outer), Err(TreeError::Cycle { parent: inner, child: outer }));
		assert_eq!(dom.append_child(outer, outer), Err(TreeError::Cycle { parent: outer, child: outer }));
		assert_eq!(dom.append_child(inner, dom.root()), Err(TreeError::Cycle { parent: inner, child: dom.root() }));
		assert_eq!(dom.parent(outer), Some(dom.root()));
		assert!(dom.children(inner).is_empty());
		assert!(dom.matches(&outer, "html div").unwrap());
		assert_eq!(dom.query_selector_all(None, "span").unwrap(), [inner]);
	}

	#[test]
	fn foreign_nodes_are_rejected() {
		let dom = MemoryDom::new();
		let other = MemoryDom::new();
		let foreign = other.append(other.root(), "div").unwrap();

		assert_eq!(dom.append_child(dom.root(), foreign), Err(TreeError::UnknownNode(foreign)));
		assert_eq!(dom.append(foreign, "span"), Err(TreeError::UnknownNode(foreign)));
		assert_eq!(dom.set_id(foreign, "x"), Err(TreeError::UnknownNode(foreign)));
		assert_eq!(dom.add_class(foreign, "x"), Err(TreeError::UnknownNode(foreign)));
		assert_eq!(dom.parent(foreign), None);
		assert_eq!(dom.tag_name(foreign), None);
		assert!(!dom.matches(&foreign, "div").unwrap());
		assert!(dom.query_selector_all(Some(&foreign), "*").unwrap().is_empty());
	}
}
