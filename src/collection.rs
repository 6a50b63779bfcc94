use crate::{Dom, Host};
use core::{
	fmt::{self, Debug, Formatter},
	slice,
};
use std::rc::Rc;

/// An ordered, mutable group of element handles, usually created by [`Dom::select`].
///
/// Mutators return `&mut Self` so that they can be chained:
///
/// ```
/// # use brief_dom::{memory::MemoryDom, Dom};
/// let dom = Dom::new(MemoryDom::new());
/// let root = dom.host().root();
/// let mut collection = dom.collection();
/// collection.push(root).push(root).pop();
/// assert_eq!(collection.len(), 1);
/// ```
pub struct Collection<H: Host> {
	pub(crate) dom: Rc<Dom<H>>,
	elements: Vec<H::Element>,
	selector: Option<String>,
}
impl<H: Host> Collection<H> {
	pub(crate) fn new(dom: Rc<Dom<H>>, elements: Vec<H::Element>, selector: Option<String>) -> Self {
		Self { dom, elements, selector }
	}

	pub fn dom(&self) -> &Rc<Dom<H>> {
		&self.dom
	}

	/// The selector this collection was built from.
	///
	/// This is kept as-is by [`filter`](`Collection::filter`) and [`find`](`Collection::find`).
	#[must_use]
	pub fn selector(&self) -> Option<&str> {
		self.selector.as_deref()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	/// The element at `index`, if there is one.
	#[must_use]
	pub fn get(&self, index: usize) -> Option<&H::Element> {
		self.elements.get(index)
	}

	pub fn iter(&self) -> slice::Iter<'_, H::Element> {
		self.elements.iter()
	}

	#[must_use]
	pub fn as_slice(&self) -> &[H::Element] {
		&self.elements
	}

	#[must_use]
	pub fn to_vec(&self) -> Vec<H::Element> {
		self.elements.clone()
	}

	/// Calls `f` with each index and element, in order.
	pub fn for_each(&self, mut f: impl FnMut(usize, &H::Element)) -> &Self {
		for (i, element) in self.elements.iter().enumerate() {
			f(i, element)
		}
		self
	}

	/// A new collection of the elements matching `selector`, in the same order.
	///
	/// # Errors
	///
	/// The host's error iff `selector` is invalid.
	pub fn filter(&self, selector: &str) -> Result<Self, H::Error> {
		let mut elements = Vec::new();
		for element in &self.elements {
			if self.dom.host().matches(element, selector)? {
				elements.push(element.clone())
			}
		}
		Ok(Self::new(Rc::clone(&self.dom), elements, self.selector.clone()))
	}

	/// A new collection of all descendants matching `selector`, by element and then in document order.
	///
	/// # Errors
	///
	/// The host's error iff `selector` is invalid.
	pub fn find(&self, selector: &str) -> Result<Self, H::Error> {
		let elements = self.dom.find_within(&self.elements, selector)?;
		Ok(Self::new(Rc::clone(&self.dom), elements, self.selector.clone()))
	}

	/// The index of the first element matching `selector`, or `-1` if there is none.
	///
	/// # Errors
	///
	/// The host's error iff `selector` is invalid.
	#[allow(clippy::cast_possible_wrap)] // `Vec` lengths never exceed `isize::MAX`.
	pub fn index_of(&self, selector: &str) -> Result<isize, H::Error> {
		for (i, element) in self.elements.iter().enumerate() {
			if self.dom.host().matches(element, selector)? {
				return Ok(i as isize);
			}
		}
		Ok(-1)
	}

	pub fn push(&mut self, element: H::Element) -> &mut Self {
		self.elements.push(element);
		self
	}

	/// Removes the last element, if any.
	pub fn pop(&mut self) -> &mut Self {
		self.elements.pop();
		self
	}

	/// Removes up to `delete_count` elements starting at `start` and inserts `items` in their place.
	///
	/// Both `start` and `delete_count` are clamped to the collection's bounds.
	pub fn splice(&mut self, start: usize, delete_count: usize, items: impl IntoIterator<Item = H::Element>) -> &mut Self {
		let start = start.min(self.elements.len());
		let end = start.saturating_add(delete_count).min(self.elements.len());
		self.elements.splice(start..end, items).for_each(drop);
		self
	}

	pub fn empty(&mut self) -> &mut Self {
		self.elements.clear();
		self
	}
}

impl<H: Host> Clone for Collection<H> {
	fn clone(&self) -> Self {
		Self::new(Rc::clone(&self.dom), self.elements.clone(), self.selector.clone())
	}
}

impl<H: Host> Debug for Collection<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Collection").field("selector", &self.selector).field("elements", &self.elements).finish()
	}
}

impl<'a, H: Host> IntoIterator for &'a Collection<H> {
	type Item = &'a H::Element;
	type IntoIter = slice::Iter<'a, H::Element>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
