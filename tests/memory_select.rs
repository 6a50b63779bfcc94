use brief_dom::{
	memory::{MemoryDom, SelectorError},
	Context, Dom,
};

mod memory_setup_;
use memory_setup_::{init_logging, list};

#[test]
fn selects_in_document_order() {
	init_logging();
	let dom = Dom::new(MemoryDom::new());
	let host = dom.host();
	let body = host.append(host.root(), "body").unwrap();
	let a = host.append(body, "p.x").unwrap();
	let div = host.append(body, "div").unwrap();
	let b = host.append(div, "p").unwrap();
	let c = host.append(body, "p.x").unwrap();

	let paragraphs = dom.select(Some("p"), None).unwrap();
	assert_eq!(paragraphs.len(), 3);
	assert_eq!(paragraphs.to_vec(), [a, b, c]);
	assert_eq!(paragraphs.selector(), Some("p"));

	let same = dom.select(Some("p"), Some(Context::Document)).unwrap();
	assert_eq!(same.as_slice(), paragraphs.as_slice());
}

#[test]
fn empty_without_selector_and_context() {
	let list = list();
	let mut collection = list.dom.select(None, None).unwrap();
	assert!(collection.is_empty());
	assert_eq!(collection.selector(), None);

	collection.push(list.ul);
	assert_eq!(collection.get(0), Some(&list.ul));
}

#[test]
fn find_and_index_of() {
	let list = list();
	let lists = list.dom.select(Some("ul"), Some(Context::Document)).unwrap();
	assert_eq!(lists.to_vec(), [list.ul]);

	let items = lists.find("li").unwrap();
	assert_eq!(items.len(), 3);
	assert_eq!(items.to_vec(), list.items);
	assert_eq!(items.selector(), Some("ul"));
	assert_eq!(items.index_of("li").unwrap(), 0);
	assert_eq!(items.index_of(".other").unwrap(), 1);
	assert_eq!(items.index_of(".missing").unwrap(), -1);
}

#[test]
fn find_concatenates_by_element() {
	init_logging();
	let dom = Dom::new(MemoryDom::new());
	let host = dom.host();
	let first = host.append(host.root(), "ul").unwrap();
	let second = host.append(host.root(), "ul").unwrap();
	let a = host.append(first, "li").unwrap();
	let b = host.append(second, "li").unwrap();
	let c = host.append(second, "li").unwrap();

	let lists = dom.select(None, Some(Context::Elements(vec![second, first]))).unwrap();
	assert_eq!(lists.find("li").unwrap().to_vec(), [b, c, a]);
}

#[test]
fn filter_keeps_the_source() {
	init_logging();
	let dom = Dom::new(MemoryDom::new());
	let host = dom.host();
	let ul = host.append(host.root(), "ul").unwrap();
	let items: Vec<_> = ["li", "li.x", "li", "li.x", "li"].iter().map(|item| host.append(ul, item).unwrap()).collect();

	let all = dom.select(Some("li"), None).unwrap();
	let marked = all.filter(".x").unwrap();
	assert_eq!(marked.len(), 2);
	assert_eq!(marked.to_vec(), [items[1], items[3]]);
	assert_eq!(marked.selector(), Some("li"));
	assert_eq!(all.len(), 5);
}

#[test]
fn contexts() {
	init_logging();
	let dom = Dom::new(MemoryDom::new());
	let host = dom.host();
	let first = host.append(host.root(), "ul.first").unwrap();
	let a = host.append(first, "li").unwrap();
	let second = host.append(host.root(), "ul.second").unwrap();
	let b = host.append(second, "li").unwrap();
	let c = host.append(second, "li").unwrap();

	let in_second = dom.select(Some("li"), Some(Context::Selector("ul.second"))).unwrap();
	assert_eq!(in_second.to_vec(), [b, c]);
	assert_eq!(in_second.selector(), Some("li"));

	let lists = dom.select(None, Some(Context::Selector("ul"))).unwrap();
	assert_eq!(lists.to_vec(), [first, second]);
	assert_eq!(lists.selector(), Some("ul"));

	let via_collection = dom.select(Some("li"), Some(Context::Collection(&lists))).unwrap();
	assert_eq!(via_collection.to_vec(), [a, b, c]);

	let copy = dom.select(None, Some(Context::Collection(&lists))).unwrap();
	assert_eq!(copy.to_vec(), lists.to_vec());
	assert_eq!(copy.selector(), Some("ul"));

	let via_element = dom.select(Some("li"), Some(Context::Element(first))).unwrap();
	assert_eq!(via_element.to_vec(), [a]);

	let elements = dom.select(None, Some(Context::Elements(vec![c, a]))).unwrap();
	assert_eq!(elements.to_vec(), [c, a]);
	assert_eq!(elements.selector(), None);
}

#[test]
fn invalid_selectors_surface_the_host_error() {
	let list = list();
	let invalid = || SelectorError::Invalid("li[".to_owned());

	assert_eq!(list.dom.select(Some("li["), None).unwrap_err(), invalid());
	assert_eq!(list.dom.select(Some("li"), Some(Context::Selector("li["))).unwrap_err(), invalid());

	let items = list.dom.select(Some("li"), None).unwrap();
	assert_eq!(items.filter("li[").unwrap_err(), invalid());
	assert_eq!(items.find("li[").unwrap_err(), invalid());
	assert_eq!(items.index_of("li[").unwrap_err(), invalid());
}

#[test]
fn get_out_of_bounds() {
	let list = list();
	let items = list.dom.select(Some("li"), None).unwrap();
	assert_eq!(items.get(2), Some(&list.items[2]));
	assert_eq!(items.get(3), None);
}

#[test]
fn mutators_chain() {
	let list = list();
	let [a, b, c] = [list.items[0], list.items[1], list.items[2]];
	let mut collection = list.dom.collection();

	collection.push(a).push(b).push(c).pop();
	assert_eq!(collection.to_vec(), [a, b]);

	collection.splice(1, 100, vec![c, c]);
	assert_eq!(collection.to_vec(), [a, c, c]);

	collection.splice(10, 1, vec![b]).splice(0, 1, vec![]);
	assert_eq!(collection.to_vec(), [c, c, b]);

	collection.empty().pop();
	assert!(collection.is_empty());
}

#[test]
fn for_each_and_clone() {
	let list = list();
	let items = list.dom.select(Some("li"), None).unwrap();

	let mut seen = Vec::new();
	items.for_each(|i, &element| seen.push((i, element)));
	assert_eq!(seen, [(0, list.items[0]), (1, list.items[1]), (2, list.items[2])]);
	assert_eq!((&items).into_iter().count(), 3);

	let mut copy = items.clone();
	copy.empty();
	assert_eq!(items.len(), 3);
	assert!(std::rc::Rc::ptr_eq(copy.dom(), items.dom()));
}
