#![allow(dead_code)]

use brief_dom::{
	memory::{MemoryDom, MemoryEvent, NodeId},
	Dom, Listener,
};
use std::{cell::Cell, rc::Rc, sync::Once};
use tracing_subscriber::EnvFilter;

static LOG_INITIALIZED: Once = Once::new();

pub fn init_logging() {
	LOG_INITIALIZED.call_once(|| {
		let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_test_writer().try_init();
	});
}

/// `<body><ul id="list"><li class="child">…</li><li class="other">…</li><li class="child">…</li></ul></body>`
pub struct List {
	pub dom: Rc<Dom<MemoryDom>>,
	pub body: NodeId,
	pub ul: NodeId,
	pub items: Vec<NodeId>,
}

pub fn list() -> List {
	init_logging();
	let dom = Dom::new(MemoryDom::new());
	let host = dom.host();
	let body = host.append(host.root(), "body").unwrap();
	let ul = host.append(body, "ul#list").unwrap();
	let items = ["li.child", "li.other", "li.child"].iter().map(|item| host.append(ul, item).unwrap()).collect();
	List { dom, body, ul, items }
}

pub fn counter() -> (Rc<Cell<usize>>, Listener<MemoryEvent>) {
	let count = Rc::new(Cell::new(0));
	let listener = Listener::new({
		let count = Rc::clone(&count);
		move |_: &MemoryEvent| count.set(count.get() + 1)
	});
	(count, listener)
}
