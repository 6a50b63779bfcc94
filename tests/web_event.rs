#![cfg(target_arch = "wasm32")]

use brief_dom::{web::WebHost, Dom, Listener, ListenerOptions};
use std::{cell::Cell, rc::Rc};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn setup() -> Rc<Dom<WebHost>> {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}

	let document = window().unwrap().document().unwrap();
	document
		.body()
		.unwrap()
		.set_inner_html(r#"<ul id="list"><li id="child" class="child">a</li><li id="other">b</li></ul>"#);
	Dom::new(WebHost::new(document))
}

fn click(id: &str) {
	let element: HtmlElement = window().unwrap().document().unwrap().get_element_by_id(id).unwrap().dyn_into().unwrap();
	element.click();
}

fn counter() -> (Rc<Cell<usize>>, Listener<web_sys::Event>) {
	let count = Rc::new(Cell::new(0));
	let listener = Listener::new({
		let count = Rc::clone(&count);
		move |_: &web_sys::Event| count.set(count.get() + 1)
	});
	(count, listener)
}

#[wasm_bindgen_test]
fn on_off() {
	let dom = setup();
	let items = dom.select(Some("li"), None).unwrap();
	let (count, listener) = counter();

	items.on("click", &listener, ListenerOptions::new()).unwrap();
	assert_eq!(dom.host().bridge_count(), 1);
	click("child");
	click("other");
	assert_eq!(count.get(), 2);

	items.off("click", &listener, None).unwrap();
	assert_eq!(dom.host().bridge_count(), 0);
	click("child");
	assert_eq!(count.get(), 2);
}

#[wasm_bindgen_test]
fn delegated() {
	let dom = setup();
	let lists = dom.select(Some("#list"), None).unwrap();
	let (count, listener) = counter();

	lists.on("click", &listener, ListenerOptions::new().delegate(".child")).unwrap();
	click("other");
	assert_eq!(count.get(), 0);
	click("child");
	assert_eq!(count.get(), 1);

	lists.off("click", &listener, Some("*")).unwrap();
	assert_eq!(dom.registry().len("click"), 0);
	click("child");
	assert_eq!(count.get(), 1);
}

#[wasm_bindgen_test]
fn once() {
	let dom = setup();
	let lists = dom.select(Some("#list"), None).unwrap();
	let (count, listener) = counter();

	lists.once("click", &listener, ListenerOptions::new()).unwrap();
	click("child");
	click("child");
	assert_eq!(count.get(), 1);

	lists.once("click", &listener, ListenerOptions::new().delegate(".child")).unwrap();
	click("other");
	click("child");
	click("child");
	assert_eq!(count.get(), 2);
	assert_eq!(dom.registry().len("click"), 0);
}
