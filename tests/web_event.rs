#![cfg(target_arch = "wasm32")]

use sprig_dom::{create_state, web::WebHost, Child, Mount, Renderer, VNode};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlBodyElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn init_log() {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}
}

#[wasm_bindgen_test]
fn click() {
	init_log();

	let host = WebHost::from_window().unwrap();
	let body = host.document().body().unwrap().dyn_into::<HtmlBodyElement>().unwrap();
	let renderer = Renderer::new(host);

	let click_count = Rc::new(RefCell::new(0));
	let vdom = VNode::new("BUTTON").attr("id", "test-button").on("Click", {
		let click_count = Rc::clone(&click_count);
		move |event: &web_sys::Event| {
			assert_eq!(event.type_(), "click");
			*click_count.borrow_mut() += 1;
		}
	});

	let button = renderer.render(&Child::Element(vdom)).unwrap();
	body.append_child(&button).unwrap();
	assert_eq!(*click_count.borrow(), 0);

	let button: HtmlElement = window().unwrap().document().unwrap().get_element_by_id("test-button").unwrap().dyn_into().unwrap();
	button.click();
	assert_eq!(*click_count.borrow(), 1);

	button.remove();
	assert_eq!(renderer.host().listener_count(), 1);
}

#[wasm_bindgen_test]
fn click_rerenders_mount() {
	init_log();

	let host = WebHost::from_window().unwrap();
	let root = host.document().create_element("section").unwrap();
	host.document().body().unwrap().append_child(&root).unwrap();

	let store = create_state(vec![("count", 0)].into_iter().collect::<BTreeMap<&str, i32>>());
	let subscription = Mount::new(Renderer::new(host), root.clone().into()).bind(&store, {
		let store = store.clone();
		move |state: &BTreeMap<&'static str, i32>| -> Child<WebHost> {
			let count = state["count"];
			let store = store.clone();
			VNode::<WebHost>::new("button")
				.attr("class", "counter")
				.on("click", move |_: &web_sys::Event| store.set_state(vec![("count", count + 1)].into_iter().collect()))
				.child(count)
				.into()
		}
	});

	for expected in 0..3 {
		let button: HtmlElement = root.first_element_child().unwrap().dyn_into().unwrap();
		assert_eq!(button.text_content().as_deref(), Some(expected.to_string().as_str()));
		button.click();
	}

	assert_eq!(store.get_state()["count"], 3);
	assert_eq!(root.child_element_count(), 1);

	subscription.unsubscribe();
	root.remove();
}
