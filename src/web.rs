//! Browser bindings through [`web_sys`].

use crate::{
	host::{Host, PropertyValue},
	router::{Navigation, Router},
	vnode::Callback,
};
use core::cell::RefCell;
use js_sys::Reflect;
use tracing::{error, instrument, trace, trace_span};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

/// A [`Host`] creating [***Node***](https://developer.mozilla.org/en-US/docs/Web/API/Node)s in a [`web_sys::Document`].
///
/// # Event listeners
///
/// Listener closures are owned by the [`WebHost`] until [`Host::release_listeners`] is called or it is dropped.
/// Listeners of nodes that are still in the page will throw errors into [***JavaScript***](https://developer.mozilla.org/en-US/docs/Web/JavaScript)
/// once that happens, so release only after discarding those nodes.
#[derive(Debug)]
pub struct WebHost {
	document: web_sys::Document,
	listeners: RefCell<Vec<Closure<dyn Fn(web_sys::Event)>>>,
}

impl WebHost {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self {
			document,
			listeners: RefCell::default(),
		}
	}

	/// A [`WebHost`] for the current window's document, if there is one.
	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window().and_then(|window| window.document()).map(Self::new)
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}

	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}
}

fn as_element(node: &web_sys::Node) -> Result<&web_sys::Element, JsValue> {
	node.dyn_ref::<web_sys::Element>().ok_or_else(|| JsValue::from_str("sprig-dom: Expected an element."))
}

impl Host for WebHost {
	type Node = web_sys::Node;
	type Event = web_sys::Event;
	type Error = JsValue;

	fn create_element(&self, tag: &str) -> Result<web_sys::Node, JsValue> {
		self.document.create_element(tag).map(Into::into)
	}

	fn create_text_node(&self, text: &str) -> web_sys::Node {
		self.document.create_text_node(text).into()
	}

	fn set_attribute(&self, node: &web_sys::Node, name: &str, value: &str) -> Result<(), JsValue> {
		as_element(node)?.set_attribute(name, value)
	}

	fn remove_attribute(&self, node: &web_sys::Node, name: &str) -> Result<(), JsValue> {
		as_element(node)?.remove_attribute(name)
	}

	/// Assigns through [***Reflect.set()***](https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Reflect/set),
	/// which reports getter-only properties as failure instead of ignoring the write.
	fn set_property(&self, node: &web_sys::Node, name: &str, value: &PropertyValue) -> Result<(), JsValue> {
		let value = match value {
			PropertyValue::Text(text) => JsValue::from_str(text),
			PropertyValue::Bool(value) => JsValue::from_bool(*value),
		};
		if Reflect::set(node.as_ref(), &JsValue::from_str(name), &value)? {
			Ok(())
		} else {
			Err(JsValue::from_str(&format!("sprig-dom: Property {:?} could not be set.", name)))
		}
	}

	fn set_class_name(&self, node: &web_sys::Node, class_name: &str) -> Result<(), JsValue> {
		as_element(node)?.set_class_name(class_name);
		Ok(())
	}

	fn append_child(&self, parent: &web_sys::Node, child: &web_sys::Node) -> Result<(), JsValue> {
		parent.append_child(child).map(drop)
	}

	fn clear_children(&self, parent: &web_sys::Node) -> Result<(), JsValue> {
		parent.set_text_content(None);
		Ok(())
	}

	#[instrument(skip(self, node, handler))]
	fn add_event_listener(&self, node: &web_sys::Node, event: &str, handler: Callback<web_sys::Event>) -> Result<(), JsValue> {
		let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
			let span = trace_span!("Event handler", event = %event.type_());
			let _enter = span.enter();
			handler.call(&event)
		}) as Box<dyn Fn(web_sys::Event)>);
		node.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
		self.listeners.borrow_mut().push(closure);
		Ok(())
	}

	fn release_listeners(&self) -> usize {
		let released = self.listeners.take();
		trace!("Dropping {} listener closure(s).", released.len());
		released.len()
	}
}

/// The location hash as [`Navigation`] source.
#[derive(Debug, Clone)]
pub struct HashNavigation {
	window: web_sys::Window,
}

impl HashNavigation {
	#[must_use]
	pub fn new(window: web_sys::Window) -> Self {
		Self { window }
	}

	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window().map(Self::new)
	}
}

fn location_hash(window: &web_sys::Window) -> String {
	match window.location().hash() {
		Ok(hash) => hash,
		Err(error) => {
			error!("Failed to read the location hash: {:?}", error);
			String::new()
		}
	}
}

impl Navigation for HashNavigation {
	fn current_target(&self) -> String {
		location_hash(&self.window)
	}

	/// Listens for `hashchange` on the window.
	///
	/// The listener is never removed, so its closure is leaked on purpose.
	fn on_navigate(&self, dispatch: Box<dyn Fn(&str)>) {
		let window = self.window.clone();
		let closure = Closure::wrap(Box::new(move |_: web_sys::Event| dispatch(&location_hash(&window))) as Box<dyn Fn(web_sys::Event)>);
		match self.window.add_event_listener_with_callback("hashchange", closure.as_ref().unchecked_ref()) {
			Ok(()) => closure.forget(),
			Err(error) => error!("Failed to listen for `hashchange`: {:?}", error),
		}
	}
}

/// A [`Router`] over the current window's location hash, if there is a window.
#[must_use]
pub fn create_router() -> Option<Router<HashNavigation>> {
	HashNavigation::from_window().map(Router::new)
}
