//! A headless [`Host`] and [`Navigation`] source.
//!
//! These back the crate's native tests and can drive the toolkit outside of a browser.
//! They model only what the renderer and router observe: element tags, attributes, properties, class names,
//! child order, event listeners and a current navigation target.

use crate::{host::{Host, PropertyValue}, router::Navigation, vnode::Callback};
use core::{
	cell::RefCell,
	fmt::{self, Debug, Display, Formatter},
};
use hashbrown::HashSet;
use std::{
	error::Error,
	rc::{Rc, Weak},
};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
	/// Mirrors the DOM's `InvalidCharacterError` for unusable element names.
	InvalidTag(String),
	ReadOnlyProperty(String),
	/// The operation needs an element, but was given a text node.
	NotAnElement,
}
impl Display for MemoryError {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			MemoryError::InvalidTag(tag) => write!(f, "invalid element name {:?}", tag),
			MemoryError::ReadOnlyProperty(name) => write!(f, "property {:?} is read-only", name),
			MemoryError::NotAnElement => f.write_str("not an element"),
		}
	}
}
impl Error for MemoryError {}

/// The event type dispatched through [`MemoryNode::dispatch`].
#[derive(Debug, Clone)]
pub struct MemoryEvent {
	pub name: String,
	pub target: MemoryNode,
}

#[derive(Debug)]
enum Data {
	Element {
		tag: String,
		attributes: Vec<(String, String)>,
		properties: Vec<(String, PropertyValue)>,
		class_name: Option<String>,
		listeners: Vec<(String, Callback<MemoryEvent>)>,
		children: Vec<MemoryNode>,
	},
	Text(String),
}

struct NodeCell {
	data: RefCell<Data>,
	parent: RefCell<Weak<NodeCell>>,
}

/// A shared handle to an in-memory node. Clones refer to the same node.
#[derive(Clone)]
pub struct MemoryNode(Rc<NodeCell>);
impl Debug for MemoryNode {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match &*self.0.data.borrow() {
			Data::Element { tag, children, .. } => write!(f, "<{}> ({} child node(s))", tag, children.len()),
			Data::Text(_) => f.write_str("#text"),
		}
	}
}

impl MemoryNode {
	fn new(data: Data) -> Self {
		Self(Rc::new(NodeCell {
			data: RefCell::new(data),
			parent: RefCell::default(),
		}))
	}

	fn element(tag: &str) -> Self {
		Self::new(Data::Element {
			tag: tag.to_owned(),
			attributes: Vec::new(),
			properties: Vec::new(),
			class_name: None,
			listeners: Vec::new(),
			children: Vec::new(),
		})
	}

	fn text_node(text: &str) -> Self {
		Self::new(Data::Text(text.to_owned()))
	}

	/// The element this node was last appended to, unless it was removed from it since.
	#[must_use]
	pub fn parent(&self) -> Option<MemoryNode> {
		self.0.parent.borrow().upgrade().map(MemoryNode)
	}

	/// Removes this node from its parent's children, if it has a parent.
	fn detach(&self) {
		if let Some(parent) = self.0.parent.take().upgrade() {
			if let Data::Element { children, .. } = &mut *parent.data.borrow_mut() {
				children.retain(|child| !child.ptr_eq(self))
			}
		}
	}

	/// Whether both handles refer to the same node.
	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}

	#[must_use]
	pub fn tag(&self) -> Option<String> {
		match &*self.0.data.borrow() {
			Data::Element { tag, .. } => Some(tag.clone()),
			Data::Text(_) => None,
		}
	}

	/// The data of a text node.
	#[must_use]
	pub fn text(&self) -> Option<String> {
		match &*self.0.data.borrow() {
			Data::Element { .. } => None,
			Data::Text(text) => Some(text.clone()),
		}
	}

	/// Concatenated data of all descendant text nodes, in tree order.
	#[must_use]
	pub fn text_content(&self) -> String {
		match &*self.0.data.borrow() {
			Data::Element { children, .. } => children.iter().map(Self::text_content).collect(),
			Data::Text(text) => text.clone(),
		}
	}

	#[must_use]
	pub fn attribute(&self, name: &str) -> Option<String> {
		match &*self.0.data.borrow() {
			Data::Element { attributes, .. } => attributes.iter().find(|(n, _)| n == name).map(|(_, value)| value.clone()),
			Data::Text(_) => None,
		}
	}

	#[must_use]
	pub fn has_attribute(&self, name: &str) -> bool {
		self.attribute(name).is_some()
	}

	#[must_use]
	pub fn attribute_count(&self) -> usize {
		match &*self.0.data.borrow() {
			Data::Element { attributes, .. } => attributes.len(),
			Data::Text(_) => 0,
		}
	}

	#[must_use]
	pub fn property(&self, name: &str) -> Option<PropertyValue> {
		match &*self.0.data.borrow() {
			Data::Element { properties, .. } => properties.iter().find(|(n, _)| n == name).map(|(_, value)| value.clone()),
			Data::Text(_) => None,
		}
	}

	#[must_use]
	pub fn class_name(&self) -> Option<String> {
		match &*self.0.data.borrow() {
			Data::Element { class_name, .. } => class_name.clone(),
			Data::Text(_) => None,
		}
	}

	#[must_use]
	pub fn children(&self) -> Vec<MemoryNode> {
		match &*self.0.data.borrow() {
			Data::Element { children, .. } => children.clone(),
			Data::Text(_) => Vec::new(),
		}
	}

	#[must_use]
	pub fn child_count(&self) -> usize {
		match &*self.0.data.borrow() {
			Data::Element { children, .. } => children.len(),
			Data::Text(_) => 0,
		}
	}

	#[must_use]
	pub fn listener_count(&self, event: &str) -> usize {
		match &*self.0.data.borrow() {
			Data::Element { listeners, .. } => listeners.iter().filter(|(name, _)| name == event).count(),
			Data::Text(_) => 0,
		}
	}

	/// Invokes the listeners registered for `event`, in registration order.
	///
	/// Listeners added while dispatching are not invoked by this dispatch.
	/// Returns the number of invoked listeners.
	pub fn dispatch(&self, event: &str) -> usize {
		let listeners: Vec<_> = match &*self.0.data.borrow() {
			Data::Element { listeners, .. } => listeners.iter().filter(|(name, _)| name == event).map(|(_, callback)| callback.clone()).collect(),
			Data::Text(_) => Vec::new(),
		};
		let event = MemoryEvent {
			name: event.to_owned(),
			target: self.clone(),
		};
		for listener in &listeners {
			listener.call(&event)
		}
		listeners.len()
	}

	/// Writes a property directly, as user input would.
	pub fn set_property(&self, name: &str, value: PropertyValue) {
		if let Data::Element { properties, .. } = &mut *self.0.data.borrow_mut() {
			upsert(properties, name, value)
		}
	}

	fn with_element<T>(&self, f: impl FnOnce(&mut ElementParts<'_>) -> T) -> Result<T, MemoryError> {
		match &mut *self.0.data.borrow_mut() {
			Data::Element {
				attributes,
				properties,
				class_name,
				listeners,
				children,
				..
			} => Ok(f(&mut ElementParts {
				attributes,
				properties,
				class_name,
				listeners,
				children,
			})),
			Data::Text(_) => Err(MemoryError::NotAnElement),
		}
	}
}

struct ElementParts<'a> {
	attributes: &'a mut Vec<(String, String)>,
	properties: &'a mut Vec<(String, PropertyValue)>,
	class_name: &'a mut Option<String>,
	listeners: &'a mut Vec<(String, Callback<MemoryEvent>)>,
	children: &'a mut Vec<MemoryNode>,
}

fn upsert<V>(entries: &mut Vec<(String, V)>, name: &str, value: V) {
	match entries.iter_mut().find(|(n, _)| n == name) {
		Some((_, slot)) => *slot = value,
		None => entries.push((name.to_owned(), value)),
	}
}

/// A headless [`Host`] producing [`MemoryNode`]s.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
	readonly_properties: HashSet<String>,
}
impl MemoryHost {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Makes [`Host::set_property`] fail for `name`, like a getter-only property on a real element.
	#[must_use]
	pub fn with_readonly_property(mut self, name: impl Into<String>) -> Self {
		self.readonly_properties.insert(name.into());
		self
	}
}

impl Host for MemoryHost {
	type Node = MemoryNode;
	type Event = MemoryEvent;
	type Error = MemoryError;

	fn create_element(&self, tag: &str) -> Result<MemoryNode, MemoryError> {
		if tag.is_empty() || tag.chars().any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '"' | '\'' | '=')) {
			return Err(MemoryError::InvalidTag(tag.to_owned()));
		}
		Ok(MemoryNode::element(tag))
	}

	fn create_text_node(&self, text: &str) -> MemoryNode {
		MemoryNode::text_node(text)
	}

	fn set_attribute(&self, node: &MemoryNode, name: &str, value: &str) -> Result<(), MemoryError> {
		node.with_element(|element| upsert(element.attributes, name, value.to_owned()))
	}

	fn remove_attribute(&self, node: &MemoryNode, name: &str) -> Result<(), MemoryError> {
		node.with_element(|element| element.attributes.retain(|(n, _)| n != name))
	}

	fn set_property(&self, node: &MemoryNode, name: &str, value: &PropertyValue) -> Result<(), MemoryError> {
		if self.readonly_properties.contains(name) {
			return Err(MemoryError::ReadOnlyProperty(name.to_owned()));
		}
		node.with_element(|element| upsert(element.properties, name, value.clone()))
	}

	fn set_class_name(&self, node: &MemoryNode, class_name: &str) -> Result<(), MemoryError> {
		node.with_element(|element| *element.class_name = Some(class_name.to_owned()))
	}

	/// Moves `child` from its previous parent, if any, to the end of `parent`'s children.
	fn append_child(&self, parent: &MemoryNode, child: &MemoryNode) -> Result<(), MemoryError> {
		parent.with_element(|_| ())?;
		child.detach();
		parent.with_element(|element| element.children.push(child.clone()))?;
		*child.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
		Ok(())
	}

	fn clear_children(&self, parent: &MemoryNode) -> Result<(), MemoryError> {
		let removed = parent.with_element(|element| std::mem::take(element.children))?;
		for child in removed {
			child.0.parent.take();
		}
		Ok(())
	}

	fn add_event_listener(&self, node: &MemoryNode, event: &str, handler: Callback<MemoryEvent>) -> Result<(), MemoryError> {
		node.with_element(|element| element.listeners.push((event.to_owned(), handler)))
	}
}

struct NavigationState {
	target: RefCell<String>,
	dispatchers: RefCell<Vec<Rc<dyn Fn(&str)>>>,
}

/// An in-memory [`Navigation`] source. Clones share the same target.
#[derive(Clone)]
pub struct MemoryNavigation(Rc<NavigationState>);
impl MemoryNavigation {
	#[must_use]
	pub fn new(target: impl Into<String>) -> Self {
		Self(Rc::new(NavigationState {
			target: RefCell::new(target.into()),
			dispatchers: RefCell::default(),
		}))
	}

	/// Changes the current target and notifies registered dispatchers, like a `hashchange`.
	pub fn navigate(&self, target: impl Into<String>) {
		let target = target.into();
		trace!("Navigating to {:?}.", target);
		*self.0.target.borrow_mut() = target.clone();
		let dispatchers = self.0.dispatchers.borrow().clone();
		for dispatch in dispatchers {
			(*dispatch)(&target)
		}
	}
}
impl Default for MemoryNavigation {
	fn default() -> Self {
		Self::new("")
	}
}
impl Debug for MemoryNavigation {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryNavigation")
			.field("target", &*self.0.target.borrow())
			.field("dispatchers", &self.0.dispatchers.borrow().len())
			.finish()
	}
}
impl Navigation for MemoryNavigation {
	fn current_target(&self) -> String {
		self.0.target.borrow().clone()
	}

	fn on_navigate(&self, dispatch: Box<dyn Fn(&str)>) {
		self.0.dispatchers.borrow_mut().push(Rc::from(dispatch))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_unusable_tags() {
		let host = MemoryHost::new();
		assert!(host.create_element("li").is_ok());
		assert_eq!(host.create_element("").unwrap_err(), MemoryError::InvalidTag(String::new()));
		assert!(host.create_element("not a tag").is_err());
	}

	#[test]
	fn text_nodes_are_not_elements() {
		let host = MemoryHost::new();
		let text = host.create_text_node("x");
		assert_eq!(host.set_attribute(&text, "id", "a"), Err(MemoryError::NotAnElement));
		assert_eq!(host.append_child(&text, &host.create_text_node("y")), Err(MemoryError::NotAnElement));
		assert_eq!(text.text().as_deref(), Some("x"));
	}

	#[test]
	fn appending_moves_a_node_between_parents() {
		let host = MemoryHost::new();
		let (first, second) = (host.create_element("ul").unwrap(), host.create_element("ol").unwrap());
		let item = host.create_element("li").unwrap();

		host.append_child(&first, &item).unwrap();
		host.append_child(&second, &item).unwrap();
		assert_eq!(first.child_count(), 0);
		assert_eq!(second.child_count(), 1);
		assert!(item.parent().unwrap().ptr_eq(&second));

		host.clear_children(&second).unwrap();
		assert!(item.parent().is_none());
		host.append_child(&first, &item).unwrap();
		assert_eq!(second.child_count(), 0);
		assert_eq!(first.child_count(), 1);
	}

	#[test]
	fn readonly_properties_refuse_writes() {
		let host = MemoryHost::new().with_readonly_property("value");
		let input = host.create_element("input").unwrap();
		assert_eq!(
			host.set_property(&input, "value", &PropertyValue::Text("a".to_owned())),
			Err(MemoryError::ReadOnlyProperty("value".to_owned()))
		);
		assert!(host.set_property(&input, "checked", &PropertyValue::Bool(true)).is_ok());
		assert_eq!(input.property("checked"), Some(PropertyValue::Bool(true)));
	}

	#[test]
	fn navigation_notifies_with_the_new_target() {
		let navigation = MemoryNavigation::new("#/");
		let seen = Rc::new(RefCell::new(Vec::new()));
		navigation.on_navigate(Box::new({
			let seen = Rc::clone(&seen);
			move |target: &str| seen.borrow_mut().push(target.to_owned())
		}));
		navigation.navigate("#/active");
		assert_eq!(navigation.current_target(), "#/active");
		assert_eq!(*seen.borrow(), ["#/active"]);
	}
}
