//! The seam between the renderer and a live UI tree.

use crate::vnode::Callback;
use core::fmt::Debug;

/// A value written to a live node's property (as opposed to its [***Attr***](https://developer.mozilla.org/en-US/docs/Web/API/Attr)ibutes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
	Text(String),
	Bool(bool),
}

impl PropertyValue {
	/// The string form used when falling back to an attribute.
	#[must_use]
	pub fn to_attribute_value(&self) -> String {
		match self {
			PropertyValue::Text(text) => text.clone(),
			PropertyValue::Bool(value) => value.to_string(),
		}
	}
}

/// Node and attribute primitives supplied by a host environment.
///
/// Implementations only ever receive nodes they created themselves (or that were embedded via [`Child::Live`](`crate::Child::Live`)).
///
/// Nothing here mounts anything: A node only becomes visible once the caller appends it to an already visible tree.
pub trait Host {
	/// A live node handle. Clones must refer to the same node.
	type Node: Clone + Debug;
	/// The event type passed to [`Callback`]s registered through [`Host::add_event_listener`].
	type Event;
	type Error: Debug;

	fn create_element(&self, tag: &str) -> Result<Self::Node, Self::Error>;
	fn create_text_node(&self, text: &str) -> Self::Node;

	fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;
	fn remove_attribute(&self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;

	/// Writes a live property.
	///
	/// # Errors
	///
	/// Iff the host refused the write, for example because the property is read-only.
	fn set_property(&self, node: &Self::Node, name: &str, value: &PropertyValue) -> Result<(), Self::Error>;

	/// Sets the element's class list from a space-separated string.
	fn set_class_name(&self, node: &Self::Node, class_name: &str) -> Result<(), Self::Error>;

	fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;
	fn clear_children(&self, parent: &Self::Node) -> Result<(), Self::Error>;

	fn add_event_listener(&self, node: &Self::Node, event: &str, handler: Callback<Self::Event>) -> Result<(), Self::Error>;

	/// Frees resources held for event listeners registered so far.
	///
	/// Call this only once the nodes those listeners were added to have been discarded.
	/// Returns the number of released listeners.
	fn release_listeners(&self) -> usize {
		0
	}
}
