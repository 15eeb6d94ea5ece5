//! Immutable descriptions of UI elements, decoupled from any live node.

use crate::host::Host;
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// The tag used for [`VNode`]s that don't specify one.
pub const DEFAULT_TAG: &str = "div";

/// A shared event handler.
///
/// Two [`Callback`]s are [`ptr_eq`](`Callback::ptr_eq`) iff they were cloned from the same original.
pub struct Callback<E>(Rc<dyn Fn(&E)>);
impl<E> Callback<E> {
	pub fn new(handler: impl 'static + Fn(&E)) -> Self {
		Self(Rc::new(handler))
	}

	pub fn call(&self, event: &E) {
		(self.0)(event)
	}

	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::as_ptr(&self.0) as *const () == Rc::as_ptr(&other.0) as *const ()
	}
}
impl<E> Clone for Callback<E> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}
impl<E> Debug for Callback<E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Callback").field(&(Rc::as_ptr(&self.0) as *const ())).finish()
	}
}

/// An attribute value as written in a [`VNode`].
pub enum AttrValue<E> {
	Text(String),
	Bool(bool),
	Handler(Callback<E>),
	/// Not set at all. Rendering skips these.
	Absent,
}
impl<E> AttrValue<E> {
	#[must_use]
	pub fn is_absent(&self) -> bool {
		matches!(self, AttrValue::Absent)
	}
}
impl<E> Clone for AttrValue<E> {
	fn clone(&self) -> Self {
		match self {
			AttrValue::Text(text) => AttrValue::Text(text.clone()),
			AttrValue::Bool(value) => AttrValue::Bool(*value),
			AttrValue::Handler(handler) => AttrValue::Handler(handler.clone()),
			AttrValue::Absent => AttrValue::Absent,
		}
	}
}
impl<E> Debug for AttrValue<E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			AttrValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
			AttrValue::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
			AttrValue::Handler(handler) => f.debug_tuple("Handler").field(handler).finish(),
			AttrValue::Absent => f.write_str("Absent"),
		}
	}
}
impl<E> From<&str> for AttrValue<E> {
	fn from(text: &str) -> Self {
		AttrValue::Text(text.to_owned())
	}
}
impl<E> From<String> for AttrValue<E> {
	fn from(text: String) -> Self {
		AttrValue::Text(text)
	}
}
impl<E> From<bool> for AttrValue<E> {
	fn from(value: bool) -> Self {
		AttrValue::Bool(value)
	}
}
impl<E> From<Callback<E>> for AttrValue<E> {
	fn from(handler: Callback<E>) -> Self {
		AttrValue::Handler(handler)
	}
}
impl<E, T: Into<AttrValue<E>>> From<Option<T>> for AttrValue<E> {
	fn from(value: Option<T>) -> Self {
		value.map_or(AttrValue::Absent, Into::into)
	}
}

/// Insertion-ordered attributes with unique names.
pub struct Attributes<E>(Vec<(String, AttrValue<E>)>);
impl<E> Attributes<E> {
	#[must_use]
	pub fn new() -> Self {
		Self(Vec::new())
	}

	/// Replaces the value in place if `name` is already present.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue<E>>) {
		let name = name.into();
		let value = value.into();
		match self.0.iter_mut().find(|(existing, _)| *existing == name) {
			Some((_, slot)) => *slot = value,
			None => self.0.push((name, value)),
		}
	}

	#[must_use]
	pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue<E>>) -> Self {
		self.insert(name, value);
		self
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&AttrValue<E>> {
		self.0.iter().find(|(existing, _)| existing == name).map(|(_, value)| value)
	}

	pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &AttrValue<E>)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value))
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<E> Default for Attributes<E> {
	fn default() -> Self {
		Self::new()
	}
}
impl<E> Clone for Attributes<E> {
	fn clone(&self) -> Self {
		Self(self.0.clone())
	}
}
impl<E> Debug for Attributes<E> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.0.iter().map(|(name, value)| (name, value))).finish()
	}
}
impl<E, N: Into<String>, V: Into<AttrValue<E>>> core::iter::FromIterator<(N, V)> for Attributes<E> {
	fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
		let mut attributes = Self::new();
		for (name, value) in iter {
			attributes.insert(name, value);
		}
		attributes
	}
}

/// One entry in a [`VNode`]'s children.
pub enum Child<H: Host> {
	Element(VNode<H>),
	Text(String),
	/// An externally constructed live node, rendered as itself.
	Live(H::Node),
	/// Renders to nothing.
	Skip,
}
impl<H: Host> Child<H> {
	#[must_use]
	pub fn is_skip(&self) -> bool {
		matches!(self, Child::Skip)
	}
}
impl<H: Host> Clone for Child<H> {
	fn clone(&self) -> Self {
		match self {
			Child::Element(vnode) => Child::Element(vnode.clone()),
			Child::Text(text) => Child::Text(text.clone()),
			Child::Live(node) => Child::Live(node.clone()),
			Child::Skip => Child::Skip,
		}
	}
}
impl<H: Host> Debug for Child<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Child::Element(vnode) => f.debug_tuple("Element").field(vnode).finish(),
			Child::Text(text) => f.debug_tuple("Text").field(text).finish(),
			Child::Live(node) => f.debug_tuple("Live").field(node).finish(),
			Child::Skip => f.write_str("Skip"),
		}
	}
}
impl<H: Host> From<VNode<H>> for Child<H> {
	fn from(vnode: VNode<H>) -> Self {
		Child::Element(vnode)
	}
}
impl<H: Host> From<&str> for Child<H> {
	fn from(text: &str) -> Self {
		Child::Text(text.to_owned())
	}
}
impl<H: Host> From<String> for Child<H> {
	fn from(text: String) -> Self {
		Child::Text(text)
	}
}
impl<H: Host, T: Into<Child<H>>> From<Option<T>> for Child<H> {
	fn from(child: Option<T>) -> Self {
		child.map_or(Child::Skip, Into::into)
	}
}
macro_rules! number_children {
	($($number:ty),*$(,)?) => {$(
		impl<H: Host> From<$number> for Child<H> {
			fn from(number: $number) -> Self {
				Child::Text(number.to_string())
			}
		}
	)*};
}
number_children!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// The optional parts of a [`VNode`], as accepted by [`create_element`].
pub struct ElementOptions<H: Host> {
	pub attrs: Attributes<H::Event>,
	pub children: Vec<Child<H>>,
}
impl<H: Host> Default for ElementOptions<H> {
	fn default() -> Self {
		Self {
			attrs: Attributes::new(),
			children: Vec::new(),
		}
	}
}

/// Describes one element to materialize.
///
/// A [`VNode`] is never mutated once constructed. The builder methods consume it and return a new one.
pub struct VNode<H: Host> {
	tag: Option<String>,
	attrs: Attributes<H::Event>,
	children: Vec<Child<H>>,
}

/// Creates a [`VNode`], defaulting missing `options` to no attributes and no children.
///
/// Neither `tag` nor attribute names are validated here.
pub fn create_element<H: Host>(tag: impl Into<String>, options: Option<ElementOptions<H>>) -> VNode<H> {
	let ElementOptions { attrs, children } = options.unwrap_or_default();
	VNode {
		tag: Some(tag.into()),
		attrs,
		children,
	}
}

impl<H: Host> VNode<H> {
	pub fn new(tag: impl Into<String>) -> Self {
		create_element(tag, None)
	}

	/// The element kind, [`DEFAULT_TAG`] if none was given.
	#[must_use]
	pub fn tag(&self) -> &str {
		self.tag.as_deref().unwrap_or(DEFAULT_TAG)
	}

	#[must_use]
	pub fn attrs(&self) -> &Attributes<H::Event> {
		&self.attrs
	}

	#[must_use]
	pub fn children(&self) -> &[Child<H>] {
		&self.children
	}

	#[must_use]
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue<H::Event>>) -> Self {
		self.attrs.insert(name, value);
		self
	}

	/// Shorthand for an `on…` attribute holding `handler`.
	#[must_use]
	pub fn on(self, event: &str, handler: impl 'static + Fn(&H::Event)) -> Self {
		self.attr(format!("on{}", event), Callback::new(handler))
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<Child<H>>) -> Self {
		self.children.push(child.into());
		self
	}

	#[must_use]
	pub fn with_children<C: Into<Child<H>>>(mut self, children: impl IntoIterator<Item = C>) -> Self {
		self.children.extend(children.into_iter().map(Into::into));
		self
	}
}
impl<H: Host> Default for VNode<H> {
	/// A tagless, empty node. It renders as an empty [`DEFAULT_TAG`] element.
	fn default() -> Self {
		Self {
			tag: None,
			attrs: Attributes::new(),
			children: Vec::new(),
		}
	}
}
impl<H: Host> Clone for VNode<H> {
	fn clone(&self) -> Self {
		Self {
			tag: self.tag.clone(),
			attrs: self.attrs.clone(),
			children: self.children.clone(),
		}
	}
}
impl<H: Host> Debug for VNode<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("VNode")
			.field("tag", &self.tag())
			.field("attrs", &self.attrs)
			.field("children", &self.children)
			.finish()
	}
}
