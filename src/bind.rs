//! Attribute-binding strategies, tried in a fixed priority order.
//!
//! | Priority | Binder                     | Applies to                                  |
//! |----------|----------------------------|---------------------------------------------|
//! | 1        | [`EventBinder`]            | `on…` keys holding a [`Callback`]           |
//! | 2        | [`AbsentSkipper`]          | [`AttrValue::Absent`]                       |
//! | 3        | [`ValueBinder`]            | the `value` key                             |
//! | 4        | [`BooleanBinder`]          | [`AttrValue::Bool`]                         |
//! | 5        | [`ClassBinder`]            | the `class` key                             |
//! | 6        | [`GenericAttributeBinder`] | [`AttrValue::Text`]                         |
//!
//! Property writes that the host refuses fall back to attributes. Failures are logged and never propagated.

use crate::{
	host::{Host, PropertyValue},
	vnode::{AttrValue, Callback},
};
use core::fmt::{self, Debug, Formatter};
use tracing::{error, trace, warn};

/// The event-listener key prefix.
pub const EVENT_PREFIX: &str = "on";
/// The key bound as a live property on input-like elements.
pub const VALUE_KEY: &str = "value";
/// The key bound as the element's class name.
pub const CLASS_KEY: &str = "class";

/// The outcome of offering one attribute to an [`AttributeBinder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
	/// Handled, possibly through a fallback.
	Bound,
	/// Handled by deliberately setting nothing.
	Skipped,
	/// Not applicable. The next binder is tried.
	Declined,
}

pub trait AttributeBinder<H: Host> {
	fn bind(&self, host: &H, node: &H::Node, name: &str, value: &AttrValue<H::Event>) -> Binding;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventBinder;
impl<H: Host> AttributeBinder<H> for EventBinder {
	fn bind(&self, host: &H, node: &H::Node, name: &str, value: &AttrValue<H::Event>) -> Binding {
		let (event, handler) = match (name.strip_prefix(EVENT_PREFIX), value) {
			(Some(event), AttrValue::Handler(handler)) => (event.to_lowercase(), handler),
			_ => return Binding::Declined,
		};
		trace!("Adding {:?} listener.", event);
		if let Err(error) = host.add_event_listener(node, &event, Callback::clone(handler)) {
			error!("Failed to add event listener {:?}: {:?}", event, error)
		}
		Binding::Bound
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AbsentSkipper;
impl<H: Host> AttributeBinder<H> for AbsentSkipper {
	fn bind(&self, _: &H, _: &H::Node, _: &str, value: &AttrValue<H::Event>) -> Binding {
		if value.is_absent() {
			Binding::Skipped
		} else {
			Binding::Declined
		}
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValueBinder;
impl<H: Host> AttributeBinder<H> for ValueBinder {
	fn bind(&self, host: &H, node: &H::Node, name: &str, value: &AttrValue<H::Event>) -> Binding {
		if name != VALUE_KEY {
			return Binding::Declined;
		}
		let property = match value {
			AttrValue::Text(text) => PropertyValue::Text(text.clone()),
			AttrValue::Bool(value) => PropertyValue::Bool(*value),
			AttrValue::Handler(_) | AttrValue::Absent => return Binding::Declined,
		};
		if let Err(error) = host.set_property(node, VALUE_KEY, &property) {
			warn!("Failed to set `value` property, falling back to the attribute: {:?}", error);
			if let Err(error) = host.set_attribute(node, VALUE_KEY, &property.to_attribute_value()) {
				error!("Failed to set `value` attribute: {:?}", error)
			}
		}
		Binding::Bound
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanBinder;
impl<H: Host> AttributeBinder<H> for BooleanBinder {
	fn bind(&self, host: &H, node: &H::Node, name: &str, value: &AttrValue<H::Event>) -> Binding {
		let value = match value {
			AttrValue::Bool(value) => *value,
			_ => return Binding::Declined,
		};
		if let Err(error) = host.set_property(node, name, &PropertyValue::Bool(value)) {
			warn!("Failed to set boolean property {:?}, falling back to attribute presence: {:?}", name, error);
			let fallback = if value { host.set_attribute(node, name, "") } else { host.remove_attribute(node, name) };
			if let Err(error) = fallback {
				error!("Failed to toggle attribute {:?}: {:?}", name, error)
			}
		}
		Binding::Bound
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassBinder;
impl<H: Host> AttributeBinder<H> for ClassBinder {
	fn bind(&self, host: &H, node: &H::Node, name: &str, value: &AttrValue<H::Event>) -> Binding {
		match (name, value) {
			(CLASS_KEY, AttrValue::Text(class_name)) => {
				if let Err(error) = host.set_class_name(node, class_name) {
					error!("Failed to set class name: {:?}", error)
				}
				Binding::Bound
			}
			_ => Binding::Declined,
		}
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericAttributeBinder;
impl<H: Host> AttributeBinder<H> for GenericAttributeBinder {
	fn bind(&self, host: &H, node: &H::Node, name: &str, value: &AttrValue<H::Event>) -> Binding {
		match value {
			AttrValue::Text(text) => {
				if let Err(error) = host.set_attribute(node, name, text) {
					error!("Failed to set attribute {:?}: {:?}", name, error)
				}
				Binding::Bound
			}
			_ => Binding::Declined,
		}
	}
}

/// An ordered set of [`AttributeBinder`]s. The first one that doesn't decline wins.
pub struct Binders<H: Host>(Vec<Box<dyn AttributeBinder<H>>>);
impl<H: Host> Binders<H> {
	#[must_use]
	pub fn new(binders: Vec<Box<dyn AttributeBinder<H>>>) -> Self {
		Self(binders)
	}

	/// The binders listed in the [module documentation](self), in that order.
	#[must_use]
	pub fn standard() -> Self {
		Self(vec![
			Box::new(EventBinder),
			Box::new(AbsentSkipper),
			Box::new(ValueBinder),
			Box::new(BooleanBinder),
			Box::new(ClassBinder),
			Box::new(GenericAttributeBinder),
		])
	}

	pub fn bind(&self, host: &H, node: &H::Node, name: &str, value: &AttrValue<H::Event>) -> Binding {
		for binder in &self.0 {
			match binder.bind(host, node, name, value) {
				Binding::Declined => continue,
				binding => return binding,
			}
		}
		warn!("No binder accepted attribute {:?} ({:?}). Ignoring it.", name, value);
		Binding::Declined
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
impl<H: Host> Default for Binders<H> {
	fn default() -> Self {
		Self::standard()
	}
}
impl<H: Host> Debug for Binders<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Binders").field(&self.0.len()).finish()
	}
}
