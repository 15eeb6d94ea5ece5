use crate::{
	bind::Binders,
	host::Host,
	vnode::{Child, VNode},
};
use tracing::{error, instrument, trace, trace_span};

/// The default limit on element nesting for a single [`Renderer::render`] call: none.
pub const DEFAULT_DEPTH_LIMIT: usize = usize::MAX;

/// Materializes [`VNode`] trees into fresh live nodes.
///
/// This is not a differ: Every call builds the whole subtree anew, in time proportional to its size,
/// and the previous live tree is simply discarded by the caller.
///
/// Event listeners registered while rendering stay alive in the host until [`Host::release_listeners`].
/// [`Mount`](`crate::Mount`) takes care of this between generations.
#[derive(Debug)]
pub struct Renderer<H: Host> {
	host: H,
	binders: Binders<H>,
	depth_limit: usize,
}

impl<H: Host> Renderer<H> {
	#[must_use]
	pub fn new(host: H) -> Self {
		Self {
			host,
			binders: Binders::standard(),
			depth_limit: DEFAULT_DEPTH_LIMIT,
		}
	}

	/// Replaces the [standard](`Binders::standard`) attribute binders.
	#[must_use]
	pub fn with_binders(mut self, binders: Binders<H>) -> Self {
		self.binders = binders;
		self
	}

	/// Opts into a nesting limit. Elements nested deeper than this are not rendered (and an error is logged).
	#[must_use]
	pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
		self.depth_limit = depth_limit;
		self
	}

	#[must_use]
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Converts one child into a live node.
	///
	/// - [`Child::Skip`] renders to [`None`]. Callers must not attach anything for it.
	/// - [`Child::Text`] renders to a text node.
	/// - [`Child::Live`] is returned as-is.
	/// - [`Child::Element`] is materialized recursively, see [`Renderer::render_element`].
	#[instrument(skip(self, child))]
	pub fn render(&self, child: &Child<H>) -> Option<H::Node> {
		self.render_child(child, self.depth_limit, &mut Vec::new())
	}

	/// Creates one element of [`VNode::tag`], binds its attributes in order and appends its rendered children in order.
	///
	/// Returns [`None`] only if the host failed to create the element or a configured depth limit was reached, both of which are logged.
	#[instrument(skip(self, vnode), fields(tag = vnode.tag()))]
	pub fn render_element(&self, vnode: &VNode<H>) -> Option<H::Node> {
		self.create_element(vnode, self.depth_limit, &mut Vec::new())
	}

	fn render_child<'a>(&self, child: &'a Child<H>, depth_limit: usize, path: &mut Vec<&'a str>) -> Option<H::Node> {
		match child {
			Child::Skip => None,
			Child::Text(text) => {
				let span = if cfg!(feature = "dangerous-logging") {
					trace_span!("Creating text node", text = text.as_str())
				} else {
					trace_span!("Creating text node", len = text.len())
				};
				let _enter = span.enter();
				Some(self.host.create_text_node(text))
			}
			Child::Live(node) => {
				trace!("Passing through live node {:?}.", node);
				Some(node.clone())
			}
			Child::Element(vnode) => self.create_element(vnode, depth_limit, path),
		}
	}

	fn create_element<'a>(&self, vnode: &'a VNode<H>, depth_limit: usize, path: &mut Vec<&'a str>) -> Option<H::Node> {
		if depth_limit == 0 {
			if cfg!(feature = "log-paths") {
				error!("Depth limit reached at <{}> below {}", vnode.tag(), path.join(" > "));
			} else {
				error!("Depth limit reached at <{}>", vnode.tag());
			}
			return None;
		}

		let tag = vnode.tag();
		let span = trace_span!("Creating element", tag, attributes = vnode.attrs().len(), children = vnode.children().len());
		let _enter = span.enter();

		let element = match self.host.create_element(tag) {
			Ok(element) => element,
			Err(error) => {
				error!("Failed to create element <{}>: {:?}", tag, error);
				return None;
			}
		};

		for (name, value) in vnode.attrs().iter() {
			let span = if cfg!(feature = "dangerous-logging") {
				trace_span!("Binding attribute", name, ?value)
			} else {
				trace_span!("Binding attribute", name)
			};
			let _enter = span.enter();
			let binding = self.binders.bind(&self.host, &element, name, value);
			trace!(?binding);
		}

		path.push(tag);
		for child in vnode.children().iter().filter(|child| !child.is_skip()) {
			let rendered = match self.render_child(child, depth_limit - 1, path) {
				Some(rendered) => rendered,
				None => {
					error!("Child of <{}> could not be rendered. Leaving it out.", tag);
					continue;
				}
			};
			if let Err(error) = self.host.append_child(&element, &rendered) {
				error!("Failed to append child to <{}>: {:?}", tag, error)
			}
		}
		path.pop();

		Some(element)
	}
}
