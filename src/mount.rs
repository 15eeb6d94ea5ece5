use crate::{
	host::Host,
	render::Renderer,
	store::{Merge, Store, Subscription},
	vnode::Child,
};
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;
use tracing::{error, instrument, trace};

/// A [`Renderer`] attached to a root node whose children it replaces wholesale.
pub struct Mount<H: Host> {
	renderer: Renderer<H>,
	root: H::Node,
}

impl<H: Host> Mount<H> {
	#[must_use]
	pub fn new(renderer: Renderer<H>, root: H::Node) -> Self {
		Self { renderer, root }
	}

	#[must_use]
	pub fn root(&self) -> &H::Node {
		&self.root
	}

	#[must_use]
	pub fn renderer(&self) -> &Renderer<H> {
		&self.renderer
	}

	/// Discards the root's current children (and the previous generation's event listeners),
	/// then renders `child` and appends it.
	///
	/// Returns whether something was appended.
	#[instrument(skip(self, child))]
	pub fn replace(&self, child: &Child<H>) -> bool {
		let host = self.renderer.host();
		let released = host.release_listeners();
		trace!("Released {} event listener(s).", released);
		if let Err(error) = host.clear_children(&self.root) {
			error!("Failed to clear the mount root: {:?}", error)
		}

		let node = match self.renderer.render(child) {
			Some(node) => node,
			None => return false,
		};
		match host.append_child(&self.root, &node) {
			Ok(()) => true,
			Err(error) => {
				error!("Failed to append to the mount root: {:?}", error);
				false
			}
		}
	}
}

impl<H: Host + 'static> Mount<H> {
	/// Renders `view` of the current state now, and again after every [`Store::set_state`].
	///
	/// [`unsubscribe`](`Subscription::unsubscribe`) to stop.
	pub fn bind<S, C>(self, store: &Store<S>, view: impl 'static + Fn(&S) -> C) -> Subscription<S>
	where
		S: Merge + 'static,
		C: Into<Child<H>>,
	{
		let mount = Rc::new(self);
		mount.replace(&view(&store.get_state()).into());
		store.subscribe_fn(move |state| {
			mount.replace(&view(state).into());
		})
	}
}

impl<H: Host + Debug> Debug for Mount<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Mount").field("renderer", &self.renderer).field("root", &self.root).finish()
	}
}
