//! Flat path-to-handler routing over a navigation source.

use crate::isolate;
use core::fmt::{self, Debug, Formatter};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{debug, instrument, trace, trace_span};

/// The path dispatched for an empty navigation target.
pub const ROOT_PATH: &str = "/";

/// A source of navigation targets, like the location hash.
pub trait Navigation {
	/// The current target including its one-character prefix (`"#/active"`), or `""` if there is none.
	fn current_target(&self) -> String;

	/// Registers `dispatch` to be called with each new target.
	fn on_navigate(&self, dispatch: Box<dyn Fn(&str)>);
}

/// The path a navigation target refers to: [`ROOT_PATH`] if empty, otherwise everything after the first character.
#[must_use]
pub fn path_of(target: &str) -> &str {
	let mut chars = target.chars();
	match chars.next() {
		None => ROOT_PATH,
		Some(_) => chars.as_str(),
	}
}

type Handler = Rc<dyn Fn()>;

#[derive(Default)]
struct RouteTable(HashMap<String, Handler>);
impl RouteTable {
	#[instrument(skip(self))]
	fn dispatch(&self, target: &str) -> bool {
		let path = path_of(target);
		match self.0.get(path) {
			Some(handler) => {
				let span = trace_span!("Dispatching", path);
				let _enter = span.enter();
				isolate("route handler", || handler());
				true
			}
			None => {
				debug!("No route for {:?}.", path);
				false
			}
		}
	}
}
impl Debug for RouteTable {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.0.keys()).finish()
	}
}

/// An idle router. Routes can only be added before [`listen`](`Router::listen`)ing.
#[derive(Debug)]
pub struct Router<N: Navigation> {
	navigation: N,
	routes: RouteTable,
}

impl<N: Navigation> Router<N> {
	#[must_use]
	pub fn new(navigation: N) -> Self {
		Self {
			navigation,
			routes: RouteTable::default(),
		}
	}

	/// Registers `handler` for `path`, replacing any handler registered for it before.
	pub fn add_route(&mut self, path: impl Into<String>, handler: impl 'static + Fn()) -> &mut Self {
		let path = path.into();
		if self.routes.0.insert(path.clone(), Rc::new(handler)).is_some() {
			debug!("Replaced the handler for {:?}.", path);
		} else {
			trace!("Added route {:?}.", path);
		}
		self
	}

	/// Starts dispatching navigation events and dispatches once for the current target right away.
	///
	/// There is no way back: A [`Listening`] router keeps dispatching for as long as the navigation source emits events,
	/// whether or not the returned handle is kept.
	#[instrument(skip(self))]
	pub fn listen(self) -> Listening<N> {
		let Self { navigation, routes } = self;
		let routes = Rc::new(routes);
		navigation.on_navigate(Box::new({
			let routes = Rc::clone(&routes);
			move |target: &str| {
				routes.dispatch(target);
			}
		}));
		let listening = Listening { navigation, routes };
		listening.dispatch_current();
		listening
	}
}

/// A router that has started [`listen`](`Router::listen`)ing.
#[derive(Debug)]
pub struct Listening<N: Navigation> {
	navigation: N,
	routes: Rc<RouteTable>,
}

impl<N: Navigation> Listening<N> {
	/// Dispatches the navigation source's current target once more.
	///
	/// Returns whether a route matched.
	pub fn dispatch_current(&self) -> bool {
		self.routes.dispatch(&self.navigation.current_target())
	}

	#[must_use]
	pub fn navigation(&self) -> &N {
		&self.navigation
	}

	/// The current path, as it is dispatched.
	#[must_use]
	pub fn current_path(&self) -> String {
		path_of(&self.navigation.current_target()).to_owned()
	}
}
