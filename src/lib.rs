//! A tiny declarative DOM toolkit.
//!
//! - [`create_element`] builds immutable [`VNode`] descriptions.
//! - A [`Renderer`] materializes them into live nodes through a [`Host`], rebuilding the whole tree every time.
//! - [`create_state`] makes a [`Store`] whose subscribers are notified synchronously after each [`Store::set_state`].
//! - A [`Router`] dispatches navigation targets like `#/active` to handlers, starting with the current one.
//!
//! [`web`] binds all of this to the browser, [`memory`] provides a headless host and navigation source.

#![doc(html_root_url = "https://docs.rs/sprig-dom/0.1.0")]
#![warn(clippy::pedantic)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod bind;
pub mod host;
pub mod memory;
mod mount;
mod render;
pub mod router;
pub mod store;
mod vnode;
pub mod web;

pub use host::{Host, PropertyValue};
pub use mount::Mount;
pub use render::{Renderer, DEFAULT_DEPTH_LIMIT};
pub use router::{Listening, Navigation, Router};
pub use store::{create_state, Listener, Merge, Store, Subscription};
pub use vnode::{create_element, AttrValue, Attributes, Callback, Child, ElementOptions, VNode, DEFAULT_TAG};

use core::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

/// Runs `f`, logging instead of propagating a panic. Returns whether `f` completed.
pub(crate) fn isolate(what: &str, f: impl FnOnce()) -> bool {
	match panic::catch_unwind(AssertUnwindSafe(f)) {
		Ok(()) => true,
		Err(payload) => {
			error!("A {} panicked: {}", what, panic_message(payload.as_ref()));
			false
		}
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(message) = payload.downcast_ref::<&str>() {
		*message
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.as_str()
	} else {
		"(non-string payload)"
	}
}
