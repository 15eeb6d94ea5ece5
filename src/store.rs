//! A single-threaded state container with synchronous subscriber notification.

use crate::isolate;
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
	hash::{BuildHasher, Hash},
};
use std::{
	collections::BTreeMap,
	rc::{Rc, Weak},
};
use tracing::{instrument, trace, trace_span, warn};

/// Right-biased shallow merging.
///
/// `current.merge(update)` must yield a new state in which entries of `update` replace matching entries of `current`
/// while all other entries of `current` persist.
pub trait Merge: Sized {
	type Update;
	#[must_use]
	fn merge(&self, update: Self::Update) -> Self;
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher + Clone> Merge for hashbrown::HashMap<K, V, S> {
	type Update = Self;
	fn merge(&self, update: Self) -> Self {
		let mut next = self.clone();
		next.extend(update);
		next
	}
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher + Clone> Merge for std::collections::HashMap<K, V, S> {
	type Update = Self;
	fn merge(&self, update: Self) -> Self {
		let mut next = self.clone();
		next.extend(update);
		next
	}
}

impl<K: Ord + Clone, V: Clone> Merge for BTreeMap<K, V> {
	type Update = Self;
	fn merge(&self, update: Self) -> Self {
		let mut next = self.clone();
		next.extend(update);
		next
	}
}

/// A subscriber. Its identity is that of the [`Rc`] allocation.
pub type Listener<S> = Rc<dyn Fn(&S)>;

struct Entry<S> {
	id: u64,
	listener: Listener<S>,
	active: Rc<Cell<bool>>,
}
impl<S> Clone for Entry<S> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			listener: Rc::clone(&self.listener),
			active: Rc::clone(&self.active),
		}
	}
}

struct Inner<S> {
	state: RefCell<Rc<S>>,
	listeners: RefCell<Vec<Entry<S>>>,
	next_id: Cell<u64>,
}

impl<S> Inner<S> {
	fn remove(&self, id: u64) -> bool {
		let mut listeners = self.listeners.borrow_mut();
		match listeners.iter().position(|entry| entry.id == id) {
			Some(index) => {
				listeners.remove(index).active.set(false);
				true
			}
			None => false,
		}
	}
}

/// A handle to one application state cell and its subscribers.
///
/// Clones share the same state. Hand a clone to each component that needs access instead of reaching for a global.
///
/// # Re-entrancy
///
/// Each notification pass iterates the subscribers registered when it started:
///
/// - Subscribers added during a pass are first notified by the next pass.
/// - Subscribers removed during a pass are not called for the remainder of it.
/// - A [`Store::set_state`] call from within a subscriber completes its own pass before the outer pass continues.
///
/// Every call receives the state current at that moment, so the last state a subscriber sees is always [`Store::get_state`].
///
/// # Panics
///
/// Each subscriber runs isolated: A panicking subscriber is logged and the remaining ones are still notified.
/// This requires unwinding, so with `panic = "abort"` (as is common on `wasm32`) a panic aborts as usual.
pub struct Store<S>(Rc<Inner<S>>);

/// Creates a [`Store`] seeded with `initial_state`.
pub fn create_state<S: Merge + 'static>(initial_state: S) -> Store<S> {
	Store::new(initial_state)
}

impl<S: Merge + 'static> Store<S> {
	#[must_use]
	pub fn new(initial_state: S) -> Self {
		Self(Rc::new(Inner {
			state: RefCell::new(Rc::new(initial_state)),
			listeners: RefCell::default(),
			next_id: Cell::new(0),
		}))
	}

	/// The current state. No side effects.
	#[must_use]
	pub fn get_state(&self) -> Rc<S> {
		Rc::clone(&self.0.state.borrow())
	}

	/// Merges `update` over the current state, stores the result and then notifies every subscriber in registration order.
	///
	/// Without nested updates, all of them receive that same state.
	///
	/// Returns only after all subscribers have run.
	#[instrument(skip(self, update))]
	pub fn set_state(&self, update: S::Update) {
		let next = Rc::new(self.0.state.borrow().merge(update));
		*self.0.state.borrow_mut() = next;

		let snapshot = self.0.listeners.borrow().clone();
		trace!("Notifying {} subscriber(s).", snapshot.len());
		let mut failed = 0_usize;
		for entry in snapshot {
			if !entry.active.get() {
				trace!("Skipping subscriber {} removed during notification.", entry.id);
				continue;
			}
			let span = trace_span!("Notifying subscriber", id = entry.id);
			let _enter = span.enter();
			let current = self.get_state();
			if !isolate("state subscriber", || (entry.listener)(&*current)) {
				failed += 1;
			}
		}
		if failed > 0 {
			warn!("{} subscriber(s) panicked during notification.", failed)
		}
	}

	/// Registers `listener` to be called with the new state after each [`Store::set_state`].
	///
	/// Subscribing the same [`Rc`] again doesn't add another registration.
	/// The returned [`Subscription`] then refers to the existing one.
	pub fn subscribe(&self, listener: Listener<S>) -> Subscription<S> {
		let mut listeners = self.0.listeners.borrow_mut();
		let existing = listeners.iter().find(|entry| same_listener(&entry.listener, &listener)).map(|entry| entry.id);
		let id = match existing {
			Some(id) => {
				trace!("Subscriber {} is already registered.", id);
				id
			}
			None => {
				let id = self.0.next_id.get();
				self.0.next_id.set(id + 1);
				listeners.push(Entry {
					id,
					listener,
					active: Rc::new(Cell::new(true)),
				});
				trace!("Registered subscriber {}.", id);
				id
			}
		};
		Subscription {
			store: Rc::downgrade(&self.0),
			id,
		}
	}

	/// Shorthand for [`Store::subscribe`] with a fresh [`Rc`].
	pub fn subscribe_fn(&self, listener: impl 'static + Fn(&S)) -> Subscription<S> {
		self.subscribe(Rc::new(listener))
	}

	#[must_use]
	pub fn subscriber_count(&self) -> usize {
		self.0.listeners.borrow().len()
	}
}

fn same_listener<S>(a: &Listener<S>, b: &Listener<S>) -> bool {
	Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

impl<S> Clone for Store<S> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}
impl<S: Debug> Debug for Store<S> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Store")
			.field("state", &self.0.state.borrow())
			.field("subscribers", &self.0.listeners.borrow().len())
			.finish()
	}
}

/// Removes one registration from its [`Store`] when [`unsubscribe`](`Subscription::unsubscribe`)d.
///
/// Dropping a [`Subscription`] does **not** unsubscribe.
pub struct Subscription<S> {
	store: Weak<Inner<S>>,
	id: u64,
}
impl<S> Subscription<S> {
	/// Removes exactly this registration. Further calls are no-ops.
	pub fn unsubscribe(&self) {
		if let Some(store) = self.store.upgrade() {
			if store.remove(self.id) {
				trace!("Unsubscribed subscriber {}.", self.id)
			}
		}
	}
}
impl<S> Debug for Subscription<S> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription").field("id", &self.id).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	type State = BTreeMap<&'static str, i32>;

	fn state(entries: &[(&'static str, i32)]) -> State {
		entries.iter().copied().collect()
	}

	#[test]
	fn merge_is_right_biased() {
		let merged = state(&[("a", 1), ("b", 2)]).merge(state(&[("b", 3), ("c", 4)]));
		assert_eq!(merged, state(&[("a", 1), ("b", 3), ("c", 4)]));

		let mut current = hashbrown::HashMap::new();
		current.insert("filter", "all");
		let mut update = hashbrown::HashMap::new();
		update.insert("filter", "active");
		assert_eq!(current.merge(update)["filter"], "active");
	}

	#[test]
	fn duplicate_subscription_is_a_no_op() {
		let store = create_state(state(&[]));
		let calls = Rc::new(Cell::new(0));
		let listener: Listener<State> = Rc::new({
			let calls = Rc::clone(&calls);
			move |_: &State| calls.set(calls.get() + 1)
		});

		let first = store.subscribe(Rc::clone(&listener));
		let second = store.subscribe(Rc::clone(&listener));
		assert_eq!(store.subscriber_count(), 1);

		store.set_state(state(&[("a", 1)]));
		assert_eq!(calls.get(), 1);

		second.unsubscribe();
		assert_eq!(store.subscriber_count(), 0);
		first.unsubscribe();

		store.set_state(state(&[("a", 2)]));
		assert_eq!(calls.get(), 1);
	}

	#[test]
	fn unsubscribe_after_store_drop_is_harmless() {
		let store = create_state(state(&[]));
		let subscription = store.subscribe_fn(|_| ());
		drop(store);
		subscription.unsubscribe();
	}
}
