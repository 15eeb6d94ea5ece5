use sprig_dom::{memory::MemoryNavigation, router::path_of, Router};
use std::{cell::RefCell, rc::Rc};

fn recording_router(navigation: &MemoryNavigation, log: &Rc<RefCell<Vec<&'static str>>>) -> Router<MemoryNavigation> {
	let mut router = Router::new(navigation.clone());
	for (path, name) in [("/", "A"), ("/active", "B")].iter().copied() {
		let log = Rc::clone(log);
		router.add_route(path, move || log.borrow_mut().push(name));
	}
	router
}

#[test]
fn listen_dispatches_the_current_target() {
	let navigation = MemoryNavigation::new("#/active");
	let log = Rc::default();
	recording_router(&navigation, &log).listen();
	assert_eq!(*log.borrow(), ["B"]);
}

#[test]
fn unmatched_targets_invoke_nothing() {
	let navigation = MemoryNavigation::new("#/missing");
	let log = Rc::default();
	let listening = recording_router(&navigation, &log).listen();
	assert!(log.borrow().is_empty());
	assert!(!listening.dispatch_current());
	assert_eq!(listening.current_path(), "/missing");
}

#[test]
fn empty_target_is_the_root_path() {
	let navigation = MemoryNavigation::new("");
	let log = Rc::default();
	recording_router(&navigation, &log).listen();
	assert_eq!(*log.borrow(), ["A"]);
	assert_eq!(path_of(""), "/");
}

#[test]
fn navigation_events_dispatch_after_listen() {
	let navigation = MemoryNavigation::new("#/");
	let log = Rc::default();
	let router = recording_router(&navigation, &log);

	navigation.navigate("#/active");
	assert!(log.borrow().is_empty(), "an idle router must not dispatch");

	let _listening = router.listen();
	navigation.navigate("#/");
	navigation.navigate("#/missing");
	navigation.navigate("#/active");
	assert_eq!(*log.borrow(), ["B", "A", "B"]);
}

#[test]
fn dispatch_continues_after_the_handle_is_dropped() {
	let navigation = MemoryNavigation::new("#/");
	let log = Rc::default();
	drop(recording_router(&navigation, &log).listen());
	navigation.navigate("#/active");
	assert_eq!(*log.borrow(), ["A", "B"]);
}

#[test]
fn re_registration_replaces_the_handler() {
	let navigation = MemoryNavigation::new("#/");
	let log = Rc::new(RefCell::new(Vec::new()));
	let mut router = Router::new(navigation);
	router
		.add_route("/", {
			let log = Rc::clone(&log);
			move || log.borrow_mut().push("old")
		})
		.add_route("/", {
			let log = Rc::clone(&log);
			move || log.borrow_mut().push("new")
		});
	router.listen();
	assert_eq!(*log.borrow(), ["new"]);
}

#[test]
fn a_panicking_handler_does_not_break_routing() {
	let navigation = MemoryNavigation::new("#/boom");
	let log = Rc::new(RefCell::new(Vec::new()));
	let mut router = Router::new(navigation.clone());
	router.add_route("/boom", || panic!("handler failure"));
	router.add_route("/ok", {
		let log = Rc::clone(&log);
		move || log.borrow_mut().push("ok")
	});
	let listening = router.listen();
	assert!(listening.dispatch_current());

	navigation.navigate("#/ok");
	assert_eq!(*log.borrow(), ["ok"]);
}
