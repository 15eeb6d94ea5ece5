use sprig_dom::{
	create_element,
	memory::{MemoryEvent, MemoryHost, MemoryNode},
	AttrValue, Attributes, Child, ElementOptions, Host, PropertyValue, Renderer, VNode,
};
use std::{cell::RefCell, rc::Rc};

fn renderer() -> Renderer<MemoryHost> {
	Renderer::new(MemoryHost::new())
}

fn render(vnode: VNode<MemoryHost>) -> MemoryNode {
	renderer().render(&Child::Element(vnode)).expect("rendered element")
}

#[test]
fn skip_renders_to_nothing() {
	assert!(renderer().render(&Child::Skip).is_none());
}

#[test]
fn text_and_numbers_render_as_text_nodes() {
	let renderer = renderer();
	let text = renderer.render(&Child::from("hello")).unwrap();
	assert_eq!(text.text().as_deref(), Some("hello"));
	assert_eq!(text.tag(), None);

	let number = renderer.render(&Child::from(42)).unwrap();
	assert_eq!(number.text().as_deref(), Some("42"));
}

#[test]
fn live_nodes_pass_through() {
	let renderer = renderer();
	let live = renderer.host().create_element("canvas").unwrap();
	let rendered = renderer.render(&Child::Live(live.clone())).unwrap();
	assert!(rendered.ptr_eq(&live));

	let parent = render(VNode::new("div").child(Child::Live(live.clone())));
	assert!(parent.children()[0].ptr_eq(&live));
}

#[test]
fn a_live_node_embedded_twice_ends_up_in_the_latest_parent() {
	let renderer = renderer();
	let live = renderer.host().create_element("canvas").unwrap();

	let first = render(VNode::new("section").child(Child::Live(live.clone())));
	let second = render(VNode::new("aside").child(Child::Live(live.clone())));

	assert_eq!(first.child_count(), 0);
	assert_eq!(second.child_count(), 1);
	assert!(live.parent().unwrap().ptr_eq(&second));
}

#[test]
fn tagless_nodes_default_to_div() {
	let node = render(VNode::default());
	assert_eq!(node.tag().as_deref(), Some("div"));
	assert_eq!(node.child_count(), 0);
	assert_eq!(node.attribute_count(), 0);
}

#[test]
fn checkbox_checked_is_a_live_property() {
	let node = render(create_element(
		"input",
		Some(ElementOptions {
			attrs: Attributes::new().with("type", "checkbox").with("checked", true),
			children: Vec::new(),
		}),
	));
	assert_eq!(node.property("checked"), Some(PropertyValue::Bool(true)));
	assert_eq!(node.attribute("type").as_deref(), Some("checkbox"));
	assert!(!node.has_attribute("checked"));
}

#[test]
fn skipped_children_are_not_appended() {
	let node = render(create_element(
		"li",
		Some(ElementOptions {
			attrs: Attributes::new(),
			children: vec![Child::Skip, "x".into(), Child::Skip, Child::Element(create_element("span", None))],
		}),
	));

	let children = node.children();
	assert_eq!(children.len(), 2);
	assert_eq!(children[0].text().as_deref(), Some("x"));
	assert_eq!(children[1].tag().as_deref(), Some("span"));
}

#[test]
fn child_order_is_preserved() {
	let node = render(VNode::new("ul").with_children((0..10).map(|i| VNode::<MemoryHost>::new("li").child(i))));
	let texts: Vec<_> = node.children().iter().map(MemoryNode::text_content).collect();
	assert_eq!(texts, (0..10).map(|i| i.to_string()).collect::<Vec<_>>());
}

#[test]
fn attributes_follow_their_binding_rules() {
	let clicks = Rc::new(RefCell::new(Vec::new()));
	let node = render(
		VNode::new("button")
			.attr("class", "destroy")
			.attr("title", AttrValue::Absent)
			.attr("data-id", "7")
			.attr("disabled", false)
			.on("Click", {
				let clicks = Rc::clone(&clicks);
				move |event: &MemoryEvent| clicks.borrow_mut().push(event.name.clone())
			}),
	);

	assert_eq!(node.class_name().as_deref(), Some("destroy"));
	assert!(!node.has_attribute("title"));
	assert_eq!(node.attribute("data-id").as_deref(), Some("7"));
	assert_eq!(node.property("disabled"), Some(PropertyValue::Bool(false)));
	assert!(!node.has_attribute("onClick"));

	assert_eq!(node.dispatch("click"), 1);
	assert_eq!(*clicks.borrow(), ["click"]);
}

#[test]
fn refused_properties_fall_back_to_attributes() {
	let renderer = Renderer::new(MemoryHost::new().with_readonly_property("value").with_readonly_property("autofocus"));
	let node = renderer
		.render_element(&VNode::new("input").attr("value", "milk").attr("autofocus", true))
		.unwrap();

	assert_eq!(node.attribute("value").as_deref(), Some("milk"));
	assert_eq!(node.attribute("autofocus").as_deref(), Some(""));
	assert_eq!(node.property("value"), None);
}

#[test]
fn invalid_children_are_left_out() {
	let node = render(VNode::new("div").child("before").child(VNode::<MemoryHost>::new("not valid")).child("after"));
	assert_eq!(node.child_count(), 2);
	assert_eq!(node.text_content(), "beforeafter");
}

#[test]
fn invalid_root_renders_to_nothing() {
	assert!(renderer().render_element(&VNode::new("")).is_none());
}

#[test]
fn every_render_builds_new_nodes() {
	let renderer = renderer();
	let vnode = VNode::new("p").child("same");
	let first = renderer.render_element(&vnode).unwrap();
	let second = renderer.render_element(&vnode).unwrap();
	assert!(!first.ptr_eq(&second));
	assert_eq!(first.text_content(), second.text_content());
}
