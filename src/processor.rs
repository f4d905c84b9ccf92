//! Recursive tree processing.
//!
//! `TreeProcessor` walks a [`Node`] tree and rewrites elements according to
//! their role: buttons receive the submit (or wizard-navigation) click
//! handler, named inputs receive registration bindings under the
//! platform-correct event prop, containers are recursed into structurally,
//! and everything else carries the shared control reference down. Text,
//! empty nodes, and anything past [`MAX_DEPTH`] pass through unchanged.

use serde_json::Value;
use tracing::warn;

use crate::callback::{Callback, EventHandler};
use crate::control::FormControl;
use crate::node::{Element, Node, Role, WizardNav};
use crate::platform::{self, Platform};
use crate::wizard::WizardState;

/// Maximum element nesting depth the processor rewrites.
///
/// Subtrees nested deeper than this render as authored, without bindings.
pub const MAX_DEPTH: usize = 10;

/// Role-driven tree rewriter for one render pass.
pub struct TreeProcessor {
	control: FormControl,
	platform: Platform,
	wizard: Option<WizardState>,
	submit: EventHandler,
}

impl TreeProcessor {
	/// Creates a processor for one render pass.
	///
	/// `platform` is the already-resolved effective platform. The submit
	/// trigger is built once here via [`FormControl::handle_submit`], so
	/// every button in the tree shares the same validate-then-callback
	/// pathway.
	pub fn new(
		control: FormControl,
		platform: Platform,
		wizard: Option<WizardState>,
		on_submit: Callback<Value, ()>,
	) -> Self {
		let submit = control.handle_submit(on_submit);
		Self {
			control,
			platform,
			wizard,
			submit,
		}
	}

	/// Returns the shared submit trigger.
	pub fn submit_handler(&self) -> &EventHandler {
		&self.submit
	}

	/// Processes a tree from the root.
	pub fn process(&self, node: Node) -> Node {
		self.process_at(node, 0)
	}

	fn process_at(&self, node: Node, depth: usize) -> Node {
		if depth > MAX_DEPTH {
			warn!(depth, "tree nesting exceeds supported depth; passing subtree through");
			return node;
		}
		match node {
			Node::Text(_) | Node::Empty => node,
			// A fragment is a multi-child slot, not a nesting level.
			Node::Fragment(children) => Node::Fragment(
				children
					.into_iter()
					.map(|child| self.process_at(child, depth))
					.collect(),
			),
			Node::Element(element) => self.process_element(element, depth),
		}
	}

	fn process_element(&self, element: Element, depth: usize) -> Node {
		match element.role() {
			Role::Button => self.process_button(element),
			Role::Input => self.process_input(element),
			Role::Container if element.has_children() => {
				let children = self.process_children(&element, depth);
				element.with_children(children).into()
			}
			Role::Generic if element.has_children() => {
				let children = self.process_children(&element, depth);
				element
					.with_control(self.control.clone())
					.with_children(children)
					.into()
			}
			// Childless leaves only carry the control reference.
			_ => element.with_control(self.control.clone()).into(),
		}
	}

	fn process_children(&self, element: &Element, depth: usize) -> Vec<Node> {
		element
			.child_nodes()
			.iter()
			.cloned()
			.map(|child| self.process_at(child, depth + 1))
			.collect()
	}

	fn process_button(&self, element: Element) -> Node {
		if let (Some(wizard), Some(nav)) = (&self.wizard, element.wizard_marker()) {
			return match nav {
				WizardNav::Next => {
					if wizard.is_last_step() {
						// The final step's Next button is the submit button.
						element.with_click(self.submit.clone())
					} else {
						let wizard = wizard.clone();
						element.with_click(Callback::new(move |_: Value| wizard.next()))
					}
				}
				WizardNav::Previous => {
					let handler = {
						let wizard = wizard.clone();
						Callback::new(move |_: Value| wizard.previous())
					};
					element
						.with_click(handler)
						.with_disabled(wizard.is_first_step())
				}
			}
			.into();
		}
		element.with_click(self.submit.clone()).into()
	}

	fn process_input(&self, element: Element) -> Node {
		let name = match element.name() {
			Some(name) => name.to_string(),
			None => {
				warn!(tag = element.tag(), "input element has no name path; leaving it unbound");
				return element.with_control(self.control.clone()).into();
			}
		};

		let component = platform::component_type(&element, self.platform).to_string();
		let event_prop = platform::change_event_prop(self.platform, &component);
		let registration = self.control.register(&name);

		let mut element = element
			.with_handler(event_prop, registration.on_change)
			.with_handler("onBlur", registration.on_blur);
		if self.platform.is_native() && event_prop != "onChange" {
			// Keep a stub under the generic prop so components that fire
			// both events do not dispatch the commit twice.
			element = element.with_handler("onChange", EventHandler::noop());
		}
		element.with_key(name).into()
	}
}

impl std::fmt::Debug for TreeProcessor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TreeProcessor")
			.field("platform", &self.platform)
			.field("wizard", &self.wizard)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::platform::components;
	use serde_json::json;
	use std::sync::{Arc, Mutex};

	fn web_processor(control: &FormControl) -> TreeProcessor {
		TreeProcessor::new(control.clone(), Platform::Web, None, Callback::new(|_| {}))
	}

	#[test]
	fn test_text_and_empty_pass_through() {
		let control = FormControl::new();
		let processor = web_processor(&control);

		assert!(matches!(processor.process(Node::text("hi")), Node::Text(t) if t == "hi"));
		assert!(matches!(processor.process(Node::empty()), Node::Empty));
	}

	#[test]
	fn test_button_receives_submit_click() {
		let control = FormControl::new();
		control.set_value("name", json!("Ada"), Default::default());

		let seen = Arc::new(Mutex::new(Vec::new()));
		let processor = TreeProcessor::new(
			control.clone(),
			Platform::Web,
			None,
			Callback::new({
				let seen = Arc::clone(&seen);
				move |values: Value| seen.lock().unwrap().push(values)
			}),
		);

		let node = processor.process(Element::button("button").child("Send").into());
		let button = node.as_element().unwrap();
		button.handler("onClick").unwrap().trigger();

		let seen = seen.lock().unwrap();
		assert_eq!(seen.len(), 1);
		assert_eq!(seen[0], json!({"name": "Ada"}));
	}

	#[test]
	fn test_submit_sees_latest_values() {
		let control = FormControl::new();
		let seen = Arc::new(Mutex::new(Vec::new()));
		let processor = TreeProcessor::new(
			control.clone(),
			Platform::Web,
			None,
			Callback::new({
				let seen = Arc::clone(&seen);
				move |values: Value| seen.lock().unwrap().push(values)
			}),
		);

		let form = Element::new("div")
			.child(Element::input("input", "name"))
			.child(Element::button("button").child("Send"));
		let node = processor.process(form.into());
		let root = node.as_element().unwrap();
		let input = root.child_nodes()[0].as_element().unwrap();
		let button = root.child_nodes()[1].as_element().unwrap();

		input.handler("onChange").unwrap().call(json!("Grace"));
		button.handler("onClick").unwrap().trigger();

		assert_eq!(seen.lock().unwrap()[0], json!({"name": "Grace"}));
	}

	#[test]
	fn test_input_bound_and_rekeyed_on_web() {
		let control = FormControl::new();
		let processor = web_processor(&control);

		let node = processor.process(Element::input("input", "email").into());
		let input = node.as_element().unwrap();
		assert!(input.handler("onChange").is_some());
		assert!(input.handler("onBlur").is_some());
		assert_eq!(input.element_key(), Some("email"));

		input.handler("onChange").unwrap().call(json!("a@b.c"));
		assert_eq!(control.get_value("email"), Some(json!("a@b.c")));
	}

	#[test]
	fn test_native_text_input_uses_on_change_text() {
		let control = FormControl::new();
		let processor = TreeProcessor::new(
			control.clone(),
			Platform::Native,
			None,
			Callback::new(|_| {}),
		);

		let node = processor.process(
			Element::input("input", "bio")
				.component(components::TEXT_INPUT)
				.into(),
		);
		let input = node.as_element().unwrap();

		input.handler("onChangeText").unwrap().call(json!("hello"));
		assert_eq!(control.get_value("bio"), Some(json!("hello")));

		// The generic prop carries an inert stub, so a double dispatch
		// does not commit twice.
		input.handler("onChange").unwrap().call(json!("ignored"));
		assert_eq!(control.get_value("bio"), Some(json!("hello")));
	}

	#[test]
	fn test_native_switch_uses_on_value_change() {
		let control = FormControl::new();
		let processor = TreeProcessor::new(
			control.clone(),
			Platform::Native,
			None,
			Callback::new(|_| {}),
		);

		let node = processor.process(
			Element::input("input", "active")
				.component(components::SWITCH)
				.into(),
		);
		let input = node.as_element().unwrap();
		input.handler("onValueChange").unwrap().call(json!(true));
		assert_eq!(control.get_value("active"), Some(json!(true)));
	}

	#[test]
	fn test_nameless_input_degrades_to_leaf() {
		let control = FormControl::new();
		let processor = web_processor(&control);

		let node =
			processor.process(Element::with_role("custom-input", Role::Input).into());
		let el = node.as_element().unwrap();
		assert!(el.control().is_some());
		assert!(el.handler("onChange").is_none());
		assert!(el.element_key().is_none());
	}

	#[test]
	fn test_container_recursed_without_control() {
		let control = FormControl::new();
		let processor = web_processor(&control);

		let tree = Element::container("section").child(Element::input("input", "a"));
		let node = processor.process(tree.into());
		let section = node.as_element().unwrap();
		assert!(section.control().is_none());

		let input = section.child_nodes()[0].as_element().unwrap();
		assert!(input.handler("onChange").is_some());
	}

	#[test]
	fn test_generic_with_children_gets_control_and_recursion() {
		let control = FormControl::new();
		let processor = web_processor(&control);

		let tree = Element::new("div").child(Element::button("button").child("Go"));
		let node = processor.process(tree.into());
		let div = node.as_element().unwrap();
		assert!(div.control().is_some());

		let button = div.child_nodes()[0].as_element().unwrap();
		assert!(button.handler("onClick").is_some());
	}

	#[test]
	fn test_childless_leaf_gets_control_only() {
		let control = FormControl::new();
		let processor = web_processor(&control);

		let node = processor.process(Element::new("hr").into());
		let hr = node.as_element().unwrap();
		assert!(hr.control().is_some());
		assert!(hr.handlers().is_empty());
	}

	#[test]
	fn test_fragment_children_processed_at_same_depth() {
		let control = FormControl::new();
		let processor = web_processor(&control);

		let node = processor.process(Node::fragment([
			Node::from(Element::input("input", "a")),
			Node::from(Element::input("input", "b")),
		]));
		let Node::Fragment(children) = node else {
			panic!("expected fragment");
		};
		for child in &children {
			assert!(child.as_element().unwrap().handler("onChange").is_some());
		}
	}

	#[test]
	fn test_subtrees_past_max_depth_pass_through() {
		let control = FormControl::new();
		let processor = web_processor(&control);

		// Eleven container levels put the input at depth 11.
		let mut tree: Node = Element::input("input", "deep").into();
		for _ in 0..11 {
			tree = Element::container("div").child(tree).into();
		}

		let mut node = processor.process(tree);
		for _ in 0..11 {
			node = node.as_element().unwrap().child_nodes()[0].clone();
		}
		let input = node.as_element().unwrap();
		assert!(input.handler("onChange").is_none());
		assert!(input.element_key().is_none());
	}

	#[test]
	fn test_wizard_next_advances_until_last_step() {
		let control = FormControl::new();
		let wizard = WizardState::new(2);
		let submitted = Arc::new(Mutex::new(0usize));
		let processor = TreeProcessor::new(
			control.clone(),
			Platform::Web,
			Some(wizard.clone()),
			Callback::new({
				let submitted = Arc::clone(&submitted);
				move |_: Value| *submitted.lock().unwrap() += 1
			}),
		);

		let next_button: Node = Element::button("button")
			.wizard_nav(WizardNav::Next)
			.child("Next")
			.into();

		// Step 0: Next advances, no submit.
		let node = processor.process(next_button.clone());
		node.as_element().unwrap().handler("onClick").unwrap().trigger();
		assert_eq!(wizard.current_step(), 1);
		assert_eq!(*submitted.lock().unwrap(), 0);

		// Step 1 (last): Next submits.
		let node = processor.process(next_button);
		node.as_element().unwrap().handler("onClick").unwrap().trigger();
		assert_eq!(wizard.current_step(), 1);
		assert_eq!(*submitted.lock().unwrap(), 1);
	}

	#[test]
	fn test_wizard_previous_disabled_on_first_step() {
		let control = FormControl::new();
		let wizard = WizardState::new(3);
		let processor = TreeProcessor::new(
			control.clone(),
			Platform::Web,
			Some(wizard.clone()),
			Callback::new(|_| {}),
		);

		let previous_button: Node = Element::button("button")
			.wizard_nav(WizardNav::Previous)
			.child("Back")
			.into();

		let node = processor.process(previous_button.clone());
		assert!(node.as_element().unwrap().is_disabled());

		wizard.next();
		let node = processor.process(previous_button);
		let button = node.as_element().unwrap();
		assert!(!button.is_disabled());
		button.handler("onClick").unwrap().trigger();
		assert_eq!(wizard.current_step(), 0);
	}

	#[test]
	fn test_nav_markers_ignored_outside_wizard_mode() {
		let control = FormControl::new();
		let submitted = Arc::new(Mutex::new(0usize));
		let processor = TreeProcessor::new(
			control.clone(),
			Platform::Web,
			None,
			Callback::new({
				let submitted = Arc::clone(&submitted);
				move |_: Value| *submitted.lock().unwrap() += 1
			}),
		);

		let node = processor.process(
			Element::button("button")
				.wizard_nav(WizardNav::Next)
				.child("Next")
				.into(),
		);
		node.as_element().unwrap().handler("onClick").unwrap().trigger();
		assert_eq!(*submitted.lock().unwrap(), 1);
	}
}
