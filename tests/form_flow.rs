//! End-to-end flows: building a form, driving its handlers, submitting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Value, json};

use formtree::platform::components;
use formtree::{
	Callback, Element, FieldArray, FormControl, FormView, MAX_DEPTH, Node, Platform,
	PlatformMode, TreeProcessor, WizardNav, WizardState,
};

fn collecting_submit() -> (Callback<Value, ()>, Arc<Mutex<Vec<Value>>>) {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let callback = Callback::new({
		let seen = Arc::clone(&seen);
		move |values: Value| seen.lock().unwrap().push(values)
	});
	(callback, seen)
}

fn element_at<'a>(node: &'a Node, path: &[usize]) -> &'a Element {
	let mut el = node.as_element().expect("element");
	for &index in path {
		el = el.child_nodes()[index].as_element().expect("element");
	}
	el
}

#[test]
fn submit_flow_collects_latest_values() {
	let control = FormControl::new();
	let (on_submit, seen) = collecting_submit();
	let form = FormView::new(control, on_submit)
		.platform(PlatformMode::Web)
		.children(
			Element::new("div")
				.child(Element::input("input", "user.name"))
				.child(Element::input("input", "user.email"))
				.child(Element::button("button").child("Send")),
		);

	let tree = form.render();
	element_at(&tree, &[0, 0])
		.handler("onChange")
		.unwrap()
		.call(json!("Ada"));
	element_at(&tree, &[0, 1])
		.handler("onChange")
		.unwrap()
		.call(json!("ada@example.com"));
	element_at(&tree, &[0, 2])
		.handler("onClick")
		.unwrap()
		.trigger();

	let seen = seen.lock().unwrap();
	assert_eq!(seen.len(), 1);
	assert_eq!(
		seen[0],
		json!({"user": {"name": "Ada", "email": "ada@example.com"}})
	);
}

#[test]
fn validation_blocks_submit_until_fixed() {
	let control = FormControl::builder()
		.resolver(|values: &Value| {
			let ok = formtree::path::get(values, "email")
				.and_then(Value::as_str)
				.is_some_and(|s| s.contains('@'));
			if ok {
				Ok(())
			} else {
				let mut errors = HashMap::new();
				errors.insert("email".to_string(), vec!["invalid email".to_string()]);
				Err(errors)
			}
		})
		.build();
	let (on_submit, seen) = collecting_submit();
	let form = FormView::new(control.clone(), on_submit)
		.platform(PlatformMode::Web)
		.children(
			Element::new("div")
				.child(Element::input("input", "email"))
				.child(Element::button("button").child("Send")),
		);

	let tree = form.render();
	let input = element_at(&tree, &[0, 0]);
	let button = element_at(&tree, &[0, 1]);

	input.handler("onChange").unwrap().call(json!("not-an-email"));
	button.handler("onClick").unwrap().trigger();
	assert!(seen.lock().unwrap().is_empty());
	assert_eq!(control.field_errors("email"), vec!["invalid email".to_string()]);

	input.handler("onChange").unwrap().call(json!("a@b.c"));
	button.handler("onClick").unwrap().trigger();
	assert_eq!(seen.lock().unwrap().len(), 1);
	assert!(control.field_errors("email").is_empty());
}

#[test]
fn wizard_three_step_flow() {
	let control = FormControl::new();
	let (on_submit, seen) = collecting_submit();
	let wizard = WizardState::new(0);

	let step = |name: &'static str| {
		Element::container("section")
			.attr("id", name)
			.child(
				Element::button("button")
					.wizard_nav(WizardNav::Previous)
					.child("Back"),
			)
			.child(
				Element::button("button")
					.wizard_nav(WizardNav::Next)
					.child("Next"),
			)
	};
	let form = FormView::new(control, on_submit)
		.platform(PlatformMode::Web)
		.wizard_state(wizard.clone())
		.children(Node::fragment([step("step-a"), step("step-b"), step("step-c")]));

	// Step 1 of 3: only the first step renders, Back is disabled.
	let tree = form.render();
	let html = tree.render_to_string();
	assert!(html.contains("step-a"));
	assert!(!html.contains("step-b"));
	assert!(html.contains("Step 1 of 3"));
	let back = element_at(&tree, &[0, 0]);
	assert!(back.is_disabled());

	// Next advances to step 2; nothing submitted.
	element_at(&tree, &[0, 1]).handler("onClick").unwrap().trigger();
	assert_eq!(wizard.current_step(), 1);
	assert!(seen.lock().unwrap().is_empty());

	let tree = form.render();
	let html = tree.render_to_string();
	assert!(html.contains("step-b"));
	assert!(!html.contains("step-a"));
	assert!(!html.contains("step-c"));
	assert!(html.contains("Step 2 of 3"));
	let back = element_at(&tree, &[0, 0]);
	assert!(!back.is_disabled());

	// Back returns to step 1.
	back.handler("onClick").unwrap().trigger();
	assert_eq!(wizard.current_step(), 0);
	wizard.next();
	wizard.next();

	// On the last step Next submits instead of advancing.
	let tree = form.render();
	assert!(tree.render_to_string().contains("Step 3 of 3"));
	element_at(&tree, &[0, 1]).handler("onClick").unwrap().trigger();
	assert_eq!(wizard.current_step(), 2);
	assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn native_text_input_commits_through_on_change_text() {
	let control = FormControl::new();
	let (on_submit, _) = collecting_submit();
	let form = FormView::new(control.clone(), on_submit)
		.native(true)
		.children(Element::input("input", "bio").component(components::TEXT_INPUT));

	let tree = form.render();
	let input = element_at(&tree, &[0]);

	input.handler("onChangeText").unwrap().call(json!("hello"));
	assert_eq!(control.get_value("bio"), Some(json!("hello")));

	// The generic change prop is inert on native text inputs.
	input.handler("onChange").unwrap().call(json!("ignored"));
	assert_eq!(control.get_value("bio"), Some(json!("hello")));
}

#[rstest]
#[case(Platform::Web, None, "onChange")]
#[case(Platform::Native, Some(components::TEXT_INPUT), "onChangeText")]
#[case(Platform::Native, Some(components::SWITCH), "onValueChange")]
#[case(Platform::Native, Some(components::PICKER), "onValueChange")]
#[case(Platform::Native, None, "onChange")]
fn change_event_prop_per_platform(
	#[case] platform: Platform,
	#[case] component: Option<&'static str>,
	#[case] expected: &str,
) {
	let control = FormControl::new();
	let processor = TreeProcessor::new(control.clone(), platform, None, Callback::new(|_| {}));

	let mut element = Element::input("input", "field");
	if let Some(component) = component {
		element = element.component(component);
	}
	let node = processor.process(element.into());
	let input = node.as_element().unwrap();

	input.handler(expected).unwrap().call(json!("x"));
	assert_eq!(control.get_value("field"), Some(json!("x")));
}

#[test]
fn leaf_elements_keep_their_props() {
	let control = FormControl::new();
	let processor = TreeProcessor::new(
		control,
		Platform::Web,
		None,
		Callback::new(|_| {}),
	);

	let original = Element::new("img")
		.attr("src", "/logo.png")
		.attr("alt", "logo")
		.key("brand");
	let node = processor.process(original.clone().into());
	let leaf = node.as_element().unwrap();

	assert!(leaf.control().is_some());
	assert_eq!(leaf.attrs(), original.attrs());
	assert_eq!(leaf.element_key(), original.element_key());
	assert!(leaf.handlers().is_empty());
	assert_eq!(
		node.render_to_string(),
		Node::from(original).render_to_string()
	);
}

#[test]
fn array_root_error_gates_submission() {
	let control = FormControl::new();
	let items = FieldArray::new(control.clone(), "items").min_length(1, "add at least one item");
	let (on_submit, seen) = collecting_submit();
	let submit = control.handle_submit(on_submit);

	items.append(json!({"qty": 1})).unwrap();
	items.remove(0).unwrap();

	submit.trigger();
	assert!(seen.lock().unwrap().is_empty());
	assert_eq!(
		control.root_error("items"),
		Some("add at least one item".to_string())
	);

	items.append(json!({"qty": 2})).unwrap();
	submit.trigger();
	assert_eq!(seen.lock().unwrap().len(), 1);
	assert_eq!(seen.lock().unwrap()[0], json!({"items": [{"qty": 2}]}));
}

proptest! {
	#[test]
	fn inputs_bind_only_within_depth_limit(depth in 0usize..=20) {
		let control = FormControl::new();
		let processor = TreeProcessor::new(
			control,
			Platform::Web,
			None,
			Callback::new(|_| {}),
		);

		let mut tree: Node = Element::input("input", "leaf").into();
		for _ in 0..depth {
			tree = Element::container("div").child(tree).into();
		}

		let mut node = processor.process(tree);
		for _ in 0..depth {
			node = node.as_element().unwrap().child_nodes()[0].clone();
		}
		let bound = node.as_element().unwrap().handler("onChange").is_some();
		prop_assert_eq!(bound, depth <= MAX_DEPTH);
	}

	#[test]
	fn text_nodes_pass_through_untouched(text in ".*") {
		let control = FormControl::new();
		let processor = TreeProcessor::new(
			control,
			Platform::Web,
			None,
			Callback::new(|_| {}),
		);

		let processed = processor.process(Node::text(text.clone()));
		prop_assert!(matches!(processed, Node::Text(t) if t == text));
	}
}
