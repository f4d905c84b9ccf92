//! Declarative field specifications.
//!
//! As an alternative to embedding input elements in the tree, a caller can
//! hand the control a list of `FieldSpec`s; the composition component
//! instantiates each one as a bound input element ahead of the processed
//! children, keyed by its position in the list.

use std::borrow::Cow;

use serde_json::Value;

use crate::callback::Callback;
use crate::control::FormControl;
use crate::node::{Element, Node};
use crate::platform::{self, Platform, components};

/// Closed set of input component kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
	TextInput,
	Switch,
	Picker,
	Slider,
	CheckBox,
	RadioButton,
	/// A caller-supplied component type name.
	Custom(Cow<'static, str>),
}

impl InputKind {
	/// Returns the component type name used for event-prop resolution.
	pub fn component_name(&self) -> &str {
		match self {
			InputKind::TextInput => components::TEXT_INPUT,
			InputKind::Switch => components::SWITCH,
			InputKind::Picker => components::PICKER,
			InputKind::Slider => components::SLIDER,
			InputKind::CheckBox => components::CHECK_BOX,
			InputKind::RadioButton => components::RADIO_BUTTON,
			InputKind::Custom(name) => name,
		}
	}
}

/// Value transforms applied at the field boundary.
///
/// `input` maps the stored value to its display form; `output` maps the
/// event payload back to the stored form.
#[derive(Clone)]
pub struct Transform {
	pub input: Callback<Value, Value>,
	pub output: Callback<Value, Value>,
}

impl std::fmt::Debug for Transform {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("Transform")
	}
}

/// A declarative, auto-registered field.
///
/// # Examples
///
/// ```
/// use formtree::{FieldSpec, InputKind};
///
/// let field = FieldSpec::new("user.email", InputKind::TextInput)
///     .label("Email")
///     .placeholder("you@example.com");
/// assert_eq!(field.name(), "user.email");
/// ```
#[derive(Debug, Clone)]
pub struct FieldSpec {
	name: String,
	kind: InputKind,
	label: Option<String>,
	placeholder: Option<String>,
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	transform: Option<Transform>,
}

impl FieldSpec {
	/// Creates a field spec for a name path.
	pub fn new(name: impl Into<String>, kind: InputKind) -> Self {
		Self {
			name: name.into(),
			kind,
			label: None,
			placeholder: None,
			attrs: Vec::new(),
			transform: None,
		}
	}

	/// Sets the label text.
	pub fn label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Sets the placeholder text.
	pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	/// Adds an extra attribute to the instantiated element.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Sets the value transforms.
	pub fn transform(mut self, transform: Transform) -> Self {
		self.transform = Some(transform);
		self
	}

	/// Returns the name path.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the input kind.
	pub fn kind(&self) -> &InputKind {
		&self.kind
	}

	/// Instantiates the spec as a bound input element.
	///
	/// The element carries registration bindings under the
	/// platform-correct event prop, the current (input-transformed) value,
	/// and is keyed by `index`, its position in the declarative list.
	pub fn instantiate(&self, control: &FormControl, platform: Platform, index: usize) -> Node {
		let registration = control.register(&self.name);

		let on_change = match &self.transform {
			Some(transform) => {
				let output = transform.output.clone();
				let inner = registration.on_change.clone();
				Callback::new(move |value: Value| inner.call(output.call(value)))
			}
			None => registration.on_change.clone(),
		};

		let component = self.kind.component_name();
		let event_prop = platform::change_event_prop(platform, component);

		let mut element = Element::input("input", self.name.clone())
			.component(component.to_string())
			.key(index.to_string())
			.on(event_prop, on_change)
			.on("onBlur", registration.on_blur.clone());
		if platform.is_native() && event_prop != "onChange" {
			element = element.on("onChange", crate::callback::EventHandler::noop());
		}

		if let Some(value) = control.get_value(&self.name) {
			let display = match &self.transform {
				Some(transform) => transform.input.call(value),
				None => value,
			};
			element = element.attr(
				Cow::Borrowed(platform::value_prop(platform, component)),
				Cow::Owned(attr_text(&display)),
			);
		}
		if let Some(placeholder) = &self.placeholder {
			element = element.attr("placeholder", placeholder.clone());
		}
		for (name, value) in &self.attrs {
			element = element.attr(name.clone(), value.clone());
		}
		let errors = control.field_errors(&self.name);
		if let Some(first) = errors.first() {
			element = element.attr("data-error", first.clone());
		}

		match &self.label {
			Some(label) => Element::container("label")
				.child(Node::text(label.clone()))
				.child(element)
				.into(),
			None => element.into(),
		}
	}
}

fn attr_text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}
