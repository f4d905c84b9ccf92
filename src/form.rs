//! Form composition.
//!
//! `FormView` ties the pieces together for one form: it resolves the
//! platform once, instantiates any declarative fields, runs the tree
//! processor over the caller's children, and in wizard mode restricts the
//! top-level children to the current step with a status line underneath.
//! [`FormView::handle`] returns a detached submit handle for callers that
//! trigger submission from outside the tree.

use serde_json::Value;
use tracing::debug;

use crate::callback::{Callback, EventHandler};
use crate::control::FormControl;
use crate::node::{Element, Node};
use crate::platform::{Platform, PlatformMode};
use crate::processor::TreeProcessor;
use crate::wizard::WizardState;

/// Declarative form over a control and a child tree.
///
/// # Examples
///
/// ```
/// use formtree::{Callback, Element, FormControl, FormView};
/// use serde_json::json;
///
/// let control = FormControl::new();
/// let form = FormView::new(control, Callback::new(|values| {
///     println!("submitted: {values}");
/// }))
/// .class_name("signup")
/// .children(
///     Element::new("div")
///         .child(Element::input("input", "email"))
///         .child(Element::button("button").child("Send")),
/// );
///
/// let tree = form.render();
/// assert!(tree.render_to_string().starts_with("<form class=\"signup\">"));
/// ```
pub struct FormView {
	control: FormControl,
	on_submit: Callback<Value, ()>,
	children: Node,
	class_name: Option<String>,
	native: bool,
	debug: bool,
	platform: PlatformMode,
	wizard: Option<WizardState>,
}

impl FormView {
	/// Creates a form over a control with a submit callback.
	pub fn new(control: FormControl, on_submit: Callback<Value, ()>) -> Self {
		Self {
			control,
			on_submit,
			children: Node::Empty,
			class_name: None,
			native: false,
			debug: false,
			platform: PlatformMode::default(),
			wizard: None,
		}
	}

	/// Sets the child tree.
	pub fn children(mut self, children: impl Into<Node>) -> Self {
		self.children = children.into();
		self
	}

	/// Sets the class attribute on the form element.
	pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
		self.class_name = Some(class_name.into());
		self
	}

	/// Forces native event-prop conventions regardless of platform mode.
	pub fn native(mut self, native: bool) -> Self {
		self.native = native;
		self
	}

	/// Enables the state dump appended after the children.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}

	/// Sets the platform mode. Defaults to [`PlatformMode::Auto`].
	pub fn platform(mut self, platform: PlatformMode) -> Self {
		self.platform = platform;
		self
	}

	/// Enables wizard mode with fresh state on the first step.
	pub fn wizard(self) -> Self {
		self.wizard_state(WizardState::new(0))
	}

	/// Enables wizard mode with caller-held state.
	pub fn wizard_state(mut self, wizard: WizardState) -> Self {
		self.wizard = Some(wizard);
		self
	}

	/// Returns the wizard state when wizard mode is enabled.
	pub fn wizard_handle(&self) -> Option<&WizardState> {
		self.wizard.as_ref()
	}

	/// Returns the control this form renders from.
	pub fn control(&self) -> &FormControl {
		&self.control
	}

	/// Returns a detached submit handle.
	///
	/// The handle shares the control, so triggering it runs the same
	/// validate-then-callback pathway as a submit button in the tree.
	pub fn handle(&self) -> FormHandle {
		FormHandle {
			submit: self.control.handle_submit(self.on_submit.clone()),
			control: self.control.clone(),
		}
	}

	/// Renders the form to a processed node tree.
	///
	/// Render order: declarative fields, the processed children (or the
	/// current wizard step plus its status line), then the debug dump.
	pub fn render(&self) -> Node {
		let platform = if self.native {
			Platform::Native
		} else {
			self.platform.resolve()
		};
		debug!(?platform, wizard = self.wizard.is_some(), "rendering form");

		let processor = TreeProcessor::new(
			self.control.clone(),
			platform,
			self.wizard.clone(),
			self.on_submit.clone(),
		);

		let mut form = Element::container("form");
		if let Some(class_name) = &self.class_name {
			form = form.attr("class", class_name.clone());
		}

		for (index, field) in self.control.fields().iter().enumerate() {
			form = form.child(field.instantiate(&self.control, platform, index));
		}

		match &self.wizard {
			Some(wizard) => {
				let steps = self.steps();
				wizard.set_total(steps.len());
				let current = wizard.current_step();
				if let Some(step) = steps.into_iter().nth(current) {
					form = form.child(processor.process(step));
				}
				form = form.child(
					Element::container("div")
						.attr("class", "wizard-info")
						.child(Node::text(wizard.status_line())),
				);
			}
			None => {
				form = form.child(processor.process(self.children.clone()));
			}
		}

		if self.debug {
			form = form.child(self.debug_dump());
		}
		form.into()
	}

	/// Splits the children into wizard steps: each top-level fragment child
	/// is one step; a single non-fragment child is a one-step wizard.
	fn steps(&self) -> Vec<Node> {
		match &self.children {
			Node::Fragment(children) => children.clone(),
			Node::Empty => Vec::new(),
			other => vec![other.clone()],
		}
	}

	fn debug_dump(&self) -> Node {
		let values =
			serde_json::to_string_pretty(&self.control.values()).unwrap_or_default();
		let errors =
			serde_json::to_string_pretty(&self.control.errors()).unwrap_or_default();
		Element::container("div")
			.attr("class", "form-debug")
			.child(Element::new("pre").child(values))
			.child(Element::new("pre").child(errors))
			.into()
	}
}

impl std::fmt::Debug for FormView {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormView")
			.field("class_name", &self.class_name)
			.field("native", &self.native)
			.field("debug", &self.debug)
			.field("platform", &self.platform)
			.field("wizard", &self.wizard)
			.finish()
	}
}

/// Detached submit handle for triggering submission from outside the tree.
#[derive(Clone)]
pub struct FormHandle {
	submit: EventHandler,
	control: FormControl,
}

impl FormHandle {
	/// Runs the validate-then-callback submit pathway.
	pub fn trigger_submit(&self) {
		self.submit.trigger();
	}

	/// Returns the shared control.
	pub fn control(&self) -> &FormControl {
		&self.control
	}
}

impl std::fmt::Debug for FormHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormHandle").finish()
	}
}
