//! Sum-typed view tree.
//!
//! The tree the binding layer walks is a closed data type: a node is text,
//! nothing, a fragment, or an element carrying an explicit [`Role`]. Roles
//! are assigned by the caller at construction time; nothing in this crate
//! infers a role from a tag name, so classification during traversal is a
//! total match.
//!
//! Elements are immutable values. Injection during processing goes through
//! the explicit `with_*` rebuilders, which consume the element and return
//! the updated one.

use std::borrow::Cow;

use crate::callback::EventHandler;
use crate::control::FormControl;

/// Classification of an element, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
	/// Submit or wizard-navigation button.
	Button,
	/// Form input bound to a name path.
	Input,
	/// Structural container (box/section/region); recursed into without
	/// control injection.
	Container,
	/// Anything else.
	Generic,
}

/// Wizard navigation marker carried by button elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardNav {
	/// Advance to the next step, or submit on the last step.
	Next,
	/// Return to the previous step.
	Previous,
}

/// A node in the declarative view tree.
#[derive(Debug, Clone)]
pub enum Node {
	/// A text node. Passes through processing unchanged.
	Text(Cow<'static, str>),
	/// Renders nothing. Passes through processing unchanged.
	Empty,
	/// A multi-child slot with no wrapper element.
	Fragment(Vec<Node>),
	/// An element with a role, props, and children.
	Element(Element),
}

/// An element in the view tree.
#[derive(Clone)]
pub struct Element {
	tag: Cow<'static, str>,
	role: Role,
	/// Name path for input-role elements (dotted, arrays by index).
	name: Option<String>,
	/// Native component type name (e.g. `TextInput`), when the element
	/// wraps a native-mobile component.
	component: Option<Cow<'static, str>>,
	wizard_nav: Option<WizardNav>,
	disabled: bool,
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	children: Vec<Node>,
	/// Event handlers keyed by event-prop name (`onClick`, `onChangeText`, ...).
	handlers: Vec<(Cow<'static, str>, EventHandler)>,
	/// Shared form-control reference injected by the processor.
	control: Option<FormControl>,
	/// Reconciliation key.
	key: Option<String>,
}

impl Element {
	/// Creates a generic element.
	///
	/// # Examples
	///
	/// ```
	/// use formtree::{Element, Role};
	///
	/// let el = Element::new("span").attr("class", "hint");
	/// assert_eq!(el.role(), Role::Generic);
	/// assert_eq!(el.tag(), "span");
	/// ```
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			role: Role::Generic,
			name: None,
			component: None,
			wizard_nav: None,
			disabled: false,
			attrs: Vec::new(),
			children: Vec::new(),
			handlers: Vec::new(),
			control: None,
			key: None,
		}
	}

	/// Creates an element with an explicit role.
	///
	/// [`Element::input`] is the usual way to build an input element; this
	/// constructor exists for wrappers that assign roles dynamically, and
	/// is the only way to produce an input-role element without a name.
	pub fn with_role(tag: impl Into<Cow<'static, str>>, role: Role) -> Self {
		let mut el = Self::new(tag);
		el.role = role;
		el
	}

	/// Creates a button-role element.
	pub fn button(tag: impl Into<Cow<'static, str>>) -> Self {
		let mut el = Self::new(tag);
		el.role = Role::Button;
		el
	}

	/// Creates an input-role element bound to a name path.
	///
	/// # Examples
	///
	/// ```
	/// use formtree::{Element, Role};
	///
	/// let el = Element::input("input", "user.email");
	/// assert_eq!(el.role(), Role::Input);
	/// assert_eq!(el.name(), Some("user.email"));
	/// ```
	pub fn input(tag: impl Into<Cow<'static, str>>, name: impl Into<String>) -> Self {
		let mut el = Self::new(tag);
		el.role = Role::Input;
		el.name = Some(name.into());
		el
	}

	/// Creates a container-role element.
	pub fn container(tag: impl Into<Cow<'static, str>>) -> Self {
		let mut el = Self::new(tag);
		el.role = Role::Container;
		el
	}

	/// Adds an attribute.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Adds a child node.
	pub fn child(mut self, child: impl Into<Node>) -> Self {
		self.children.push(child.into());
		self
	}

	/// Adds multiple child nodes.
	pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
		self.children.extend(children.into_iter().map(Into::into));
		self
	}

	/// Sets the native component type name.
	pub fn component(mut self, component: impl Into<Cow<'static, str>>) -> Self {
		self.component = Some(component.into());
		self
	}

	/// Marks a button element for wizard navigation.
	pub fn wizard_nav(mut self, nav: WizardNav) -> Self {
		self.wizard_nav = Some(nav);
		self
	}

	/// Sets the disabled flag.
	pub fn disabled(mut self, disabled: bool) -> Self {
		self.disabled = disabled;
		self
	}

	/// Sets the reconciliation key.
	pub fn key(mut self, key: impl Into<String>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Attaches an event handler under the given event-prop name.
	pub fn on(mut self, event: impl Into<Cow<'static, str>>, handler: EventHandler) -> Self {
		self.handlers.push((event.into(), handler));
		self
	}

	// --- accessors ---

	/// Returns the tag name.
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Returns the element's role.
	pub fn role(&self) -> Role {
		self.role
	}

	/// Returns the name path, if any.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Returns the native component type name, if any.
	pub fn component_name(&self) -> Option<&str> {
		self.component.as_deref()
	}

	/// Returns the wizard navigation marker, if any.
	pub fn wizard_marker(&self) -> Option<WizardNav> {
		self.wizard_nav
	}

	/// Returns whether the element is disabled.
	pub fn is_disabled(&self) -> bool {
		self.disabled
	}

	/// Returns the attributes.
	pub fn attrs(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
		&self.attrs
	}

	/// Returns the child nodes.
	pub fn child_nodes(&self) -> &[Node] {
		&self.children
	}

	/// Returns whether the element has any children.
	pub fn has_children(&self) -> bool {
		!self.children.is_empty()
	}

	/// Returns the event handlers.
	pub fn handlers(&self) -> &[(Cow<'static, str>, EventHandler)] {
		&self.handlers
	}

	/// Looks up a handler by event-prop name.
	pub fn handler(&self, event: &str) -> Option<&EventHandler> {
		self.handlers
			.iter()
			.find(|(name, _)| name == event)
			.map(|(_, handler)| handler)
	}

	/// Returns the injected form-control reference, if any.
	pub fn control(&self) -> Option<&FormControl> {
		self.control.as_ref()
	}

	/// Returns the reconciliation key, if any.
	pub fn element_key(&self) -> Option<&str> {
		self.key.as_deref()
	}

	// --- injection rebuilders used by the processor ---

	/// Rebuilds the element with the shared control reference injected.
	pub fn with_control(mut self, control: FormControl) -> Self {
		self.control = Some(control);
		self
	}

	/// Rebuilds the element with a handler installed under `event`,
	/// replacing any existing handler for the same event.
	pub fn with_handler(
		mut self,
		event: impl Into<Cow<'static, str>>,
		handler: EventHandler,
	) -> Self {
		let event = event.into();
		self.handlers.retain(|(name, _)| *name != event);
		self.handlers.push((event, handler));
		self
	}

	/// Rebuilds the element with a click handler installed.
	pub fn with_click(self, handler: EventHandler) -> Self {
		self.with_handler("onClick", handler)
	}

	/// Rebuilds the element with its children replaced.
	pub fn with_children(mut self, children: Vec<Node>) -> Self {
		self.children = children;
		self
	}

	/// Rebuilds the element with the disabled flag OR'd in.
	pub fn with_disabled(mut self, disabled: bool) -> Self {
		self.disabled = self.disabled || disabled;
		self
	}

	/// Rebuilds the element re-keyed for reconciliation.
	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = Some(key.into());
		self
	}
}

impl std::fmt::Debug for Element {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Element")
			.field("tag", &self.tag)
			.field("role", &self.role)
			.field("name", &self.name)
			.field("component", &self.component)
			.field("wizard_nav", &self.wizard_nav)
			.field("disabled", &self.disabled)
			.field("attrs", &self.attrs)
			.field("children", &self.children)
			.field("handlers", &self.handlers.len())
			.field("has_control", &self.control.is_some())
			.field("key", &self.key)
			.finish()
	}
}

impl Node {
	/// Creates a text node.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	/// Creates an empty node.
	pub fn empty() -> Self {
		Self::Empty
	}

	/// Creates a fragment node.
	pub fn fragment(children: impl IntoIterator<Item = impl Into<Node>>) -> Self {
		Self::Fragment(children.into_iter().map(Into::into).collect())
	}

	/// Returns the element if this node is one.
	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Node::Element(el) => Some(el),
			_ => None,
		}
	}

	/// Renders the node to an HTML-ish string.
	///
	/// Used by tests and the debug overlay; event handlers, roles, and the
	/// injected control are not serialized.
	///
	/// # Examples
	///
	/// ```
	/// use formtree::{Element, Node};
	///
	/// let node: Node = Element::container("div")
	///     .attr("class", "card")
	///     .child("Hello")
	///     .into();
	/// assert_eq!(node.render_to_string(), "<div class=\"card\">Hello</div>");
	/// ```
	pub fn render_to_string(&self) -> String {
		let mut output = String::new();
		self.render_inner(&mut output);
		output
	}

	fn render_inner(&self, output: &mut String) {
		match self {
			Node::Element(el) => {
				output.push('<');
				output.push_str(el.tag());

				for (name, value) in el.attrs() {
					output.push(' ');
					output.push_str(name);
					output.push_str("=\"");
					output.push_str(&html_escape(value));
					output.push('"');
				}
				if let Some(name) = el.name() {
					output.push_str(" name=\"");
					output.push_str(&html_escape(name));
					output.push('"');
				}
				if el.is_disabled() {
					output.push_str(" disabled");
				}

				if is_void(el.tag()) {
					output.push_str(" />");
				} else {
					output.push('>');
					for child in el.child_nodes() {
						child.render_inner(output);
					}
					output.push_str("</");
					output.push_str(el.tag());
					output.push('>');
				}
			}
			Node::Text(text) => output.push_str(&html_escape(text)),
			Node::Fragment(children) => {
				for child in children {
					child.render_inner(output);
				}
			}
			Node::Empty => {}
		}
	}
}

impl From<Element> for Node {
	fn from(el: Element) -> Self {
		Node::Element(el)
	}
}

impl From<&'static str> for Node {
	fn from(text: &'static str) -> Self {
		Node::Text(Cow::Borrowed(text))
	}
}

impl From<String> for Node {
	fn from(text: String) -> Self {
		Node::Text(Cow::Owned(text))
	}
}

impl From<Vec<Node>> for Node {
	fn from(children: Vec<Node>) -> Self {
		Node::Fragment(children)
	}
}

fn is_void(tag: &str) -> bool {
	matches!(
		tag,
		"area"
			| "base" | "br"
			| "col" | "embed"
			| "hr" | "img"
			| "input" | "link"
			| "meta" | "source"
			| "track" | "wbr"
	)
}

/// Escapes HTML special characters.
fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}
