//! Form control: registration, value state, validation, submit wiring.
//!
//! `FormControl` owns the current values, per-field errors, and the
//! dirty/touched bookkeeping. It is a cheap clone handle over shared state,
//! so the same control can be held by the composition component, injected
//! into tree elements, and captured by event handlers at once.
//!
//! Validation is delegated to an optional resolver: a function over the
//! full value snapshot returning per-field error messages. The control
//! never interprets rules itself.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::debug;

use crate::callback::{Callback, EventHandler};
use crate::fields::FieldSpec;
use crate::path;

/// Errors surfaced by the binding layer for integration misuse.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
	#[error("value at '{name}' is not an array")]
	NotAnArray { name: String },
	#[error("index {index} out of bounds for '{name}' (len {len})")]
	IndexOutOfBounds {
		name: String,
		index: usize,
		len: usize,
	},
}

pub type BindResult<T> = Result<T, BindError>;

/// When field validation runs relative to user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
	/// Only when the submit pathway runs.
	#[default]
	OnSubmit,
	/// After every committed change.
	OnChange,
	/// When a field loses focus.
	OnBlur,
	/// When a field is first touched, then on every change.
	OnTouched,
	/// On change and on blur.
	All,
}

/// Validation function over the full value snapshot.
///
/// Returns `Ok(())` when the values pass, or a map of name path to error
/// messages when they do not.
pub type Resolver = Arc<dyn Fn(&Value) -> Result<(), HashMap<String, Vec<String>>> + Send + Sync>;

/// Payload delivered to persistence subscribers on every committed change.
///
/// Serializable so subscribers can write it to storage as-is.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChangeEvent {
	/// Name path that changed, when the change was field-scoped.
	pub name: Option<String>,
	/// Full value snapshot after the change.
	pub values: Value,
}

/// Binding bundle returned by [`FormControl::register`].
#[derive(Debug, Clone)]
pub struct Registration {
	/// The registered name path.
	pub name: String,
	/// Commits a new value for the field.
	pub on_change: EventHandler,
	/// Marks the field touched.
	pub on_blur: EventHandler,
}

/// Options for [`FormControl::set_value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SetValueOptions {
	pub should_dirty: bool,
	pub should_touch: bool,
	pub should_validate: bool,
}

struct ControlState {
	values: Value,
	errors: HashMap<String, Vec<String>>,
	dirty: BTreeSet<String>,
	touched: BTreeSet<String>,
	subscribers: Vec<Callback<ChangeEvent, ()>>,
}

struct ControlOptions {
	defaults: Value,
	resolver: Option<Resolver>,
	mode: ValidationMode,
	fields: Vec<FieldSpec>,
}

/// Shared form-state handle.
///
/// # Examples
///
/// ```
/// use formtree::FormControl;
/// use serde_json::json;
///
/// let control = FormControl::builder()
///     .default_values(json!({"email": ""}))
///     .build();
///
/// control.set_value("email", json!("a@b.c"), Default::default());
/// assert_eq!(control.get_value("email"), Some(json!("a@b.c")));
/// ```
#[derive(Clone)]
pub struct FormControl {
	state: Arc<RwLock<ControlState>>,
	options: Arc<ControlOptions>,
}

/// Builder for [`FormControl`].
pub struct FormControlBuilder {
	defaults: Value,
	resolver: Option<Resolver>,
	mode: ValidationMode,
	fields: Vec<FieldSpec>,
}

impl FormControlBuilder {
	/// Sets the default values (an object).
	pub fn default_values(mut self, defaults: Value) -> Self {
		self.defaults = defaults;
		self
	}

	/// Sets the validation resolver.
	pub fn resolver<F>(mut self, resolver: F) -> Self
	where
		F: Fn(&Value) -> Result<(), HashMap<String, Vec<String>>> + Send + Sync + 'static,
	{
		self.resolver = Some(Arc::new(resolver));
		self
	}

	/// Sets the validation mode.
	pub fn mode(mut self, mode: ValidationMode) -> Self {
		self.mode = mode;
		self
	}

	/// Appends a declarative field.
	pub fn field(mut self, field: FieldSpec) -> Self {
		self.fields.push(field);
		self
	}

	/// Replaces the declarative field list.
	pub fn fields(mut self, fields: Vec<FieldSpec>) -> Self {
		self.fields = fields;
		self
	}

	/// Builds the control.
	pub fn build(self) -> FormControl {
		let values = if self.defaults.is_object() {
			self.defaults.clone()
		} else {
			Value::Object(Map::new())
		};
		FormControl {
			state: Arc::new(RwLock::new(ControlState {
				values,
				errors: HashMap::new(),
				dirty: BTreeSet::new(),
				touched: BTreeSet::new(),
				subscribers: Vec::new(),
			})),
			options: Arc::new(ControlOptions {
				defaults: self.defaults,
				resolver: self.resolver,
				mode: self.mode,
				fields: self.fields,
			}),
		}
	}
}

impl FormControl {
	/// Starts building a control.
	pub fn builder() -> FormControlBuilder {
		FormControlBuilder {
			defaults: Value::Object(Map::new()),
			resolver: None,
			mode: ValidationMode::default(),
			fields: Vec::new(),
		}
	}

	/// Creates a control with no defaults, resolver, or fields.
	pub fn new() -> Self {
		Self::builder().build()
	}

	/// Returns a snapshot of the current values.
	pub fn values(&self) -> Value {
		self.state.read().values.clone()
	}

	/// Reads the value at a name path.
	pub fn get_value(&self, name: &str) -> Option<Value> {
		path::get(&self.state.read().values, name).cloned()
	}

	/// Writes a value at a name path.
	///
	/// Dirty/touched marking and revalidation are opt-in via
	/// [`SetValueOptions`]; registration handlers mark dirty themselves.
	pub fn set_value(&self, name: &str, value: Value, options: SetValueOptions) {
		self.commit(name, value, options.should_dirty, options.should_touch);
		if options.should_validate {
			self.trigger();
		}
	}

	/// Registers a field by name path, returning its binding bundle.
	///
	/// The `on_change` binding commits the new value, marks the field
	/// dirty, and revalidates when the control's mode asks for it; the
	/// `on_blur` binding marks the field touched.
	///
	/// # Examples
	///
	/// ```
	/// use formtree::FormControl;
	/// use serde_json::json;
	///
	/// let control = FormControl::new();
	/// let registration = control.register("user.name");
	///
	/// registration.on_change.call(json!("Ada"));
	/// assert_eq!(control.get_value("user.name"), Some(json!("Ada")));
	/// assert!(control.dirty_fields().contains(&"user.name".to_string()));
	///
	/// registration.on_blur.call(json!(null));
	/// assert!(control.touched_fields().contains(&"user.name".to_string()));
	/// ```
	pub fn register(&self, name: &str) -> Registration {
		let on_change = {
			let control = self.clone();
			let name = name.to_string();
			Callback::new(move |value: Value| {
				control.commit(&name, value, true, false);
				if control.should_validate_on_change(&name) {
					control.trigger();
				}
			})
		};
		let on_blur = {
			let control = self.clone();
			let name = name.to_string();
			Callback::new(move |_: Value| {
				control.state.write().touched.insert(name.clone());
				if control.should_validate_on_blur() {
					control.trigger();
				}
			})
		};
		Registration {
			name: name.to_string(),
			on_change,
			on_blur,
		}
	}

	/// Runs the resolver over the current values, replacing stored errors.
	///
	/// Returns `true` when validation passed. With no resolver configured,
	/// field errors clear and the result is `true` (root errors installed
	/// by field arrays survive).
	pub fn trigger(&self) -> bool {
		let values = self.values();
		let result = match &self.options.resolver {
			Some(resolver) => resolver(&values),
			None => Ok(()),
		};
		let mut state = self.state.write();
		// Root errors are owned by field-array rules, not the resolver.
		state.errors.retain(|name, _| name.starts_with("__root."));
		match result {
			Ok(()) => state.errors.is_empty(),
			Err(errors) => {
				debug!(fields = errors.len(), "form validation failed");
				state.errors.extend(errors);
				false
			}
		}
	}

	/// Builds the submit trigger: validate, then invoke `on_valid` with the
	/// current values.
	///
	/// Every invocation is a fresh validate-then-callback pass; there is no
	/// in-flight guard.
	///
	/// # Examples
	///
	/// ```
	/// use formtree::FormControl;
	/// use formtree::Callback;
	/// use serde_json::{Value, json};
	/// use std::sync::{Arc, Mutex};
	///
	/// let control = FormControl::new();
	/// control.set_value("name", json!("Ada"), Default::default());
	///
	/// let seen: Arc<Mutex<Vec<Value>>> = Arc::new(Mutex::new(Vec::new()));
	/// let submit = control.handle_submit(Callback::new({
	///     let seen = Arc::clone(&seen);
	///     move |values: Value| seen.lock().unwrap().push(values)
	/// }));
	///
	/// submit.trigger();
	/// assert_eq!(seen.lock().unwrap()[0], json!({"name": "Ada"}));
	/// ```
	pub fn handle_submit(&self, on_valid: Callback<Value, ()>) -> EventHandler {
		let control = self.clone();
		Callback::new(move |_: Value| {
			if control.trigger() {
				on_valid.call(control.values());
			} else {
				debug!("submit suppressed by validation errors");
			}
		})
	}

	/// Returns all current errors, keyed by name path.
	pub fn errors(&self) -> HashMap<String, Vec<String>> {
		self.state.read().errors.clone()
	}

	/// Returns the errors recorded for one field.
	pub fn field_errors(&self, name: &str) -> Vec<String> {
		self.state
			.read()
			.errors
			.get(name)
			.cloned()
			.unwrap_or_default()
	}

	/// Records a root-level error for an array field.
	pub fn set_root_error(&self, name: &str, message: impl Into<String>) {
		self.state
			.write()
			.errors
			.insert(format!("__root.{name}"), vec![message.into()]);
	}

	/// Clears the root-level error for an array field.
	pub fn clear_root_error(&self, name: &str) {
		self.state.write().errors.remove(&format!("__root.{name}"));
	}

	/// Returns the root-level error for an array field, if any.
	pub fn root_error(&self, name: &str) -> Option<String> {
		self.state
			.read()
			.errors
			.get(&format!("__root.{name}"))
			.and_then(|messages| messages.first().cloned())
	}

	/// Returns whether any field differs from its default.
	pub fn is_dirty(&self) -> bool {
		!self.state.read().dirty.is_empty()
	}

	/// Returns the name paths currently dirty.
	pub fn dirty_fields(&self) -> Vec<String> {
		self.state.read().dirty.iter().cloned().collect()
	}

	/// Returns the name paths touched so far.
	pub fn touched_fields(&self) -> Vec<String> {
		self.state.read().touched.iter().cloned().collect()
	}

	/// Subscribes to committed value changes (persistence hook).
	///
	/// The handler receives the changed name path and the full snapshot
	/// after every commit.
	pub fn subscribe(&self, handler: Callback<ChangeEvent, ()>) {
		self.state.write().subscribers.push(handler);
	}

	/// Returns the declarative field list.
	pub fn fields(&self) -> &[FieldSpec] {
		&self.options.fields
	}

	/// Returns whether a declarative field list was supplied.
	pub fn has_fields(&self) -> bool {
		!self.options.fields.is_empty()
	}

	/// Restores defaults and clears errors, dirty, and touched state.
	pub fn reset(&self) {
		let mut state = self.state.write();
		state.values = if self.options.defaults.is_object() {
			self.options.defaults.clone()
		} else {
			Value::Object(Map::new())
		};
		state.errors.clear();
		state.dirty.clear();
		state.touched.clear();
	}

	fn commit(&self, name: &str, value: Value, mark_dirty: bool, mark_touch: bool) {
		{
			let mut state = self.state.write();
			path::set(&mut state.values, name, value);
			if mark_dirty {
				let pristine =
					path::get(&state.values, name) == path::get(&self.options.defaults, name);
				if pristine {
					state.dirty.remove(name);
				} else {
					state.dirty.insert(name.to_string());
				}
			}
			if mark_touch {
				state.touched.insert(name.to_string());
			}
		}
		self.notify(Some(name));
	}

	pub(crate) fn notify(&self, name: Option<&str>) {
		let (subscribers, values) = {
			let state = self.state.read();
			(state.subscribers.clone(), state.values.clone())
		};
		let name = name.map(str::to_string);
		for subscriber in &subscribers {
			subscriber.call(ChangeEvent {
				name: name.clone(),
				values: values.clone(),
			});
		}
	}

	fn should_validate_on_change(&self, name: &str) -> bool {
		match self.options.mode {
			ValidationMode::OnChange | ValidationMode::All => true,
			ValidationMode::OnTouched => self.state.read().touched.contains(name),
			ValidationMode::OnSubmit | ValidationMode::OnBlur => false,
		}
	}

	fn should_validate_on_blur(&self) -> bool {
		matches!(
			self.options.mode,
			ValidationMode::OnBlur | ValidationMode::OnTouched | ValidationMode::All
		)
	}
}

impl Default for FormControl {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for FormControl {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.read();
		f.debug_struct("FormControl")
			.field("values", &state.values)
			.field("errors", &state.errors.len())
			.field("dirty", &state.dirty.len())
			.field("touched", &state.touched.len())
			.field("fields", &self.options.fields.len())
			.finish()
	}
}
