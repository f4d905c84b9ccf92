//! Callback types shared across the binding layer.
//!
//! `Callback<Args, Ret>` is a cheaply cloneable, `Send + Sync` wrapper for
//! handlers injected into the view tree. Cloning a callback shares the
//! underlying function, so the same handler survives any number of tree
//! rebuilds without changing identity.

use std::sync::Arc;

use serde_json::Value;

/// Handler attached to a view-tree element, keyed by event-prop name.
///
/// Click handlers ignore their payload; change handlers receive the new
/// field value.
pub type EventHandler = Callback<Value, ()>;

/// A type-safe, cloneable callback wrapper.
///
/// # Examples
///
/// ```
/// use formtree::Callback;
///
/// let double = Callback::new(|x: i32| x * 2);
/// assert_eq!(double.call(21), 42);
///
/// let clone = double.clone();
/// assert_eq!(clone.call(5), 10);
/// ```
pub struct Callback<Args = Value, Ret = ()> {
	inner: Arc<dyn Fn(Args) -> Ret + Send + Sync + 'static>,
}

impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + Send + Sync + 'static,
	{
		Self { inner: Arc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

impl EventHandler {
	/// A handler that does nothing.
	///
	/// Installed as the inert `onChange` stub next to a re-keyed native
	/// change handler.
	pub fn noop() -> Self {
		Self::new(|_| {})
	}

	/// Invokes the handler with a null payload (click-style dispatch).
	pub fn trigger(&self) {
		self.call(Value::Null);
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> std::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}
