//! Form binding over a declarative view tree.
//!
//! `formtree` connects a shared form control to a tree of view nodes: a
//! recursive processor classifies each element by its role and injects the
//! right props — submit clicks on buttons, registration bindings on named
//! inputs under the platform-correct event prop, and a control reference on
//! everything else. On top of that sit multi-step wizard navigation,
//! declarative auto-rendered fields, and dynamic array fields with stable
//! entry ids.
//!
//! # Examples
//!
//! ```
//! use formtree::{Callback, Element, FormControl, FormView, PlatformMode};
//! use serde_json::json;
//! use std::sync::{Arc, Mutex};
//!
//! let control = FormControl::builder()
//!     .default_values(json!({"email": ""}))
//!     .build();
//!
//! let submitted = Arc::new(Mutex::new(None));
//! let form = FormView::new(control, Callback::new({
//!     let submitted = Arc::clone(&submitted);
//!     move |values| *submitted.lock().unwrap() = Some(values)
//! }))
//! .platform(PlatformMode::Web)
//! .children(
//!     Element::new("div")
//!         .child(Element::input("input", "email"))
//!         .child(Element::button("button").child("Send")),
//! );
//!
//! let tree = form.render();
//! let root = tree.as_element().unwrap();
//! let body = root.child_nodes()[0].as_element().unwrap();
//!
//! let input = body.child_nodes()[0].as_element().unwrap();
//! input.handler("onChange").unwrap().call(json!("a@b.c"));
//!
//! let button = body.child_nodes()[1].as_element().unwrap();
//! button.handler("onClick").unwrap().trigger();
//!
//! assert_eq!(
//!     submitted.lock().unwrap().take(),
//!     Some(json!({"email": "a@b.c"}))
//! );
//! ```

pub mod callback;
pub mod control;
pub mod field_array;
pub mod fields;
pub mod form;
pub mod node;
pub mod path;
pub mod platform;
pub mod processor;
pub mod wizard;

pub use callback::{Callback, EventHandler};
pub use control::{
	BindError, BindResult, ChangeEvent, FormControl, FormControlBuilder, Registration, Resolver,
	SetValueOptions, ValidationMode,
};
pub use field_array::{ArrayEntry, FieldArray};
pub use fields::{FieldSpec, InputKind, Transform};
pub use form::{FormHandle, FormView};
pub use node::{Element, Node, Role, WizardNav};
pub use platform::{Platform, PlatformMode};
pub use processor::{MAX_DEPTH, TreeProcessor};
pub use wizard::WizardState;
