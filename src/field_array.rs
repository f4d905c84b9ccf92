//! Dynamic array-field management.
//!
//! `FieldArray` wraps one array-valued name path with list operations and
//! per-entry identity: every entry is paired with a stable id that survives
//! insertion, removal, and reordering, so rendered rows can be keyed by id
//! instead of by position. Optional length rules install a root-level error
//! on the owning control when violated.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::control::{BindError, BindResult, FormControl, SetValueOptions};

/// One array entry paired with its stable id.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayEntry {
	pub id: u64,
	pub value: Value,
}

struct LengthRule {
	limit: usize,
	message: String,
}

struct ArrayInner {
	ids: Vec<u64>,
	next_id: u64,
}

impl ArrayInner {
	fn fresh_id(&mut self) -> u64 {
		let id = self.next_id;
		self.next_id += 1;
		id
	}
}

/// Handle over one array-valued name path.
///
/// Ids are assigned by this handle and track its operations; writing the
/// array through [`FormControl::set_value`] directly bypasses id tracking.
///
/// # Examples
///
/// ```
/// use formtree::{FieldArray, FormControl};
/// use serde_json::json;
///
/// let control = FormControl::new();
/// let items = FieldArray::new(control.clone(), "items");
///
/// items.append(json!({"qty": 1}))?;
/// items.append(json!({"qty": 2}))?;
/// items.swap(0, 1)?;
///
/// let entries = items.entries();
/// assert_eq!(entries[0].value, json!({"qty": 2}));
/// assert_eq!(entries[0].id, 1);
/// # Ok::<(), formtree::BindError>(())
/// ```
pub struct FieldArray {
	control: FormControl,
	name: String,
	inner: Arc<RwLock<ArrayInner>>,
	min: Option<LengthRule>,
	max: Option<LengthRule>,
}

impl FieldArray {
	/// Creates a handle over `name`, adopting any entries already present.
	pub fn new(control: FormControl, name: impl Into<String>) -> Self {
		let name = name.into();
		let existing = match control.get_value(&name) {
			Some(Value::Array(items)) => items.len(),
			_ => 0,
		};
		Self {
			control,
			name,
			inner: Arc::new(RwLock::new(ArrayInner {
				ids: (0..existing as u64).collect(),
				next_id: existing as u64,
			})),
			min: None,
			max: None,
		}
	}

	/// Requires at least `limit` entries, installing `message` as the root
	/// error when the array is shorter.
	pub fn min_length(mut self, limit: usize, message: impl Into<String>) -> Self {
		self.min = Some(LengthRule {
			limit,
			message: message.into(),
		});
		self
	}

	/// Allows at most `limit` entries, installing `message` as the root
	/// error when the array is longer.
	pub fn max_length(mut self, limit: usize, message: impl Into<String>) -> Self {
		self.max = Some(LengthRule {
			limit,
			message: message.into(),
		});
		self
	}

	/// Returns the array name path.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the current entry count.
	pub fn len(&self) -> usize {
		self.inner.read().ids.len()
	}

	/// Returns whether the array is empty.
	pub fn is_empty(&self) -> bool {
		self.inner.read().ids.is_empty()
	}

	/// Returns the current entries with their stable ids.
	pub fn entries(&self) -> Vec<ArrayEntry> {
		let items = match self.control.get_value(&self.name) {
			Some(Value::Array(items)) => items,
			_ => Vec::new(),
		};
		let inner = self.inner.read();
		inner
			.ids
			.iter()
			.zip(items)
			.map(|(&id, value)| ArrayEntry { id, value })
			.collect()
	}

	/// Appends an entry.
	pub fn append(&self, value: Value) -> BindResult<()> {
		self.mutate(|items, inner| {
			items.push(value);
			let id = inner.fresh_id();
			inner.ids.push(id);
			Ok(())
		})
	}

	/// Inserts an entry at `index`, shifting later entries up.
	pub fn insert(&self, index: usize, value: Value) -> BindResult<()> {
		self.mutate(|items, inner| {
			if index > items.len() {
				return Err(self.out_of_bounds(index, items.len()));
			}
			items.insert(index, value);
			let id = inner.fresh_id();
			inner.ids.insert(index, id);
			Ok(())
		})
	}

	/// Removes the entry at `index`.
	pub fn remove(&self, index: usize) -> BindResult<()> {
		self.mutate(|items, inner| {
			if index >= items.len() {
				return Err(self.out_of_bounds(index, items.len()));
			}
			items.remove(index);
			inner.ids.remove(index);
			Ok(())
		})
	}

	/// Swaps the entries at `a` and `b`, ids included.
	pub fn swap(&self, a: usize, b: usize) -> BindResult<()> {
		self.mutate(|items, inner| {
			let len = items.len();
			if a >= len {
				return Err(self.out_of_bounds(a, len));
			}
			if b >= len {
				return Err(self.out_of_bounds(b, len));
			}
			items.swap(a, b);
			inner.ids.swap(a, b);
			Ok(())
		})
	}

	/// Replaces the value at `index`, keeping its id.
	pub fn update(&self, index: usize, value: Value) -> BindResult<()> {
		self.mutate(|items, _inner| {
			if index >= items.len() {
				return Err(self.out_of_bounds(index, items.len()));
			}
			items[index] = value;
			Ok(())
		})
	}

	fn out_of_bounds(&self, index: usize, len: usize) -> BindError {
		BindError::IndexOutOfBounds {
			name: self.name.clone(),
			index,
			len,
		}
	}

	fn mutate(
		&self,
		op: impl FnOnce(&mut Vec<Value>, &mut ArrayInner) -> BindResult<()>,
	) -> BindResult<()> {
		let mut items = match self.control.get_value(&self.name) {
			Some(Value::Array(items)) => items,
			Some(Value::Null) | None => Vec::new(),
			Some(_) => {
				return Err(BindError::NotAnArray {
					name: self.name.clone(),
				});
			}
		};
		{
			let mut inner = self.inner.write();
			op(&mut items, &mut inner)?;
		}
		let len = items.len();
		self.control.set_value(
			&self.name,
			Value::Array(items),
			SetValueOptions {
				should_dirty: true,
				..Default::default()
			},
		);
		self.enforce_rules(len);
		Ok(())
	}

	fn enforce_rules(&self, len: usize) {
		if let Some(rule) = &self.min {
			if len < rule.limit {
				debug!(name = %self.name, len, min = rule.limit, "array below minimum length");
				self.control.set_root_error(&self.name, rule.message.clone());
				return;
			}
		}
		if let Some(rule) = &self.max {
			if len > rule.limit {
				debug!(name = %self.name, len, max = rule.limit, "array above maximum length");
				self.control.set_root_error(&self.name, rule.message.clone());
				return;
			}
		}
		self.control.clear_root_error(&self.name);
	}
}

impl std::fmt::Debug for FieldArray {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.inner.read();
		f.debug_struct("FieldArray")
			.field("name", &self.name)
			.field("len", &inner.ids.len())
			.field("ids", &inner.ids)
			.finish()
	}
}
