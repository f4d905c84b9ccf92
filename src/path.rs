//! Dotted name-path access into JSON values.
//!
//! Form values live in one `serde_json::Value` object; fields address into
//! it with dotted paths (`user.email`, `items.2.qty`). Numeric segments
//! address arrays. Missing intermediates are created on write: an object
//! when the next segment is a key, an array when it is an index.

use serde_json::Value;

/// Reads the value at `path`, if present.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let values = json!({"user": {"tags": ["a", "b"]}});
/// assert_eq!(formtree::path::get(&values, "user.tags.1"), Some(&json!("b")));
/// assert_eq!(formtree::path::get(&values, "user.missing"), None);
/// ```
pub fn get<'a>(values: &'a Value, path: &str) -> Option<&'a Value> {
	let mut current = values;
	for segment in path.split('.') {
		current = match current {
			Value::Object(map) => map.get(segment)?,
			Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
			_ => return None,
		};
	}
	Some(current)
}

/// Writes `value` at `path`, creating intermediate objects and arrays.
///
/// Arrays are padded with nulls when an index lands past the end.
///
/// # Examples
///
/// ```
/// use serde_json::{Value, json};
///
/// let mut values = json!({});
/// formtree::path::set(&mut values, "items.1.name", json!("second"));
/// assert_eq!(values, json!({"items": [null, {"name": "second"}]}));
/// ```
pub fn set(values: &mut Value, path: &str, value: Value) {
	let segments: Vec<&str> = path.split('.').collect();
	set_inner(values, &segments, value);
}

fn set_inner(target: &mut Value, segments: &[&str], value: Value) {
	let (head, rest) = match segments.split_first() {
		Some(split) => split,
		None => {
			*target = value;
			return;
		}
	};

	match head.parse::<usize>() {
		Ok(index) => {
			if !target.is_array() {
				*target = Value::Array(Vec::new());
			}
			if let Value::Array(items) = target {
				if items.len() <= index {
					items.resize(index + 1, Value::Null);
				}
				descend(&mut items[index], rest, value);
			}
		}
		Err(_) => {
			if !target.is_object() {
				*target = Value::Object(serde_json::Map::new());
			}
			if let Value::Object(map) = target {
				let slot = map.entry(head.to_string()).or_insert(Value::Null);
				descend(slot, rest, value);
			}
		}
	}
}

fn descend(slot: &mut Value, rest: &[&str], value: Value) {
	if rest.is_empty() {
		*slot = value;
	} else {
		set_inner(slot, rest, value);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_get_flat() {
		let values = json!({"name": "Ada"});
		assert_eq!(get(&values, "name"), Some(&json!("Ada")));
	}

	#[test]
	fn test_get_nested_and_missing() {
		let values = json!({"user": {"email": "a@b.c"}});
		assert_eq!(get(&values, "user.email"), Some(&json!("a@b.c")));
		assert_eq!(get(&values, "user.phone"), None);
		assert_eq!(get(&values, "user.email.deep"), None);
	}

	#[test]
	fn test_set_flat() {
		let mut values = json!({});
		set(&mut values, "name", json!("Ada"));
		assert_eq!(values, json!({"name": "Ada"}));
	}

	#[test]
	fn test_set_creates_nested_objects() {
		let mut values = json!({});
		set(&mut values, "user.address.city", json!("Oslo"));
		assert_eq!(values, json!({"user": {"address": {"city": "Oslo"}}}));
	}

	#[test]
	fn test_set_creates_and_pads_arrays() {
		let mut values = json!({});
		set(&mut values, "items.2", json!("third"));
		assert_eq!(values, json!({"items": [null, null, "third"]}));
	}

	#[test]
	fn test_set_overwrites_scalar_intermediate() {
		let mut values = json!({"user": "oops"});
		set(&mut values, "user.name", json!("Ada"));
		assert_eq!(values, json!({"user": {"name": "Ada"}}));
	}

	#[test]
	fn test_roundtrip_array_of_objects() {
		let mut values = json!({});
		set(&mut values, "rows.0.qty", json!(3));
		set(&mut values, "rows.1.qty", json!(5));
		assert_eq!(get(&values, "rows.1.qty"), Some(&json!(5)));
	}
}
