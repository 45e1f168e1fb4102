//! Field values and input events
//!
//! Values are stored in one flat map keyed by `fieldId`. The shape of a value
//! depends on the field type, so instead of an untyped JSON value each entry is
//! a [`FieldValue`]: text for text-like, date and choice fields, a boolean for
//! checkboxes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value of a single field.
///
/// Serialized untagged, so a value map becomes plain JSON
/// (`{"name": "Alice", "agree": true}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
	/// Checkbox state
	Bool(bool),
	/// Text, date and single-choice values
	Text(String),
	/// Multi-valued payloads (pre-filled data only; no field type emits it)
	List(Vec<String>),
}

impl FieldValue {
	/// The text content, if this is a text value.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			FieldValue::Text(text) => Some(text),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			FieldValue::Bool(flag) => Some(*flag),
			_ => None,
		}
	}

	/// Checkbox reading of the value: only `Bool(true)` is checked.
	pub fn is_checked(&self) -> bool {
		matches!(self, FieldValue::Bool(true))
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		FieldValue::Text(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		FieldValue::Text(value)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		FieldValue::Bool(value)
	}
}

impl From<Vec<String>> for FieldValue {
	fn from(value: Vec<String>) -> Self {
		FieldValue::List(value)
	}
}

/// Current values keyed by `fieldId`. An absent key means "untouched".
pub type FormValues = BTreeMap<String, FieldValue>;

/// Validation state keyed by `fieldId`.
///
/// `Some(message)` is a current error, `None` means "validated, currently
/// valid", and an absent key means "not yet validated".
pub type FormErrors = BTreeMap<String, Option<String>>;

/// A change notification coming from an input control.
///
/// Mirrors what a browser change event exposes: the control name (the
/// `fieldId`), whether the control is a checkbox, its string value and its
/// checked state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
	pub name: String,
	pub is_checkbox: bool,
	pub value: String,
	pub checked: bool,
}

impl ChangeEvent {
	/// Change event from a text-like, date, select or radio control.
	///
	/// # Examples
	///
	/// ```
	/// use formflow_forms::{ChangeEvent, FieldValue};
	///
	/// let event = ChangeEvent::input("name", "Alice");
	/// assert_eq!(event.field_value(), FieldValue::Text("Alice".to_string()));
	/// ```
	pub fn input(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			is_checkbox: false,
			value: value.into(),
			checked: false,
		}
	}

	/// Change event from a checkbox control.
	///
	/// # Examples
	///
	/// ```
	/// use formflow_forms::{ChangeEvent, FieldValue};
	///
	/// let event = ChangeEvent::checkbox("agree", true);
	/// assert_eq!(event.field_value(), FieldValue::Bool(true));
	/// ```
	pub fn checkbox(name: impl Into<String>, checked: bool) -> Self {
		Self {
			name: name.into(),
			is_checkbox: true,
			value: "on".to_string(),
			checked,
		}
	}

	/// Extract the value to store: the checked state for checkboxes, the
	/// string value for every other control.
	pub fn field_value(&self) -> FieldValue {
		if self.is_checkbox {
			FieldValue::Bool(self.checked)
		} else {
			FieldValue::Text(self.value.clone())
		}
	}
}
