//! Per-field validation
//!
//! Applies the rule library to one field schema and its current value, in a
//! fixed order where the first failing check wins:
//!
//! 1. required and not present
//! 2. optional and not present (valid, nothing else runs)
//! 3. `minLength` (text values only)
//! 4. `maxLength` (text values only)
//! 5. type-specific format (`email`, `tel`; `date` only with
//!    [`ValidationOptions::strict_dates`])

use crate::schema::{FieldSchema, FieldType};
use crate::validators;
use crate::value::FieldValue;
use std::fmt;

/// Which check rejected a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorKind {
	Required,
	MinLength,
	MaxLength,
	Email,
	Phone,
	Date,
}

/// A failed field check with its user-facing message.
///
/// The message is the field's custom `validationMessage` when the schema
/// declares one, otherwise a default built from the label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
	kind: FieldErrorKind,
	message: String,
}

impl FieldError {
	fn for_field(kind: FieldErrorKind, field: &FieldSchema) -> Self {
		let message = match &field.validation_message {
			Some(custom) if !custom.is_empty() => custom.clone(),
			_ => default_message(kind, field),
		};
		Self { kind, message }
	}

	pub fn kind(&self) -> FieldErrorKind {
		self.kind
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn into_message(self) -> String {
		self.message
	}
}

impl fmt::Display for FieldError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)
	}
}

impl std::error::Error for FieldError {}

pub type FieldResult<T> = Result<T, FieldError>;

fn default_message(kind: FieldErrorKind, field: &FieldSchema) -> String {
	let label = &field.label;
	match kind {
		FieldErrorKind::Required => format!("{} is required.", label),
		FieldErrorKind::MinLength => format!(
			"{} must be at least {} characters long.",
			label,
			field.min_length.unwrap_or_default()
		),
		FieldErrorKind::MaxLength => format!(
			"{} must be no more than {} characters long.",
			label,
			field.max_length.unwrap_or_default()
		),
		FieldErrorKind::Email => format!("Please enter a valid email address for {}.", label),
		FieldErrorKind::Phone => format!("Please enter a valid phone number for {}.", label),
		FieldErrorKind::Date => format!("Please enter a valid date (YYYY-MM-DD) for {}.", label),
	}
}

/// Knobs for behavior the default dispatch leaves out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
	/// Run the calendar-date rule on `date` fields.
	///
	/// Off by default: `date` fields only get presence and length checks.
	pub strict_dates: bool,
}

impl ValidationOptions {
	pub fn strict() -> Self {
		Self { strict_dates: true }
	}
}

/// Validate one field with the default options.
///
/// # Examples
///
/// ```
/// use formflow_forms::{FieldSchema, FieldType, FieldValue, validate_field};
///
/// let field = FieldSchema::new("name", FieldType::Text, "Name").required(true);
///
/// let err = validate_field(&field, None).unwrap_err();
/// assert_eq!(err.message(), "Name is required.");
/// assert!(validate_field(&field, Some(&FieldValue::from("Alice"))).is_ok());
/// ```
pub fn validate_field(field: &FieldSchema, value: Option<&FieldValue>) -> FieldResult<()> {
	validate_field_with(field, value, ValidationOptions::default())
}

/// Validate one field.
pub fn validate_field_with(
	field: &FieldSchema,
	value: Option<&FieldValue>,
	options: ValidationOptions,
) -> FieldResult<()> {
	if !validators::is_present(value) {
		return if field.required {
			Err(FieldError::for_field(FieldErrorKind::Required, field))
		} else {
			Ok(())
		};
	}

	let text = value.and_then(FieldValue::as_text);

	if let (Some(min), Some(text)) = (field.min_length, text)
		&& !validators::has_min_length(Some(text), min)
	{
		return Err(FieldError::for_field(FieldErrorKind::MinLength, field));
	}

	if let (Some(max), Some(text)) = (field.max_length, text)
		&& !validators::has_max_length(Some(text), max)
	{
		return Err(FieldError::for_field(FieldErrorKind::MaxLength, field));
	}

	// Non-text values are checked as the empty string, which always passes.
	let format_input = Some(text.unwrap_or(""));

	match field.field_type {
		FieldType::Email if !validators::is_valid_email(format_input) => {
			Err(FieldError::for_field(FieldErrorKind::Email, field))
		}
		FieldType::Tel if !validators::is_valid_phone(format_input) => {
			Err(FieldError::for_field(FieldErrorKind::Phone, field))
		}
		FieldType::Date if options.strict_dates && !validators::is_valid_date(format_input) => {
			Err(FieldError::for_field(FieldErrorKind::Date, field))
		}
		_ => Ok(()),
	}
}
