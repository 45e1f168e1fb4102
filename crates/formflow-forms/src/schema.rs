//! Form schema model
//!
//! Plain data shapes describing a server-declared form: the form itself, its
//! ordered sections, and the fields inside each section. The shapes follow the
//! JSON wire format of the form-fetch endpoint (camelCase keys).
//!
//! Every other part of the crate reads these types; none of them carries
//! behavior beyond lookups and structural checks.

use crate::error::{SchemaError, SchemaWarning};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Closed set of field types a form may declare.
///
/// Unknown type tags are rejected during deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
	/// Single-line text input
	Text,
	/// Email address input
	Email,
	/// Telephone number input
	Tel,
	/// Calendar date input (`YYYY-MM-DD`)
	Date,
	/// Multi-line text input
	Textarea,
	/// Single choice from a drop-down list
	Dropdown,
	/// Single choice from a radio group
	Radio,
	/// Boolean checkbox
	Checkbox,
}

impl FieldType {
	/// Every variant, in declaration order.
	pub const ALL: [FieldType; 8] = [
		FieldType::Text,
		FieldType::Email,
		FieldType::Tel,
		FieldType::Date,
		FieldType::Textarea,
		FieldType::Dropdown,
		FieldType::Radio,
		FieldType::Checkbox,
	];

	/// Wire tag of this type.
	///
	/// # Examples
	///
	/// ```
	/// use formflow_forms::FieldType;
	///
	/// assert_eq!(FieldType::Dropdown.as_str(), "dropdown");
	/// ```
	pub fn as_str(&self) -> &'static str {
		match self {
			FieldType::Text => "text",
			FieldType::Email => "email",
			FieldType::Tel => "tel",
			FieldType::Date => "date",
			FieldType::Textarea => "textarea",
			FieldType::Dropdown => "dropdown",
			FieldType::Radio => "radio",
			FieldType::Checkbox => "checkbox",
		}
	}

	/// Whether the field picks one value out of declared options.
	pub fn is_choice(&self) -> bool {
		matches!(self, FieldType::Dropdown | FieldType::Radio)
	}

	/// Whether the field holds a boolean rather than a string.
	pub fn is_boolean(&self) -> bool {
		matches!(self, FieldType::Checkbox)
	}

	/// `type` attribute of the `<input>` element for single-line types.
	pub fn html_input_type(&self) -> Option<&'static str> {
		match self {
			FieldType::Text | FieldType::Email | FieldType::Tel | FieldType::Date => {
				Some(self.as_str())
			}
			_ => None,
		}
	}
}

impl fmt::Display for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One selectable choice of a `dropdown` or `radio` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
	pub value: String,
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data_test_id: Option<String>,
}

impl FieldOption {
	pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			label: label.into(),
			data_test_id: None,
		}
	}
}

/// Schema of a single field.
///
/// `field_id` is the key into the form-wide value and error maps, so it must be
/// unique across all sections of one form (see [`FormDefinition::check`]).
///
/// The custom validation message is read from either `validationMessage` or
/// the nested `validation: { message }` object; it is always written back as
/// `validationMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "FieldSchemaRepr")]
pub struct FieldSchema {
	pub field_id: String,
	#[serde(rename = "type")]
	pub field_type: FieldType,
	pub label: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub placeholder: Option<String>,
	pub required: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min_length: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_length: Option<usize>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub options: Option<Vec<FieldOption>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub validation_message: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data_test_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldSchemaRepr {
	field_id: String,
	#[serde(rename = "type")]
	field_type: FieldType,
	label: String,
	#[serde(default)]
	placeholder: Option<String>,
	#[serde(default)]
	required: bool,
	#[serde(default)]
	min_length: Option<usize>,
	#[serde(default)]
	max_length: Option<usize>,
	#[serde(default)]
	options: Option<Vec<FieldOption>>,
	#[serde(default)]
	validation_message: Option<String>,
	#[serde(default)]
	validation: Option<ValidationRepr>,
	#[serde(default)]
	data_test_id: Option<String>,
}

#[derive(Deserialize)]
struct ValidationRepr {
	message: Option<String>,
}

impl From<FieldSchemaRepr> for FieldSchema {
	fn from(repr: FieldSchemaRepr) -> Self {
		let validation_message = repr
			.validation_message
			.or_else(|| repr.validation.and_then(|v| v.message));

		Self {
			field_id: repr.field_id,
			field_type: repr.field_type,
			label: repr.label,
			placeholder: repr.placeholder,
			required: repr.required,
			min_length: repr.min_length,
			max_length: repr.max_length,
			options: repr.options,
			validation_message,
			data_test_id: repr.data_test_id,
		}
	}
}

impl FieldSchema {
	/// Create an optional field with no constraints.
	///
	/// # Examples
	///
	/// ```
	/// use formflow_forms::{FieldSchema, FieldType};
	///
	/// let field = FieldSchema::new("email", FieldType::Email, "Email")
	///     .required(true)
	///     .with_max_length(120);
	/// assert!(field.required);
	/// assert_eq!(field.max_length, Some(120));
	/// ```
	pub fn new(field_id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
		Self {
			field_id: field_id.into(),
			field_type,
			label: label.into(),
			placeholder: None,
			required: false,
			min_length: None,
			max_length: None,
			options: None,
			validation_message: None,
			data_test_id: None,
		}
	}

	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
		self
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
		self.options = Some(options);
		self
	}

	/// Replace every default error message of this field with `message`.
	pub fn with_validation_message(mut self, message: impl Into<String>) -> Self {
		self.validation_message = Some(message.into());
		self
	}

	/// Declared options, or an empty slice when none were declared.
	pub fn options(&self) -> &[FieldOption] {
		self.options.as_deref().unwrap_or(&[])
	}
}

/// Section identifier as sent by the server.
///
/// The reference server sends integers; string identifiers are accepted too.
/// Navigation never uses this value, only the section's position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionId {
	Number(i64),
	Text(String),
}

impl fmt::Display for SectionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SectionId::Number(n) => write!(f, "{}", n),
			SectionId::Text(s) => f.write_str(s),
		}
	}
}

impl From<i64> for SectionId {
	fn from(value: i64) -> Self {
		SectionId::Number(value)
	}
}

impl From<i32> for SectionId {
	fn from(value: i32) -> Self {
		SectionId::Number(i64::from(value))
	}
}

impl From<&str> for SectionId {
	fn from(value: &str) -> Self {
		SectionId::Text(value.to_string())
	}
}

/// An ordered page of fields; the unit of navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
	pub section_id: SectionId,
	pub title: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub fields: Vec<FieldSchema>,
}

impl Section {
	pub fn new(section_id: impl Into<SectionId>, title: impl Into<String>) -> Self {
		Self {
			section_id: section_id.into(),
			title: title.into(),
			description: String::new(),
			fields: Vec::new(),
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn with_field(mut self, field: FieldSchema) -> Self {
		self.fields.push(field);
		self
	}
}

/// A complete server-declared form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
	pub form_title: String,
	pub form_id: String,
	pub version: String,
	#[serde(default)]
	pub sections: Vec<Section>,
}

/// Envelope returned by the form-fetch endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormResponse {
	#[serde(default)]
	pub message: String,
	pub form: FormDefinition,
}

impl FormDefinition {
	pub fn new(
		form_id: impl Into<String>,
		form_title: impl Into<String>,
		version: impl Into<String>,
	) -> Self {
		Self {
			form_title: form_title.into(),
			form_id: form_id.into(),
			version: version.into(),
			sections: Vec::new(),
		}
	}

	pub fn with_section(mut self, section: Section) -> Self {
		self.sections.push(section);
		self
	}

	/// Parse a form definition and check its structure.
	///
	/// Accepts either a bare definition or the `{ message, form }` envelope of
	/// the fetch endpoint.
	///
	/// # Examples
	///
	/// ```
	/// use formflow_forms::FormDefinition;
	///
	/// let json = r#"{
	///     "message": "ok",
	///     "form": {
	///         "formTitle": "Signup",
	///         "formId": "signup",
	///         "version": "1.0",
	///         "sections": [{
	///             "sectionId": 1,
	///             "title": "Basics",
	///             "description": "",
	///             "fields": [{ "fieldId": "name", "type": "text", "label": "Name", "required": true }]
	///         }]
	///     }
	/// }"#;
	///
	/// let form = FormDefinition::from_json(json).unwrap();
	/// assert_eq!(form.form_id, "signup");
	/// assert_eq!(form.total_sections(), 1);
	/// ```
	pub fn from_json(json: &str) -> Result<Self, SchemaError> {
		let raw: serde_json::Value = serde_json::from_str(json)?;
		let definition = if raw.get("form").is_some_and(|form| form.is_object()) {
			serde_json::from_value::<FormResponse>(raw)?.form
		} else {
			serde_json::from_value::<FormDefinition>(raw)?
		};
		definition.check()?;
		Ok(definition)
	}

	/// Check structural invariants the engine relies on.
	///
	/// Only duplicate `fieldId`s are fatal: values and errors are keyed by
	/// `fieldId`, so two fields sharing one would overwrite each other. Every
	/// [`lint`](Self::lint) finding is logged as a warning and the definition
	/// is accepted.
	pub fn check(&self) -> Result<(), SchemaError> {
		let mut seen: HashMap<&str, usize> = HashMap::new();

		for (index, section) in self.sections.iter().enumerate() {
			for field in &section.fields {
				if let Some(first_section) = seen.insert(field.field_id.as_str(), index) {
					return Err(SchemaError::DuplicateFieldId {
						field_id: field.field_id.clone(),
						first_section,
						second_section: index,
					});
				}
			}
		}

		for warning in self.lint() {
			tracing::warn!(form_id = %self.form_id, "{}", warning);
		}

		Ok(())
	}

	/// Report fields that load but can never be answered as declared.
	///
	/// - `dropdown` and `radio` fields without options
	/// - `minLength` greater than `maxLength`
	///
	/// # Examples
	///
	/// ```
	/// use formflow_forms::{FieldSchema, FieldType, FormDefinition, Section, SchemaWarning};
	///
	/// let form = FormDefinition::new("f", "Form", "1").with_section(
	///     Section::new(1, "A").with_field(FieldSchema::new("pick", FieldType::Radio, "Pick")),
	/// );
	///
	/// assert!(form.check().is_ok());
	/// assert!(matches!(form.lint().as_slice(), [SchemaWarning::MissingOptions { .. }]));
	/// ```
	pub fn lint(&self) -> Vec<SchemaWarning> {
		let mut warnings = Vec::new();

		for field in self.fields() {
			if field.field_type.is_choice() && field.options().is_empty() {
				warnings.push(SchemaWarning::MissingOptions {
					field_id: field.field_id.clone(),
					field_type: field.field_type,
				});
			}

			if let (Some(min), Some(max)) = (field.min_length, field.max_length)
				&& min > max
			{
				warnings.push(SchemaWarning::InvalidLengthBounds {
					field_id: field.field_id.clone(),
					min,
					max,
				});
			}
		}

		warnings
	}

	pub fn total_sections(&self) -> usize {
		self.sections.len()
	}

	pub fn section(&self, index: usize) -> Option<&Section> {
		self.sections.get(index)
	}

	/// Look up a field by id across every section.
	pub fn field(&self, field_id: &str) -> Option<&FieldSchema> {
		self.fields().find(|field| field.field_id == field_id)
	}

	/// All fields of the form in rendering order.
	pub fn fields(&self) -> impl Iterator<Item = &FieldSchema> {
		self.sections.iter().flat_map(|section| section.fields.iter())
	}
}
