//! Field controls and HTML rendering
//!
//! [`Control::for_field`] is the only place that maps a [`FieldType`] to a
//! control. Renderers consume the resulting [`Control`] instead of switching on
//! the field type themselves, so adding a field type is a compile error in one
//! match rather than a silent fallback.

use formflow_forms::{FieldOption, FieldSchema, FieldType, FieldValue};

/// `type` attribute of single-line inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
	Text,
	Email,
	Tel,
	Date,
}

impl InputType {
	pub fn as_str(&self) -> &'static str {
		match self {
			InputType::Text => "text",
			InputType::Email => "email",
			InputType::Tel => "tel",
			InputType::Date => "date",
		}
	}
}

/// What to draw for one field, with its current value already extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control<'a> {
	/// Single-line input for `text`, `email`, `tel` and `date`
	Input {
		input_type: InputType,
		value: &'a str,
		min_length: Option<usize>,
		max_length: Option<usize>,
	},
	/// Multi-line input
	Textarea {
		value: &'a str,
		min_length: Option<usize>,
		max_length: Option<usize>,
	},
	/// Drop-down list; `selected` is empty when nothing is chosen
	Select {
		options: &'a [FieldOption],
		selected: &'a str,
	},
	/// One radio button per option
	RadioGroup {
		options: &'a [FieldOption],
		selected: Option<&'a str>,
	},
	Checkbox { checked: bool },
}

impl<'a> Control<'a> {
	/// Choose the control for a field and extract its value.
	///
	/// Text-shaped controls show a missing or non-text value as empty. A
	/// checkbox is checked only for `Bool(true)`.
	///
	/// # Examples
	///
	/// ```
	/// use formflow_forms::{FieldSchema, FieldType, FieldValue};
	/// use formflow_pages::{Control, InputType};
	///
	/// let field = FieldSchema::new("email", FieldType::Email, "Email");
	/// let value = FieldValue::from("a@b.io");
	///
	/// assert_eq!(
	///     Control::for_field(&field, Some(&value)),
	///     Control::Input {
	///         input_type: InputType::Email,
	///         value: "a@b.io",
	///         min_length: None,
	///         max_length: None,
	///     }
	/// );
	/// ```
	pub fn for_field(field: &'a FieldSchema, value: Option<&'a FieldValue>) -> Self {
		let text = value.and_then(FieldValue::as_text);

		let input = |input_type| Control::Input {
			input_type,
			value: text.unwrap_or(""),
			min_length: field.min_length,
			max_length: field.max_length,
		};

		match field.field_type {
			FieldType::Text => input(InputType::Text),
			FieldType::Email => input(InputType::Email),
			FieldType::Tel => input(InputType::Tel),
			FieldType::Date => input(InputType::Date),
			FieldType::Textarea => Control::Textarea {
				value: text.unwrap_or(""),
				min_length: field.min_length,
				max_length: field.max_length,
			},
			FieldType::Dropdown => Control::Select {
				options: field.options(),
				selected: text.unwrap_or(""),
			},
			FieldType::Radio => Control::RadioGroup {
				options: field.options(),
				selected: text,
			},
			FieldType::Checkbox => Control::Checkbox {
				checked: value.is_some_and(FieldValue::is_checked),
			},
		}
	}

	/// Suffix of the generated `data-testid` when the schema sets none.
	fn test_id_suffix(&self) -> &'static str {
		match self {
			Control::Input { .. } => "input",
			Control::Textarea { .. } => "textarea",
			Control::Select { .. } => "select",
			Control::RadioGroup { .. } => "radiogroup",
			Control::Checkbox { .. } => "checkbox",
		}
	}
}

/// Everything a renderer needs to draw one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldProps<'a> {
	pub field: &'a FieldSchema,
	pub value: Option<&'a FieldValue>,
	pub error: Option<&'a str>,
}

impl<'a> FieldProps<'a> {
	pub fn new(field: &'a FieldSchema, value: Option<&'a FieldValue>, error: Option<&'a str>) -> Self {
		Self {
			field,
			value,
			error,
		}
	}

	pub fn control(&self) -> Control<'a> {
		Control::for_field(self.field, self.value)
	}

	/// `data-testid` of the control: the schema's value, or `{fieldId}-{kind}`.
	pub fn test_id(&self) -> String {
		match &self.field.data_test_id {
			Some(id) => id.clone(),
			None => format!("{}-{}", self.field.field_id, self.control().test_id_suffix()),
		}
	}
}

/// Turns one field into some output (markup, terminal lines, prompts...).
pub trait FieldRenderer {
	type Output;

	fn render_field(&self, props: &FieldProps<'_>) -> Self::Output;
}

/// Renders fields as HTML fragments.
///
/// Every piece of schema or user text is escaped. Required fields get a `*`
/// marker and an error, when present, is rendered below the control with
/// `role="alert"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFieldRenderer;

impl HtmlFieldRenderer {
	pub fn new() -> Self {
		Self
	}
}

impl FieldRenderer for HtmlFieldRenderer {
	type Output = String;

	fn render_field(&self, props: &FieldProps<'_>) -> String {
		let field = props.field;
		let id = html_escape(&field.field_id);
		let test_id = props.test_id();

		let mut html = String::new();

		match props.control() {
			Control::Input {
				input_type,
				value,
				min_length,
				max_length,
			} => {
				html.push_str(r#"<div class="form-field">"#);
				push_label(&mut html, "label", Some(&id), field);
				html.push_str(&format!(
					r#"<input type="{}" id="{}" name="{}" value="{}""#,
					input_type.as_str(),
					id,
					id,
					html_escape(value)
				));
				push_common_attrs(&mut html, field, min_length, max_length, &test_id);
				html.push_str(" />");
			}
			Control::Textarea {
				value,
				min_length,
				max_length,
			} => {
				html.push_str(r#"<div class="form-field">"#);
				push_label(&mut html, "label", Some(&id), field);
				html.push_str(&format!(r#"<textarea id="{}" name="{}""#, id, id));
				push_common_attrs(&mut html, field, min_length, max_length, &test_id);
				html.push('>');
				html.push_str(&html_escape(value));
				html.push_str("</textarea>");
			}
			Control::Select { options, selected } => {
				html.push_str(r#"<div class="form-field">"#);
				push_label(&mut html, "label", Some(&id), field);
				html.push_str(&format!(r#"<select id="{}" name="{}""#, id, id));
				if field.required {
					html.push_str(" required");
				}
				html.push_str(&format!(r#" data-testid="{}">"#, html_escape(&test_id)));

				if let Some(placeholder) = &field.placeholder {
					html.push_str(r#"<option value="" disabled"#);
					if selected.is_empty() {
						html.push_str(" selected");
					}
					html.push('>');
					html.push_str(&html_escape(placeholder));
					html.push_str("</option>");
				}

				for option in options {
					html.push_str(&format!(r#"<option value="{}""#, html_escape(&option.value)));
					if let Some(option_test_id) = &option.data_test_id {
						html.push_str(&format!(r#" data-testid="{}""#, html_escape(option_test_id)));
					}
					if option.value == selected {
						html.push_str(" selected");
					}
					html.push('>');
					html.push_str(&html_escape(&option.label));
					html.push_str("</option>");
				}

				html.push_str("</select>");
			}
			Control::RadioGroup { options, selected } => {
				html.push_str(&format!(
					r#"<fieldset class="form-field" data-testid="{}">"#,
					html_escape(&test_id)
				));
				push_label(&mut html, "legend", None, field);

				for option in options {
					let radio_id = format!("{}-{}", field.field_id, option.value);
					let radio_test_id = option
						.data_test_id
						.clone()
						.unwrap_or_else(|| format!("{}-radio", radio_id));
					let radio_id = html_escape(&radio_id);

					html.push_str(&format!(
						r#"<div class="radio-option"><input type="radio" id="{}" name="{}" value="{}""#,
						radio_id,
						id,
						html_escape(&option.value)
					));
					if selected == Some(option.value.as_str()) {
						html.push_str(" checked");
					}
					if field.required {
						html.push_str(" required");
					}
					html.push_str(&format!(
						r#" data-testid="{}" /><label for="{}">{}</label></div>"#,
						html_escape(&radio_test_id),
						radio_id,
						html_escape(&option.label)
					));
				}
			}
			Control::Checkbox { checked } => {
				html.push_str(r#"<div class="form-field">"#);
				html.push_str(&format!(r#"<input type="checkbox" id="{}" name="{}""#, id, id));
				if checked {
					html.push_str(" checked");
				}
				if field.required {
					html.push_str(" required");
				}
				html.push_str(&format!(r#" data-testid="{}" />"#, html_escape(&test_id)));
				push_label(&mut html, "label", Some(&id), field);
			}
		}

		if let Some(error) = props.error {
			html.push_str(&format!(
				r#"<p class="error" role="alert">{}</p>"#,
				html_escape(error)
			));
		}

		html.push_str(match props.control() {
			Control::RadioGroup { .. } => "</fieldset>",
			_ => "</div>",
		});

		html
	}
}

fn push_label(html: &mut String, tag: &str, target: Option<&str>, field: &FieldSchema) {
	match target {
		Some(id) => html.push_str(&format!(r#"<{} for="{}">"#, tag, id)),
		None => html.push_str(&format!("<{}>", tag)),
	}
	html.push_str(&html_escape(&field.label));
	if field.required {
		html.push_str(r#" <span class="required">*</span>"#);
	}
	html.push_str(&format!("</{}>", tag));
}

fn push_common_attrs(
	html: &mut String,
	field: &FieldSchema,
	min_length: Option<usize>,
	max_length: Option<usize>,
	test_id: &str,
) {
	if let Some(placeholder) = &field.placeholder {
		html.push_str(&format!(r#" placeholder="{}""#, html_escape(placeholder)));
	}
	if let Some(min) = min_length {
		html.push_str(&format!(r#" minlength="{}""#, min));
	}
	if let Some(max) = max_length {
		html.push_str(&format!(r#" maxlength="{}""#, max));
	}
	if field.required {
		html.push_str(" required");
	}
	html.push_str(&format!(r#" data-testid="{}""#, html_escape(test_id)));
}

/// Escape HTML special characters
///
/// # Examples
///
/// ```
/// use formflow_pages::html_escape;
///
/// assert_eq!(html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
///     "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;");
/// ```
pub fn html_escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}
