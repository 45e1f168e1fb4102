//! Section, navigation and page composition
//!
//! All views here are derived from an [`EngineSnapshot`]; none of them holds
//! state of its own.
//!
//! ## Example
//!
//! ```
//! use formflow_forms::{FieldSchema, FieldType, FormDefinition, FormEngine, Section};
//! use formflow_pages::{FormPage, PrimaryAction};
//!
//! let form = FormDefinition::new("survey", "Survey", "3").with_section(
//!     Section::new(1, "About you").with_field(FieldSchema::new("name", FieldType::Text, "Name")),
//! );
//! let engine = FormEngine::new(form);
//! let snapshot = engine.snapshot();
//!
//! let page = FormPage::new(&snapshot);
//! assert_eq!(page.meta_line(), "Version: 3 | Form ID: survey");
//! assert_eq!(page.step_label(), None);
//! assert_eq!(page.navigation().primary_action, PrimaryAction::Submit);
//! ```

use super::rendering::{FieldProps, FieldRenderer, HtmlFieldRenderer, html_escape};
use formflow_forms::{EngineSnapshot, FormErrors, FormValues, Section};

/// Shown instead of a form when the definition has no sections.
pub const EMPTY_FORM_MESSAGE: &str = "No form sections found or form structure is invalid.";

/// Render state of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
	/// Hidden buttons keep their layout slot but are not shown.
	pub visible: bool,
	pub disabled: bool,
	/// Show a busy indicator instead of the label.
	pub loading: bool,
}

/// What the primary navigation button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
	Next,
	Submit,
}

impl PrimaryAction {
	pub fn label(&self) -> &'static str {
		match self {
			PrimaryAction::Next => "Next",
			PrimaryAction::Submit => "Submit",
		}
	}
}

/// Previous / Next / Submit controls for the current section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
	pub previous: ButtonState,
	pub primary_action: PrimaryAction,
	pub primary: ButtonState,
}

impl NavigationState {
	/// Derive the navigation controls.
	///
	/// - Previous is hidden on the first section and disabled while submitting.
	/// - The primary action is Submit on the last section and Next elsewhere.
	/// - The primary button is disabled while the current section is invalid
	///   or a submission is in flight; Submit shows loading while in flight.
	pub fn from_snapshot(snapshot: &EngineSnapshot) -> Self {
		let is_first = snapshot.is_first_section();
		let is_last = snapshot.is_last_section();
		let submitting = snapshot.is_submitting;

		let primary_action = if is_last {
			PrimaryAction::Submit
		} else {
			PrimaryAction::Next
		};

		Self {
			previous: ButtonState {
				visible: !is_first,
				disabled: is_first || submitting,
				loading: false,
			},
			primary_action,
			primary: ButtonState {
				visible: true,
				disabled: !snapshot.is_current_section_valid || submitting,
				loading: is_last && submitting,
			},
		}
	}

	pub fn render_html(&self) -> String {
		let mut html = String::from(r#"<div class="form-navigation">"#);

		html.push_str(r#"<button type="button" data-action="previous""#);
		if !self.previous.visible {
			html.push_str(r#" class="invisible""#);
		}
		if self.previous.disabled {
			html.push_str(" disabled");
		}
		html.push_str(">Previous</button>");

		let action = match self.primary_action {
			PrimaryAction::Next => "next",
			PrimaryAction::Submit => "submit",
		};
		html.push_str(&format!(r#"<button type="button" data-action="{}""#, action));
		if self.primary.disabled {
			html.push_str(" disabled");
		}
		if self.primary.loading {
			html.push_str(r#" aria-busy="true""#);
		}
		html.push('>');
		html.push_str(if self.primary.loading {
			"Submitting..."
		} else {
			self.primary_action.label()
		});
		html.push_str("</button></div>");

		html
	}
}

/// One section with its fields, values and errors.
#[derive(Debug, Clone, Copy)]
pub struct SectionView<'a> {
	section: &'a Section,
	values: &'a FormValues,
	errors: &'a FormErrors,
}

impl<'a> SectionView<'a> {
	pub fn new(section: &'a Section, values: &'a FormValues, errors: &'a FormErrors) -> Self {
		Self {
			section,
			values,
			errors,
		}
	}

	pub fn section(&self) -> &'a Section {
		self.section
	}

	/// Props for every field, in declaration order.
	pub fn field_props(self) -> impl Iterator<Item = FieldProps<'a>> {
		let values = self.values;
		let errors = self.errors;
		self.section.fields.iter().map(move |field| {
			FieldProps::new(
				field,
				values.get(&field.field_id),
				errors.get(&field.field_id).and_then(|error| error.as_deref()),
			)
		})
	}

	/// Render every field through `renderer`.
	pub fn render<R: FieldRenderer>(&self, renderer: &R) -> Vec<R::Output> {
		self.field_props()
			.map(|props| renderer.render_field(&props))
			.collect()
	}

	pub fn render_html(&self) -> String {
		let mut html = String::from(r#"<section class="form-section">"#);
		html.push_str(&format!("<h2>{}</h2>", html_escape(&self.section.title)));
		html.push_str(&format!(
			r#"<p class="description">{}</p>"#,
			html_escape(&self.section.description)
		));
		html.push_str(r#"<div class="fields">"#);
		for field_html in self.render(&HtmlFieldRenderer::new()) {
			html.push_str(&field_html);
		}
		html.push_str("</div></section>");
		html
	}
}

/// Whole-page view: header, current section and navigation.
#[derive(Debug, Clone, Copy)]
pub struct FormPage<'a> {
	snapshot: &'a EngineSnapshot,
}

impl<'a> FormPage<'a> {
	pub fn new(snapshot: &'a EngineSnapshot) -> Self {
		Self { snapshot }
	}

	pub fn title(&self) -> &'a str {
		&self.snapshot.form_title
	}

	pub fn meta_line(&self) -> String {
		format!(
			"Version: {} | Form ID: {}",
			self.snapshot.version, self.snapshot.form_id
		)
	}

	/// `Step i of n`, only for forms with more than one section.
	pub fn step_label(&self) -> Option<String> {
		let total = self.snapshot.total_sections;
		(total > 1).then(|| {
			format!(
				"Step {} of {}",
				self.snapshot.current_section_index + 1,
				total
			)
		})
	}

	/// The current section, or `None` for a form with no sections.
	pub fn section(&self) -> Option<SectionView<'a>> {
		self.snapshot
			.current_section
			.as_ref()
			.map(|section| SectionView::new(section, &self.snapshot.values, &self.snapshot.errors))
	}

	pub fn navigation(&self) -> NavigationState {
		NavigationState::from_snapshot(self.snapshot)
	}

	pub fn render_html(&self) -> String {
		let Some(section) = self.section() else {
			return format!(
				r#"<div class="form-page"><p class="error" role="alert">{}</p></div>"#,
				EMPTY_FORM_MESSAGE
			);
		};

		let mut html = String::from(r#"<div class="form-page"><header>"#);
		html.push_str(&format!("<h1>{}</h1>", html_escape(self.title())));
		html.push_str(&format!(
			r#"<p class="meta">{}</p>"#,
			html_escape(&self.meta_line())
		));
		if let Some(step) = self.step_label() {
			html.push_str(&format!(r#"<p class="step">{}</p>"#, step));
		}
		html.push_str("</header><form novalidate>");
		html.push_str(&section.render_html());
		html.push_str(&self.navigation().render_html());
		html.push_str("</form></div>");
		html
	}
}
