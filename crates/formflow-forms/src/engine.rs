//! Dynamic form engine
//!
//! [`FormEngine`] owns the mutable state of one multi-section form: current
//! values, current errors, the section pointer and the submission flag. It is
//! driven by discrete events (input changes, navigation, submit) and every
//! operation runs synchronously.
//!
//! ## Navigation rules
//!
//! - Moving forward validates the current section first and is blocked while
//!   any field of that section is invalid.
//! - Moving backward never validates; users may retreat with invalid data.
//! - Only the last section can submit. Submission hands the complete value map
//!   of every section to a collaborator and settles exactly once.
//!
//! UI side effects (scroll to top, blocking notices) are queued as
//! [`EngineEffect`]s and drained by the view with [`FormEngine::take_effects`].
//!
//! ## Example
//!
//! ```
//! use formflow_forms::{
//!     ChangeEvent, FieldSchema, FieldType, FormDefinition, FormEngine, Navigation, Section,
//! };
//!
//! let form = FormDefinition::new("signup", "Signup", "1")
//!     .with_section(
//!         Section::new(1, "Account")
//!             .with_field(FieldSchema::new("name", FieldType::Text, "Name").required(true)),
//!     )
//!     .with_section(
//!         Section::new(2, "Contact")
//!             .with_field(FieldSchema::new("email", FieldType::Email, "Email")),
//!     );
//!
//! let mut engine = FormEngine::new(form);
//! assert!(matches!(engine.go_to_next_section(), Navigation::Blocked { .. }));
//! assert_eq!(engine.error("name"), Some("Name is required."));
//!
//! engine.handle_change(&ChangeEvent::input("name", "Alice"));
//! assert_eq!(engine.go_to_next_section(), Navigation::Moved { from: 0, to: 1 });
//!
//! let mut submitted = None;
//! engine
//!     .submit_with(|_, values| {
//!         submitted = Some(values.clone());
//!         Ok::<(), String>(())
//!     })
//!     .unwrap();
//! assert_eq!(submitted.unwrap().len(), 1);
//! assert!(!engine.is_submitting());
//! ```

use crate::error::{SubmitError, SubmitResult};
use crate::field::{FieldError, ValidationOptions, validate_field_with};
use crate::schema::{FieldSchema, FormDefinition, Section};
use crate::submit::FormSubmitter;
use crate::value::{ChangeEvent, FieldValue, FormErrors, FormValues};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Notice queued when the final section blocks a submission.
pub const SUBMIT_BLOCKED_NOTICE: &str =
	"Please fix the errors in the final section before submitting.";

/// A UI side effect requested by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEffect {
	/// The visible section changed; the view should scroll back to the top.
	ScrollToTop,
	/// A blocking message the user has to acknowledge.
	Notice(String),
	/// A submission left the in-flight state.
	SubmissionSettled { succeeded: bool },
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
	Moved { from: usize, to: usize },
	/// The current section has invalid fields; the pointer did not move.
	Blocked { invalid_fields: usize },
	/// Already on the first (backward) or last (forward) section.
	AtBoundary,
}

/// Result of validating every field of one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionValidation {
	/// One entry per field of the section, `None` for valid fields.
	pub errors: FormErrors,
	pub all_valid: bool,
}

impl SectionValidation {
	/// Fields that failed, with their messages.
	pub fn failures(&self) -> BTreeMap<String, String> {
		self.errors
			.iter()
			.filter_map(|(field_id, error)| {
				error
					.as_ref()
					.map(|message| (field_id.clone(), message.clone()))
			})
			.collect()
	}
}

/// Proof that a submission was started, carrying the values to hand off.
///
/// Only the ticket of the submission currently in flight settles it. Tickets
/// issued before the form definition was replaced, before the engine was
/// disposed, or for an earlier submission that already settled have no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
	form_id: String,
	values: FormValues,
	generation: u64,
	sequence: u64,
}

impl SubmitTicket {
	pub fn form_id(&self) -> &str {
		&self.form_id
	}

	pub fn values(&self) -> &FormValues {
		&self.values
	}
}

/// Read-only view of the engine state, published to navigation UIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
	pub form_id: String,
	pub form_title: String,
	pub version: String,
	pub values: FormValues,
	pub errors: FormErrors,
	pub current_section_index: usize,
	pub current_section: Option<Section>,
	pub total_sections: usize,
	pub is_current_section_valid: bool,
	pub is_submitting: bool,
}

impl EngineSnapshot {
	pub fn is_first_section(&self) -> bool {
		self.current_section_index == 0
	}

	pub fn is_last_section(&self) -> bool {
		self.total_sections > 0 && self.current_section_index + 1 == self.total_sections
	}

	pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
		self.values.get(field_id)
	}

	pub fn error(&self, field_id: &str) -> Option<&str> {
		self.errors.get(field_id).and_then(|error| error.as_deref())
	}
}

/// State machine for one form definition.
#[derive(Debug)]
pub struct FormEngine {
	definition: Arc<FormDefinition>,
	options: ValidationOptions,
	values: FormValues,
	errors: FormErrors,
	current_section: usize,
	is_submitting: bool,
	generation: u64,
	submissions: u64,
	effects: Vec<EngineEffect>,
}

impl FormEngine {
	/// Create an engine positioned on the first section with empty state.
	pub fn new(definition: impl Into<Arc<FormDefinition>>) -> Self {
		Self {
			definition: definition.into(),
			options: ValidationOptions::default(),
			values: FormValues::new(),
			errors: FormErrors::new(),
			current_section: 0,
			is_submitting: false,
			generation: 0,
			submissions: 0,
			effects: Vec::new(),
		}
	}

	pub fn with_options(mut self, options: ValidationOptions) -> Self {
		self.options = options;
		self
	}

	/// Point the engine at a form definition.
	///
	/// A definition with a different identity replaces the current one and
	/// resets all state; handing the same `Arc` again changes nothing.
	/// Returns whether a reset happened.
	///
	/// # Examples
	///
	/// ```
	/// use formflow_forms::{FormDefinition, FormEngine};
	/// use std::sync::Arc;
	///
	/// let form = Arc::new(FormDefinition::new("a", "A", "1"));
	/// let mut engine = FormEngine::new(form.clone());
	///
	/// assert!(!engine.load(form.clone()));
	/// assert!(engine.load(FormDefinition::new("b", "B", "1")));
	/// ```
	pub fn load(&mut self, definition: impl Into<Arc<FormDefinition>>) -> bool {
		let definition = definition.into();
		if Arc::ptr_eq(&self.definition, &definition) {
			return false;
		}
		self.definition = definition;
		self.reset();
		true
	}

	/// Return to the initial state `({}, {}, 0, false)`.
	///
	/// Any submission still in flight becomes stale.
	pub fn reset(&mut self) {
		tracing::debug!(
			form_id = %self.definition.form_id,
			"Form definition changed, resetting form state"
		);
		self.values.clear();
		self.errors.clear();
		self.current_section = 0;
		self.is_submitting = false;
		self.effects.clear();
		self.generation = self.generation.wrapping_add(1);
	}

	/// Invalidate any in-flight submission without touching values.
	///
	/// Used when the view owning this engine is torn down.
	pub fn dispose(&mut self) {
		self.generation = self.generation.wrapping_add(1);
		self.is_submitting = false;
		self.effects.clear();
	}

	pub fn definition(&self) -> &Arc<FormDefinition> {
		&self.definition
	}

	pub fn options(&self) -> ValidationOptions {
		self.options
	}

	pub fn values(&self) -> &FormValues {
		&self.values
	}

	pub fn errors(&self) -> &FormErrors {
		&self.errors
	}

	pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
		self.values.get(field_id)
	}

	/// Current error message of a field, if it has one.
	pub fn error(&self, field_id: &str) -> Option<&str> {
		self.errors.get(field_id).and_then(|error| error.as_deref())
	}

	pub fn current_section_index(&self) -> usize {
		self.current_section
	}

	pub fn current_section(&self) -> Option<&Section> {
		self.definition.section(self.current_section)
	}

	pub fn total_sections(&self) -> usize {
		self.definition.total_sections()
	}

	pub fn is_submitting(&self) -> bool {
		self.is_submitting
	}

	pub fn is_first_section(&self) -> bool {
		self.current_section == 0
	}

	pub fn is_last_section(&self) -> bool {
		let total = self.total_sections();
		total > 0 && self.current_section + 1 == total
	}

	pub fn progress_percentage(&self) -> f32 {
		let total = self.total_sections();
		if total == 0 {
			return 0.0;
		}
		((self.current_section + 1) as f32 / total as f32) * 100.0
	}

	/// Validate a field against a value with this engine's options.
	pub fn validate_field(&self, field: &FieldSchema, value: Option<&FieldValue>) -> Option<String> {
		validate_field_with(field, value, self.options)
			.err()
			.map(FieldError::into_message)
	}

	/// Validate every field of a section against the current values.
	///
	/// Does not modify the stored errors. An index outside the form yields an
	/// empty, valid result.
	pub fn validate_section(&self, index: usize) -> SectionValidation {
		let Some(section) = self.definition.section(index) else {
			tracing::warn!(
				section = index,
				"Attempted to validate non-existent section index"
			);
			return SectionValidation {
				errors: FormErrors::new(),
				all_valid: true,
			};
		};

		let mut errors = FormErrors::new();
		let mut all_valid = true;

		for field in &section.fields {
			let value = self.values.get(&field.field_id);
			let error = self.validate_field(field, value);
			tracing::debug!(
				section = index,
				field_id = %field.field_id,
				error = ?error,
				"Validated field"
			);
			if error.is_some() {
				all_valid = false;
			}
			errors.insert(field.field_id.clone(), error);
		}

		tracing::debug!(section = index, title = %section.title, all_valid, "Validated section");
		SectionValidation { errors, all_valid }
	}

	/// Store a value, replacing any previous one.
	///
	/// If the field already has an error entry it is cleared to "valid"; the
	/// field is not re-validated until the next navigation or submit attempt.
	pub fn set_field_value(&mut self, field_id: impl Into<String>, value: impl Into<FieldValue>) {
		let field_id = field_id.into();
		if let Some(error) = self.errors.get_mut(&field_id) {
			*error = None;
		}
		self.values.insert(field_id, value.into());
	}

	/// Apply a change event coming from an input control.
	pub fn handle_change(&mut self, event: &ChangeEvent) {
		self.set_field_value(event.name.clone(), event.field_value());
	}

	/// Validate the current section and advance if it is valid.
	///
	/// Errors of the current section are merged into the stored errors in
	/// every case.
	pub fn go_to_next_section(&mut self) -> Navigation {
		let index = self.current_section;
		let validation = self.validate_section(index);
		let invalid_fields = validation.errors.values().filter(|e| e.is_some()).count();
		self.errors.extend(validation.errors);

		if !validation.all_valid {
			tracing::debug!(
				section = index,
				invalid_fields,
				"Navigation blocked: current section has validation errors"
			);
			return Navigation::Blocked { invalid_fields };
		}

		if index + 1 < self.total_sections() {
			self.current_section = index + 1;
			self.effects.push(EngineEffect::ScrollToTop);
			Navigation::Moved {
				from: index,
				to: index + 1,
			}
		} else {
			tracing::warn!(section = index, "Next requested on the last section");
			Navigation::AtBoundary
		}
	}

	/// Go back one section without validating.
	pub fn go_to_previous_section(&mut self) -> Navigation {
		let index = self.current_section;
		if index == 0 {
			return Navigation::AtBoundary;
		}
		self.current_section = index - 1;
		self.effects.push(EngineEffect::ScrollToTop);
		Navigation::Moved {
			from: index,
			to: index - 1,
		}
	}

	/// Start a submission.
	///
	/// Validates the final section and merges its errors. On success the
	/// engine enters the submitting state and returns a ticket with the values
	/// of every section; the caller hands them off and then calls
	/// [`FormEngine::finish_submit`].
	pub fn begin_submit(&mut self) -> SubmitResult<SubmitTicket> {
		let current = self.current_section;
		let total = self.total_sections();

		if !self.is_last_section() {
			tracing::error!(
				section = current,
				total,
				"Submit requested before reaching the last section"
			);
			return Err(SubmitError::NotOnLastSection { current, total });
		}

		if self.is_submitting {
			tracing::warn!(form_id = %self.definition.form_id, "Submit requested while a submission is in flight");
			return Err(SubmitError::AlreadySubmitting);
		}

		let validation = self.validate_section(current);
		let failures = validation.failures();
		self.errors.extend(validation.errors);

		if !failures.is_empty() {
			tracing::error!(
				section = current,
				errors = ?failures,
				"Submission blocked: final section is invalid"
			);
			self.is_submitting = false;
			self.effects
				.push(EngineEffect::Notice(SUBMIT_BLOCKED_NOTICE.to_string()));
			return Err(SubmitError::Invalid {
				section: current,
				errors: failures,
			});
		}

		tracing::info!(
			form_id = %self.definition.form_id,
			fields = self.values.len(),
			"Form is valid, submitting"
		);
		self.is_submitting = true;
		self.submissions = self.submissions.wrapping_add(1);

		Ok(SubmitTicket {
			form_id: self.definition.form_id.clone(),
			values: self.values.clone(),
			generation: self.generation,
			sequence: self.submissions,
		})
	}

	/// Settle a submission started with [`FormEngine::begin_submit`].
	///
	/// Returns `false` and changes nothing when the ticket is stale or was
	/// already settled.
	pub fn finish_submit(&mut self, ticket: &SubmitTicket, succeeded: bool) -> bool {
		if ticket.generation != self.generation {
			tracing::debug!(
				form_id = %ticket.form_id,
				"Ignoring completion of a submission for a replaced form"
			);
			return false;
		}
		if !self.is_submitting || ticket.sequence != self.submissions {
			tracing::debug!(
				form_id = %ticket.form_id,
				sequence = ticket.sequence,
				"Ignoring completion of a submission that is no longer in flight"
			);
			return false;
		}
		self.is_submitting = false;
		self.effects
			.push(EngineEffect::SubmissionSettled { succeeded });
		true
	}

	/// Submit through a synchronous collaborator.
	///
	/// The collaborator receives the form id and the complete value map. The
	/// engine leaves the submitting state whether it succeeds or fails.
	pub fn submit_with<F, E>(&mut self, submit: F) -> SubmitResult<()>
	where
		F: FnOnce(&str, &FormValues) -> Result<(), E>,
		E: fmt::Display,
	{
		let ticket = self.begin_submit()?;
		let outcome = submit(ticket.form_id(), ticket.values());
		self.finish_submit(&ticket, outcome.is_ok());
		outcome.map_err(|err| SubmitError::Failed {
			message: format!("{:#}", err),
		})
	}

	/// Whether every field of the current section validates right now.
	///
	/// Derived on each call from the current values; stored errors are not
	/// touched.
	pub fn is_current_section_valid(&self) -> bool {
		match self.current_section() {
			Some(section) => section
				.fields
				.iter()
				.all(|field| self.validate_field(field, self.values.get(&field.field_id)).is_none()),
			None => true,
		}
	}

	/// Drain queued UI effects, oldest first.
	pub fn take_effects(&mut self) -> Vec<EngineEffect> {
		std::mem::take(&mut self.effects)
	}

	pub fn snapshot(&self) -> EngineSnapshot {
		EngineSnapshot {
			form_id: self.definition.form_id.clone(),
			form_title: self.definition.form_title.clone(),
			version: self.definition.version.clone(),
			values: self.values.clone(),
			errors: self.errors.clone(),
			current_section_index: self.current_section,
			current_section: self.current_section().cloned(),
			total_sections: self.total_sections(),
			is_current_section_valid: self.is_current_section_valid(),
			is_submitting: self.is_submitting,
		}
	}
}

/// Cloneable, thread-safe handle around a [`FormEngine`].
///
/// All mutations go through one mutex so concurrent drivers are serialized.
/// The lock is never held across an `.await`.
#[derive(Debug, Clone)]
pub struct SharedFormEngine {
	inner: Arc<Mutex<FormEngine>>,
}

impl SharedFormEngine {
	pub fn new(engine: FormEngine) -> Self {
		Self {
			inner: Arc::new(Mutex::new(engine)),
		}
	}

	/// Run a closure with shared access to the engine.
	pub fn with<R>(&self, f: impl FnOnce(&FormEngine) -> R) -> R {
		f(&self.inner.lock())
	}

	/// Run a closure with exclusive access to the engine.
	pub fn with_mut<R>(&self, f: impl FnOnce(&mut FormEngine) -> R) -> R {
		f(&mut self.inner.lock())
	}

	pub fn load(&self, definition: impl Into<Arc<FormDefinition>>) -> bool {
		self.inner.lock().load(definition)
	}

	pub fn handle_change(&self, event: &ChangeEvent) {
		self.inner.lock().handle_change(event);
	}

	pub fn set_field_value(&self, field_id: impl Into<String>, value: impl Into<FieldValue>) {
		self.inner.lock().set_field_value(field_id, value);
	}

	pub fn go_to_next_section(&self) -> Navigation {
		self.inner.lock().go_to_next_section()
	}

	pub fn go_to_previous_section(&self) -> Navigation {
		self.inner.lock().go_to_previous_section()
	}

	pub fn is_submitting(&self) -> bool {
		self.inner.lock().is_submitting()
	}

	pub fn snapshot(&self) -> EngineSnapshot {
		self.inner.lock().snapshot()
	}

	pub fn take_effects(&self) -> Vec<EngineEffect> {
		self.inner.lock().take_effects()
	}

	pub fn dispose(&self) {
		self.inner.lock().dispose();
	}

	/// Submit through an asynchronous collaborator.
	///
	/// The completion re-enters the engine exactly once. If the definition was
	/// replaced or the engine disposed while the collaborator was running, the
	/// completion is dropped and the new state is left alone; the
	/// collaborator's outcome is still returned.
	pub async fn submit(&self, submitter: &dyn FormSubmitter) -> SubmitResult<()> {
		let ticket = self.inner.lock().begin_submit()?;

		let outcome = submitter.submit(ticket.form_id(), ticket.values()).await;

		let settled = self.inner.lock().finish_submit(&ticket, outcome.is_ok());
		if !settled {
			tracing::debug!(form_id = %ticket.form_id(), "Submission outcome ignored, it is no longer in flight");
		}

		outcome.map_err(|err| SubmitError::Failed {
			message: format!("{:#}", err),
		})
	}
}
