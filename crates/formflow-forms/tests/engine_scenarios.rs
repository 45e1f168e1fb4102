//! Form Engine Integration Tests
//!
//! End-to-end behavior of the navigation and submission state machine, driven
//! only through the public API.
//!
//! Test Categories:
//! - Category 1: Single-section forms
//! - Category 2: Multi-section navigation
//! - Category 3: Definition replacement
//! - Category 4: Submission
//! - Category 5: Loosely specified definitions

use async_trait::async_trait;
use formflow_forms::{
	ChangeEvent, EngineEffect, FieldOption, FieldSchema, FieldType, FieldValue, FormDefinition,
	FormEngine, FormSubmitter, FormValues, Navigation, SUBMIT_BLOCKED_NOTICE, Section,
	SharedFormEngine, SubmitError,
};
use parking_lot::Mutex;
use rstest::{fixture, rstest};
use std::sync::Arc;
use tokio::sync::Notify;

#[fixture]
fn single_name_form() -> FormDefinition {
	FormDefinition::new("single", "Single", "1").with_section(
		Section::new(1, "Basics")
			.with_field(FieldSchema::new("name", FieldType::Text, "Name").required(true)),
	)
}

#[fixture]
fn two_section_form() -> FormDefinition {
	FormDefinition::new("registration", "Registration", "2.1")
		.with_section(
			Section::new(1, "Personal")
				.with_description("Tell us about yourself")
				.with_field(FieldSchema::new("name", FieldType::Text, "Name").required(true))
				.with_field(
					FieldSchema::new("country", FieldType::Dropdown, "Country").with_options(vec![
						FieldOption::new("in", "India"),
						FieldOption::new("us", "United States"),
					]),
				),
		)
		.with_section(
			Section::new(2, "Contact")
				.with_field(FieldSchema::new("email", FieldType::Email, "Email").required(true))
				.with_field(FieldSchema::new("phone", FieldType::Tel, "Phone"))
				.with_field(
					FieldSchema::new("terms", FieldType::Checkbox, "Terms")
						.required(true)
						.with_validation_message("You must accept the terms"),
				),
		)
}

/// Records every submission it receives.
#[derive(Default)]
struct RecordingSubmitter {
	calls: Mutex<Vec<(String, FormValues)>>,
	fail: bool,
}

#[async_trait]
impl FormSubmitter for RecordingSubmitter {
	async fn submit(&self, form_id: &str, values: &FormValues) -> anyhow::Result<()> {
		self.calls.lock().push((form_id.to_string(), values.clone()));
		if self.fail {
			anyhow::bail!("service unavailable");
		}
		Ok(())
	}
}

/// Blocks until released, so tests can act while a submission is in flight.
struct GatedSubmitter {
	started: Notify,
	release: Notify,
}

#[async_trait]
impl FormSubmitter for GatedSubmitter {
	async fn submit(&self, _form_id: &str, _values: &FormValues) -> anyhow::Result<()> {
		self.started.notify_one();
		self.release.notified().await;
		Ok(())
	}
}

// ============================================================================
// Category 1: Single-section forms
// ============================================================================

/// Empty required field blocks navigation and records an error
#[rstest]
fn test_required_empty_blocks_navigation(single_name_form: FormDefinition) {
	// Arrange
	let mut engine = FormEngine::new(single_name_form);
	engine.set_field_value("name", "");

	// Act
	let navigation = engine.go_to_next_section();

	// Assert
	assert_eq!(navigation, Navigation::Blocked { invalid_fields: 1 });
	assert_eq!(engine.current_section_index(), 0);
	assert!(engine.error("name").is_some_and(|message| !message.is_empty()));
}

/// Next on the last section validates but does not move
#[rstest]
fn test_next_on_last_section_is_noop(single_name_form: FormDefinition) {
	let mut engine = FormEngine::new(single_name_form);
	engine.set_field_value("name", "Alice");

	let navigation = engine.go_to_next_section();

	assert_eq!(navigation, Navigation::AtBoundary);
	assert_eq!(engine.current_section_index(), 0);
	assert!(engine.is_current_section_valid());
	assert_eq!(engine.errors().get("name"), Some(&None));
	assert!(engine.take_effects().is_empty());
}

/// Optional email with a bad value fails on format, empty passes
#[rstest]
fn test_optional_email_format() {
	let field = FieldSchema::new("email", FieldType::Email, "Email");
	let engine = FormEngine::new(
		FormDefinition::new("f", "F", "1").with_section(Section::new(1, "S").with_field(field.clone())),
	);

	let bad = engine.validate_field(&field, Some(&FieldValue::from("not-an-email")));
	let empty = engine.validate_field(&field, Some(&FieldValue::from("")));

	assert_eq!(
		bad.as_deref(),
		Some("Please enter a valid email address for Email.")
	);
	assert_eq!(empty, None);
}

// ============================================================================
// Category 2: Multi-section navigation
// ============================================================================

/// Valid first section advances and queues a scroll effect
#[rstest]
fn test_advance_through_sections(two_section_form: FormDefinition) {
	let mut engine = FormEngine::new(two_section_form);
	engine.handle_change(&ChangeEvent::input("name", "Asha"));

	let navigation = engine.go_to_next_section();

	assert_eq!(navigation, Navigation::Moved { from: 0, to: 1 });
	assert!(engine.is_last_section());
	assert_eq!(engine.take_effects(), vec![EngineEffect::ScrollToTop]);
	assert_eq!(engine.current_section().map(|s| s.title.as_str()), Some("Contact"));
}

/// Previous works with invalid data and keeps every value
#[rstest]
fn test_previous_always_allowed(two_section_form: FormDefinition) {
	// Arrange
	let mut engine = FormEngine::new(two_section_form);
	engine.set_field_value("name", "Asha");
	engine.go_to_next_section();
	engine.set_field_value("email", "broken");
	engine.go_to_next_section();
	assert!(engine.error("email").is_some());

	// Act
	let navigation = engine.go_to_previous_section();

	// Assert
	assert_eq!(navigation, Navigation::Moved { from: 1, to: 0 });
	assert_eq!(engine.value("email"), Some(&FieldValue::from("broken")));
	assert!(engine.error("email").is_some());
}

/// Editing a field clears only that field's error
#[rstest]
fn test_edit_clears_error_until_next_validation(two_section_form: FormDefinition) {
	let mut engine = FormEngine::new(two_section_form);
	engine.go_to_next_section();
	assert!(engine.error("name").is_some());

	engine.set_field_value("name", " ");
	assert_eq!(engine.error("name"), None);

	let navigation = engine.go_to_next_section();
	assert_eq!(navigation, Navigation::Blocked { invalid_fields: 1 });
	assert_eq!(engine.error("name"), Some("Name is required."));
}

// ============================================================================
// Category 3: Definition replacement
// ============================================================================

/// Loading a different definition resets all state
#[rstest]
fn test_replacing_definition_resets_state(
	single_name_form: FormDefinition,
	two_section_form: FormDefinition,
) {
	// Arrange
	let mut engine = FormEngine::new(two_section_form);
	engine.set_field_value("name", "Asha");
	engine.go_to_next_section();
	engine.set_field_value("email", "x");
	engine.go_to_next_section();

	// Act
	let reset = engine.load(single_name_form);

	// Assert
	assert!(reset);
	assert!(engine.values().is_empty());
	assert!(engine.errors().is_empty());
	assert_eq!(engine.current_section_index(), 0);
	assert!(!engine.is_submitting());
	assert!(engine.take_effects().is_empty());
}

/// Re-supplying the same definition keeps state
#[rstest]
fn test_same_definition_keeps_state(two_section_form: FormDefinition) {
	let form = Arc::new(two_section_form);
	let mut engine = FormEngine::new(Arc::clone(&form));
	engine.set_field_value("name", "Asha");

	let reset = engine.load(Arc::clone(&form));

	assert!(!reset);
	assert_eq!(engine.value("name"), Some(&FieldValue::from("Asha")));
}

// ============================================================================
// Category 4: Submission
// ============================================================================

/// Invalid final section blocks submission without calling the collaborator
#[rstest]
fn test_invalid_final_section_blocks_submit(two_section_form: FormDefinition) {
	// Arrange
	let mut engine = FormEngine::new(two_section_form);
	engine.set_field_value("name", "Asha");
	engine.go_to_next_section();
	engine.set_field_value("email", "a@example.com");
	engine.set_field_value("phone", "not a phone");
	engine.set_field_value("terms", true);
	engine.take_effects();
	let mut called = false;

	// Act
	let result = engine.submit_with(|_, _| {
		called = true;
		Ok::<(), String>(())
	});

	// Assert
	assert!(!called);
	assert!(!engine.is_submitting());
	match result {
		Err(SubmitError::Invalid { section, errors }) => {
			assert_eq!(section, 1);
			assert_eq!(
				errors.get("phone").map(String::as_str),
				Some("Please enter a valid phone number for Phone.")
			);
			assert_eq!(errors.len(), 1);
		}
		other => panic!("Expected Invalid, got {:?}", other),
	}
	assert!(engine.error("phone").is_some());
	assert_eq!(
		engine.take_effects(),
		vec![EngineEffect::Notice(SUBMIT_BLOCKED_NOTICE.to_string())]
	);
}

/// Successful submission hands off the values of every section
#[rstest]
#[tokio::test]
async fn test_shared_submit_collects_all_sections(two_section_form: FormDefinition) {
	// Arrange
	let shared = SharedFormEngine::new(FormEngine::new(two_section_form));
	shared.handle_change(&ChangeEvent::input("name", "Asha"));
	shared.handle_change(&ChangeEvent::input("country", "in"));
	shared.go_to_next_section();
	shared.handle_change(&ChangeEvent::input("email", "asha@example.com"));
	shared.handle_change(&ChangeEvent::checkbox("terms", true));
	let submitter = RecordingSubmitter::default();

	// Act
	let result = shared.submit(&submitter).await;

	// Assert
	assert!(result.is_ok());
	assert!(!shared.is_submitting());
	let calls = submitter.calls.lock();
	assert_eq!(calls.len(), 1);
	let (form_id, values) = &calls[0];
	assert_eq!(form_id, "registration");
	assert_eq!(values.get("name"), Some(&FieldValue::from("Asha")));
	assert_eq!(values.get("country"), Some(&FieldValue::from("in")));
	assert_eq!(values.get("terms"), Some(&FieldValue::Bool(true)));
	assert!(
		shared
			.take_effects()
			.contains(&EngineEffect::SubmissionSettled { succeeded: true })
	);
}

/// A failing collaborator still settles the submitting flag
#[rstest]
#[tokio::test]
async fn test_shared_submit_failure_settles(single_name_form: FormDefinition) {
	let shared = SharedFormEngine::new(FormEngine::new(single_name_form));
	shared.set_field_value("name", "Asha");
	let submitter = RecordingSubmitter {
		fail: true,
		..Default::default()
	};

	let result = shared.submit(&submitter).await;

	assert_eq!(
		result,
		Err(SubmitError::Failed {
			message: "service unavailable".to_string()
		})
	);
	assert!(!shared.is_submitting());
	assert_eq!(submitter.calls.lock().len(), 1);
}

/// Completion of a submission for a replaced definition is dropped
#[rstest]
#[tokio::test]
async fn test_stale_completion_does_not_touch_new_form(
	single_name_form: FormDefinition,
	two_section_form: FormDefinition,
) {
	// Arrange
	let shared = SharedFormEngine::new(FormEngine::new(single_name_form));
	shared.set_field_value("name", "Asha");
	let submitter = Arc::new(GatedSubmitter {
		started: Notify::new(),
		release: Notify::new(),
	});

	let task = {
		let shared = shared.clone();
		let submitter = Arc::clone(&submitter);
		tokio::spawn(async move { shared.submit(submitter.as_ref()).await })
	};
	submitter.started.notified().await;
	assert!(shared.is_submitting());

	// Act: replace the form while the submission is in flight
	shared.load(two_section_form);
	shared.with_mut(|engine| {
		engine.set_field_value("name", "Ravi");
		engine.go_to_next_section();
	});
	submitter.release.notify_one();
	let result = task.await.unwrap();

	// Assert
	assert!(result.is_ok());
	let snapshot = shared.snapshot();
	assert_eq!(snapshot.form_id, "registration");
	assert_eq!(snapshot.current_section_index, 1);
	assert!(!snapshot.is_submitting);
	assert!(
		!shared
			.take_effects()
			.iter()
			.any(|effect| matches!(effect, EngineEffect::SubmissionSettled { .. }))
	);
}

/// Double submission while in flight is rejected
#[rstest]
#[tokio::test]
async fn test_second_submit_while_in_flight_is_rejected(single_name_form: FormDefinition) {
	let shared = SharedFormEngine::new(FormEngine::new(single_name_form));
	shared.set_field_value("name", "Asha");
	let submitter = Arc::new(GatedSubmitter {
		started: Notify::new(),
		release: Notify::new(),
	});

	let task = {
		let shared = shared.clone();
		let submitter = Arc::clone(&submitter);
		tokio::spawn(async move { shared.submit(submitter.as_ref()).await })
	};
	submitter.started.notified().await;

	let second = shared.submit(&RecordingSubmitter::default()).await;
	submitter.release.notify_one();
	let first = task.await.unwrap();

	assert_eq!(second, Err(SubmitError::AlreadySubmitting));
	assert!(first.is_ok());
	assert!(!shared.is_submitting());
}

// ============================================================================
// Category 5: Loosely specified definitions
// ============================================================================

const LOOSE_FORM: &str = r#"{
	"message": "ok",
	"form": {
		"formTitle": "Loose", "formId": "loose", "version": "1",
		"sections": [{
			"sectionId": 1, "title": "Only", "description": "",
			"fields": [
				{ "fieldId": "size", "type": "dropdown", "label": "Size", "required": true },
				{ "fieldId": "bio", "type": "text", "label": "Bio", "minLength": 10, "maxLength": 5 }
			]
		}]
	}
}"#;

/// A required choice field without options still loads and blocks on empty
#[rstest]
fn test_choice_without_options_is_validated() {
	// Arrange
	let form = FormDefinition::from_json(LOOSE_FORM).unwrap();
	let mut engine = FormEngine::new(form);
	engine.set_field_value("bio", "");

	// Act
	let navigation = engine.go_to_next_section();
	let submit = engine.begin_submit();

	// Assert
	assert_eq!(navigation, Navigation::AtBoundary);
	assert_eq!(engine.error("size"), Some("Size is required."));
	assert!(matches!(submit, Err(SubmitError::Invalid { ref errors, .. }) if errors.len() == 1));
}

/// Inverted length bounds are applied as written, min first
#[rstest]
#[case("abcdefg", "Bio must be at least 10 characters long.")]
#[case("abcdefghijkl", "Bio must be no more than 5 characters long.")]
fn test_inverted_length_bounds_are_validated(#[case] bio: &str, #[case] expected: &str) {
	let form = FormDefinition::from_json(LOOSE_FORM).unwrap();
	let field = form.field("bio").unwrap().clone();
	let engine = FormEngine::new(form);

	let error = engine.validate_field(&field, Some(&FieldValue::from(bio)));

	assert_eq!(error.as_deref(), Some(expected));
}
