use crate::schema::FieldType;
use std::collections::BTreeMap;

/// Errors raised while loading a form definition.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
	#[error("Invalid form definition JSON: {0}")]
	Json(#[from] serde_json::Error),

	#[error(
		"Field id '{field_id}' is declared in section {first_section} and again in section {second_section}"
	)]
	DuplicateFieldId {
		field_id: String,
		first_section: usize,
		second_section: usize,
	},
}

/// Questionable but loadable parts of a form definition.
///
/// Reported by [`FormDefinition::lint`](crate::schema::FormDefinition::lint);
/// the engine handles every one of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaWarning {
	#[error("Field '{field_id}' of type {field_type} declares no options")]
	MissingOptions {
		field_id: String,
		field_type: FieldType,
	},

	#[error("Field '{field_id}' has minLength {min} greater than maxLength {max}")]
	InvalidLengthBounds {
		field_id: String,
		min: usize,
		max: usize,
	},
}

/// Reasons a submission did not complete.
///
/// Only [`SubmitError::Invalid`] and [`SubmitError::Failed`] occur in normal
/// use; the others report a caller driving the engine out of order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
	#[error("Submit requested on section {current} of {total}; only the last section can submit")]
	NotOnLastSection { current: usize, total: usize },

	#[error("A submission is already in flight")]
	AlreadySubmitting,

	#[error("Section {section} has {} invalid field(s)", .errors.len())]
	Invalid {
		section: usize,
		errors: BTreeMap<String, String>,
	},

	#[error("Submission failed: {message}")]
	Failed { message: String },
}

pub type SubmitResult<T> = Result<T, SubmitError>;
