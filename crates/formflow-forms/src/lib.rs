//! Schema-driven multi-step forms
//!
//! This crate holds everything about a dynamic form that does not depend on how
//! it is displayed:
//! - The schema model (`FormDefinition`, `Section`, `FieldSchema`) with its
//!   JSON wire format
//! - A library of stateless validation rules
//! - Per-field validation producing user-facing messages
//! - The navigation and submission state machine (`FormEngine`)
//!
//! Rendering lives in `formflow-pages`.

pub mod engine;
pub mod error;
pub mod field;
pub mod schema;
pub mod submit;
pub mod validators;
pub mod value;

pub use engine::{
	EngineEffect, EngineSnapshot, FormEngine, Navigation, SUBMIT_BLOCKED_NOTICE, SectionValidation,
	SharedFormEngine, SubmitTicket,
};
pub use error::{SchemaError, SchemaWarning, SubmitError, SubmitResult};
pub use field::{
	FieldError, FieldErrorKind, FieldResult, ValidationOptions, validate_field, validate_field_with,
};
pub use schema::{FieldOption, FieldSchema, FieldType, FormDefinition, FormResponse, Section, SectionId};
pub use submit::{FnSubmitter, FormSubmitter, LogSubmitter};
pub use value::{ChangeEvent, FieldValue, FormErrors, FormValues};
