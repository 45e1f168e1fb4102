//! # formflow
//!
//! Schema-driven multi-step forms. A server describes a form as JSON
//! (sections, fields, validation rules) and formflow validates, paginates and
//! collects it without any form-specific code.
//!
//! ## Crates
//!
//! - [`forms`]: schema model, validation rules and the [`FormEngine`]
//! - [`pages`]: field controls, section and page views, HTML rendering,
//!   session capability and API client (feature `pages`)
//! - [`conf`]: settings from defaults, `formflow.toml` and `FORMFLOW_*`
//!   environment variables (feature `conf`)
//!
//! ## Feature Flags
//!
//! - `full` (default) - everything below
//! - `pages` - views and API client
//! - `conf` - layered settings
//!
//! ## Quick Example
//!
//! ```
//! use formflow::prelude::*;
//!
//! let json = r#"{
//!     "formTitle": "Feedback",
//!     "formId": "fb-1",
//!     "version": "1.0",
//!     "sections": [{
//!         "sectionId": 1,
//!         "title": "About you",
//!         "description": "",
//!         "fields": [
//!             { "fieldId": "email", "type": "email", "label": "Email", "required": true }
//!         ]
//!     }]
//! }"#;
//!
//! let mut engine = FormEngine::new(FormDefinition::from_json(json).unwrap());
//! engine.handle_change(&ChangeEvent::input("email", "not-an-email"));
//! assert!(!engine.is_current_section_valid());
//!
//! engine.handle_change(&ChangeEvent::input("email", "asha@example.com"));
//! assert!(engine.submit_with(|_, _| Ok::<(), String>(())).is_ok());
//! ```

#[cfg(feature = "conf")]
pub mod conf;
pub mod forms;
#[cfg(feature = "pages")]
pub mod pages;

pub use formflow_forms::{
	ChangeEvent, EngineSnapshot, FieldSchema, FieldType, FieldValue, FormDefinition, FormEngine,
	Navigation, SchemaError, SchemaWarning, Section, SharedFormEngine, SubmitError,
};

#[cfg(feature = "conf")]
pub use formflow_conf::{ClientSettings, SettingsError};

#[cfg(feature = "pages")]
pub use formflow_pages::{ApiError, FormApiClient, FormPage, HtmlFieldRenderer, Session, User};

/// Common imports for driving a form.
pub mod prelude {
	pub use formflow_forms::{
		ChangeEvent, EngineEffect, FieldValue, FormDefinition, FormEngine, FormSubmitter,
		Navigation, SharedFormEngine, SubmitError,
	};

	#[cfg(feature = "pages")]
	pub use formflow_pages::{FieldRenderer, FormPage, HtmlFieldRenderer};
}
