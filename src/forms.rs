//! Form schema, validation and the navigation engine.
//!
//! # Examples
//!
//! ```
//! use formflow::forms::{ChangeEvent, FieldSchema, FieldType, FormDefinition, FormEngine, Section};
//!
//! let form = FormDefinition::new("signup", "Sign up", "1.0").with_section(
//!     Section::new(1, "You")
//!         .with_field(FieldSchema::new("name", FieldType::Text, "Name").required(true)),
//! );
//! let mut engine = FormEngine::new(form);
//!
//! engine.handle_change(&ChangeEvent::input("name", "Asha"));
//! assert!(engine.is_current_section_valid());
//! ```

// Re-export all formflow-forms functionality
pub use formflow_forms::*;
