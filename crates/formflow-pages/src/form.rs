//! Form views
//!
//! ## Architecture
//!
//! ```text
//! FormEngine ──snapshot()──▶ EngineSnapshot
//!                              │
//!              ┌───────────────┼────────────────┐
//!              ▼               ▼                ▼
//!          FormPage       SectionView     NavigationState
//!                              │
//!                      FieldProps ─▶ Control::for_field
//!                              │
//!                        FieldRenderer ─▶ HTML / terminal / ...
//! ```
//!
//! - [`rendering`]: the closed field-type dispatch and the HTML renderer
//! - [`component`]: section, navigation and page composition

pub mod component;
pub mod rendering;

pub use component::{
	ButtonState, EMPTY_FORM_MESSAGE, FormPage, NavigationState, PrimaryAction, SectionView,
};
pub use rendering::{
	Control, FieldProps, FieldRenderer, HtmlFieldRenderer, InputType, html_escape,
};
