//! Views and transport for formflow forms
//!
//! - [`form`]: turns engine state into controls, sections, navigation and a
//!   whole page, with an HTML renderer
//! - [`auth`]: the explicit session capability
//! - [`api`]: HTTP client for the form-fetch and user-registration endpoints
//!
//! Nothing in this crate changes engine state; views read an
//! [`EngineSnapshot`](formflow_forms::EngineSnapshot) and report user input
//! back as [`ChangeEvent`](formflow_forms::ChangeEvent)s.

pub mod api;
pub mod auth;
pub mod form;

pub use api::{ApiError, CreateUserResponse, FormApiClient};
pub use auth::{AuthError, Session, User};
pub use form::{
	ButtonState, Control, EMPTY_FORM_MESSAGE, FieldProps, FieldRenderer, FormPage,
	HtmlFieldRenderer, InputType, NavigationState, PrimaryAction, SectionView, html_escape,
};
