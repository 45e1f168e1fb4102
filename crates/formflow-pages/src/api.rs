//! HTTP client for the form service
//!
//! Two endpoints:
//! - `GET {base}/get-form?rollNumber=...` returns `{ message, form }`
//! - `POST {base}/create-user` with `{ rollNumber, name }` registers a user
//!
//! Failures are returned as [`ApiError`] values; the form engine never sees
//! them.

use crate::auth::{AuthError, Session, User};
use formflow_forms::{FormDefinition, SchemaError};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error("API request failed: {0}")]
	Request(#[from] reqwest::Error),

	#[error("API error ({status}): {message}")]
	Status { status: u16, message: String },

	#[error("Invalid form structure received from API: {0}")]
	Schema(#[from] SchemaError),

	#[error(transparent)]
	Auth(#[from] AuthError),
}

/// Body of a successful registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateUserResponse {
	#[serde(default)]
	pub message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
	message: String,
}

#[derive(Debug, Clone)]
pub struct FormApiClient {
	base_url: String,
	client: Client,
}

impl FormApiClient {
	/// Create a client for `base_url` with a per-request timeout.
	pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
		let client = Client::builder().timeout(timeout).build()?;
		Ok(Self::with_client(base_url, client))
	}

	/// Create a client around an existing `reqwest::Client`.
	pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
		let base_url = base_url.into().trim_end_matches('/').to_string();
		Self { base_url, client }
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	/// Fetch the form assigned to the session's user.
	///
	/// The response is parsed and structurally checked before it is returned.
	pub async fn fetch_form(&self, session: &Session) -> Result<FormDefinition, ApiError> {
		self.fetch_form_for(session.roll_number()).await
	}

	async fn fetch_form_for(&self, roll_number: &str) -> Result<FormDefinition, ApiError> {
		tracing::debug!(roll_number, "Fetching form structure");

		let response = self
			.client
			.get(self.url("/get-form"))
			.query(&[("rollNumber", roll_number)])
			.send()
			.await?;
		let body = Self::check_status(response).await?.text().await?;

		let definition = FormDefinition::from_json(&body)?;
		tracing::debug!(
			form_id = %definition.form_id,
			sections = definition.total_sections(),
			"Fetched form structure"
		);
		Ok(definition)
	}

	/// Register a user with the form service.
	pub async fn create_user(&self, user: &User) -> Result<CreateUserResponse, ApiError> {
		user.validate()?;
		tracing::debug!(roll_number = %user.roll_number, "Creating user");

		let response = self
			.client
			.post(self.url("/create-user"))
			.json(user)
			.send()
			.await?;
		let body = Self::check_status(response).await?.text().await?;

		match serde_json::from_str(&body) {
			Ok(created) => Ok(created),
			Err(e) => {
				tracing::debug!(
					error = %e,
					body_len = body.len(),
					"Unparseable createUser response, treating as empty"
				);
				Ok(CreateUserResponse::default())
			}
		}
	}

	/// Register the user, falling back to a form fetch for existing users.
	///
	/// The session is granted when either call succeeds. If both fail the
	/// registration error is returned.
	pub async fn sign_in(&self, user: User) -> Result<Session, ApiError> {
		user.validate()?;

		match self.create_user(&user).await {
			Ok(_) => {}
			Err(create_error) => {
				tracing::warn!(
					error = %create_error,
					"createUser failed, attempting form fetch as fallback"
				);
				if let Err(fetch_error) = self.fetch_form_for(&user.roll_number).await {
					tracing::error!(
						create_error = %create_error,
						fetch_error = %fetch_error,
						"Both user creation and form fetch failed"
					);
					return Err(create_error);
				}
			}
		}

		Ok(Session::login(user)?)
	}

	async fn check_status(response: Response) -> Result<Response, ApiError> {
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}

		let body = response
			.text()
			.await
			.unwrap_or_else(|_| "Unknown error".to_string());
		let message = match serde_json::from_str::<ErrorBody>(&body) {
			Ok(error) => error.message,
			Err(_) if body.trim().is_empty() => status
				.canonical_reason()
				.unwrap_or("Unknown error")
				.to_string(),
			Err(_) => body,
		};

		tracing::error!(status = status.as_u16(), %message, "API call error");
		Err(ApiError::Status {
			status: status.as_u16(),
			message,
		})
	}
}
