//! Session capability
//!
//! There is no process-wide "current user". Code that needs the user's
//! identity takes a [`Session`], which can only be obtained through
//! [`Session::login`] and is given up with [`Session::logout`].

use serde::{Deserialize, Serialize};

/// Identity of the person filling in a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub roll_number: String,
	pub name: String,
}

impl User {
	pub fn new(roll_number: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			roll_number: roll_number.into(),
			name: name.into(),
		}
	}

	/// Reject users whose roll number or name is blank.
	pub fn validate(&self) -> Result<(), AuthError> {
		if self.roll_number.trim().is_empty() || self.name.trim().is_empty() {
			return Err(AuthError::MissingCredentials);
		}
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
	#[error("Both Roll Number and Name are required.")]
	MissingCredentials,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
	user: User,
}

impl Session {
	/// Start a session for a user.
	///
	/// # Examples
	///
	/// ```
	/// use formflow_pages::{AuthError, Session, User};
	///
	/// let session = Session::login(User::new("21CS042", "Asha")).unwrap();
	/// assert_eq!(session.roll_number(), "21CS042");
	///
	/// let err = Session::login(User::new("  ", "Asha")).unwrap_err();
	/// assert_eq!(err, AuthError::MissingCredentials);
	/// ```
	pub fn login(user: User) -> Result<Self, AuthError> {
		user.validate()?;
		tracing::info!(roll_number = %user.roll_number, "Session started");
		Ok(Self { user })
	}

	pub fn user(&self) -> &User {
		&self.user
	}

	pub fn roll_number(&self) -> &str {
		&self.user.roll_number
	}

	/// End the session, handing back the user it was created for.
	pub fn logout(self) -> User {
		tracing::info!(roll_number = %self.user.roll_number, "Session ended");
		self.user
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", "Asha")]
	#[case("21CS042", "")]
	#[case(" \t", "Asha")]
	#[case("21CS042", "   ")]
	fn test_login_rejects_blank_fields(#[case] roll_number: &str, #[case] name: &str) {
		let result = Session::login(User::new(roll_number, name));

		assert_eq!(result, Err(AuthError::MissingCredentials));
	}

	#[rstest]
	fn test_logout_returns_user() {
		let user = User::new("21CS042", "Asha");
		let session = Session::login(user.clone()).unwrap();

		let returned = session.logout();

		assert_eq!(returned, user);
	}

	#[rstest]
	fn test_user_wire_format() {
		let user = User::new("21CS042", "Asha");

		let json = serde_json::to_value(&user).unwrap();

		assert_eq!(json, serde_json::json!({ "rollNumber": "21CS042", "name": "Asha" }));
	}
}
