//! Client settings
//!
//! Resolved from three layers, highest priority first:
//!
//! 1. `FORMFLOW_*` environment variables (e.g. `FORMFLOW_API_BASE_URL`)
//! 2. a TOML file (`formflow.toml` in the working directory unless a path is given)
//! 3. built-in defaults

use crate::builder::{SettingsBuilder, SettingsError};
use crate::sources::{DefaultSource, EnvSource, TomlFileSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Base URL of the hosted form service.
pub const DEFAULT_API_BASE_URL: &str = "https://dynamic-form-generator-9rl7.onrender.com";

/// Prefix of environment variables read by [`ClientSettings::load`].
pub const ENV_PREFIX: &str = "FORMFLOW_";

/// Settings file read when no explicit path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "formflow.toml";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
	pub api_base_url: String,
	pub request_timeout_secs: u64,
	/// Reject date values that are not `YYYY-MM-DD`.
	pub strict_date_validation: bool,
	/// `tracing_subscriber::EnvFilter` directive.
	pub log_filter: String,
}

impl Default for ClientSettings {
	fn default() -> Self {
		Self {
			api_base_url: DEFAULT_API_BASE_URL.to_string(),
			request_timeout_secs: DEFAULT_TIMEOUT_SECS,
			strict_date_validation: false,
			log_filter: DEFAULT_LOG_FILTER.to_string(),
		}
	}
}

impl ClientSettings {
	/// Load settings from the environment, the settings file and defaults.
	///
	/// A missing settings file is not an error.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
		let defaults = Self::default();

		let merged = SettingsBuilder::new()
			.add_source(
				DefaultSource::new()
					.with_value("api_base_url", Value::String(defaults.api_base_url))
					.with_value(
						"request_timeout_secs",
						Value::Number(defaults.request_timeout_secs.into()),
					)
					.with_value(
						"strict_date_validation",
						Value::Bool(defaults.strict_date_validation),
					)
					.with_value("log_filter", Value::String(defaults.log_filter)),
			)
			.add_source(TomlFileSource::new(path))
			.add_source(EnvSource::new().with_prefix(ENV_PREFIX))
			.build()?;

		let settings: Self = merged.into_typed()?;
		settings.validate()?;

		tracing::debug!(
			api_base_url = %settings.api_base_url,
			timeout_secs = settings.request_timeout_secs,
			strict_dates = settings.strict_date_validation,
			"Loaded client settings"
		);
		Ok(settings)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_secs(self.request_timeout_secs)
	}

	/// # Examples
	///
	/// ```
	/// use formflow_conf::ClientSettings;
	///
	/// let mut settings = ClientSettings::default();
	/// assert!(settings.validate().is_ok());
	///
	/// settings.api_base_url = "ftp://forms.example.com".to_string();
	/// assert!(settings.validate().is_err());
	/// ```
	pub fn validate(&self) -> Result<(), SettingsError> {
		let url = self.api_base_url.trim();
		let has_host = url
			.strip_prefix("https://")
			.or_else(|| url.strip_prefix("http://"))
			.is_some_and(|rest| !rest.trim_matches('/').is_empty());
		if !has_host {
			return Err(SettingsError::Invalid {
				key: "api_base_url".to_string(),
				message: format!("expected an http(s) URL, got '{}'", self.api_base_url),
			});
		}

		if self.request_timeout_secs == 0 {
			return Err(SettingsError::Invalid {
				key: "request_timeout_secs".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}

		Ok(())
	}
}
