//! # formflow-conf
//!
//! Layered settings for formflow clients.
//!
//! ## Sources
//!
//! | Source | Priority |
//! |--------|----------|
//! | [`EnvSource`] | 100 |
//! | [`TomlFileSource`] | 50 |
//! | [`DefaultSource`] | 0 |
//!
//! ## Example
//!
//! ```no_run
//! use formflow_conf::ClientSettings;
//!
//! let settings = ClientSettings::load(None)?;
//! println!("Using {}", settings.api_base_url);
//! # Ok::<(), formflow_conf::SettingsError>(())
//! ```

pub mod builder;
pub mod client;
pub mod sources;

pub use builder::{MergedSettings, SettingsBuilder, SettingsError};
pub use client::{
	ClientSettings, DEFAULT_API_BASE_URL, DEFAULT_SETTINGS_FILE, ENV_PREFIX,
};
pub use sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};
