//! Merging of configuration sources

use crate::sources::{ConfigSource, SourceError};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("Failed to deserialize settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid setting '{key}': {message}")]
	Invalid { key: String, message: String },
}

/// Collects sources and merges them by priority.
///
/// # Examples
///
/// ```
/// use formflow_conf::builder::SettingsBuilder;
/// use formflow_conf::sources::DefaultSource;
/// use serde_json::Value;
///
/// let merged = SettingsBuilder::new()
///     .add_source(DefaultSource::new().with_value("log_filter", Value::String("info".into())))
///     .build()
///     .unwrap();
/// assert_eq!(merged.get("log_filter"), Some(&Value::String("info".into())));
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Load every source, lowest priority first, so later values win.
	pub fn build(mut self) -> Result<MergedSettings, SettingsError> {
		self.sources.sort_by_key(|source| source.priority());

		let mut values = IndexMap::new();
		for source in &self.sources {
			let loaded = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			tracing::debug!(
				source = %source.description(),
				keys = loaded.len(),
				"Loaded settings source"
			);
			values.extend(loaded);
		}

		Ok(MergedSettings { values })
	}
}

/// The flat result of merging all sources.
#[derive(Debug, Clone, Default)]
pub struct MergedSettings {
	values: IndexMap<String, Value>,
}

impl MergedSettings {
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Deserialize the merged values into a typed settings struct.
	///
	/// Keys the struct does not declare are ignored.
	pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, SettingsError> {
		let object = self.values.into_iter().collect::<serde_json::Map<_, _>>();
		Ok(serde_json::from_value(Value::Object(object))?)
	}
}
