//! Submitter that stores collected values in a JSON file

use anyhow::Context;
use async_trait::async_trait;
use formflow_forms::{FormSubmitter, FormValues};
use serde_json::json;
use std::path::PathBuf;

/// Writes `{ "formId": ..., "values": {...} }` to a file.
#[derive(Debug, Clone)]
pub struct JsonFileSubmitter {
	path: PathBuf,
}

impl JsonFileSubmitter {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

#[async_trait]
impl FormSubmitter for JsonFileSubmitter {
	async fn submit(&self, form_id: &str, values: &FormValues) -> anyhow::Result<()> {
		let payload = serde_json::to_string_pretty(&json!({
			"formId": form_id,
			"values": values,
		}))?;
		tokio::fs::write(&self.path, payload)
			.await
			.with_context(|| format!("failed to write {}", self.path.display()))?;
		tracing::info!(form_id, path = %self.path.display(), "Saved form data");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use formflow_forms::FieldValue;
	use rstest::rstest;
	use tempfile::TempDir;

	#[rstest]
	#[tokio::test]
	async fn test_writes_form_id_and_values() {
		// Arrange
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("answers.json");
		let mut values = FormValues::new();
		values.insert("name".to_string(), FieldValue::from("Asha"));
		values.insert("agree".to_string(), FieldValue::Bool(true));

		// Act
		JsonFileSubmitter::new(&path)
			.submit("signup", &values)
			.await
			.unwrap();

		// Assert
		let written: serde_json::Value =
			serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
		assert_eq!(
			written,
			json!({ "formId": "signup", "values": { "name": "Asha", "agree": true } })
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unwritable_path_fails() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("missing-dir").join("answers.json");

		let err = JsonFileSubmitter::new(&path)
			.submit("signup", &FormValues::new())
			.await
			.unwrap_err();

		assert!(err.to_string().starts_with("failed to write"));
	}
}
