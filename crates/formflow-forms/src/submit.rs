//! Submission collaborators
//!
//! The engine does not know where collected values go. A [`FormSubmitter`]
//! receives the form id and the complete value map once the final section
//! validates.

use crate::value::FormValues;
use async_trait::async_trait;

/// Receives the values of a validated form.
#[async_trait]
pub trait FormSubmitter: Send + Sync {
	async fn submit(&self, form_id: &str, values: &FormValues) -> anyhow::Result<()>;
}

/// Submitter that writes the collected values to the log and always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSubmitter;

#[async_trait]
impl FormSubmitter for LogSubmitter {
	async fn submit(&self, form_id: &str, values: &FormValues) -> anyhow::Result<()> {
		let payload = serde_json::to_string_pretty(values)?;
		tracing::info!(form_id, "Collected form data:\n{}", payload);
		Ok(())
	}
}

/// Submitter backed by a synchronous closure.
///
/// # Examples
///
/// ```
/// use formflow_forms::{FnSubmitter, FormSubmitter, FormValues};
///
/// let submitter = FnSubmitter::new(|form_id: &str, _values: &FormValues| {
///     anyhow::ensure!(form_id == "signup", "unexpected form");
///     Ok(())
/// });
/// let _: &dyn FormSubmitter = &submitter;
/// ```
pub struct FnSubmitter<F> {
	submit: F,
}

impl<F> FnSubmitter<F>
where
	F: Fn(&str, &FormValues) -> anyhow::Result<()> + Send + Sync,
{
	pub fn new(submit: F) -> Self {
		Self { submit }
	}
}

#[async_trait]
impl<F> FormSubmitter for FnSubmitter<F>
where
	F: Fn(&str, &FormValues) -> anyhow::Result<()> + Send + Sync,
{
	async fn submit(&self, form_id: &str, values: &FormValues) -> anyhow::Result<()> {
		(self.submit)(form_id, values)
	}
}
