//! Subcommand implementations

use crate::prompt::PromptFieldRenderer;
use crate::submit::JsonFileSubmitter;
use anyhow::Context;
use clap::Args;
use colored::Colorize;
use console::style;
use dialoguer::{Input, Select};
use formflow_conf::ClientSettings;
use formflow_forms::{
	EngineEffect, FormDefinition, FormEngine, FormSubmitter, LogSubmitter, Navigation,
	SharedFormEngine, SubmitError, ValidationOptions,
};
use formflow_pages::{
	EMPTY_FORM_MESSAGE, FieldRenderer, FormApiClient, FormPage, NavigationState, PrimaryAction,
	Session, User,
};
use std::path::{Path, PathBuf};

/// Identity used against the form service; missing values are prompted for.
#[derive(Args, Debug, Clone, Default)]
pub struct UserArgs {
	/// Roll number of the user
	#[arg(long, value_name = "ROLL_NUMBER")]
	pub roll_number: Option<String>,

	/// Display name of the user
	#[arg(long, value_name = "NAME")]
	pub name: Option<String>,
}

/// Where a form definition comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct FormSourceArgs {
	/// Read the form definition from a local JSON file instead of the API
	#[arg(long, value_name = "PATH", conflicts_with_all = ["roll_number", "name"])]
	pub file: Option<PathBuf>,

	#[command(flatten)]
	pub user: UserArgs,
}

/// A step the user can take after answering a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
	Previous,
	Next,
	Submit,
}

impl Action {
	fn label(&self) -> &'static str {
		match self {
			Action::Previous => "Previous",
			Action::Next => PrimaryAction::Next.label(),
			Action::Submit => PrimaryAction::Submit.label(),
		}
	}
}

pub async fn run_fetch(
	settings: &ClientSettings,
	user: UserArgs,
	output: Option<PathBuf>,
) -> anyhow::Result<()> {
	let session = Session::login(resolve_user(user)?)?;
	let form = api_client(settings)?.fetch_form(&session).await?;

	print_summary(&form);
	if let Some(path) = output {
		let json = serde_json::to_string_pretty(&form)?;
		std::fs::write(&path, json)
			.with_context(|| format!("failed to write {}", path.display()))?;
		println!("{} {}", "Saved to".green(), path.display());
	}
	Ok(())
}

pub async fn run_register(settings: &ClientSettings, user: UserArgs) -> anyhow::Result<()> {
	let user = resolve_user(user)?;
	let response = api_client(settings)?.create_user(&user).await?;

	println!(
		"{} {}",
		"✓".green().bold(),
		response
			.message
			.unwrap_or_else(|| format!("Registered {}", user.roll_number))
	);
	Ok(())
}

pub fn run_check(path: &Path) -> anyhow::Result<()> {
	let form = read_form_file(path)?;

	println!("{} {}", "✓".green().bold(), format!("{} is a valid form", path.display()).green());
	for warning in form.lint() {
		println!("{} {}", "!".yellow().bold(), warning.to_string().yellow());
	}
	print_summary(&form);
	Ok(())
}

pub async fn run_render(
	settings: &ClientSettings,
	source: FormSourceArgs,
	output: Option<PathBuf>,
) -> anyhow::Result<()> {
	let form = load_form(settings, source, false).await?;
	let html = render_page(form, validation_options(settings));

	match output {
		Some(path) => {
			std::fs::write(&path, &html)
				.with_context(|| format!("failed to write {}", path.display()))?;
			println!("{} {}", "Rendered to".green(), path.display());
		}
		None => println!("{}", html),
	}
	Ok(())
}

/// Fill in a form interactively, section by section, and submit it.
///
/// Values go to `output` as JSON when given, otherwise to the log.
pub async fn run_fill(
	settings: &ClientSettings,
	source: FormSourceArgs,
	output: Option<PathBuf>,
) -> anyhow::Result<()> {
	let form = load_form(settings, source, true).await?;
	let engine =
		SharedFormEngine::new(FormEngine::new(form).with_options(validation_options(settings)));
	let submitter: Box<dyn FormSubmitter> = match output {
		Some(path) => Box::new(JsonFileSubmitter::new(path)),
		None => Box::new(LogSubmitter),
	};
	let renderer = PromptFieldRenderer;

	// Fields still to ask for in the current section; `None` means all of them.
	let mut pending: Option<Vec<String>> = None;

	loop {
		let snapshot = engine.snapshot();
		let page = FormPage::new(&snapshot);
		let Some(section) = page.section() else {
			println!("{}", EMPTY_FORM_MESSAGE.yellow());
			return Ok(());
		};

		println!();
		println!("{}", style(page.title()).cyan().bold());
		println!("{}", style(page.meta_line()).dim());
		if let Some(step) = page.step_label() {
			println!("{}", style(step).dim());
		}
		println!("{}", style(&section.section().title).bold());
		if !section.section().description.is_empty() {
			println!("{}", section.section().description);
		}

		for props in section.field_props() {
			if let Some(fields) = &pending
				&& !fields.contains(&props.field.field_id)
			{
				continue;
			}
			let event = renderer.render_field(&props)?;
			engine.handle_change(&event);
		}
		pending = None;

		let navigation = NavigationState::from_snapshot(&engine.snapshot());
		match choose_action(&navigation)? {
			Action::Previous => {
				engine.go_to_previous_section();
			}
			Action::Next => {
				if let Navigation::Blocked { invalid_fields } = engine.go_to_next_section() {
					println!(
						"{}",
						format!("{} field(s) need attention", invalid_fields).yellow()
					);
					pending = Some(invalid_field_ids(&engine));
				}
			}
			Action::Submit => match engine.submit(submitter.as_ref()).await {
				Ok(()) => {
					report_effects(&engine);
					println!("{}", "✓ Form submitted successfully!".green().bold());
					return Ok(());
				}
				Err(SubmitError::Invalid { errors, .. }) => {
					pending = Some(errors.into_keys().collect());
				}
				Err(err) => {
					report_effects(&engine);
					return Err(err.into());
				}
			},
		}

		report_effects(&engine);
	}
}

fn report_effects(engine: &SharedFormEngine) {
	for effect in engine.take_effects() {
		match effect {
			EngineEffect::Notice(message) => println!("{}", message.yellow().bold()),
			EngineEffect::ScrollToTop => println!(),
			EngineEffect::SubmissionSettled { succeeded } => {
				tracing::debug!(succeeded, "Submission settled");
			}
		}
	}
}

fn invalid_field_ids(engine: &SharedFormEngine) -> Vec<String> {
	engine.with(|engine| {
		engine
			.errors()
			.iter()
			.filter(|(_, error)| error.is_some())
			.map(|(field_id, _)| field_id.clone())
			.collect()
	})
}

/// Actions offered for the given navigation controls, primary first.
///
/// A disabled primary action is still offered: choosing it reports the
/// invalid fields instead of moving on.
fn available_actions(navigation: &NavigationState) -> Vec<Action> {
	let mut actions = vec![match navigation.primary_action {
		PrimaryAction::Next => Action::Next,
		PrimaryAction::Submit => Action::Submit,
	}];
	if navigation.previous.visible && !navigation.previous.disabled {
		actions.push(Action::Previous);
	}
	actions
}

fn choose_action(navigation: &NavigationState) -> dialoguer::Result<Action> {
	let actions = available_actions(navigation);
	if actions.len() == 1 {
		return Ok(actions[0]);
	}

	let labels: Vec<&str> = actions.iter().map(Action::label).collect();
	let index = Select::new()
		.with_prompt("Continue")
		.items(&labels[..])
		.default(0)
		.interact()?;
	Ok(actions[index])
}

fn render_page(form: FormDefinition, options: ValidationOptions) -> String {
	let engine = FormEngine::new(form).with_options(options);
	let snapshot = engine.snapshot();
	FormPage::new(&snapshot).render_html()
}

fn validation_options(settings: &ClientSettings) -> ValidationOptions {
	if settings.strict_date_validation {
		ValidationOptions::strict()
	} else {
		ValidationOptions::default()
	}
}

fn api_client(settings: &ClientSettings) -> anyhow::Result<FormApiClient> {
	Ok(FormApiClient::new(
		&settings.api_base_url,
		settings.request_timeout(),
	)?)
}

/// Load a form from a file or the API.
///
/// With `register`, the user is signed in first (registering when new).
async fn load_form(
	settings: &ClientSettings,
	source: FormSourceArgs,
	register: bool,
) -> anyhow::Result<FormDefinition> {
	if let Some(path) = source.file {
		return read_form_file(&path);
	}

	let user = resolve_user(source.user)?;
	let client = api_client(settings)?;
	let session = if register {
		client.sign_in(user).await?
	} else {
		Session::login(user)?
	};
	Ok(client.fetch_form(&session).await?)
}

fn read_form_file(path: &Path) -> anyhow::Result<FormDefinition> {
	let json = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read {}", path.display()))?;
	FormDefinition::from_json(&json).with_context(|| format!("invalid form in {}", path.display()))
}

fn resolve_user(args: UserArgs) -> anyhow::Result<User> {
	let roll_number = match args.roll_number {
		Some(roll_number) => roll_number,
		None => Input::<String>::new().with_prompt("Roll Number").interact_text()?,
	};
	let name = match args.name {
		Some(name) => name,
		None => Input::<String>::new().with_prompt("Name").interact_text()?,
	};
	Ok(User::new(roll_number, name))
}

fn print_summary(form: &FormDefinition) {
	println!("{}", form.form_title.bold());
	println!("  Form ID: {}", form.form_id.yellow());
	println!("  Version: {}", form.version.yellow());
	for (index, section) in form.sections.iter().enumerate() {
		println!(
			"  {}. {} {}",
			index + 1,
			section.title.bold(),
			format!("({} fields)", section.fields.len()).dimmed()
		);
		for field in &section.fields {
			let marker = if field.required { "*" } else { "" };
			println!(
				"     - {}{} [{}]",
				field.label,
				marker.red(),
				field.field_type.as_str().cyan()
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use formflow_forms::{FieldSchema, FieldType, Section};
	use rstest::rstest;
	use std::fs;
	use tempfile::TempDir;

	fn nav(is_first: bool, is_last: bool, submitting: bool) -> NavigationState {
		let mut form = FormDefinition::new("f", "F", "1");
		for id in 1..=3i64 {
			form = form.with_section(Section::new(id, format!("S{}", id)));
		}
		let mut engine = FormEngine::new(form);
		let target = match (is_first, is_last) {
			(true, _) => 0,
			(false, false) => 1,
			(false, true) => 2,
		};
		for _ in 0..target {
			engine.go_to_next_section();
		}
		let mut snapshot = engine.snapshot();
		snapshot.is_submitting = submitting;
		NavigationState::from_snapshot(&snapshot)
	}

	#[rstest]
	#[case(true, false, false, vec![Action::Next])]
	#[case(false, false, false, vec![Action::Next, Action::Previous])]
	#[case(false, true, false, vec![Action::Submit, Action::Previous])]
	#[case(false, true, true, vec![Action::Submit])]
	fn test_available_actions(
		#[case] is_first: bool,
		#[case] is_last: bool,
		#[case] submitting: bool,
		#[case] expected: Vec<Action>,
	) {
		let navigation = nav(is_first, is_last, submitting);

		assert_eq!(available_actions(&navigation), expected);
	}

	#[rstest]
	fn test_read_form_file_reports_path_on_invalid_schema() {
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("form.json");
		fs::write(&path, r#"{"formTitle": "T", "formId": "t"}"#).unwrap();

		let err = read_form_file(&path).unwrap_err();

		assert!(err.to_string().starts_with("invalid form in"));
	}

	#[rstest]
	fn test_check_accepts_form_with_lint_warnings() {
		// Arrange
		let temp_dir = TempDir::new().unwrap();
		let path = temp_dir.path().join("form.json");
		fs::write(
			&path,
			r#"{
				"formTitle": "T", "formId": "t", "version": "1",
				"sections": [{
					"sectionId": 1, "title": "A", "description": "",
					"fields": [{ "fieldId": "pick", "type": "radio", "label": "Pick" }]
				}]
			}"#,
		)
		.unwrap();

		// Act
		let form = read_form_file(&path).unwrap();

		// Assert
		assert_eq!(form.lint().len(), 1);
		assert!(run_check(&path).is_ok());
	}

	#[rstest]
	fn test_render_page_for_local_form() {
		let form = FormDefinition::new("contact", "Contact Us", "3").with_section(
			Section::new(1, "Details")
				.with_field(FieldSchema::new("email", FieldType::Email, "Email").required(true)),
		);

		let html = render_page(form, ValidationOptions::default());

		assert!(html.contains("<h1>Contact Us</h1>"));
		assert!(html.contains(r#"type="email""#));
		assert!(html.contains(r#"data-action="submit""#));
	}

	#[rstest]
	fn test_render_page_for_empty_form() {
		let html = render_page(
			FormDefinition::new("empty", "Empty", "1"),
			ValidationOptions::default(),
		);

		assert!(html.contains(EMPTY_FORM_MESSAGE));
	}
}
