//! Terminal prompts for form fields

use console::style;
use dialoguer::{Confirm, Input, Select};
use formflow_forms::{ChangeEvent, FieldOption};
use formflow_pages::{Control, FieldProps, FieldRenderer};

/// Asks for one field at a time and reports the answer as a change event.
///
/// The current value is offered as the starting point, so re-prompting an
/// invalid field lets the user edit what they typed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptFieldRenderer;

impl FieldRenderer for PromptFieldRenderer {
	type Output = dialoguer::Result<ChangeEvent>;

	fn render_field(&self, props: &FieldProps<'_>) -> Self::Output {
		let field = props.field;
		if let Some(error) = props.error {
			println!("  {}", style(error).red());
		}
		let prompt = prompt_label(props);

		match props.control() {
			Control::Input { value, .. } | Control::Textarea { value, .. } => {
				let text = Input::<String>::new()
					.with_prompt(prompt)
					.with_initial_text(value)
					.allow_empty(true)
					.interact_text()?;
				Ok(ChangeEvent::input(&field.field_id, text))
			}
			Control::Select { options, selected } => {
				let value = choose(&prompt, options, Some(selected))?;
				Ok(ChangeEvent::input(&field.field_id, value))
			}
			Control::RadioGroup { options, selected } => {
				let value = choose(&prompt, options, selected)?;
				Ok(ChangeEvent::input(&field.field_id, value))
			}
			Control::Checkbox { checked } => {
				let checked = Confirm::new()
					.with_prompt(prompt)
					.default(checked)
					.interact()?;
				Ok(ChangeEvent::checkbox(&field.field_id, checked))
			}
		}
	}
}

/// Let the user pick an option and return its value.
///
/// A choice field without options has nothing to pick and yields an empty
/// value, which the engine then reports like any other missing answer.
fn choose<'a>(
	prompt: &str,
	options: &'a [FieldOption],
	selected: Option<&str>,
) -> dialoguer::Result<&'a str> {
	if options.is_empty() {
		println!("  {}", style(format!("{}: no options available", prompt)).yellow());
		return Ok("");
	}

	let labels: Vec<&str> = options.iter().map(|option| option.label.as_str()).collect();
	let index = Select::new()
		.with_prompt(prompt)
		.items(&labels[..])
		.default(default_index(options, selected))
		.interact()?;
	Ok(options[index].value.as_str())
}

/// Label shown before the input, with the required marker and any hints.
fn prompt_label(props: &FieldProps<'_>) -> String {
	let field = props.field;
	let mut label = field.label.clone();
	if field.required {
		label.push_str(" *");
	}

	let hint = match props.control() {
		Control::Input {
			min_length,
			max_length,
			..
		}
		| Control::Textarea {
			min_length,
			max_length,
			..
		} => length_hint(min_length, max_length),
		_ => None,
	}
	.or_else(|| field.placeholder.clone());

	if let Some(hint) = hint {
		label.push_str(&format!(" ({})", hint));
	}
	label
}

fn length_hint(min_length: Option<usize>, max_length: Option<usize>) -> Option<String> {
	match (min_length, max_length) {
		(Some(min), Some(max)) => Some(format!("{}-{} characters", min, max)),
		(Some(min), None) => Some(format!("at least {} characters", min)),
		(None, Some(max)) => Some(format!("at most {} characters", max)),
		(None, None) => None,
	}
}

/// Index of the selected option, or the first option.
fn default_index(options: &[FieldOption], selected: Option<&str>) -> usize {
	selected
		.and_then(|value| options.iter().position(|option| option.value == value))
		.unwrap_or(0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use formflow_forms::{FieldSchema, FieldType};
	use rstest::rstest;

	fn options() -> Vec<FieldOption> {
		vec![
			FieldOption::new("s", "Small"),
			FieldOption::new("m", "Medium"),
			FieldOption::new("l", "Large"),
		]
	}

	#[rstest]
	#[case(Some("m"), 1)]
	#[case(Some("l"), 2)]
	#[case(Some("xl"), 0)]
	#[case(Some(""), 0)]
	#[case(None, 0)]
	fn test_default_index(#[case] selected: Option<&str>, #[case] expected: usize) {
		assert_eq!(default_index(&options(), selected), expected);
	}

	#[rstest]
	fn test_prompt_label_for_required_text_with_bounds() {
		let field = FieldSchema::new("bio", FieldType::Textarea, "Bio")
			.required(true)
			.with_min_length(10)
			.with_max_length(200);
		let props = FieldProps::new(&field, None, None);

		assert_eq!(prompt_label(&props), "Bio * (10-200 characters)");
	}

	#[rstest]
	fn test_prompt_label_falls_back_to_placeholder() {
		let field = FieldSchema::new("size", FieldType::Dropdown, "Size")
			.with_placeholder("Pick a size")
			.with_options(options());
		let props = FieldProps::new(&field, None, None);

		assert_eq!(prompt_label(&props), "Size (Pick a size)");
	}

	#[rstest]
	#[case(None, Some(40), "at most 40 characters")]
	#[case(Some(3), None, "at least 3 characters")]
	fn test_length_hint(
		#[case] min_length: Option<usize>,
		#[case] max_length: Option<usize>,
		#[case] expected: &str,
	) {
		assert_eq!(length_hint(min_length, max_length).as_deref(), Some(expected));
	}
}
