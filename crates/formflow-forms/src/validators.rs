//! Validation rule library
//!
//! Stateless predicates over raw field values. Each rule answers pass/fail
//! only; turning a failure into a user-facing message is the job of
//! [`crate::field::validate_field`].
//!
//! Format rules (`email`, `phone`, `date`, `numeric`) treat an empty value as
//! passing. Whether a field must be filled in is decided by [`is_present`]
//! alone.

use crate::value::FieldValue;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

// local@domain.tld with an alphabetic TLD of at least two letters.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
		.expect("EMAIL_REGEX: invalid regex pattern")
});

// Optional leading '+', then digits, whitespace, parentheses and hyphens.
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\+?[0-9\s()\-]+$").expect("PHONE_REGEX: invalid regex pattern")
});

static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("DATE_REGEX: invalid regex pattern")
});

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether a value counts as filled in.
///
/// Fails for an absent value, for text that is empty after trimming
/// whitespace, and for an empty list. Booleans are always present, including
/// `false`.
///
/// # Examples
///
/// ```
/// use formflow_forms::FieldValue;
/// use formflow_forms::validators::is_present;
///
/// assert!(!is_present(None));
/// assert!(!is_present(Some(&FieldValue::from("   "))));
/// assert!(is_present(Some(&FieldValue::from(false))));
/// ```
pub fn is_present(value: Option<&FieldValue>) -> bool {
	match value {
		None => false,
		Some(FieldValue::Text(text)) => !text.trim().is_empty(),
		Some(FieldValue::List(items)) => !items.is_empty(),
		Some(FieldValue::Bool(_)) => true,
	}
}

/// Whether text has at least `min_length` characters.
///
/// A missing or empty value is valid only when `min_length` is zero.
pub fn has_min_length(value: Option<&str>, min_length: usize) -> bool {
	match value {
		None | Some("") => min_length == 0,
		Some(text) => text.chars().count() >= min_length,
	}
}

/// Whether text has at most `max_length` characters. A missing value is valid.
pub fn has_max_length(value: Option<&str>, max_length: usize) -> bool {
	match value {
		None => true,
		Some(text) => text.chars().count() <= max_length,
	}
}

/// Whether text looks like `local@domain.tld`. Empty passes.
///
/// # Examples
///
/// ```
/// use formflow_forms::validators::is_valid_email;
///
/// assert!(is_valid_email(Some("jane.doe+news@example.co.uk")));
/// assert!(is_valid_email(Some("")));
/// assert!(!is_valid_email(Some("not-an-email")));
/// ```
pub fn is_valid_email(value: Option<&str>) -> bool {
	match value {
		None | Some("") => true,
		Some(text) => EMAIL_REGEX.is_match(text),
	}
}

/// Whether text is a plausible phone number. Empty passes.
pub fn is_valid_phone(value: Option<&str>) -> bool {
	match value {
		None | Some("") => true,
		Some(text) => PHONE_REGEX.is_match(text),
	}
}

/// Whether text is a real calendar date written as `YYYY-MM-DD`. Empty passes.
///
/// The text must match the pattern literally and must round-trip through the
/// parsed date unchanged, which rejects impossible dates such as `2023-02-30`.
///
/// # Examples
///
/// ```
/// use formflow_forms::validators::is_valid_date;
///
/// assert!(is_valid_date(Some("2024-02-29")));
/// assert!(!is_valid_date(Some("2023-02-30")));
/// assert!(!is_valid_date(Some("2023-2-3")));
/// ```
pub fn is_valid_date(value: Option<&str>) -> bool {
	let text = match value {
		None | Some("") => return true,
		Some(text) => text,
	};

	if !DATE_REGEX.is_match(text) {
		return false;
	}

	match NaiveDate::parse_from_str(text, DATE_FORMAT) {
		Ok(date) => date.format(DATE_FORMAT).to_string() == text,
		Err(_) => false,
	}
}

/// Whether text parses as a finite number. Blank text passes.
pub fn is_numeric(value: Option<&str>) -> bool {
	let trimmed = match value {
		None => return true,
		Some(text) => text.trim(),
	};

	if trimmed.is_empty() {
		return true;
	}

	trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Whether a number lies within the optional inclusive bounds.
///
/// A missing value passes; `NaN` never does.
pub fn is_in_range(value: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
	let Some(number) = value else {
		return true;
	};

	if number.is_nan() {
		return false;
	}
	if min.is_some_and(|min| number < min) {
		return false;
	}
	if max.is_some_and(|max| number > max) {
		return false;
	}
	true
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	// =========================================================================
	// is_present
	// =========================================================================

	#[rstest]
	#[case(None)]
	#[case(Some(FieldValue::from("")))]
	#[case(Some(FieldValue::from(" \t\n")))]
	#[case(Some(FieldValue::List(vec![])))]
	fn test_is_present_rejects_empty(#[case] value: Option<FieldValue>) {
		assert!(!is_present(value.as_ref()));
	}

	#[rstest]
	#[case(FieldValue::from("a"))]
	#[case(FieldValue::from("  padded  "))]
	#[case(FieldValue::from(false))]
	#[case(FieldValue::from(true))]
	#[case(FieldValue::List(vec!["x".to_string()]))]
	fn test_is_present_accepts_filled(#[case] value: FieldValue) {
		assert!(is_present(Some(&value)));
	}

	// =========================================================================
	// length rules
	// =========================================================================

	#[rstest]
	#[case(None, 0, true)]
	#[case(None, 1, false)]
	#[case(Some(""), 0, true)]
	#[case(Some(""), 3, false)]
	#[case(Some("ab"), 3, false)]
	#[case(Some("abc"), 3, true)]
	#[case(Some("héé"), 3, true)]
	fn test_has_min_length(#[case] value: Option<&str>, #[case] min: usize, #[case] expected: bool) {
		assert_eq!(has_min_length(value, min), expected);
	}

	#[rstest]
	#[case(None, 0, true)]
	#[case(Some(""), 0, true)]
	#[case(Some("abc"), 3, true)]
	#[case(Some("abcd"), 3, false)]
	#[case(Some("ééé"), 3, true)]
	fn test_has_max_length(#[case] value: Option<&str>, #[case] max: usize, #[case] expected: bool) {
		assert_eq!(has_max_length(value, max), expected);
	}

	// =========================================================================
	// format rules
	// =========================================================================

	#[rstest]
	#[case("user@example.com")]
	#[case("first.last@sub.example.org")]
	#[case("a_b%c+d-e@x-y.io")]
	fn test_is_valid_email_valid(#[case] email: &str) {
		assert!(is_valid_email(Some(email)), "Expected '{email}' to be a valid email");
	}

	#[rstest]
	#[case("not-an-email")]
	#[case("user@")]
	#[case("@example.com")]
	#[case("user@example")]
	#[case("user@example.c")]
	#[case("user name@example.com")]
	#[case("user@example.c0m")]
	fn test_is_valid_email_invalid(#[case] email: &str) {
		assert!(!is_valid_email(Some(email)), "Expected '{email}' to be an invalid email");
	}

	#[rstest]
	#[case("+1 (555) 123-4567")]
	#[case("5551234567")]
	#[case("-")]
	#[case("+44 20 7946 0958")]
	fn test_is_valid_phone_valid(#[case] phone: &str) {
		assert!(is_valid_phone(Some(phone)), "Expected '{phone}' to be a valid phone");
	}

	#[rstest]
	#[case("+")]
	#[case("555-CALL-NOW")]
	#[case("++1 555")]
	#[case("555.123.4567")]
	fn test_is_valid_phone_invalid(#[case] phone: &str) {
		assert!(!is_valid_phone(Some(phone)), "Expected '{phone}' to be an invalid phone");
	}

	#[rstest]
	#[case("2024-02-29", true)]
	#[case("1999-12-31", true)]
	#[case("2023-02-29", false)]
	#[case("2023-02-30", false)]
	#[case("2023-13-01", false)]
	#[case("2023-1-01", false)]
	#[case("01/02/2023", false)]
	#[case("2023-01-01T00:00", false)]
	fn test_is_valid_date(#[case] date: &str, #[case] expected: bool) {
		assert_eq!(is_valid_date(Some(date)), expected, "date: {date}");
	}

	#[rstest]
	fn test_format_rules_pass_empty() {
		let rules: [fn(Option<&str>) -> bool; 4] =
			[is_valid_email, is_valid_phone, is_valid_date, is_numeric];

		for rule in rules {
			assert!(rule(None));
			assert!(rule(Some("")));
		}
	}

	// =========================================================================
	// numeric rules
	// =========================================================================

	#[rstest]
	#[case("42", true)]
	#[case(" -3.5 ", true)]
	#[case("1e3", true)]
	#[case("abc", false)]
	#[case("inf", false)]
	#[case("NaN", false)]
	fn test_is_numeric(#[case] value: &str, #[case] expected: bool) {
		assert_eq!(is_numeric(Some(value)), expected);
	}

	#[rstest]
	#[case(None, Some(1.0), Some(2.0), true)]
	#[case(Some(1.5), Some(1.0), Some(2.0), true)]
	#[case(Some(0.5), Some(1.0), None, false)]
	#[case(Some(2.5), None, Some(2.0), false)]
	#[case(Some(f64::NAN), None, None, false)]
	#[case(Some(100.0), None, None, true)]
	fn test_is_in_range(
		#[case] value: Option<f64>,
		#[case] min: Option<f64>,
		#[case] max: Option<f64>,
		#[case] expected: bool,
	) {
		assert_eq!(is_in_range(value, min, max), expected);
	}
}
