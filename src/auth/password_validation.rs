//! Password strength rules.
//!
//! Each rule contributes one message when violated; callers surface the
//! collected list under the `password` field.

const MIN_LENGTH: usize = 8;

/// Validate a candidate password, optionally against the account email.
///
/// Returns the list of violated-rule messages, empty when the password is
/// acceptable.
pub fn password_violations(password: &str, email: Option<&str>) -> Vec<String> {
	let mut violations = Vec::new();

	if password.chars().count() < MIN_LENGTH {
		violations.push(format!(
			"This password is too short. It must contain at least {} characters.",
			MIN_LENGTH
		));
	}

	if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
		violations.push("This password is entirely numeric.".to_string());
	}

	if let Some(email) = email
		&& too_similar_to_email(password, email)
	{
		violations.push("The password is too similar to the email.".to_string());
	}

	violations
}

fn too_similar_to_email(password: &str, email: &str) -> bool {
	let password = password.to_lowercase();
	let local_part = email.split('@').next().unwrap_or("").to_lowercase();
	if local_part.len() < 3 {
		return false;
	}
	password.contains(&local_part) || local_part.contains(&password)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_acceptable_password_has_no_violations() {
		assert!(password_violations("sturdy-passphrase-42", Some("test@user.com")).is_empty());
	}

	#[rstest]
	fn test_short_password() {
		let violations = password_violations("abc1234", None);

		assert_eq!(violations.len(), 1);
		assert!(violations[0].contains("too short"));
	}

	#[rstest]
	fn test_entirely_numeric_password() {
		let violations = password_violations("1234567890", None);

		assert_eq!(violations, vec!["This password is entirely numeric.".to_string()]);
	}

	#[rstest]
	fn test_password_similar_to_email() {
		let violations = password_violations("john.doe99", Some("john.doe@example.com"));

		assert_eq!(violations, vec!["The password is too similar to the email.".to_string()]);
	}

	#[rstest]
	fn test_short_password_collects_multiple_violations() {
		let violations = password_violations("1234", None);

		assert_eq!(violations.len(), 2);
	}
}
