//! Notification messages for the account lifecycle.
//!
//! Delivery itself is out of scope; these builders compose the message and
//! the signed link, then hand it to the configured [`EmailBackend`]
//! collaborator.

use crate::config::settings::Settings;
use crate::mail::Email;

use super::models::User;

pub fn activation_email(settings: &Settings, user: &User, token: &str) -> Email {
	let link = format!("{}/activate/{}/{}", settings.frontend_url, user.id, token);
	Email::new(
		&user.email,
		"Activate your account",
		format!("Follow this link to choose a password and activate your account:\n\n{link}\n"),
	)
}

pub fn password_reset_email(settings: &Settings, user: &User, token: &str) -> Email {
	let link = format!(
		"{}/password-reset/{}/{}",
		settings.frontend_url, user.id, token
	);
	Email::new(
		&user.email,
		"Reset your password",
		format!("Follow this link to choose a new password:\n\n{link}\n"),
	)
}

pub fn email_change_email(settings: &Settings, user: &User, token: &str) -> Email {
	let link = format!("{}/email-reset/{}/{}", settings.frontend_url, user.id, token);
	Email::new(
		&user.email,
		"Change your email address",
		format!("Follow this link to set a new email address:\n\n{link}\n"),
	)
}

pub fn login_link_email(
	settings: &Settings,
	user: &User,
	token: &str,
	redirect_url: Option<&str>,
) -> Email {
	let mut link = format!("{}/login/{}/{}", settings.frontend_url, user.id, token);
	if let Some(redirect) = redirect_url.filter(|r| !r.is_empty()) {
		link.push_str("?next=");
		link.push_str(redirect);
	}
	Email::new(
		&user.email,
		"Your login link",
		format!("Follow this link to sign in:\n\n{link}\n"),
	)
}
