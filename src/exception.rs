//! Application error taxonomy and its HTTP mapping.
//!
//! Every failure surfaced to a caller goes through [`Error`]: field-keyed
//! validation problems, conflicting or forbidden state transitions, missing
//! resources, and authentication failures. Database and internal errors are
//! logged and rendered as an opaque 500 body.

use std::collections::BTreeMap;

use hyper::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Per-field validation messages, ordered for stable response bodies.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum Error {
	/// Bad or missing input, surfaced per field as a list of messages.
	#[error("validation failed")]
	Validation(FieldErrors),

	/// A state conflict such as re-activating an already active account.
	/// Rendered as a string-valued single-field body with status 400.
	#[error("{field}: {message}")]
	Conflict { field: String, message: String },

	/// A disallowed state transition, e.g. activating an account that
	/// already holds a password. Same body shape as [`Error::Conflict`]
	/// but with status 403.
	#[error("{field}: {message}")]
	ForbiddenState { field: String, message: String },

	#[error("{0}")]
	NotFound(String),

	/// Bad credentials or an invalid/expired token.
	#[error("{0}")]
	AuthenticationFailed(String),

	/// Malformed request payload (e.g. invalid JSON).
	#[error("{0}")]
	ParseError(String),

	/// The path matched but the method did not.
	#[error("method {0} not allowed")]
	MethodNotAllowed(String),

	#[error(transparent)]
	Database(#[from] sqlx::Error),

	#[error("{0}")]
	Internal(String),
}

impl Error {
	/// Single-field validation error.
	pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
		let mut fields = FieldErrors::new();
		fields.insert(field.into(), vec![message.into()]);
		Error::Validation(fields)
	}

	pub fn conflict(field: impl Into<String>, message: impl Into<String>) -> Self {
		Error::Conflict {
			field: field.into(),
			message: message.into(),
		}
	}

	pub fn forbidden_state(field: impl Into<String>, message: impl Into<String>) -> Self {
		Error::ForbiddenState {
			field: field.into(),
			message: message.into(),
		}
	}

	pub fn not_found() -> Self {
		Error::NotFound("Not found.".to_string())
	}

	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::Validation(_) | Error::Conflict { .. } | Error::ParseError(_) => {
				StatusCode::BAD_REQUEST
			}
			Error::ForbiddenState { .. } => StatusCode::FORBIDDEN,
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
			Error::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
			Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// JSON body for the error response.
	///
	/// Validation errors keep the field -> list shape; state conflicts keep
	/// the original string-valued field shape; everything else is a
	/// `{"detail": ...}` body. Server-side errors never leak details.
	pub fn body(&self) -> Value {
		match self {
			Error::Validation(fields) => json!(fields),
			Error::Conflict { field, message } | Error::ForbiddenState { field, message } => {
				json!({ (field.as_str()): message })
			}
			Error::NotFound(detail) => json!({ "detail": detail }),
			Error::AuthenticationFailed(detail) => json!({ "detail": detail }),
			Error::ParseError(detail) => json!({ "detail": detail }),
			Error::MethodNotAllowed(method) => {
				json!({ "detail": format!("Method \"{}\" not allowed.", method) })
			}
			Error::Database(_) | Error::Internal(_) => {
				json!({ "detail": "Internal server error." })
			}
		}
	}
}

impl From<validator::ValidationErrors> for Error {
	fn from(errors: validator::ValidationErrors) -> Self {
		let mut fields = FieldErrors::new();
		for (field, list) in errors.field_errors() {
			let messages = list
				.iter()
				.map(|e| match &e.message {
					Some(message) => message.clone().into_owned(),
					None => format!("Invalid value for {}.", field),
				})
				.collect();
			fields.insert(field.to_string(), messages);
		}
		Error::Validation(fields)
	}
}

impl From<serde_json::Error> for Error {
	fn from(_: serde_json::Error) -> Self {
		Error::ParseError("JSON parse error".to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_validation_maps_to_400_with_field_lists() {
		let error = Error::validation("email", "This field is required.");

		assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(error.body(), json!({ "email": ["This field is required."] }));
	}

	#[rstest]
	fn test_conflict_keeps_string_valued_body() {
		let error = Error::conflict("user", "This account is already active");

		assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(error.body(), json!({ "user": "This account is already active" }));
	}

	#[rstest]
	fn test_forbidden_state_maps_to_403() {
		let error = Error::forbidden_state("password", "Password already created for this user");

		assert_eq!(error.status_code(), StatusCode::FORBIDDEN);
		assert_eq!(
			error.body(),
			json!({ "password": "Password already created for this user" })
		);
	}

	#[rstest]
	fn test_not_found_detail_body() {
		let error = Error::not_found();

		assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
		assert_eq!(error.body(), json!({ "detail": "Not found." }));
	}

	#[rstest]
	fn test_database_errors_are_opaque() {
		let error = Error::Database(sqlx::Error::RowNotFound);

		assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(error.body(), json!({ "detail": "Internal server error." }));
	}

	#[rstest]
	fn test_method_not_allowed_body() {
		let error = Error::MethodNotAllowed("POST".to_string());

		assert_eq!(error.status_code(), StatusCode::METHOD_NOT_ALLOWED);
		assert_eq!(error.body(), json!({ "detail": "Method \"POST\" not allowed." }));
	}
}
