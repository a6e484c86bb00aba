//! Account serializers: wire representations and validated inputs.
//!
//! Required string fields default to empty on deserialization so that a
//! missing field surfaces as a field-level validation error rather than a
//! JSON parse error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::models::User;
use crate::auth::TokenPair;

/// Public user representation; never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
	pub id: Uuid,
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl UserResponse {
	pub fn from_model(user: &User) -> Self {
		Self {
			id: user.id,
			email: user.email.clone(),
			first_name: user.first_name.clone(),
			last_name: user.last_name.clone(),
			created_at: user.created_at,
			updated_at: user.updated_at,
		}
	}
}

/// Body of the activation and token-login success responses.
#[derive(Debug, Serialize)]
pub struct UserWithTokenResponse {
	pub user: UserResponse,
	pub token: TokenPair,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserCreateSerializer {
	#[serde(default)]
	#[validate(
		length(min = 1, message = "This field may not be blank."),
		email(message = "Enter a valid email address.")
	)]
	pub email: String,
	#[serde(default)]
	#[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
	pub first_name: String,
	#[serde(default)]
	#[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
	pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserUpdateSerializer {
	#[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
	pub first_name: Option<String>,
	#[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
	pub last_name: Option<String>,
}

/// The signed pair carried by every activation / reset confirmation link.
#[derive(Debug, Deserialize, Validate)]
pub struct UidAndTokenSerializer {
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub uid: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ActivateSerializer {
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub uid: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub token: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResendActivationSerializer {
	#[serde(default)]
	#[validate(
		length(min = 1, message = "This field may not be blank."),
		email(message = "Enter a valid email address.")
	)]
	pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserEmailLoginSerializer {
	#[serde(default)]
	#[validate(
		length(min = 1, message = "This field may not be blank."),
		email(message = "Enter a valid email address.")
	)]
	pub email: String,
	pub redirect_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TokenCreateSerializer {
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub email: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TokenRefreshSerializer {
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub refresh: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TokenVerifySerializer {
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetPasswordSerializer {
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub current_password: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordConfirmSerializer {
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub uid: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub token: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetEmailSerializer {
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub current_password: String,
	#[serde(default)]
	#[validate(
		length(min = 1, message = "This field may not be blank."),
		email(message = "Enter a valid email address.")
	)]
	pub new_email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetEmailConfirmSerializer {
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub uid: String,
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub token: String,
	#[serde(default)]
	#[validate(
		length(min = 1, message = "This field may not be blank."),
		email(message = "Enter a valid email address.")
	)]
	pub new_email: String,
}
