//! User model and queries.
//!
//! Emails are normalized to lowercase on the way in and unique
//! case-insensitively (enforced by a `lower(email)` unique index). Accounts
//! are created inactive and without a password; activation sets both.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::TokenState;
use crate::db;
use crate::exception::{Error, Result};

pub const EMAIL_TAKEN_MESSAGE: &str = "A user with that email address already exists.";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
	pub id: Uuid,
	pub email: String,
	/// Argon2 hash; NULL until the account has been activated.
	pub password: Option<String>,
	pub first_name: String,
	pub last_name: String,
	pub is_active: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Lowercase an email for storage and lookups.
pub fn normalize_email(email: &str) -> String {
	email.trim().to_lowercase()
}

impl User {
	/// The account state an activation/reset token is bound to.
	pub fn token_state(&self) -> TokenState<'_> {
		TokenState {
			user_id: self.id,
			password: self.password.as_deref(),
			is_active: self.is_active,
		}
	}

	/// Insert a new inactive, passwordless account.
	pub async fn create(
		pool: &PgPool,
		email: &str,
		first_name: &str,
		last_name: &str,
	) -> Result<User> {
		sqlx::query_as::<_, User>(
			"INSERT INTO users (id, email, first_name, last_name, is_active) \
			 VALUES ($1, $2, $3, $4, FALSE) RETURNING *",
		)
		.bind(Uuid::new_v4())
		.bind(normalize_email(email))
		.bind(first_name)
		.bind(last_name)
		.fetch_one(pool)
		.await
		.map_err(map_write_error)
	}

	pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
		sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
			.bind(id)
			.fetch_optional(pool)
			.await
			.map_err(Error::from)
	}

	/// Case-insensitive email lookup.
	pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
		sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
			.bind(email.trim())
			.fetch_optional(pool)
			.await
			.map_err(Error::from)
	}

	pub async fn find_inactive_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
		sqlx::query_as::<_, User>(
			"SELECT * FROM users WHERE lower(email) = lower($1) AND is_active = FALSE",
		)
		.bind(email.trim())
		.fetch_optional(pool)
		.await
		.map_err(Error::from)
	}

	/// Set the password hash and flip the account active, in one write.
	pub async fn set_password_and_activate(
		pool: &PgPool,
		id: Uuid,
		password_hash: &str,
	) -> Result<User> {
		sqlx::query_as::<_, User>(
			"UPDATE users SET password = $2, is_active = TRUE, updated_at = now() \
			 WHERE id = $1 RETURNING *",
		)
		.bind(id)
		.bind(password_hash)
		.fetch_one(pool)
		.await
		.map_err(Error::from)
	}

	pub async fn set_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<User> {
		sqlx::query_as::<_, User>(
			"UPDATE users SET password = $2, updated_at = now() WHERE id = $1 RETURNING *",
		)
		.bind(id)
		.bind(password_hash)
		.fetch_one(pool)
		.await
		.map_err(Error::from)
	}

	pub async fn set_email(pool: &PgPool, id: Uuid, email: &str) -> Result<User> {
		sqlx::query_as::<_, User>(
			"UPDATE users SET email = $2, updated_at = now() WHERE id = $1 RETURNING *",
		)
		.bind(id)
		.bind(normalize_email(email))
		.fetch_one(pool)
		.await
		.map_err(map_write_error)
	}

	/// Partial update of the profile names; `None` leaves a field untouched.
	pub async fn update_names(
		pool: &PgPool,
		id: Uuid,
		first_name: Option<&str>,
		last_name: Option<&str>,
	) -> Result<User> {
		sqlx::query_as::<_, User>(
			"UPDATE users SET first_name = COALESCE($2, first_name), \
			 last_name = COALESCE($3, last_name), updated_at = now() \
			 WHERE id = $1 RETURNING *",
		)
		.bind(id)
		.bind(first_name)
		.bind(last_name)
		.fetch_one(pool)
		.await
		.map_err(Error::from)
	}
}

fn map_write_error(error: sqlx::Error) -> Error {
	match db::unique_violation(&error).as_deref() {
		Some("users_email_ci_key") => Error::validation("email", EMAIL_TAKEN_MESSAGE),
		_ => Error::from(error),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("A@X.com", "a@x.com")]
	#[case("  Test@User.COM  ", "test@user.com")]
	#[case("already@lower.case", "already@lower.case")]
	fn test_normalize_email(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(normalize_email(input), expected);
	}
}
