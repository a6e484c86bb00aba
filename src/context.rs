//! Application context: everything a handler needs, built once at startup
//! and passed by `Arc` — no ambient globals.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{ActivationTokenGenerator, Argon2Hasher, JwtAuth, PasswordHasher};
use crate::config::settings::Settings;
use crate::mail::{ConsoleEmailBackend, EmailBackend};

pub struct AppContext {
	pub settings: Settings,
	pub pool: PgPool,
	pub hasher: Arc<dyn PasswordHasher>,
	pub jwt: JwtAuth,
	pub activation_tokens: ActivationTokenGenerator,
	pub mailer: Arc<dyn EmailBackend>,
}

impl AppContext {
	pub fn new(settings: Settings, pool: PgPool, mailer: Arc<dyn EmailBackend>) -> Self {
		let jwt = JwtAuth::new(
			settings.secret_key.as_bytes(),
			settings.access_token_lifetime_secs,
			settings.refresh_token_lifetime_secs,
		);
		let activation_tokens = ActivationTokenGenerator::new(
			settings.secret_key.as_bytes(),
			settings.activation_token_timeout_secs,
		);
		Self {
			settings,
			pool,
			hasher: Arc::new(Argon2Hasher::new()),
			jwt,
			activation_tokens,
			mailer,
		}
	}

	/// Context over default settings and a lazy pool; no connection is
	/// opened until a query runs. Unit tests that never touch the database
	/// use this directly.
	#[cfg(test)]
	pub fn for_tests() -> Self {
		let settings = Settings::default();
		let pool = crate::db::lazy_pool(&settings.database_url)
			.unwrap_or_else(|_| panic!("default database url must parse"));
		Self::new(settings, pool, Arc::new(ConsoleEmailBackend))
	}
}
