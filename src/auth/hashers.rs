//! Password hashing.

use crate::exception::{Error, Result};

/// Password hasher seam. The default implementation is Argon2id; the trait
/// exists so tests and future algorithms can swap in.
pub trait PasswordHasher: Send + Sync {
	/// Hash a plaintext password into a PHC-format string.
	fn hash(&self, password: &str) -> Result<String>;

	/// Verify a plaintext password against a stored hash.
	///
	/// An unparseable stored hash verifies as `false` rather than erroring,
	/// so a corrupt row degrades to a failed login.
	fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Argon2id password hasher.
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl Default for Argon2Hasher {
	fn default() -> Self {
		Self::new()
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString},
		};
		use rand::RngCore;

		let mut salt_bytes = [0u8; 16];
		rand::rng().fill_bytes(&mut salt_bytes);
		let salt = SaltString::encode_b64(&salt_bytes)
			.map_err(|e| Error::Internal(format!("salt encoding failed: {e}")))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| Error::Internal(format!("password hashing failed: {e}")))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHash, PasswordVerifier},
		};

		let Ok(parsed_hash) = PasswordHash::new(hash) else {
			return Ok(false);
		};

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}
