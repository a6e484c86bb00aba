//! JWT issuance and verification (HS256 access/refresh pairs).

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::exception::{Error, Result};

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

const INVALID_TOKEN_DETAIL: &str = "Token is invalid or expired";

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
	/// User id.
	pub sub: String,
	pub email: String,
	pub token_type: String,
	pub iat: i64,
	pub exp: i64,
}

impl Claims {
	pub fn new(user_id: Uuid, email: &str, token_type: &str, lifetime: Duration) -> Self {
		let now = Utc::now();
		Self {
			sub: user_id.to_string(),
			email: email.to_string(),
			token_type: token_type.to_string(),
			iat: now.timestamp(),
			exp: (now + lifetime).timestamp(),
		}
	}

	pub fn user_id(&self) -> Result<Uuid> {
		self.sub
			.parse()
			.map_err(|_| Error::AuthenticationFailed(INVALID_TOKEN_DETAIL.to_string()))
	}
}

/// Access/refresh pair, in the wire shape the token endpoints return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
	pub refresh: String,
	pub access: String,
}

/// JWT signing and verification handle, configured once from settings.
pub struct JwtAuth {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
	access_lifetime: Duration,
	refresh_lifetime: Duration,
}

impl JwtAuth {
	pub fn new(secret: &[u8], access_lifetime_secs: i64, refresh_lifetime_secs: i64) -> Self {
		let mut validation = Validation::default();
		validation.leeway = 0;
		Self {
			encoding_key: EncodingKey::from_secret(secret),
			decoding_key: DecodingKey::from_secret(secret),
			validation,
			access_lifetime: Duration::seconds(access_lifetime_secs),
			refresh_lifetime: Duration::seconds(refresh_lifetime_secs),
		}
	}

	fn encode(&self, claims: &Claims) -> Result<String> {
		encode(&Header::default(), claims, &self.encoding_key)
			.map_err(|e| Error::Internal(format!("token encoding failed: {e}")))
	}

	/// Decode and validate signature and expiry; the token type is not
	/// checked here.
	pub fn decode(&self, token: &str) -> Result<Claims> {
		decode::<Claims>(token, &self.decoding_key, &self.validation)
			.map(|data| data.claims)
			.map_err(|_| Error::AuthenticationFailed(INVALID_TOKEN_DETAIL.to_string()))
	}

	pub fn access_token(&self, user_id: Uuid, email: &str) -> Result<String> {
		self.encode(&Claims::new(user_id, email, TOKEN_TYPE_ACCESS, self.access_lifetime))
	}

	pub fn refresh_token(&self, user_id: Uuid, email: &str) -> Result<String> {
		self.encode(&Claims::new(
			user_id,
			email,
			TOKEN_TYPE_REFRESH,
			self.refresh_lifetime,
		))
	}

	/// Issue a fresh refresh+access pair for a user.
	pub fn token_pair(&self, user_id: Uuid, email: &str) -> Result<TokenPair> {
		Ok(TokenPair {
			refresh: self.refresh_token(user_id, email)?,
			access: self.access_token(user_id, email)?,
		})
	}

	/// Validate a bearer token: must be a live access token.
	pub fn verify_access(&self, token: &str) -> Result<Claims> {
		self.verify_type(token, TOKEN_TYPE_ACCESS)
	}

	/// Validate a refresh token presented to the refresh endpoint.
	pub fn verify_refresh(&self, token: &str) -> Result<Claims> {
		self.verify_type(token, TOKEN_TYPE_REFRESH)
	}

	fn verify_type(&self, token: &str, expected: &str) -> Result<Claims> {
		let claims = self.decode(token)?;
		if claims.token_type != expected {
			return Err(Error::AuthenticationFailed(format!(
				"Token has wrong type, expected \"{}\"",
				expected
			)));
		}
		Ok(claims)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn jwt() -> JwtAuth {
		JwtAuth::new(b"test-secret", 3600, 7 * 24 * 3600)
	}

	#[rstest]
	fn test_token_pair_roundtrip() {
		let auth = jwt();
		let user_id = Uuid::new_v4();

		let pair = auth.token_pair(user_id, "test@user.com").unwrap();

		let access = auth.verify_access(&pair.access).unwrap();
		assert_eq!(access.user_id().unwrap(), user_id);
		assert_eq!(access.email, "test@user.com");

		let refresh = auth.verify_refresh(&pair.refresh).unwrap();
		assert_eq!(refresh.token_type, TOKEN_TYPE_REFRESH);
	}

	#[rstest]
	fn test_refresh_token_rejected_as_access() {
		let auth = jwt();
		let pair = auth.token_pair(Uuid::new_v4(), "test@user.com").unwrap();

		assert!(auth.verify_access(&pair.refresh).is_err());
		assert!(auth.verify_refresh(&pair.access).is_err());
	}

	#[rstest]
	fn test_expired_token_is_rejected() {
		let auth = JwtAuth::new(b"test-secret", -3600, -3600);
		let token = auth.access_token(Uuid::new_v4(), "test@user.com").unwrap();

		let result = jwt().decode(&token);

		assert!(matches!(result, Err(Error::AuthenticationFailed(_))));
	}

	#[rstest]
	fn test_wrong_secret_is_rejected() {
		let auth = jwt();
		let token = auth.access_token(Uuid::new_v4(), "test@user.com").unwrap();

		let other = JwtAuth::new(b"other-secret", 3600, 3600);
		assert!(other.decode(&token).is_err());
	}

	#[rstest]
	fn test_tampered_token_is_rejected() {
		let auth = jwt();
		let mut token = auth.access_token(Uuid::new_v4(), "test@user.com").unwrap();
		token.push('x');

		assert!(auth.decode(&token).is_err());
	}
}
