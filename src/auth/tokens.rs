//! Signed, time-limited tokens for activation and password-reset links.
//!
//! A token proves control of an email address at a point in time. It is
//! derived from account state (id, password hash, active flag) and a
//! timestamp, MAC'd with the application secret. Activating the account or
//! changing the password changes the state and thereby invalidates every
//! outstanding token, without any storage.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Account state a token is bound to.
#[derive(Debug, Clone, Copy)]
pub struct TokenState<'a> {
	pub user_id: Uuid,
	/// Stored password hash, if any.
	pub password: Option<&'a str>,
	pub is_active: bool,
}

pub struct ActivationTokenGenerator {
	secret: Vec<u8>,
	timeout_secs: i64,
}

impl ActivationTokenGenerator {
	pub fn new(secret: &[u8], timeout_secs: i64) -> Self {
		Self {
			secret: secret.to_vec(),
			timeout_secs,
		}
	}

	/// Produce a token of the form `<base36 timestamp>-<hex mac>`.
	pub fn make_token(&self, state: TokenState<'_>) -> String {
		let timestamp = Utc::now().timestamp();
		self.make_token_at(state, timestamp)
	}

	fn make_token_at(&self, state: TokenState<'_>, timestamp: i64) -> String {
		format!(
			"{}-{}",
			base36_encode(timestamp),
			hex_encode(&self.mac(state, timestamp))
		)
	}

	/// Check a token against current account state and the configured
	/// timeout. Comparison of the MAC is constant-time.
	pub fn check_token(&self, state: TokenState<'_>, token: &str) -> bool {
		let Some((ts_part, mac_part)) = token.split_once('-') else {
			return false;
		};
		let Some(timestamp) = base36_decode(ts_part) else {
			return false;
		};
		let Some(mac_bytes) = hex_decode(mac_part) else {
			return false;
		};

		let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
		mac.update(self.state_bytes(state, timestamp).as_bytes());
		if mac.verify_slice(&mac_bytes).is_err() {
			return false;
		}

		Utc::now().timestamp() - timestamp <= self.timeout_secs
	}

	fn mac(&self, state: TokenState<'_>, timestamp: i64) -> Vec<u8> {
		let mut mac = HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
		mac.update(self.state_bytes(state, timestamp).as_bytes());
		mac.finalize().into_bytes().to_vec()
	}

	fn state_bytes(&self, state: TokenState<'_>, timestamp: i64) -> String {
		format!(
			"{}\x00{}\x00{}\x00{}",
			state.user_id,
			state.password.unwrap_or(""),
			state.is_active,
			timestamp
		)
	}
}

fn base36_encode(mut value: i64) -> String {
	const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
	if value <= 0 {
		return "0".to_string();
	}
	let mut out = Vec::new();
	while value > 0 {
		out.push(DIGITS[(value % 36) as usize]);
		value /= 36;
	}
	out.reverse();
	String::from_utf8(out).expect("base36 digits are ASCII")
}

fn base36_decode(value: &str) -> Option<i64> {
	if value.is_empty() || value.len() > 13 {
		return None;
	}
	let mut out: i64 = 0;
	for c in value.chars() {
		let digit = c.to_digit(36)?;
		out = out.checked_mul(36)?.checked_add(digit as i64)?;
	}
	Some(out)
}

fn hex_encode(bytes: &[u8]) -> String {
	bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(value: &str) -> Option<Vec<u8>> {
	if value.len() % 2 != 0 {
		return None;
	}
	(0..value.len())
		.step_by(2)
		.map(|i| u8::from_str_radix(value.get(i..i + 2)?, 16).ok())
		.collect()
}
