//! Outbound notification seam.
//!
//! Actual delivery is an external collaborator; the application only hands
//! a composed [`Email`] to an [`EmailBackend`]. Production wiring uses the
//! console backend (structured log lines), tests observe sends through the
//! in-memory backend.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::exception::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
	pub to: String,
	pub subject: String,
	pub body: String,
}

impl Email {
	pub fn new(
		to: impl Into<String>,
		subject: impl Into<String>,
		body: impl Into<String>,
	) -> Self {
		Self {
			to: to.into(),
			subject: subject.into(),
			body: body.into(),
		}
	}
}

#[async_trait]
pub trait EmailBackend: Send + Sync {
	async fn send_email(&self, email: &Email) -> Result<()>;
}

/// Logs every message instead of delivering it.
pub struct ConsoleEmailBackend;

#[async_trait]
impl EmailBackend for ConsoleEmailBackend {
	async fn send_email(&self, email: &Email) -> Result<()> {
		tracing::info!(to = %email.to, subject = %email.subject, "outbound email");
		Ok(())
	}
}

/// Stores messages in memory for test assertions.
#[derive(Clone, Default)]
pub struct MemoryEmailBackend {
	sent: Arc<RwLock<Vec<Email>>>,
}

impl MemoryEmailBackend {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn sent_emails(&self) -> Vec<Email> {
		self.sent.read().clone()
	}
}

#[async_trait]
impl EmailBackend for MemoryEmailBackend {
	async fn send_email(&self, email: &Email) -> Result<()> {
		self.sent.write().push(email.clone());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[tokio::test(flavor = "current_thread")]
	async fn test_memory_backend_records_sends() {
		let backend = MemoryEmailBackend::new();

		backend
			.send_email(&Email::new("test@user.com", "Activate your account", "..."))
			.await
			.unwrap();

		let sent = backend.sent_emails();
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].to, "test@user.com");
		assert_eq!(sent[0].subject, "Activate your account");
	}
}
