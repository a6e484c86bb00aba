//! Request/response middleware.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::router::Handler;
use super::{Request, Response};
use crate::context::AppContext;
use crate::exception::Result;

/// Middleware wraps handler execution. Composition instead of inheritance:
/// each middleware receives the next handler in the chain.
#[async_trait]
pub trait Middleware: Send + Sync {
	async fn process(
		&self,
		ctx: Arc<AppContext>,
		request: Request,
		next: Arc<dyn Handler>,
	) -> Result<Response>;
}

/// Logs one line per request: method, path, status, latency.
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
	async fn process(
		&self,
		ctx: Arc<AppContext>,
		request: Request,
		next: Arc<dyn Handler>,
	) -> Result<Response> {
		let method = request.method.clone();
		let path = request.path().to_string();
		let started = Instant::now();

		let result = next.handle(ctx, request).await;

		let elapsed_ms = started.elapsed().as_millis() as u64;
		match &result {
			Ok(response) => {
				tracing::info!(%method, %path, status = %response.status.as_u16(), elapsed_ms, "request");
			}
			Err(error) => {
				tracing::info!(%method, %path, status = %error.status_code().as_u16(), elapsed_ms, "request");
			}
		}
		result
	}
}
