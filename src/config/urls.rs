//! URL configuration for the whole application.

use crate::apps::{accounts, articles, shop};
use crate::http::Router;
use crate::http::middleware::LoggingMiddleware;

/// The full routing table: articles at the root, the shop under `/shop/`,
/// accounts and JWT under `/auth/`.
pub fn routes() -> Router {
	Router::new()
		.include("", articles::urls::routes())
		.include("/shop", shop::urls::routes())
		.include("/auth", accounts::urls::routes())
		.with_middleware(LoggingMiddleware)
}
