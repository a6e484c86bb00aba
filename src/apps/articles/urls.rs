//! URL patterns for the articles application.

use hyper::Method;

use crate::http::Router;

use super::views;

pub fn routes() -> Router {
	Router::new()
		.function("/articles/", Method::GET, views::article_list)
		.function("/articles/{slug}/", Method::GET, views::article_detail)
}
