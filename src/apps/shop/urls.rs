//! URL patterns for the shop application, mounted under `/shop/`.

use hyper::Method;

use crate::http::Router;

use super::views;

pub fn routes() -> Router {
	Router::new()
		.function("/products/", Method::GET, views::product_list)
		.function("/products/{slug}/", Method::GET, views::product_detail)
		.function("/products/{slug}/reviews/", Method::GET, views::review_list)
		.function("/products/{slug}/reviews/", Method::POST, views::review_create)
		.function("/categories/", Method::GET, views::category_list)
}
