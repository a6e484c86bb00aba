//! Shop views: public catalog reads, authenticated review writes.

use std::sync::Arc;

use crate::apps::accounts::request_user;
use crate::context::AppContext;
use crate::exception::{Error, Result};
use crate::http::{Request, Response};
use crate::pagination::{PageNumberPagination, PaginatedResponse};

use super::models::{Category, ORDERING, Product, ProductImage, ProductQuery, ProductVariant, Review};
use super::serializers::{
	CategoryResponse, ProductDetailResponse, ProductListResponse, ReviewCreateSerializer,
	ReviewResponse,
};

/// `GET /shop/products/` — available products, filterable, searchable,
/// orderable, paginated.
pub async fn product_list(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let params = request.decoded_query_params();

	let order_clause = ORDERING.order_clause(params.get("ordering").map(String::as_str))?;
	let paginator = PageNumberPagination::from_settings(&ctx.settings);
	let page_params = paginator.page_params(&request)?;

	let query = ProductQuery {
		search: params.get("search").cloned(),
		filters: params,
		order_clause,
		limit: page_params.limit(),
		offset: page_params.offset(),
	};
	let (count, products) = Product::list_available(&ctx.pool, &query).await?;

	let ids: Vec<_> = products.iter().map(|p| p.id).collect();
	let mut tags = Product::tag_names_for(&ctx.pool, &ids).await?;
	let results: Vec<ProductListResponse> = products
		.iter()
		.map(|product| {
			ProductListResponse::from_model(product, tags.remove(&product.id).unwrap_or_default())
		})
		.collect();

	let page = PaginatedResponse::build(&request, &page_params, count, results)?;
	Response::ok().with_json(&page)
}

/// `GET /shop/products/{slug}/` — full product with variants, images, and
/// rating summary; 404 for unknown or unavailable slugs.
pub async fn product_detail(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let slug = request.path_param("slug").unwrap_or_default();
	let product = Product::find_available_by_slug(&ctx.pool, slug)
		.await?
		.ok_or_else(Error::not_found)?;

	let tags = Product::tag_names(&ctx.pool, product.id).await?;
	let variants = ProductVariant::for_product(&ctx.pool, product.id).await?;
	let images = ProductImage::for_product(&ctx.pool, product.id).await?;
	let (average_rating, review_count) = Product::rating_summary(&ctx.pool, product.id).await?;

	Response::ok().with_json(&ProductDetailResponse::from_model(
		&product,
		tags,
		&variants,
		&images,
		average_rating,
		review_count,
	))
}

/// `GET /shop/categories/` — the full category tree as a flat list.
pub async fn category_list(ctx: Arc<AppContext>, _request: Request) -> Result<Response> {
	let categories = Category::list_all(&ctx.pool).await?;
	let results: Vec<CategoryResponse> =
		categories.iter().map(CategoryResponse::from_model).collect();

	Response::ok().with_json(&results)
}

/// `GET /shop/products/{slug}/reviews/` — a product's reviews, newest
/// first, paginated.
pub async fn review_list(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let slug = request.path_param("slug").unwrap_or_default();
	let product = Product::find_available_by_slug(&ctx.pool, slug)
		.await?
		.ok_or_else(Error::not_found)?;

	let paginator = PageNumberPagination::from_settings(&ctx.settings);
	let page_params = paginator.page_params(&request)?;
	let (count, reviews) = Review::list_for_product(
		&ctx.pool,
		product.id,
		page_params.limit(),
		page_params.offset(),
	)
	.await?;

	let results: Vec<ReviewResponse> = reviews.iter().map(ReviewResponse::from_model).collect();
	let page = PaginatedResponse::build(&request, &page_params, count, results)?;
	Response::ok().with_json(&page)
}

/// `POST /shop/products/{slug}/reviews/` — authenticated; one review per
/// user per product, enforced by the database constraint.
pub async fn review_create(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let user = request_user(&ctx, &request).await?;

	let slug = request.path_param("slug").unwrap_or_default();
	let product = Product::find_available_by_slug(&ctx.pool, slug)
		.await?
		.ok_or_else(Error::not_found)?;

	let serializer: ReviewCreateSerializer = request.validated_json()?;
	let review = Review::create(
		&ctx.pool,
		product.id,
		user.id,
		serializer.rating,
		&serializer.comment,
	)
	.await?;

	Response::created().with_json(&ReviewResponse::from_model(&review))
}
