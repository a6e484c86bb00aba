//! Public article views: list and retrieve only.

use std::sync::Arc;

use crate::context::AppContext;
use crate::exception::{Error, Result};
use crate::http::{Request, Response};
use crate::pagination::{PageNumberPagination, PaginatedResponse};

use super::models::{Article, ArticleQuery, ORDERING};
use super::serializers::ArticleResponse;

/// `GET /articles/` — published articles, filterable, searchable,
/// orderable, paginated.
pub async fn article_list(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let params = request.decoded_query_params();

	let order_clause = ORDERING.order_clause(params.get("ordering").map(String::as_str))?;
	let paginator = PageNumberPagination::from_settings(&ctx.settings);
	let page_params = paginator.page_params(&request)?;

	let query = ArticleQuery {
		search: params.get("search").cloned(),
		filters: params,
		order_clause,
		limit: page_params.limit(),
		offset: page_params.offset(),
	};
	let (count, articles) = Article::list_published(&ctx.pool, &query).await?;

	let ids: Vec<_> = articles.iter().map(|a| a.id).collect();
	let mut tags = Article::tag_names_for(&ctx.pool, &ids).await?;
	let results: Vec<ArticleResponse> = articles
		.iter()
		.map(|article| {
			ArticleResponse::from_model(article, tags.remove(&article.id).unwrap_or_default())
		})
		.collect();

	let page = PaginatedResponse::build(&request, &page_params, count, results)?;
	Response::ok().with_json(&page)
}

/// `GET /articles/{slug}/` — 404 for unknown or unpublished slugs.
pub async fn article_detail(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let slug = request.path_param("slug").unwrap_or_default();

	let article = Article::find_published_by_slug(&ctx.pool, slug)
		.await?
		.ok_or_else(Error::not_found)?;
	let tags = Article::tag_names(&ctx.pool, article.id).await?;

	Response::ok().with_json(&ArticleResponse::from_model(&article, tags))
}
