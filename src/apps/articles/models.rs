//! Article model and queries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::text::slugify;
use crate::db;
use crate::exception::{Error, Result};
use crate::filters::{
	OrderingFilter, SearchFilter, push_eq_bool, push_eq_text, push_eq_timestamptz, push_eq_uuid,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
pub enum ArticleCategory {
	#[default]
	#[serde(rename = "knowledge_base")]
	#[sqlx(rename = "knowledge_base")]
	KnowledgeBase,
	#[serde(rename = "well_being")]
	#[sqlx(rename = "well_being")]
	WellBeing,
	#[serde(rename = "Diet")]
	#[sqlx(rename = "Diet")]
	Diet,
}

/// Schema.org article type used for structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
pub enum ArticleType {
	#[default]
	#[serde(rename = "Article")]
	#[sqlx(rename = "Article")]
	Article,
	#[serde(rename = "BlogPosting")]
	#[sqlx(rename = "BlogPosting")]
	BlogPosting,
	#[serde(rename = "NewsArticle")]
	#[sqlx(rename = "NewsArticle")]
	NewsArticle,
	#[serde(rename = "Guide")]
	#[sqlx(rename = "Guide")]
	Guide,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Article {
	pub id: Uuid,
	pub title: String,
	pub slug: String,
	pub author_id: Option<Uuid>,
	pub category: ArticleCategory,
	pub featured_image: String,
	pub excerpt: String,
	pub content: String,
	pub is_featured: bool,
	pub is_published: bool,
	pub publish_date: Option<DateTime<Utc>>,
	pub article_type: ArticleType,
	pub show_table_of_contents: bool,
	// SEO block
	pub meta_title: String,
	pub meta_description: String,
	pub focus_keyword: String,
	pub canonical_url: String,
	pub no_index: bool,
	pub content_abstract: String,
	pub key_questions_answered: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Insert payload. The slug is derived from the title when absent.
#[derive(Debug, Clone)]
pub struct NewArticle {
	pub title: String,
	pub slug: Option<String>,
	pub author_id: Option<Uuid>,
	pub category: ArticleCategory,
	pub featured_image: String,
	pub excerpt: String,
	pub content: String,
	pub is_featured: bool,
	pub is_published: bool,
	pub publish_date: Option<DateTime<Utc>>,
	pub article_type: ArticleType,
	pub show_table_of_contents: bool,
	pub meta_title: String,
	pub meta_description: String,
	pub focus_keyword: String,
	pub canonical_url: String,
	pub no_index: bool,
	pub content_abstract: String,
	pub key_questions_answered: String,
}

impl Default for NewArticle {
	fn default() -> Self {
		Self {
			title: String::new(),
			slug: None,
			author_id: None,
			category: ArticleCategory::default(),
			featured_image: String::new(),
			excerpt: String::new(),
			content: String::new(),
			is_featured: false,
			is_published: true,
			publish_date: None,
			article_type: ArticleType::default(),
			show_table_of_contents: true,
			meta_title: String::new(),
			meta_description: String::new(),
			focus_keyword: String::new(),
			canonical_url: String::new(),
			no_index: false,
			content_abstract: String::new(),
			key_questions_answered: String::new(),
		}
	}
}

/// Parameters of one list query, assembled by the view layer.
pub struct ArticleQuery {
	pub filters: HashMap<String, String>,
	pub search: Option<String>,
	pub order_clause: String,
	pub limit: i64,
	pub offset: i64,
}

pub const SEARCH: SearchFilter = SearchFilter {
	columns: &["title", "excerpt", "content"],
};

pub const ORDERING: OrderingFilter = OrderingFilter {
	allowed: &["created_at", "updated_at", "publish_date", "title"],
	default: "-created_at",
};

impl Article {
	pub async fn create(pool: &PgPool, new: NewArticle) -> Result<Article> {
		let slug = match new.slug.filter(|s| !s.is_empty()) {
			Some(slug) => slug,
			None => slugify(&new.title),
		};

		sqlx::query_as::<_, Article>(
			"INSERT INTO articles (id, title, slug, author_id, category, featured_image, \
			 excerpt, content, is_featured, is_published, publish_date, article_type, \
			 show_table_of_contents, meta_title, meta_description, focus_keyword, \
			 canonical_url, no_index, content_abstract, key_questions_answered) \
			 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
			 $17, $18, $19, $20) RETURNING *",
		)
		.bind(Uuid::new_v4())
		.bind(&new.title)
		.bind(&slug)
		.bind(new.author_id)
		.bind(new.category)
		.bind(&new.featured_image)
		.bind(&new.excerpt)
		.bind(&new.content)
		.bind(new.is_featured)
		.bind(new.is_published)
		.bind(new.publish_date)
		.bind(new.article_type)
		.bind(new.show_table_of_contents)
		.bind(&new.meta_title)
		.bind(&new.meta_description)
		.bind(&new.focus_keyword)
		.bind(&new.canonical_url)
		.bind(new.no_index)
		.bind(&new.content_abstract)
		.bind(&new.key_questions_answered)
		.fetch_one(pool)
		.await
		.map_err(map_write_error)
	}

	/// Published article by slug; unpublished articles are invisible here.
	pub async fn find_published_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Article>> {
		sqlx::query_as::<_, Article>(
			"SELECT * FROM articles WHERE slug = $1 AND is_published = TRUE",
		)
		.bind(slug)
		.fetch_optional(pool)
		.await
		.map_err(Error::from)
	}

	/// Count and fetch one page of published articles.
	pub async fn list_published(pool: &PgPool, query: &ArticleQuery) -> Result<(i64, Vec<Article>)> {
		let mut count_qb = QueryBuilder::new("SELECT count(*) FROM articles WHERE is_published = TRUE");
		apply_filters(&mut count_qb, query)?;
		let count: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

		let mut qb = QueryBuilder::new("SELECT * FROM articles WHERE is_published = TRUE");
		apply_filters(&mut qb, query)?;
		qb.push(" ORDER BY ");
		qb.push(&query.order_clause);
		qb.push(" LIMIT ");
		qb.push_bind(query.limit);
		qb.push(" OFFSET ");
		qb.push_bind(query.offset);
		let articles = qb.build_query_as::<Article>().fetch_all(pool).await?;

		Ok((count, articles))
	}

	/// Tag names for one article, alphabetical.
	pub async fn tag_names(pool: &PgPool, article_id: Uuid) -> Result<Vec<String>> {
		let names = sqlx::query_scalar::<_, String>(
			"SELECT t.name FROM tags t \
			 JOIN article_tags at ON at.tag_id = t.id \
			 WHERE at.article_id = $1 ORDER BY t.name",
		)
		.bind(article_id)
		.fetch_all(pool)
		.await?;
		Ok(names)
	}

	/// Tag names for a page of articles in one query, grouped by article.
	pub async fn tag_names_for(
		pool: &PgPool,
		article_ids: &[Uuid],
	) -> Result<HashMap<Uuid, Vec<String>>> {
		let rows = sqlx::query_as::<_, (Uuid, String)>(
			"SELECT at.article_id, t.name FROM article_tags at \
			 JOIN tags t ON t.id = at.tag_id \
			 WHERE at.article_id = ANY($1) ORDER BY t.name",
		)
		.bind(article_ids)
		.fetch_all(pool)
		.await?;

		let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
		for (article_id, name) in rows {
			grouped.entry(article_id).or_default().push(name);
		}
		Ok(grouped)
	}

	/// Attach tags by name, creating missing tags on the fly.
	pub async fn set_tags(pool: &PgPool, article_id: Uuid, names: &[&str]) -> Result<()> {
		sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
			.bind(article_id)
			.execute(pool)
			.await?;

		for name in names {
			let tag_id = crate::apps::shop::models::Tag::get_or_create(pool, name).await?;
			sqlx::query(
				"INSERT INTO article_tags (article_id, tag_id) VALUES ($1, $2) \
				 ON CONFLICT DO NOTHING",
			)
			.bind(article_id)
			.bind(tag_id)
			.execute(pool)
			.await?;
		}
		Ok(())
	}
}

/// Exact-match filters, mirroring the public filter surface. Unknown query
/// parameters are ignored.
fn apply_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ArticleQuery) -> Result<()> {
	for (param, value) in &query.filters {
		match param.as_str() {
			"slug" => push_eq_text(qb, "slug", value),
			"title" => push_eq_text(qb, "title", value),
			"excerpt" => push_eq_text(qb, "excerpt", value),
			"article_type" => push_eq_text(qb, "article_type", value),
			"category" => push_eq_text(qb, "category", value),
			"is_featured" => push_eq_bool(qb, "is_featured", "is_featured", value)?,
			"is_published" => push_eq_bool(qb, "is_published", "is_published", value)?,
			"publish_date" => push_eq_timestamptz(qb, "publish_date", "publish_date", value)?,
			"author" => push_eq_uuid(qb, "author_id", "author", value)?,
			_ => {}
		}
	}

	if let Some(term) = query.search.as_deref().filter(|t| !t.is_empty()) {
		SEARCH.apply(qb, term);
	}
	Ok(())
}

fn map_write_error(error: sqlx::Error) -> Error {
	match db::unique_violation(&error).as_deref() {
		Some("articles_slug_key") => {
			Error::validation("slug", "article with this slug already exists.")
		}
		_ => Error::from(error),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_enum_wire_values() {
		assert_eq!(
			serde_json::to_value(ArticleCategory::KnowledgeBase).unwrap(),
			serde_json::json!("knowledge_base")
		);
		assert_eq!(
			serde_json::to_value(ArticleCategory::Diet).unwrap(),
			serde_json::json!("Diet")
		);
		assert_eq!(
			serde_json::to_value(ArticleType::BlogPosting).unwrap(),
			serde_json::json!("BlogPosting")
		);
		assert_eq!(
			serde_json::from_value::<ArticleType>(serde_json::json!("Guide")).unwrap(),
			ArticleType::Guide
		);
	}

	#[rstest]
	fn test_defaults_match_model_definition() {
		let new = NewArticle::default();

		assert_eq!(new.category, ArticleCategory::KnowledgeBase);
		assert_eq!(new.article_type, ArticleType::Article);
		assert!(new.is_published);
		assert!(!new.is_featured);
		assert!(new.show_table_of_contents);
	}

	#[rstest]
	fn test_filter_surface_builds_expected_sql() {
		let mut filters = HashMap::new();
		filters.insert("slug".to_string(), "test-article".to_string());
		let query = ArticleQuery {
			filters,
			search: Some("endo".to_string()),
			order_clause: "created_at DESC".to_string(),
			limit: 20,
			offset: 0,
		};

		let mut qb = QueryBuilder::new("SELECT count(*) FROM articles WHERE is_published = TRUE");
		apply_filters(&mut qb, &query).unwrap();

		let sql = qb.sql();
		assert!(sql.contains("slug = $1"));
		assert!(sql.contains("title ILIKE $2 OR excerpt ILIKE $3 OR content ILIKE $4"));
	}

	#[rstest]
	fn test_unknown_filter_params_are_ignored() {
		let mut filters = HashMap::new();
		filters.insert("format".to_string(), "json".to_string());
		let query = ArticleQuery {
			filters,
			search: None,
			order_clause: "created_at DESC".to_string(),
			limit: 20,
			offset: 0,
		};

		let mut qb = QueryBuilder::new("SELECT count(*) FROM articles WHERE is_published = TRUE");
		apply_filters(&mut qb, &query).unwrap();

		assert_eq!(qb.sql(), "SELECT count(*) FROM articles WHERE is_published = TRUE");
	}

	#[rstest]
	fn test_invalid_boolean_filter_is_rejected() {
		let mut filters = HashMap::new();
		filters.insert("is_featured".to_string(), "maybe".to_string());
		let query = ArticleQuery {
			filters,
			search: None,
			order_clause: "created_at DESC".to_string(),
			limit: 20,
			offset: 0,
		};

		let mut qb = QueryBuilder::new("SELECT count(*) FROM articles WHERE is_published = TRUE");

		assert!(matches!(
			apply_filters(&mut qb, &query),
			Err(Error::Validation(_))
		));
	}
}
