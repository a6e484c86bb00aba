//! Article wire representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::{Article, ArticleCategory, ArticleType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleResponse {
	pub id: Uuid,
	pub title: String,
	pub slug: String,
	pub author: Option<Uuid>,
	pub category: ArticleCategory,
	pub featured_image: String,
	pub excerpt: String,
	pub content: String,
	pub is_featured: bool,
	pub is_published: bool,
	pub publish_date: Option<DateTime<Utc>>,
	pub article_type: ArticleType,
	pub show_table_of_contents: bool,
	pub tags: Vec<String>,
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

impl ArticleResponse {
	pub fn from_model(article: &Article, tags: Vec<String>) -> Self {
		Self {
			id: article.id,
			title: article.title.clone(),
			slug: article.slug.clone(),
			author: article.author_id,
			category: article.category,
			featured_image: article.featured_image.clone(),
			excerpt: article.excerpt.clone(),
			content: article.content.clone(),
			is_featured: article.is_featured,
			is_published: article.is_published,
			publish_date: article.publish_date,
			article_type: article.article_type,
			show_table_of_contents: article.show_table_of_contents,
			tags,
			meta_title: article.meta_title.clone(),
			meta_description: article.meta_description.clone(),
			focus_keyword: article.focus_keyword.clone(),
			canonical_url: article.canonical_url.clone(),
			no_index: article.no_index,
			content_abstract: article.content_abstract.clone(),
			key_questions_answered: article.key_questions_answered.clone(),
			created_at: article.created_at,
			updated_at: article.updated_at,
		}
	}
}
