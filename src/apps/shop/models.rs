//! Shop catalog models: categories, tags, products with variants and
//! images, and customer reviews.
//!
//! Products act as templates; the sellable unit is the variant, which
//! carries sku, price, and stock. At most one variant per product is the
//! default, and a user reviews a product at most once. Both invariants are
//! database constraints.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::common::text::slugify;
use crate::db;
use crate::exception::{Error, Result};
use crate::filters::{OrderingFilter, SearchFilter, push_eq_bool, push_eq_text, push_eq_uuid};

/// Tone selector for AI-generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
pub enum BrandVoice {
	#[serde(rename = "PLAYFUL")]
	#[sqlx(rename = "PLAYFUL")]
	Playful,
	#[default]
	#[serde(rename = "PROFESSIONAL")]
	#[sqlx(rename = "PROFESSIONAL")]
	Professional,
	#[serde(rename = "MINIMALIST")]
	#[sqlx(rename = "MINIMALIST")]
	Minimalist,
	#[serde(rename = "ADVENTUROUS")]
	#[sqlx(rename = "ADVENTUROUS")]
	Adventurous,
}

/// Product category, hierarchical via `parent_id`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Category {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
	pub parent_id: Option<Uuid>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Category {
	pub async fn create(
		pool: &PgPool,
		name: &str,
		slug: Option<&str>,
		parent_id: Option<Uuid>,
	) -> Result<Category> {
		let slug = match slug.filter(|s| !s.is_empty()) {
			Some(slug) => slug.to_string(),
			None => slugify(name),
		};
		sqlx::query_as::<_, Category>(
			"INSERT INTO categories (id, name, slug, parent_id) VALUES ($1, $2, $3, $4) \
			 RETURNING *",
		)
		.bind(Uuid::new_v4())
		.bind(name)
		.bind(&slug)
		.bind(parent_id)
		.fetch_one(pool)
		.await
		.map_err(map_write_error)
	}

	pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>> {
		sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
			.fetch_all(pool)
			.await
			.map_err(Error::from)
	}
}

/// Non-hierarchical tag, shared by products and articles.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Tag {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Tag {
	pub async fn create(pool: &PgPool, name: &str, slug: Option<&str>) -> Result<Tag> {
		let slug = match slug.filter(|s| !s.is_empty()) {
			Some(slug) => slug.to_string(),
			None => slugify(name),
		};
		sqlx::query_as::<_, Tag>(
			"INSERT INTO tags (id, name, slug) VALUES ($1, $2, $3) RETURNING *",
		)
		.bind(Uuid::new_v4())
		.bind(name)
		.bind(&slug)
		.fetch_one(pool)
		.await
		.map_err(map_write_error)
	}

	/// Find a tag by derived slug, creating it when missing. Returns the id.
	pub async fn get_or_create(pool: &PgPool, name: &str) -> Result<Uuid> {
		let slug = slugify(name);
		if let Some(id) =
			sqlx::query_scalar::<_, Uuid>("SELECT id FROM tags WHERE slug = $1")
				.bind(&slug)
				.fetch_optional(pool)
				.await?
		{
			return Ok(id);
		}
		let tag = Tag::create(pool, name, Some(&slug)).await?;
		Ok(tag.id)
	}
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Product {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
	pub short_description: String,
	pub long_description: String,
	pub category_id: Option<Uuid>,
	pub is_available: bool,
	pub meta_title: String,
	pub meta_description: String,
	pub gaio_brand_voice: BrandVoice,
	/// Opaque GAIO blobs; the catalog never looks inside them.
	pub gaio_target_personas: Value,
	pub gaio_key_features: Value,
	pub gaio_structured_facts: Value,
	pub gaio_faq_data: Value,
	pub gaio_description_variants: Value,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
	pub name: String,
	pub slug: Option<String>,
	pub short_description: String,
	pub long_description: String,
	pub category_id: Option<Uuid>,
	pub is_available: bool,
	pub meta_title: String,
	pub meta_description: String,
	pub gaio_brand_voice: BrandVoice,
	pub gaio_target_personas: Value,
	pub gaio_key_features: Value,
	pub gaio_structured_facts: Value,
	pub gaio_faq_data: Value,
	pub gaio_description_variants: Value,
}

impl Default for NewProduct {
	fn default() -> Self {
		Self {
			name: String::new(),
			slug: None,
			short_description: String::new(),
			long_description: String::new(),
			category_id: None,
			is_available: true,
			meta_title: String::new(),
			meta_description: String::new(),
			gaio_brand_voice: BrandVoice::default(),
			gaio_target_personas: Value::Array(Vec::new()),
			gaio_key_features: Value::Array(Vec::new()),
			gaio_structured_facts: Value::Object(serde_json::Map::new()),
			gaio_faq_data: Value::Array(Vec::new()),
			gaio_description_variants: Value::Object(serde_json::Map::new()),
		}
	}
}

/// Parameters of one product list query.
pub struct ProductQuery {
	pub filters: HashMap<String, String>,
	pub search: Option<String>,
	pub order_clause: String,
	pub limit: i64,
	pub offset: i64,
}

pub const SEARCH: SearchFilter = SearchFilter {
	columns: &["name", "short_description", "long_description"],
};

pub const ORDERING: OrderingFilter = OrderingFilter {
	allowed: &["created_at", "updated_at", "name"],
	default: "-created_at",
};

impl Product {
	pub async fn create(pool: &PgPool, new: NewProduct) -> Result<Product> {
		let slug = match new.slug.filter(|s| !s.is_empty()) {
			Some(slug) => slug,
			None => slugify(&new.name),
		};
		sqlx::query_as::<_, Product>(
			"INSERT INTO products (id, name, slug, short_description, long_description, \
			 category_id, is_available, meta_title, meta_description, gaio_brand_voice, \
			 gaio_target_personas, gaio_key_features, gaio_structured_facts, gaio_faq_data, \
			 gaio_description_variants) \
			 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
			 RETURNING *",
		)
		.bind(Uuid::new_v4())
		.bind(&new.name)
		.bind(&slug)
		.bind(&new.short_description)
		.bind(&new.long_description)
		.bind(new.category_id)
		.bind(new.is_available)
		.bind(&new.meta_title)
		.bind(&new.meta_description)
		.bind(new.gaio_brand_voice)
		.bind(&new.gaio_target_personas)
		.bind(&new.gaio_key_features)
		.bind(&new.gaio_structured_facts)
		.bind(&new.gaio_faq_data)
		.bind(&new.gaio_description_variants)
		.fetch_one(pool)
		.await
		.map_err(map_write_error)
	}

	pub async fn find_available_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>> {
		sqlx::query_as::<_, Product>(
			"SELECT * FROM products WHERE slug = $1 AND is_available = TRUE",
		)
		.bind(slug)
		.fetch_optional(pool)
		.await
		.map_err(Error::from)
	}

	/// Count and fetch one page of available products.
	pub async fn list_available(pool: &PgPool, query: &ProductQuery) -> Result<(i64, Vec<Product>)> {
		let mut count_qb =
			QueryBuilder::new("SELECT count(*) FROM products WHERE is_available = TRUE");
		apply_filters(&mut count_qb, query)?;
		let count: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

		let mut qb = QueryBuilder::new("SELECT * FROM products WHERE is_available = TRUE");
		apply_filters(&mut qb, query)?;
		qb.push(" ORDER BY ");
		qb.push(&query.order_clause);
		qb.push(" LIMIT ");
		qb.push_bind(query.limit);
		qb.push(" OFFSET ");
		qb.push_bind(query.offset);
		let products = qb.build_query_as::<Product>().fetch_all(pool).await?;

		Ok((count, products))
	}

	pub async fn tag_names(pool: &PgPool, product_id: Uuid) -> Result<Vec<String>> {
		let names = sqlx::query_scalar::<_, String>(
			"SELECT t.name FROM tags t \
			 JOIN product_tags pt ON pt.tag_id = t.id \
			 WHERE pt.product_id = $1 ORDER BY t.name",
		)
		.bind(product_id)
		.fetch_all(pool)
		.await?;
		Ok(names)
	}

	pub async fn tag_names_for(
		pool: &PgPool,
		product_ids: &[Uuid],
	) -> Result<HashMap<Uuid, Vec<String>>> {
		let rows = sqlx::query_as::<_, (Uuid, String)>(
			"SELECT pt.product_id, t.name FROM product_tags pt \
			 JOIN tags t ON t.id = pt.tag_id \
			 WHERE pt.product_id = ANY($1) ORDER BY t.name",
		)
		.bind(product_ids)
		.fetch_all(pool)
		.await?;

		let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
		for (product_id, name) in rows {
			grouped.entry(product_id).or_default().push(name);
		}
		Ok(grouped)
	}

	pub async fn set_tags(pool: &PgPool, product_id: Uuid, names: &[&str]) -> Result<()> {
		sqlx::query("DELETE FROM product_tags WHERE product_id = $1")
			.bind(product_id)
			.execute(pool)
			.await?;

		for name in names {
			let tag_id = Tag::get_or_create(pool, name).await?;
			sqlx::query(
				"INSERT INTO product_tags (product_id, tag_id) VALUES ($1, $2) \
				 ON CONFLICT DO NOTHING",
			)
			.bind(product_id)
			.bind(tag_id)
			.execute(pool)
			.await?;
		}
		Ok(())
	}

	/// Mean review rating and review count for a product.
	pub async fn rating_summary(pool: &PgPool, product_id: Uuid) -> Result<(Option<f64>, i64)> {
		let summary = sqlx::query_as::<_, (Option<f64>, i64)>(
			"SELECT avg(rating)::float8, count(*) FROM reviews WHERE product_id = $1",
		)
		.bind(product_id)
		.fetch_one(pool)
		.await?;
		Ok(summary)
	}
}

fn apply_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery) -> Result<()> {
	for (param, value) in &query.filters {
		match param.as_str() {
			"slug" => push_eq_text(qb, "slug", value),
			"category" => push_eq_uuid(qb, "category_id", "category", value)?,
			"is_available" => push_eq_bool(qb, "is_available", "is_available", value)?,
			"tag" => {
				qb.push(
					" AND EXISTS (SELECT 1 FROM product_tags pt \
					 JOIN tags t ON t.id = pt.tag_id \
					 WHERE pt.product_id = products.id AND t.slug = ",
				);
				qb.push_bind(value.to_string());
				qb.push(")");
			}
			_ => {}
		}
	}

	if let Some(term) = query.search.as_deref().filter(|t| !t.is_empty()) {
		SEARCH.apply(qb, term);
	}
	Ok(())
}

/// A sellable configuration of a product: own sku, price, and stock.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductVariant {
	pub id: Uuid,
	pub product_id: Uuid,
	pub sku: String,
	pub price: Decimal,
	pub discount_price: Option<Decimal>,
	pub stock_quantity: i32,
	pub size: String,
	pub color: String,
	pub is_default: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewVariant {
	pub product_id: Uuid,
	pub sku: String,
	pub price: Decimal,
	pub discount_price: Option<Decimal>,
	pub stock_quantity: i32,
	pub size: String,
	pub color: String,
	pub is_default: bool,
}

impl ProductVariant {
	pub async fn create(pool: &PgPool, new: NewVariant) -> Result<ProductVariant> {
		sqlx::query_as::<_, ProductVariant>(
			"INSERT INTO product_variants (id, product_id, sku, price, discount_price, \
			 stock_quantity, size, color, is_default) \
			 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
		)
		.bind(Uuid::new_v4())
		.bind(new.product_id)
		.bind(&new.sku)
		.bind(new.price)
		.bind(new.discount_price)
		.bind(new.stock_quantity)
		.bind(&new.size)
		.bind(&new.color)
		.bind(new.is_default)
		.fetch_one(pool)
		.await
		.map_err(map_write_error)
	}

	pub async fn for_product(pool: &PgPool, product_id: Uuid) -> Result<Vec<ProductVariant>> {
		sqlx::query_as::<_, ProductVariant>(
			"SELECT * FROM product_variants WHERE product_id = $1 ORDER BY size, color",
		)
		.bind(product_id)
		.fetch_all(pool)
		.await
		.map_err(Error::from)
	}
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductImage {
	pub id: Uuid,
	pub product_id: Uuid,
	/// Storage path; upload handling is outside this system.
	pub image: String,
	pub alt_text: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl ProductImage {
	pub async fn create(
		pool: &PgPool,
		product_id: Uuid,
		image: &str,
		alt_text: &str,
	) -> Result<ProductImage> {
		sqlx::query_as::<_, ProductImage>(
			"INSERT INTO product_images (id, product_id, image, alt_text) \
			 VALUES ($1, $2, $3, $4) RETURNING *",
		)
		.bind(Uuid::new_v4())
		.bind(product_id)
		.bind(image)
		.bind(alt_text)
		.fetch_one(pool)
		.await
		.map_err(Error::from)
	}

	pub async fn for_product(pool: &PgPool, product_id: Uuid) -> Result<Vec<ProductImage>> {
		sqlx::query_as::<_, ProductImage>(
			"SELECT * FROM product_images WHERE product_id = $1 ORDER BY created_at",
		)
		.bind(product_id)
		.fetch_all(pool)
		.await
		.map_err(Error::from)
	}
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Review {
	pub id: Uuid,
	pub product_id: Uuid,
	pub user_id: Uuid,
	pub rating: i16,
	pub comment: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Review {
	pub async fn create(
		pool: &PgPool,
		product_id: Uuid,
		user_id: Uuid,
		rating: i16,
		comment: &str,
	) -> Result<Review> {
		sqlx::query_as::<_, Review>(
			"INSERT INTO reviews (id, product_id, user_id, rating, comment) \
			 VALUES ($1, $2, $3, $4, $5) RETURNING *",
		)
		.bind(Uuid::new_v4())
		.bind(product_id)
		.bind(user_id)
		.bind(rating)
		.bind(comment)
		.fetch_one(pool)
		.await
		.map_err(map_write_error)
	}

	/// One page of a product's reviews, newest first.
	pub async fn list_for_product(
		pool: &PgPool,
		product_id: Uuid,
		limit: i64,
		offset: i64,
	) -> Result<(i64, Vec<Review>)> {
		let count: i64 =
			sqlx::query_scalar("SELECT count(*) FROM reviews WHERE product_id = $1")
				.bind(product_id)
				.fetch_one(pool)
				.await?;
		let reviews = sqlx::query_as::<_, Review>(
			"SELECT * FROM reviews WHERE product_id = $1 ORDER BY created_at DESC \
			 LIMIT $2 OFFSET $3",
		)
		.bind(product_id)
		.bind(limit)
		.bind(offset)
		.fetch_all(pool)
		.await?;
		Ok((count, reviews))
	}
}

fn map_write_error(error: sqlx::Error) -> Error {
	match db::unique_violation(&error).as_deref() {
		Some("products_slug_key") => {
			Error::validation("slug", "product with this slug already exists.")
		}
		Some("categories_slug_key") => {
			Error::validation("slug", "category with this slug already exists.")
		}
		Some("tags_slug_key") => Error::validation("slug", "tag with this slug already exists."),
		Some("product_variants_sku_key") => {
			Error::validation("sku", "product variant with this sku already exists.")
		}
		Some("product_variants_default_key") => Error::validation(
			"is_default",
			"A default variant already exists for this product.",
		),
		Some("product_variants_product_size_color_key") => Error::validation(
			"non_field_errors",
			"A variant with this size and color already exists for this product.",
		),
		Some("reviews_product_user_key") => Error::validation(
			"non_field_errors",
			"You have already reviewed this product.",
		),
		_ => Error::from(error),
	}
}
