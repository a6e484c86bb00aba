//! Shop wire representations and review input.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use super::models::{BrandVoice, Category, Product, ProductImage, ProductVariant, Review};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
	pub parent: Option<Uuid>,
}

impl CategoryResponse {
	pub fn from_model(category: &Category) -> Self {
		Self {
			id: category.id,
			name: category.name.clone(),
			slug: category.slug.clone(),
			parent: category.parent_id,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantResponse {
	pub id: Uuid,
	pub sku: String,
	pub price: Decimal,
	pub discount_price: Option<Decimal>,
	pub stock_quantity: i32,
	pub size: String,
	pub color: String,
	pub is_default: bool,
}

impl VariantResponse {
	pub fn from_model(variant: &ProductVariant) -> Self {
		Self {
			id: variant.id,
			sku: variant.sku.clone(),
			price: variant.price,
			discount_price: variant.discount_price,
			stock_quantity: variant.stock_quantity,
			size: variant.size.clone(),
			color: variant.color.clone(),
			is_default: variant.is_default,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
	pub id: Uuid,
	pub image: String,
	pub alt_text: String,
}

impl ImageResponse {
	pub fn from_model(image: &ProductImage) -> Self {
		Self {
			id: image.id,
			image: image.image.clone(),
			alt_text: image.alt_text.clone(),
		}
	}
}

/// Compact product form for list pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListResponse {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
	pub short_description: String,
	pub category: Option<Uuid>,
	pub is_available: bool,
	pub tags: Vec<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl ProductListResponse {
	pub fn from_model(product: &Product, tags: Vec<String>) -> Self {
		Self {
			id: product.id,
			name: product.name.clone(),
			slug: product.slug.clone(),
			short_description: product.short_description.clone(),
			category: product.category_id,
			is_available: product.is_available,
			tags,
			created_at: product.created_at,
			updated_at: product.updated_at,
		}
	}
}

/// Full product form for the detail page.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetailResponse {
	pub id: Uuid,
	pub name: String,
	pub slug: String,
	pub short_description: String,
	pub long_description: String,
	pub category: Option<Uuid>,
	pub is_available: bool,
	pub meta_title: String,
	pub meta_description: String,
	pub gaio_brand_voice: BrandVoice,
	pub gaio_target_personas: Value,
	pub gaio_key_features: Value,
	pub gaio_structured_facts: Value,
	pub gaio_faq_data: Value,
	pub gaio_description_variants: Value,
	pub tags: Vec<String>,
	pub variants: Vec<VariantResponse>,
	pub images: Vec<ImageResponse>,
	/// Mean review rating rounded to two decimals; null without reviews.
	pub average_rating: Option<f64>,
	pub review_count: i64,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl ProductDetailResponse {
	pub fn from_model(
		product: &Product,
		tags: Vec<String>,
		variants: &[ProductVariant],
		images: &[ProductImage],
		average_rating: Option<f64>,
		review_count: i64,
	) -> Self {
		Self {
			id: product.id,
			name: product.name.clone(),
			slug: product.slug.clone(),
			short_description: product.short_description.clone(),
			long_description: product.long_description.clone(),
			category: product.category_id,
			is_available: product.is_available,
			meta_title: product.meta_title.clone(),
			meta_description: product.meta_description.clone(),
			gaio_brand_voice: product.gaio_brand_voice,
			gaio_target_personas: product.gaio_target_personas.clone(),
			gaio_key_features: product.gaio_key_features.clone(),
			gaio_structured_facts: product.gaio_structured_facts.clone(),
			gaio_faq_data: product.gaio_faq_data.clone(),
			gaio_description_variants: product.gaio_description_variants.clone(),
			tags,
			variants: variants.iter().map(VariantResponse::from_model).collect(),
			images: images.iter().map(ImageResponse::from_model).collect(),
			average_rating: average_rating.map(|avg| (avg * 100.0).round() / 100.0),
			review_count,
			created_at: product.created_at,
			updated_at: product.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
	pub id: Uuid,
	pub product: Uuid,
	pub user: Uuid,
	pub rating: i16,
	pub comment: String,
	pub created_at: DateTime<Utc>,
}

impl ReviewResponse {
	pub fn from_model(review: &Review) -> Self {
		Self {
			id: review.id,
			product: review.product_id,
			user: review.user_id,
			rating: review.rating,
			comment: review.comment.clone(),
			created_at: review.created_at,
		}
	}
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewCreateSerializer {
	#[serde(default)]
	#[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5."))]
	pub rating: i16,
	#[serde(default)]
	#[validate(length(min = 1, message = "This field may not be blank."))]
	pub comment: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(1, true)]
	#[case(5, true)]
	#[case(0, false)]
	#[case(6, false)]
	fn test_review_rating_bounds(#[case] rating: i16, #[case] ok: bool) {
		let serializer = ReviewCreateSerializer {
			rating,
			comment: "Great product".to_string(),
		};

		assert_eq!(serializer.validate().is_ok(), ok);
	}

	#[rstest]
	fn test_review_comment_required() {
		let serializer: ReviewCreateSerializer =
			serde_json::from_value(serde_json::json!({"rating": 4})).unwrap();

		assert!(serializer.validate().is_err());
	}

	#[rstest]
	fn test_average_rating_is_rounded() {
		let response_rounding = |avg: f64| (avg * 100.0).round() / 100.0;

		assert_eq!(response_rounding(4.333333), 4.33);
		assert_eq!(response_rounding(3.666666), 3.67);
	}
}
