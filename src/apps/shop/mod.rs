//! Shop catalog: categories, tags, products with variants and images,
//! customer reviews.

pub mod models;
pub mod serializers;
pub mod urls;
pub mod views;

pub use models::{
	BrandVoice, Category, NewProduct, NewVariant, Product, ProductImage, ProductVariant, Review,
	Tag,
};
