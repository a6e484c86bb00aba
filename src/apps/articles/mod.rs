//! Blog / knowledge-base articles with SEO metadata. Read-only over HTTP;
//! rows are written by back-office tooling.

pub mod models;
pub mod serializers;
pub mod urls;
pub mod views;

pub use models::{Article, ArticleCategory, ArticleType, NewArticle};
