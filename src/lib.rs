//! Content and shop backend.
//!
//! Articles (knowledge-base/blog content with SEO metadata), a product
//! catalog (products, variants, images, categories, tags, reviews), and
//! email-based accounts with signed activation links and JWT issuance,
//! over PostgreSQL.

pub mod apps;
pub mod auth;
pub mod common;
pub mod config;
pub mod context;
pub mod db;
pub mod exception;
pub mod filters;
pub mod http;
pub mod mail;
pub mod pagination;

pub use context::AppContext;
pub use exception::{Error, Result};
