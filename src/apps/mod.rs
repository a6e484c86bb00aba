//! Applications: each owns its models, serializers, views, and URLs.

pub mod accounts;
pub mod articles;
pub mod shop;
