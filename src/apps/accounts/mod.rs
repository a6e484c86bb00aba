//! Email-based accounts: registration, activation links, JWT issuance,
//! password and email resets.

pub mod emails;
pub mod models;
pub mod serializers;
pub mod urls;
pub mod views;

pub use models::User;
pub use views::request_user;
