//! Authentication building blocks: password hashing, JWT pairs, and the
//! signed activation/reset tokens.

pub mod hashers;
pub mod jwt;
pub mod password_validation;
pub mod tokens;

pub use hashers::{Argon2Hasher, PasswordHasher};
pub use jwt::{Claims, JwtAuth, TokenPair};
pub use tokens::{ActivationTokenGenerator, TokenState};
