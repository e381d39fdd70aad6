//! # ghostrepo-auth
//!
//! Credential primitives for GhostRepo.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing of share passwords and the length policy
//! - `jwt`: HS256 owner sessions, visitor passes and unlock grants

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenType};
pub use password::{PasswordHasher, PasswordValidator};
