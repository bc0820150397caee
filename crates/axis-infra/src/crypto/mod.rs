//! Credential adapters for Axis.
//!
//! - `password`: Argon2id password hashing
//! - `token`: HS256-signed access tokens

pub mod password;
pub mod token;
