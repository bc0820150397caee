//! Account registration, login, and access-token verification.

pub mod credentials;
pub mod repository;
pub mod service;
