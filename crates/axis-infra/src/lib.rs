//! Infrastructure implementations for Axis.
//!
//! Concrete adapters for the traits defined in `axis-core`: SQLite and
//! in-memory stores, model completion clients, password hashing, access
//! tokens, and the configuration loader.

pub mod config;
pub mod crypto;
pub mod database;
pub mod llm;
pub mod memory;
pub mod sqlite;
