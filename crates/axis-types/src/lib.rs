//! Shared domain types for Axis.
//!
//! This crate contains the domain types used across the Axis service:
//! conversation records, pagination, users, configuration, and the error
//! taxonomy every layer reports through.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror,
//! validator, secrecy.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod pagination;
pub mod user;
