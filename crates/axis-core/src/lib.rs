//! Business logic and repository trait definitions for Axis.
//!
//! This crate defines the "ports" (store, backend, and credential traits)
//! that the infrastructure layer implements. It depends only on `axis-types`
//! -- never on `axis-infra` or any database/IO crate.

pub mod auth;
pub mod chat;
pub mod context;
pub mod llm;
pub mod storage;
pub mod validation;
