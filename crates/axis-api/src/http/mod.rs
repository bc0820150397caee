//! HTTP/REST API layer for Axis.
//!
//! Axum-based REST API at `/api/v1/` with cookie authentication and the
//! `{code, message, status, ...}` error envelope.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod pipeline;
pub mod router;
