//! Conversation persistence and the chat use cases.

pub mod repository;
pub mod service;
