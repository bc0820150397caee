//! Route handlers. Each one delegates to the request pipeline or, for
//! health, answers directly.

pub mod auth;
pub mod chat;
pub mod health;
