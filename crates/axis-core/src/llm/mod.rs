//! Model backend abstractions for Axis.
//!
//! - `CompletionClient`: RPITIT trait for concrete wire-protocol clients
//! - `BoxCompletionClient`: object-safe wrapper for runtime client selection
//! - `ModelCatalog`: immutable alias -> backend model identifier table
//! - `ModelBackend` / `CatalogBackend`: alias dispatch used by the chat service

pub mod backend;
pub mod box_provider;
pub mod catalog;
pub mod provider;
