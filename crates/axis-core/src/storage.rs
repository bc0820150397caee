//! Storage health probes.

use std::future::Future;

use axis_types::error::RepositoryError;

/// Lifecycle and liveness checks for the configured store.
pub trait StorageProbe: Send + Sync {
    /// Whether the store finished startup (pools open, schema applied).
    fn is_initialized(&self) -> bool;

    /// Round-trip a trivial query.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Release connections. Called once on shutdown.
    fn close(&self) -> impl Future<Output = ()> + Send;
}
