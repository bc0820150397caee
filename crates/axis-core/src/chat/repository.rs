//! ConversationStore trait definition.

use axis_types::chat::{ConversationRecord, NewConversation};
use axis_types::error::RepositoryError;
use axis_types::pagination::{HistoryQuery, PagedResult};
use uuid::Uuid;

/// Repository trait for conversation history.
///
/// Implementations live in axis-infra (`SqliteConversationStore`,
/// `MemoryStore`). Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ConversationStore: Send + Sync {
    /// Persist one exchange. The store assigns `id` and `timestamp` as part
    /// of the write and returns the stored record.
    ///
    /// A write that reports no affected row fails with
    /// [`RepositoryError::NoRowsAffected`]. No retries.
    fn append(
        &self,
        conversation: NewConversation,
    ) -> impl std::future::Future<Output = Result<ConversationRecord, RepositoryError>> + Send;

    /// One page of a user's history, newest first (ties broken by id, newest first).
    ///
    /// The row fetch and the total count are separate reads; a concurrent
    /// append between them can make `total` disagree with `data`.
    fn page(
        &self,
        user_id: Uuid,
        query: &HistoryQuery,
    ) -> impl std::future::Future<Output = Result<PagedResult<ConversationRecord>, RepositoryError>> + Send;
}
