//! Chat service: model listing, chat turns, and history reads.
//!
//! Every outbound call is bounded by a deadline and the request's
//! cancellation token. Storage deadlines surface as
//! [`RepositoryError::Timeout`]; model deadlines and cancellations surface as
//! internal errors.

use std::time::Duration;

use axis_types::chat::{ChatRequest, ConversationRecord, ModelAlias, NewConversation};
use axis_types::error::{HttpError, RepositoryError, ServiceError};
use axis_types::pagination::{HistoryQuery, PagedResult};
use tracing::{info, warn};

use crate::chat::repository::ConversationStore;
use crate::context::{Interrupted, RequestContext};
use crate::llm::backend::ModelBackend;

/// Deadlines for the calls a chat request makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTimeouts {
    pub storage: Duration,
    pub listing: Duration,
    pub generation: Duration,
}

impl Default for ChatTimeouts {
    fn default() -> Self {
        Self {
            storage: Duration::from_secs(10),
            listing: Duration::from_secs(60),
            generation: Duration::from_secs(120),
        }
    }
}

/// Orchestrates model calls and conversation persistence.
///
/// Generic over `ConversationStore` and `ModelBackend` to maintain clean
/// architecture (axis-core never depends on axis-infra).
pub struct ChatService<S: ConversationStore, M: ModelBackend> {
    store: S,
    backend: M,
    timeouts: ChatTimeouts,
}

impl<S: ConversationStore, M: ModelBackend> ChatService<S, M> {
    pub fn new(store: S, backend: M, timeouts: ChatTimeouts) -> Self {
        Self {
            store,
            backend,
            timeouts,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn backend(&self) -> &M {
        &self.backend
    }

    /// The alias table offered to clients.
    pub async fn available_models(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<ModelAlias>, ServiceError> {
        ctx.bounded(self.timeouts.listing, self.backend.available_models())
            .await
            .map_err(|cause| interrupted(ctx, "list_models", cause).into())
    }

    /// Send one message to a model and record the exchange.
    ///
    /// `request` must already be validated and defaulted. The record is only
    /// written after a successful generation.
    pub async fn chat(
        &self,
        ctx: &RequestContext,
        request: ChatRequest,
    ) -> Result<ConversationRecord, ServiceError> {
        let user_id = ctx.require_user()?;

        let generation = ctx
            .bounded(
                self.timeouts.generation,
                self.backend
                    .generate_response(&request.model, &request.message),
            )
            .await
            .map_err(|cause| interrupted(ctx, "generate_response", cause))??;

        let draft = NewConversation {
            user_id,
            text_query: request.message,
            response_text: generation.text,
            llm_model_name: request.model,
        };

        let record = ctx
            .bounded(self.timeouts.storage, self.store.append(draft))
            .await
            .map_err(|cause| storage_interrupted(ctx, "append_conversation", cause))??;

        info!(
            request_id = %ctx.request_id,
            conversation_id = %record.id,
            model = %record.llm_model_name,
            elapsed_secs = generation.elapsed.as_secs_f64(),
            "conversation recorded"
        );
        Ok(record)
    }

    /// A page of the caller's history, newest first.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        query: HistoryQuery,
    ) -> Result<PagedResult<ConversationRecord>, ServiceError> {
        let user_id = ctx.require_user()?;
        let page = ctx
            .bounded(self.timeouts.storage, self.store.page(user_id, &query))
            .await
            .map_err(|cause| storage_interrupted(ctx, "page_conversations", cause))??;
        Ok(page)
    }
}

fn interrupted(ctx: &RequestContext, operation: &'static str, cause: Interrupted) -> HttpError {
    warn!(request_id = %ctx.request_id, operation, %cause, "operation interrupted");
    HttpError::internal()
}

fn storage_interrupted(
    ctx: &RequestContext,
    operation: &'static str,
    cause: Interrupted,
) -> ServiceError {
    match cause {
        Interrupted::TimedOut(_) => {
            warn!(request_id = %ctx.request_id, operation, %cause, "storage call timed out");
            RepositoryError::Timeout.into()
        }
        Interrupted::Cancelled => interrupted(ctx, operation, cause).into(),
    }
}
