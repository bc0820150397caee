//! Chat handlers: model listing, chat turns, and paginated history.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use axis_types::chat::{ChatRequest, ModelsQuery};
use axis_types::pagination::HistoryQuery;

use crate::http::error::AppError;
use crate::http::extractors::context::RequestScope;
use crate::http::pipeline;
use crate::state::AppState;

/// GET /api/v1/chat/models - The alias table.
pub async fn list_models(
    State(state): State<AppState>,
    RequestScope(ctx): RequestScope,
    request: Request,
) -> Result<Response, AppError> {
    pipeline::handle("list_models", request, StatusCode::OK, |_: ModelsQuery| async move {
        Ok(state.chat_service.available_models(&ctx).await?)
    })
    .await
}

/// POST /api/v1/chat - Send a message and record the exchange.
pub async fn chat(
    State(state): State<AppState>,
    RequestScope(ctx): RequestScope,
    request: Request,
) -> Result<Response, AppError> {
    pipeline::handle("chat", request, StatusCode::OK, |req: ChatRequest| async move {
        Ok(state.chat_service.chat(&ctx, req).await?)
    })
    .await
}

/// GET /api/v1/chat/history?page=&limit= - The caller's history, newest first.
pub async fn history(
    State(state): State<AppState>,
    RequestScope(ctx): RequestScope,
    request: Request,
) -> Result<Response, AppError> {
    pipeline::handle("history", request, StatusCode::OK, |query: HistoryQuery| async move {
        Ok(state.chat_service.history(&ctx, query).await?)
    })
    .await
}
