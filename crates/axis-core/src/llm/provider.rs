//! CompletionClient trait definition.
//!
//! This is the wire-protocol seam every model client implements. Uses RPITIT
//! for `complete`; `BoxCompletionClient` adds dynamic dispatch on top.

use axis_types::llm::LlmError;

/// Trait for completion backends (OpenRouter, local echo, etc.).
///
/// Implementations live in axis-infra (e.g., `OpenRouterClient`).
pub trait CompletionClient: Send + Sync {
    /// Human-readable provider name (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send a single user message to `model` and return the response text.
    fn complete(
        &self,
        model: &str,
        message: &str,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
