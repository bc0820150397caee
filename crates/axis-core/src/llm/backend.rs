//! Model dispatch: resolve an alias, call the client, classify the outcome.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axis_types::chat::{Generation, ModelAlias};
use axis_types::error::{HttpError, INVALID_MODEL_NAME};
use tracing::{Instrument, error, info, info_span};

use super::catalog::ModelCatalog;
use super::provider::CompletionClient;

/// What the chat service needs from a model backend.
pub trait ModelBackend: Send + Sync {
    /// The full alias table. Infallible.
    fn available_models(&self) -> impl Future<Output = Vec<ModelAlias>> + Send;

    /// Generate a response to `message` using the model behind `alias`.
    ///
    /// Unknown aliases fail with a `NotFound` (`INVALID_MODEL_NAME`) without
    /// contacting the backend. Backend failures are logged and reported as a
    /// generic internal error.
    fn generate_response(
        &self,
        alias: &str,
        message: &str,
    ) -> impl Future<Output = Result<Generation, HttpError>> + Send;
}

/// [`ModelBackend`] over a [`ModelCatalog`] and a [`CompletionClient`].
pub struct CatalogBackend<C: CompletionClient> {
    catalog: Arc<ModelCatalog>,
    client: C,
}

impl<C: CompletionClient> CatalogBackend<C> {
    pub fn new(catalog: Arc<ModelCatalog>, client: C) -> Self {
        Self { catalog, client }
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }
}

impl<C: CompletionClient> ModelBackend for CatalogBackend<C> {
    async fn available_models(&self) -> Vec<ModelAlias> {
        self.catalog.aliases()
    }

    async fn generate_response(&self, alias: &str, message: &str) -> Result<Generation, HttpError> {
        let Some(model) = self.catalog.resolve(alias) else {
            return Err(HttpError::not_found_with_code(
                format!("no such model found: {alias}"),
                INVALID_MODEL_NAME,
            ));
        };

        let span = info_span!(
            "chat",
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %self.client.name(),
            gen_ai.request.model = %model,
            axis.model_alias = %alias,
        );

        let start = Instant::now();
        let result = self.client.complete(model, message).instrument(span).await;
        let elapsed = start.elapsed();

        match result {
            Ok(text) => {
                info!(
                    alias,
                    model,
                    elapsed_secs = elapsed.as_secs_f64(),
                    "model response generated"
                );
                Ok(Generation { text, elapsed })
            }
            Err(err) => {
                error!(
                    alias,
                    model,
                    provider = %self.client.name(),
                    elapsed_secs = elapsed.as_secs_f64(),
                    error = %err,
                    "model response generation failed"
                );
                Err(HttpError::internal())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axis_types::error::ErrorKind;
    use axis_types::llm::LlmError;

    struct CountingClient {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl CountingClient {
        fn new(fail: bool) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    calls: calls.clone(),
                    fail,
                },
                calls,
            )
        }
    }

    impl CompletionClient for CountingClient {
        fn name(&self) -> &str {
            "counting"
        }

        async fn complete(&self, model: &str, message: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LlmError::Provider {
                    message: "upstream unavailable".into(),
                });
            }
            Ok(format!("{model} says {message}"))
        }
    }

    fn catalog() -> Arc<ModelCatalog> {
        Arc::new(ModelCatalog::new([
            ("llama-70b", "meta-llama/llama-3.3-70b-instruct:free"),
            ("qwen3", "qwen/qwen3-coder:free"),
        ]))
    }

    #[tokio::test]
    async fn test_known_alias_resolves_to_model_id() {
        let (client, calls) = CountingClient::new(false);
        let backend = CatalogBackend::new(catalog(), client);
        let generation = backend.generate_response("qwen3", "hi").await.unwrap();
        assert_eq!(generation.text, "qwen/qwen3-coder:free says hi");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_alias_skips_backend() {
        let (client, calls) = CountingClient::new(false);
        let backend = CatalogBackend::new(catalog(), client);
        let err = backend.generate_response("gpt-9", "hi").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), "INVALID_MODEL_NAME");
        assert_eq!(err.message(), "no such model found: gpt-9");
        assert!(!err.is_retryable());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_is_internal() {
        let (client, calls) = CountingClient::new(true);
        let backend = CatalogBackend::new(catalog(), client);
        let err = backend.generate_response("llama-70b", "hi").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), "Internal Server Error");
        assert!(!err.message().contains("upstream"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_available_models_lists_catalog() {
        let (client, _) = CountingClient::new(false);
        let backend = CatalogBackend::new(catalog(), client);
        let mut models = backend.available_models().await;
        models.sort();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].name, "llama-70b");
    }
}
