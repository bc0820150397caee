//! Model completion clients.
//!
//! Concrete implementations of the [`CompletionClient`] trait defined in
//! `axis-core`, plus the factory that picks one from configuration and the
//! catalog builder.
//!
//! [`CompletionClient`]: axis_core::llm::provider::CompletionClient

pub mod echo;
pub mod openrouter;

use axis_core::llm::box_provider::BoxCompletionClient;
use axis_core::llm::catalog::ModelCatalog;
use axis_types::config::{ModelConfig, ModelProvider};
use axis_types::llm::LlmError;
use secrecy::ExposeSecret;

use self::echo::EchoClient;
use self::openrouter::OpenRouterClient;

/// Create a [`BoxCompletionClient`] for the configured provider.
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when the provider needs an API
/// key and none is configured.
pub fn create_client(config: &ModelConfig) -> Result<BoxCompletionClient, LlmError> {
    match config.provider {
        ModelProvider::OpenRouter => {
            let key = config
                .api_key
                .as_ref()
                .ok_or(LlmError::AuthenticationFailed)?;
            let client = OpenRouterClient::new(&config.base_url, key.expose_secret());
            Ok(BoxCompletionClient::new(client))
        }
        ModelProvider::Echo => Ok(BoxCompletionClient::new(EchoClient)),
    }
}

/// The alias table: `model.aliases` when configured, the built-in table otherwise.
pub fn build_catalog(config: &ModelConfig) -> ModelCatalog {
    match &config.aliases {
        Some(aliases) => ModelCatalog::new(aliases.clone()),
        None => openrouter::catalog::default_catalog(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use axis_core::llm::provider::CompletionClient;
    use secrecy::SecretString;

    #[test]
    fn test_create_openrouter_requires_key() {
        let config = ModelConfig::default();
        assert!(matches!(
            create_client(&config),
            Err(LlmError::AuthenticationFailed)
        ));

        let config = ModelConfig {
            api_key: Some(SecretString::from("sk-or-test")),
            ..Default::default()
        };
        let client = create_client(&config).unwrap();
        assert_eq!(CompletionClient::name(&client), "openrouter");
    }

    #[test]
    fn test_create_echo() {
        let config = ModelConfig {
            provider: ModelProvider::Echo,
            ..Default::default()
        };
        let client = create_client(&config).unwrap();
        assert_eq!(CompletionClient::name(&client), "echo");
    }

    #[test]
    fn test_build_catalog() {
        assert_eq!(build_catalog(&ModelConfig::default()).len(), 11);

        let config = ModelConfig {
            aliases: Some(BTreeMap::from([("tiny".to_string(), "vendor/tiny".to_string())])),
            ..Default::default()
        };
        let catalog = build_catalog(&config);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve("tiny"), Some("vendor/tiny"));
    }
}
