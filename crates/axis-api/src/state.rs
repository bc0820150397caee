//! Application state wiring all services together.
//!
//! Services are generic over store/backend/credential traits; AppState pins
//! them to the concrete infra implementations chosen by configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axis_core::auth::service::AuthService;
use axis_core::chat::service::{ChatService, ChatTimeouts};
use axis_core::llm::backend::CatalogBackend;
use axis_core::llm::box_provider::BoxCompletionClient;
use axis_infra::crypto::password::Argon2Hasher;
use axis_infra::crypto::token::JwtTokenIssuer;
use axis_infra::database::Database;
use axis_infra::llm::{build_catalog, create_client};
use axis_types::config::AppConfig;
use secrecy::ExposeSecret;
use tracing::info;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<Database, CatalogBackend<BoxCompletionClient>>;

pub type ConcreteAuthService = AuthService<Database, Argon2Hasher, JwtTokenIssuer>;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub auth_service: Arc<ConcreteAuthService>,
    pub database: Database,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Open the configured store and model client, then wire services.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let database = Database::connect(&config.database)
            .await
            .context("failed to open database")?;
        let client = create_client(&config.model).context("failed to create model client")?;
        Self::build(config, database, client)
    }

    /// Wire services over an already-open store and client.
    pub fn build(
        config: AppConfig,
        database: Database,
        client: BoxCompletionClient,
    ) -> anyhow::Result<Self> {
        let catalog = Arc::new(build_catalog(&config.model));
        info!(models = catalog.len(), "model catalog loaded");

        let timeouts = ChatTimeouts {
            generation: Duration::from_secs(config.model.timeout_secs),
            ..ChatTimeouts::default()
        };
        let chat_service = ChatService::new(
            database.clone(),
            CatalogBackend::new(catalog, client),
            timeouts,
        );

        let secret = config
            .auth
            .jwt_secret
            .as_ref()
            .context("auth.jwt_secret is required")?;
        let ttl_secs = i64::try_from(config.auth.token_ttl_secs)
            .context("auth.token_ttl_secs is out of range")?;
        let tokens = JwtTokenIssuer::new(secret.expose_secret().as_bytes(), ttl_secs);
        let hasher = Argon2Hasher::new(config.auth.argon2_memory_kib, config.auth.argon2_iterations)
            .context("invalid argon2 parameters")?;
        let auth_service = AuthService::new(database.clone(), hasher, tokens, timeouts.storage);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            auth_service: Arc::new(auth_service),
            database,
            config: Arc::new(config),
        })
    }
}
