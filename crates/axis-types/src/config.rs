//! Service configuration types for Axis.
//!
//! `AppConfig` represents the `axis.toml` file. Every field has a default so
//! an empty file (or no file) yields a runnable development setup, apart from
//! the signing secret which must always be supplied.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::chat::DEFAULT_MODEL_ALIAS;

/// Errors raised while loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub model: ModelConfig,
    pub auth: AuthConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Reject settings the service cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret_missing = self
            .auth
            .jwt_secret
            .as_ref()
            .is_none_or(|s| s.expose_secret().trim().is_empty());
        if secret_missing {
            return Err(ConfigError::Invalid(
                "auth.jwt_secret is required (or set AXIS_JWT_SECRET)".into(),
            ));
        }
        if self.auth.token_ttl_secs == 0 {
            return Err(ConfigError::Invalid("auth.token_ttl_secs must be > 0".into()));
        }
        if self.database.kind == DatabaseKind::Sqlite {
            if self.database.max_connections == 0 {
                return Err(ConfigError::Invalid(
                    "database.max_connections must be > 0".into(),
                ));
            }
            if self.database.url.trim().is_empty() {
                return Err(ConfigError::Invalid("database.url is required".into()));
            }
        }
        if self.model.provider == ModelProvider::OpenRouter && self.model.api_key.is_none() {
            return Err(ConfigError::Invalid(
                "model.api_key is required for the openrouter provider (or set AXIS_MODEL_API_KEY)"
                    .into(),
            ));
        }
        if self.model.timeout_secs == 0 {
            return Err(ConfigError::Invalid("model.timeout_secs must be > 0".into()));
        }
        if let Some(aliases) = &self.model.aliases {
            if aliases.is_empty() {
                return Err(ConfigError::Invalid(
                    "model.aliases must name at least one model when present".into(),
                ));
            }
            if !aliases.contains_key(DEFAULT_MODEL_ALIAS) {
                return Err(ConfigError::Invalid(format!(
                    "model.aliases must include the fallback alias '{DEFAULT_MODEL_ALIAS}'"
                )));
            }
        }
        if !LOG_LEVELS.contains(&self.observability.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "observability.log_level '{}' is not one of {}",
                self.observability.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to make credentialed cross-origin requests.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// Which conversation store backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    Sqlite,
    Memory,
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::Sqlite => write!(f, "sqlite"),
            DatabaseKind::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub kind: DatabaseKind,
    /// sqlx connection URL, e.g. `sqlite://axis.db?mode=rwc`.
    pub url: String,
    /// Size of the read pool. Writes always go through a single connection.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: DatabaseKind::Sqlite,
            url: "sqlite://axis.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Which completion client answers chat requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    #[default]
    OpenRouter,
    /// Offline client that echoes the prompt back. Development only.
    Echo,
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelProvider::OpenRouter => write!(f, "openrouter"),
            ModelProvider::Echo => write!(f, "echo"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub provider: ModelProvider,
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    /// Upper bound on a single generation call.
    pub timeout_secs: u64,
    /// Replaces the built-in alias table when set.
    pub aliases: Option<BTreeMap<String, String>>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ModelProvider::OpenRouter,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: None,
            timeout_secs: 120,
            aliases: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    #[serde(deserialize_with = "deserialize_secret")]
    pub jwt_secret: Option<SecretString>,
    pub token_ttl_secs: u64,
    /// Mark the access cookie `Secure` (enable behind TLS).
    pub secure_cookie: bool,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: 24 * 60 * 60,
            secure_cookie: false,
            argon2_memory_kib: 19 * 1024,
            argon2_iterations: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Export spans through OpenTelemetry (stdout exporter).
    pub otel: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            otel: false,
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(SecretString::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some(SecretString::from("test-secret"));
        config.model.provider = ModelProvider::Echo;
        config
    }

    #[test]
    fn test_defaults_from_empty_toml() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.kind, DatabaseKind::Sqlite);
        assert_eq!(config.model.timeout_secs, 120);
        assert_eq!(config.observability.log_level, "info");
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn test_deserialize_with_values() {
        let toml_str = r#"
[server]
port = 9000
cors_allowed_origins = ["https://app.example.com"]

[database]
kind = "memory"

[model]
provider = "echo"
api_key = "sk-or-test"

[model.aliases]
llama-70b = "vendor/large:free"
small = "vendor/small:free"

[auth]
jwt_secret = "s3cret"

[observability]
log_format = "json"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_allowed_origins, vec!["https://app.example.com"]);
        assert_eq!(config.database.kind, DatabaseKind::Memory);
        assert_eq!(config.model.provider, ModelProvider::Echo);
        assert_eq!(
            config.model.api_key.as_ref().map(|k| k.expose_secret().to_owned()),
            Some("sk-or-test".to_string())
        );
        assert_eq!(config.model.aliases.as_ref().unwrap().len(), 2);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_database_kind_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[database]\nkind = \"postgres\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_requires_secret() {
        let mut config = valid();
        config.auth.jwt_secret = None;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_requires_api_key_for_openrouter() {
        let mut config = valid();
        config.model.provider = ModelProvider::OpenRouter;
        assert!(config.validate().is_err());
        config.model.api_key = Some(SecretString::from("sk-or"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_log_level() {
        let mut config = valid();
        config.observability.log_level = "loud".into();
        assert!(config.validate().is_err());
        config.observability.log_level = "DEBUG".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_pool_size() {
        let mut config = valid();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
        config.database.kind = DatabaseKind::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_aliases_must_keep_fallback() {
        let mut config = valid();
        config.model.aliases = Some(BTreeMap::new());
        assert!(config.validate().is_err());

        config.model.aliases = Some(BTreeMap::from([(
            "tiny".to_string(),
            "vendor/tiny".to_string(),
        )]));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(DEFAULT_MODEL_ALIAS));

        config
            .model
            .aliases
            .as_mut()
            .unwrap()
            .insert(DEFAULT_MODEL_ALIAS.to_string(), "vendor/large".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let config = valid();
        assert!(!format!("{config:?}").contains("test-secret"));
    }
}
