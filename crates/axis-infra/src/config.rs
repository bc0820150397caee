//! Configuration loader for Axis.
//!
//! Reads a TOML file into [`AppConfig`], layers a small set of environment
//! overrides on top (secrets and the database URL), then validates.

use std::path::{Path, PathBuf};

use axis_types::config::{AppConfig, ConfigError};
use secrecy::SecretString;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "axis.toml";

pub const ENV_JWT_SECRET: &str = "AXIS_JWT_SECRET";
pub const ENV_MODEL_API_KEY: &str = "AXIS_MODEL_API_KEY";
pub const ENV_DATABASE_URL: &str = "AXIS_DATABASE_URL";

/// Load, override from the process environment, and validate.
///
/// - An explicit `path` must exist.
/// - Without one, `./axis.toml` is used if present, otherwise defaults.
pub async fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = read_config(path).await?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

async fn read_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (config_path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!("No {} found, using defaults", config_path.display());
            return Ok(AppConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: config_path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    let config = toml::from_str::<AppConfig>(&content)
        .map_err(|e| ConfigError::Parse(format!("{}: {e}", config_path.display())))?;
    tracing::debug!("Loaded configuration from {}", config_path.display());
    Ok(config)
}

/// Apply environment overrides. `lookup` resolves a variable name; empty
/// values are ignored.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(secret) = lookup(ENV_JWT_SECRET) {
        config.auth.jwt_secret = Some(SecretString::from(secret));
    }
    if let Some(api_key) = lookup(ENV_MODEL_API_KEY) {
        config.model.api_key = Some(SecretString::from(api_key));
    }
    if let Some(url) = lookup(ENV_DATABASE_URL) {
        config.database.url = url;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axis_types::config::{DatabaseKind, ModelProvider};
    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::*;

    const VALID: &str = r#"
[database]
kind = "memory"

[model]
provider = "echo"

[auth]
jwt_secret = "from-file"
"#;

    #[tokio::test]
    async fn test_load_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("axis.toml");
        tokio::fs::write(&path, VALID).await.unwrap();

        let config = read_config(Some(&path)).await.unwrap();
        assert_eq!(config.database.kind, DatabaseKind::Memory);
        assert_eq!(config.model.provider, ModelProvider::Echo);
        config.validate().unwrap();
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_config(Some(&tmp.path().join("nope.toml")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("axis.toml");
        tokio::fs::write(&path, "[server\nport = ").await.unwrap();
        let err = read_config(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_JWT_SECRET, "from-env"),
            (ENV_MODEL_API_KEY, "sk-or-env"),
            (ENV_DATABASE_URL, "sqlite://env.db?mode=rwc"),
        ]);
        let mut config: AppConfig = toml::from_str(VALID).unwrap();
        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        let secret = config.auth.jwt_secret.as_ref().unwrap();
        assert_eq!(secret.expose_secret(), "from-env");
        assert_eq!(
            config.model.api_key.as_ref().unwrap().expose_secret(),
            "sk-or-env"
        );
        assert_eq!(config.database.url, "sqlite://env.db?mode=rwc");
    }

    #[test]
    fn test_empty_env_value_ignored() {
        let mut config: AppConfig = toml::from_str(VALID).unwrap();
        apply_env_overrides(&mut config, |key| {
            (key == ENV_JWT_SECRET).then(|| "  ".to_string())
        });
        assert_eq!(
            config.auth.jwt_secret.as_ref().unwrap().expose_secret(),
            "from-file"
        );
    }
}
