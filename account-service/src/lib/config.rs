use std::env;

use auth::AuthConfig;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for account-service.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

/// PostgreSQL configuration. No `url` means the in-memory store.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

/// Unprefixed, `__`-separated variables.
/// Example: DATABASE__URL=postgres://... overrides database.url
fn environment() -> Environment {
    Environment::default().separator("__")
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. `JWT_SECRET` (overrides auth.jwt_secret)
    /// 2. Environment variables (AUTH__JWT_SECRET, SERVER__HTTP_PORT, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        Self::load_from(&run_mode, environment(), env::var("JWT_SECRET").ok())
    }

    fn load_from(
        run_mode: &str,
        environment: Environment,
        jwt_secret: Option<String>,
    ) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(environment)
            .set_override_option("auth.jwt_secret", jwt_secret)?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret must not be empty".to_string(),
            ));
        }
        if self.auth.token_ttl_seconds <= 0 {
            return Err(ConfigError::Message(
                "auth.token_ttl_seconds must be positive".to_string(),
            ));
        }
        if !self.server.api_prefix.starts_with('/') {
            return Err(ConfigError::Message(
                "server.api_prefix must start with '/'".to_string(),
            ));
        }
        Ok(())
    }
}
