use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Deployment mode, selected by the `RUN_MODE` environment variable.
/// Production enables pool auto-heal and masks internal error detail from
/// API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Development,
    #[serde(alias = "prod")]
    Production,
}

impl RunMode {
    pub fn is_production(&self) -> bool {
        *self == RunMode::Production
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub run_mode: RunMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string. Required; there is no usable default, and a
    /// missing value fails configuration loading at process start.
    pub url: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_seconds: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_body_limit() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    30
}

fn default_max_lifetime() -> u64 {
    300
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        // Anything other than production behaves as development
        let normalized_mode = match run_mode.as_str() {
            "production" | "prod" => "production",
            _ => "development",
        };

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.request_timeout_seconds", 30)?
            .set_default("server.body_limit_bytes", 1024 * 1024)?
            .set_default("database.connect_timeout_seconds", 10)?
            .set_default("database.idle_timeout_seconds", 30)?
            .set_default("database.max_lifetime_seconds", 300)?
            .set_override("run_mode", normalized_mode)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER_HOST, SERVER_PORT, DATABASE_URL, etc.
            .add_source(
                Environment::default()
                    .separator("_")
                    .try_parsing(true)
                    .list_separator(","),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            request_timeout_seconds: default_request_timeout(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 3000);
        assert_eq!(server.request_timeout_seconds, 30);
        assert_eq!(server.body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn test_run_mode_parsing() {
        let mode: RunMode = serde_json::from_str("\"production\"").unwrap();
        assert!(mode.is_production());

        let mode: RunMode = serde_json::from_str("\"prod\"").unwrap();
        assert!(mode.is_production());

        let mode: RunMode = serde_json::from_str("\"development\"").unwrap();
        assert!(!mode.is_production());
    }

    #[test]
    fn test_database_config_defaults_via_serde() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{"url": "postgres://localhost/signet"}"#).unwrap();
        assert_eq!(config.connect_timeout_seconds, 10);
        assert_eq!(config.idle_timeout_seconds, 30);
        assert_eq!(config.max_lifetime_seconds, 300);
    }

    #[test]
    fn test_database_url_is_required() {
        let result: Result<DatabaseConfig, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }
}
