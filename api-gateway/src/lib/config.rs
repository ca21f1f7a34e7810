use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for api-gateway.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub gateway: GatewayConfig,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Token verification configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Base64-encoded HMAC key shared with the auth service
    pub secret: String,
}

/// Routing configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// Path prefixes forwarded without a bearer token
    #[serde(default = "default_public_prefixes")]
    pub public_prefixes: Vec<String>,
    pub routes: Vec<RouteConfig>,
}

/// Path prefix served by an upstream base URL.
#[derive(Debug, Deserialize, Clone)]
pub struct RouteConfig {
    pub prefix: String,
    pub upstream: String,
}

fn default_public_prefixes() -> Vec<String> {
    vec!["/auth/".to_string()]
}

impl Config {
    /// Load configuration from `config/default.toml`, `config/{RUN_MODE}.toml`
    /// and `__`-separated environment variables, in increasing priority.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}
