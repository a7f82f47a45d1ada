//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration.
///
/// JWT signing settings and OAuth clients are read by their own services
/// (`JwtTokenService::from_env`, `EnvClientRegistry::from_env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// JSON file with the establishment directory to serve.
    pub establishments_file: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            establishments_file: lookup("ESTABLISHMENTS_FILE").filter(|p| !p.trim().is_empty()),
        }
    }
}
