use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;

use pantry_upstream::DEFAULT_BASE_URL;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_PORT: u16 = 5001;

/// Server configuration, loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub api_key: String,
    pub upstream_base_url: String,
    pub frontend_origin: HeaderValue,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = var("SPOONACULAR_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("SPOONACULAR_API_KEY"))?;

        let listen_addr = match var("PANTRY_LISTEN_ADDR") {
            Some(addr) => addr.parse().map_err(|_| {
                ConfigError::Invalid("PANTRY_LISTEN_ADDR", "must be a valid socket address")
            })?,
            None => {
                let port = match var("PORT") {
                    Some(p) => p
                        .parse::<u16>()
                        .map_err(|_| ConfigError::Invalid("PORT", "must be a valid port"))?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        let upstream_base_url =
            var("SPOONACULAR_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let frontend_origin = var("FRONTEND_URL")
            .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string())
            .trim_end_matches('/')
            .parse::<HeaderValue>()
            .map_err(|_| ConfigError::Invalid("FRONTEND_URL", "must be a valid origin"))?;

        Ok(Config {
            listen_addr,
            api_key,
            upstream_base_url,
            frontend_origin,
        })
    }

    /// CORS policy admitting only the configured frontend, with credentials.
    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(self.frontend_origin.clone())
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    }
}

// The API key stays out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("listen_addr", &self.listen_addr)
            .field("api_key", &"<redacted>")
            .field("upstream_base_url", &self.upstream_base_url)
            .field("frontend_origin", &self.frontend_origin)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, &'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(var) => {
                write!(f, "Missing required environment variable: {}", var)
            }
            ConfigError::Invalid(var, msg) => write!(f, "Invalid value for {}: {}", var, msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_missing_api_key() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SPOONACULAR_API_KEY")));

        let err = load(&[("SPOONACULAR_API_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("SPOONACULAR_API_KEY", "secret")]).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:5001".parse().unwrap());
        assert_eq!(config.upstream_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.frontend_origin, "http://localhost:3000");
    }

    #[test]
    fn test_port_and_listen_addr() {
        let config = load(&[("SPOONACULAR_API_KEY", "k"), ("PORT", "8080")]).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);

        let config = load(&[
            ("SPOONACULAR_API_KEY", "k"),
            ("PORT", "8080"),
            ("PANTRY_LISTEN_ADDR", "127.0.0.1:9000"),
        ])
        .unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9000".parse().unwrap());

        let err = load(&[("SPOONACULAR_API_KEY", "k"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("PORT", _)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = load(&[("SPOONACULAR_API_KEY", "super-secret")]).unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
