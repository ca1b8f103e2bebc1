use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::apply_security_headers;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_MAIL_FROM: &str = "band@localhost";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub server_addr: SocketAddr,
    pub jwt_secret: String,
    /// Mail relay endpoint; notifications are only logged when absent.
    pub notify_url: Option<String>,
    pub mail_from: String,
    pub cors_allowed_origins: Option<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let max_connections = match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: raw.clone(),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let raw_addr =
            optional("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());
        let server_addr = raw_addr.trim().parse().map_err(|_| ConfigError::Invalid {
            key: "SERVER_ADDR",
            value: raw_addr.clone(),
        })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            max_connections,
            server_addr,
            jwt_secret: required("JWT_SECRET")?,
            notify_url: optional("NOTIFY_URL"),
            mail_from: optional("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            cors_allowed_origins: optional("CORS_ALLOWED_ORIGINS"),
            production: optional("RUST_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/band"),
            ("JWT_SECRET", "secret"),
        ])
        .unwrap();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.server_addr, DEFAULT_SERVER_ADDR.parse().unwrap());
        assert_eq!(config.notify_url, None);
        assert_eq!(config.mail_from, DEFAULT_MAIL_FROM);
        assert!(!config.production);
    }

    #[test]
    fn test_missing_secret() {
        let err = config_from(&[("DATABASE_URL", "postgres://localhost/band")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_invalid_pool_size() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://localhost/band"),
            ("JWT_SECRET", "secret"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                ..
            }
        ));
    }

    #[test]
    fn test_production_and_relay() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/band"),
            ("JWT_SECRET", "secret"),
            ("RUST_ENV", "Production"),
            ("NOTIFY_URL", "http://relay.local/send"),
            ("SERVER_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();

        assert!(config.production);
        assert_eq!(config.notify_url.as_deref(), Some("http://relay.local/send"));
        assert_eq!(config.server_addr.port(), 8080);
    }
}
